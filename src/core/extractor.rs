use crate::core::catalog::SkillCatalog;
use crate::domain::model::SkillSet;

/// 以不分大小寫的子字串比對，從文字中找出目錄裡的技能。
///
/// 不檢查字邊界：目錄中的 "java" 也會命中 "javascript"。
pub struct TextSkillExtractor<'a> {
    catalog: &'a SkillCatalog,
}

impl<'a> TextSkillExtractor<'a> {
    pub fn new(catalog: &'a SkillCatalog) -> Self {
        Self { catalog }
    }

    /// 缺漏的文字視為沒有技能；結果依目錄順序排列
    pub fn extract(&self, text: Option<&str>) -> SkillSet {
        let Some(text) = text else {
            return SkillSet::new();
        };

        let lowered = text.to_lowercase();
        self.catalog
            .iter()
            .filter(|skill| lowered.contains(skill))
            .collect()
    }
}
