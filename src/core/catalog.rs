use crate::utils::error::{EtlError, Result};
use std::sync::OnceLock;

/// 預設辨識的技能，順序即為輸出時的平手排序
pub const DEFAULT_SKILLS: [&str; 10] = [
    "python",
    "sql",
    "excel",
    "tableau",
    "power bi",
    "javascript",
    "react",
    "aws",
    "docker",
    "java",
];

/// 固定、有序、不重複的技能目錄；建立後不再變動
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillCatalog {
    skills: Vec<String>,
}

impl SkillCatalog {
    /// 從設定建立目錄：去除空白並轉小寫，拒絕空字串與重複項目
    pub fn new<I, S>(tokens: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut skills: Vec<String> = Vec::new();

        for token in tokens {
            let skill = token.as_ref().trim().to_lowercase();
            if skill.is_empty() {
                return Err(EtlError::InvalidConfigValueError {
                    field: "catalog.skills".to_string(),
                    value: token.as_ref().to_string(),
                    reason: "Skill tokens cannot be empty".to_string(),
                });
            }
            if skills.contains(&skill) {
                return Err(EtlError::InvalidConfigValueError {
                    field: "catalog.skills".to_string(),
                    value: skill,
                    reason: "Duplicate skill token".to_string(),
                });
            }
            skills.push(skill);
        }

        if skills.is_empty() {
            return Err(EtlError::InvalidConfigValueError {
                field: "catalog.skills".to_string(),
                value: String::new(),
                reason: "Catalog must contain at least one skill".to_string(),
            });
        }

        Ok(Self { skills })
    }

    /// 全行程共用的預設目錄
    pub fn standard() -> &'static SkillCatalog {
        static STANDARD: OnceLock<SkillCatalog> = OnceLock::new();
        STANDARD.get_or_init(|| SkillCatalog {
            skills: DEFAULT_SKILLS.iter().map(|s| s.to_string()).collect(),
        })
    }

    /// 空設定時回傳預設目錄的副本
    pub fn from_config(tokens: &[String]) -> Result<Self> {
        if tokens.is_empty() {
            Ok(Self::standard().clone())
        } else {
            Self::new(tokens)
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.skills.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    pub fn contains(&self, skill: &str) -> bool {
        self.position(skill).is_some()
    }

    pub fn position(&self, skill: &str) -> Option<usize> {
        self.skills.iter().position(|s| s == skill)
    }
}
