use crate::domain::model::SalaryInput;
use regex::Regex;
use std::sync::OnceLock;

fn digit_runs() -> &'static Regex {
    static DIGITS: OnceLock<Regex> = OnceLock::new();
    // 只認 ASCII 數字；`\d` 會命中全形等 Unicode 數字
    DIGITS.get_or_init(|| Regex::new(r"[0-9]+").expect("static regex"))
}

/// 取薪資文字中第一段連續數字作為代表值（即區間下限），
/// 忽略幣別、期間與上限。
pub struct SalaryParser;

impl SalaryParser {
    pub fn parse(raw: &SalaryInput) -> Option<u64> {
        Self::parse_text(&raw.as_text())
    }

    /// 找不到數字或數字溢位時回傳 None
    pub fn parse_text(text: &str) -> Option<u64> {
        digit_runs()
            .find(text)
            .and_then(|m| m.as_str().parse::<u64>().ok())
    }
}
