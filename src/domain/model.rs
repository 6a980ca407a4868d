use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// 技能集合：不重複，保留插入順序（由目錄順序萃取時即為目錄順序）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkillSet(Vec<String>);

impl SkillSet {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// 已存在時回傳 false
    pub fn insert(&mut self, skill: impl Into<String>) -> bool {
        let skill = skill.into();
        if self.contains(&skill) {
            return false;
        }
        self.0.push(skill);
        true
    }

    pub fn contains(&self, skill: &str) -> bool {
        self.0.iter().any(|s| s == skill)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn intersection_count(&self, other: &SkillSet) -> usize {
        self.iter().filter(|skill| other.contains(skill)).count()
    }
}

impl<S: Into<String>> FromIterator<S> for SkillSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = SkillSet::new();
        for skill in iter {
            set.insert(skill);
        }
        set
    }
}

/// 以月份分組的鍵，顯示為 `YYYY-MM`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PostingMonth {
    pub year: i32,
    pub month: u32,
}

impl PostingMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for PostingMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl std::str::FromStr for PostingMonth {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (year, month) = s
            .split_once('-')
            .ok_or_else(|| format!("expected YYYY-MM, got '{}'", s))?;
        let year = year.parse().map_err(|_| format!("invalid year in '{}'", s))?;
        let month = month.parse().map_err(|_| format!("invalid month in '{}'", s))?;
        PostingMonth::new(year, month).ok_or_else(|| format!("month out of range in '{}'", s))
    }
}

impl Serialize for PostingMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for PostingMonth {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// 薪資欄位在邊界上可能是文字或數字
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SalaryInput {
    Text(String),
    /// 保留 JSON 數字原本的寫法，大整數不經過 f64
    Amount(serde_json::Number),
}

impl SalaryInput {
    /// 統一轉成文字再解析
    pub fn as_text(&self) -> String {
        match self {
            SalaryInput::Text(text) => text.clone(),
            SalaryInput::Amount(number) => number.to_string(),
        }
    }
}

/// 資料來源提供的原始職缺記錄，所有欄位皆可缺漏
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPosting {
    #[serde(default, deserialize_with = "lenient::text")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub company: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub location: String,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub date_posted: Option<String>,
    #[serde(default, alias = "salary_text", deserialize_with = "lenient::salary")]
    pub salary: Option<SalaryInput>,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub url: String,
}

mod lenient {
    use super::SalaryInput;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        Ok(match Option::<Value>::deserialize(deserializer)? {
            Some(Value::String(s)) => s,
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Bool(b)) => b.to_string(),
            _ => String::new(),
        })
    }

    // 非文字值（數字、物件等）視為缺漏
    pub fn optional_text<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<String>, D::Error> {
        Ok(match Option::<Value>::deserialize(deserializer)? {
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s),
            _ => None,
        })
    }

    pub fn salary<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<SalaryInput>, D::Error> {
        Ok(match Option::<Value>::deserialize(deserializer)? {
            Some(Value::String(s)) if !s.trim().is_empty() => Some(SalaryInput::Text(s)),
            Some(Value::Number(n)) => Some(SalaryInput::Amount(n)),
            _ => None,
        })
    }
}

/// 已標註的職缺：技能與薪資數值由描述與薪資文字推導，呼叫端不能直接指定
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Posting {
    pub title: String,
    pub company: String,
    pub location: String,
    pub date_posted: Option<NaiveDate>,
    pub salary_text: Option<String>,
    pub url: String,
    pub(crate) description: Option<String>,
    pub(crate) skills: SkillSet,
    pub(crate) salary_value: Option<u64>,
}

impl Posting {
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn skills(&self) -> &SkillSet {
        &self.skills
    }

    pub fn salary_value(&self) -> Option<u64> {
        self.salary_value
    }

    pub fn month(&self) -> Option<PostingMonth> {
        self.date_posted.map(PostingMonth::from_date)
    }
}

/// 由履歷文字推導的技能輪廓
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Candidate {
    pub resume_text: Option<String>,
    pub(crate) skills: SkillSet,
}

impl Candidate {
    pub fn skills(&self) -> &SkillSet {
        &self.skills
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillCount {
    pub skill: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillSalary {
    pub skill: String,
    pub average_salary: f64,
    /// 有可解析薪資的職缺數
    pub postings: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MarketSummary {
    /// 依數量遞減，同數量依目錄順序
    pub skill_counts: Vec<SkillCount>,
    /// 依目錄順序
    pub salary_by_skill: Vec<SkillSalary>,
    pub postings_by_period: BTreeMap<PostingMonth, usize>,
}

impl MarketSummary {
    pub fn count_for(&self, skill: &str) -> Option<usize> {
        self.skill_counts
            .iter()
            .find(|entry| entry.skill == skill)
            .map(|entry| entry.count)
    }

    pub fn average_salary_for(&self, skill: &str) -> Option<f64> {
        self.salary_by_skill
            .iter()
            .find(|entry| entry.skill == skill)
            .map(|entry| entry.average_salary)
    }

    pub fn postings_in(&self, month: PostingMonth) -> usize {
        self.postings_by_period.get(&month).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.skill_counts.is_empty()
            && self.salary_by_skill.is_empty()
            && self.postings_by_period.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    /// 在職缺集合中的位置
    pub posting_index: usize,
    pub title: String,
    pub company: String,
    pub location: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillGap {
    pub skill: String,
    pub demand: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendations {
    pub candidate_skills: SkillSet,
    pub ranked: Vec<MatchResult>,
    pub skill_gaps: Vec<SkillGap>,
}

impl Recommendations {
    pub fn top(&self, n: usize) -> &[MatchResult] {
        &self.ranked[..n.min(self.ranked.len())]
    }
}

/// 轉換階段的完整輸出
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub postings: Vec<Posting>,
    pub market: MarketSummary,
    pub recommendations: Option<Recommendations>,
}

/// 以列為單位的匯出表格
#[derive(Debug, Clone, PartialEq)]
pub struct ReportTable {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ReportTable {
    pub fn new(name: &str, headers: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// 職缺資料來源
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostingSource {
    CsvFile(String),
    JsonFile(String),
    Api(String),
}

impl PostingSource {
    pub fn from_parts(kind: &str, location: &str) -> Option<Self> {
        match kind.to_ascii_lowercase().as_str() {
            "csv" => Some(PostingSource::CsvFile(location.to_string())),
            "json" => Some(PostingSource::JsonFile(location.to_string())),
            "api" => Some(PostingSource::Api(location.to_string())),
            _ => None,
        }
    }

    pub fn location(&self) -> &str {
        match self {
            PostingSource::CsvFile(path) | PostingSource::JsonFile(path) => path,
            PostingSource::Api(endpoint) => endpoint,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skill_set_deduplicates_and_keeps_order() {
        let set: SkillSet = ["sql", "python", "sql"].into_iter().collect();
        assert_eq!(set.len(), 2);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["sql", "python"]);
    }

    #[test]
    fn test_posting_month_display_and_order() {
        let march = PostingMonth::new(2024, 3).unwrap();
        let december = PostingMonth::new(2023, 12).unwrap();
        assert_eq!(march.to_string(), "2024-03");
        assert!(december < march);
        assert_eq!("2024-03".parse::<PostingMonth>().unwrap(), march);
        assert!(PostingMonth::new(2024, 13).is_none());
    }

    #[test]
    fn test_raw_posting_tolerates_missing_and_loose_fields() {
        let json = serde_json::json!({
            "title": "Data Analyst",
            "company": 42,
            "salary": 3000,
            "description": 17,
            "date_posted": null
        });
        let raw: RawPosting = serde_json::from_value(json).unwrap();

        assert_eq!(raw.title, "Data Analyst");
        assert_eq!(raw.company, "42");
        assert_eq!(raw.location, "");
        assert_eq!(raw.salary, Some(SalaryInput::Amount(3000u64.into())));
        assert!(raw.description.is_none());
        assert!(raw.date_posted.is_none());
    }

    #[test]
    fn test_salary_amount_as_text() {
        assert_eq!(SalaryInput::Amount(3000u64.into()).as_text(), "3000");
        assert_eq!(SalaryInput::Text("2k".into()).as_text(), "2k");
    }

    #[test]
    fn test_large_json_salary_is_not_rounded() {
        let raw: RawPosting =
            serde_json::from_str(r#"{"title": "Staff Engineer", "salary": 12345678901234567891}"#)
                .unwrap();
        let salary = raw.salary.unwrap();
        assert_eq!(salary.as_text(), "12345678901234567891");
    }

    #[test]
    fn test_recommendations_top_clamps() {
        let recs = Recommendations {
            candidate_skills: SkillSet::new(),
            ranked: vec![MatchResult {
                posting_index: 0,
                title: "Dev".into(),
                company: "Acme".into(),
                location: "Remote".into(),
                score: 0.5,
            }],
            skill_gaps: vec![],
        };
        assert_eq!(recs.top(10).len(), 1);
        assert_eq!(recs.top(0).len(), 0);
    }
}
