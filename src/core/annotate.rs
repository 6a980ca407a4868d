//! 標註階段：把原始職缺轉成帶有技能、薪資數值與日期的新集合，
//! 不修改呼叫端的資料。

use crate::core::catalog::SkillCatalog;
use crate::core::extractor::TextSkillExtractor;
use crate::core::salary::SalaryParser;
use crate::domain::model::{Candidate, Posting, RawPosting, SalaryInput};
use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// 日期後接時間的 ISO 8601 寫法；`%.f` 可選，秒數可省略
const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// 解析發布日期；無法解析時回傳 None
pub fn parse_posting_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            DATETIME_FORMATS.iter().find_map(|format| {
                NaiveDateTime::parse_from_str(raw, format)
                    .ok()
                    .map(|dt| dt.date())
            })
        })
}

pub fn annotate(raw: &RawPosting, catalog: &SkillCatalog) -> Posting {
    let extractor = TextSkillExtractor::new(catalog);
    let description = raw.description.clone();

    Posting {
        title: raw.title.clone(),
        company: raw.company.clone(),
        location: raw.location.clone(),
        date_posted: raw.date_posted.as_deref().and_then(parse_posting_date),
        salary_text: raw.salary.as_ref().map(SalaryInput::as_text),
        url: raw.url.clone(),
        skills: extractor.extract(description.as_deref()),
        salary_value: raw.salary.as_ref().and_then(SalaryParser::parse),
        description,
    }
}

pub fn annotate_all(raw: &[RawPosting], catalog: &SkillCatalog) -> Vec<Posting> {
    let postings: Vec<Posting> = raw.iter().map(|r| annotate(r, catalog)).collect();

    let undated = postings.iter().filter(|p| p.date_posted.is_none()).count();
    let without_salary = postings.iter().filter(|p| p.salary_value.is_none()).count();
    tracing::debug!(
        "Annotated {} postings ({} without date, {} without parseable salary)",
        postings.len(),
        undated,
        without_salary
    );

    postings
}

impl Posting {
    /// 換描述時一併重算技能
    pub fn with_description(&self, description: Option<String>, catalog: &SkillCatalog) -> Posting {
        let skills = TextSkillExtractor::new(catalog).extract(description.as_deref());
        Posting {
            description,
            skills,
            ..self.clone()
        }
    }
}

impl Candidate {
    pub fn from_resume(resume_text: Option<String>, catalog: &SkillCatalog) -> Candidate {
        let skills = TextSkillExtractor::new(catalog).extract(resume_text.as_deref());
        Candidate {
            resume_text,
            skills,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(description: &str, date: Option<&str>, salary: Option<&str>) -> RawPosting {
        RawPosting {
            title: "Data Analyst".to_string(),
            company: "Acme Corp".to_string(),
            location: "Remote".to_string(),
            date_posted: date.map(str::to_string),
            salary: salary.map(|s| SalaryInput::Text(s.to_string())),
            description: Some(description.to_string()),
            url: "https://example.com/job/1".to_string(),
        }
    }

    #[test]
    fn test_parse_posting_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 15);
        assert_eq!(parse_posting_date("2024-03-15"), expected);
        assert_eq!(parse_posting_date("2024-03-15T10:30:00Z"), expected);
        assert_eq!(parse_posting_date("2024-03-15 10:30:00"), expected);
        assert_eq!(parse_posting_date("2024-03-15T10:30:00"), expected);
        assert_eq!(parse_posting_date("2024-03-15T10:30:00.123456"), expected);
        assert_eq!(parse_posting_date("2024-03-15 10:30:00.5"), expected);
        assert_eq!(parse_posting_date("2024-03-15T10:30"), expected);
        assert_eq!(parse_posting_date("2024-03-15 10:30"), expected);
        assert_eq!(parse_posting_date("2024-03-15T10:30:00.123+02:00"), expected);
        assert_eq!(parse_posting_date("15/03/2024"), None);
        assert_eq!(parse_posting_date("2024-02-30"), None);
        assert_eq!(parse_posting_date(""), None);
    }

    #[test]
    fn test_annotate_derives_fields() {
        let posting = annotate(
            &raw("Skills required: python, sql", Some("2024-03-15"), Some("3000-3500 EUR/month")),
            SkillCatalog::standard(),
        );

        assert_eq!(posting.skills().iter().collect::<Vec<_>>(), vec!["python", "sql"]);
        assert_eq!(posting.salary_value(), Some(3000));
        assert_eq!(posting.salary_text.as_deref(), Some("3000-3500 EUR/month"));
        assert_eq!(posting.month().unwrap().to_string(), "2024-03");
    }

    #[test]
    fn test_annotate_tolerates_bad_fields() {
        let posting = annotate(
            &raw("", Some("not a date"), Some("negotiable")),
            SkillCatalog::standard(),
        );
        assert!(posting.skills().is_empty());
        assert!(posting.salary_value().is_none());
        assert!(posting.date_posted.is_none());
    }

    #[test]
    fn test_annotate_all_leaves_input_untouched() {
        let input = vec![raw("docker", None, None)];
        let before = input.clone();
        let postings = annotate_all(&input, SkillCatalog::standard());

        assert_eq!(input, before);
        assert_eq!(postings.len(), 1);
        assert!(postings[0].skills().contains("docker"));
    }

    #[test]
    fn test_with_description_recomputes_skills() {
        let catalog = SkillCatalog::standard();
        let posting = annotate(&raw("excel reporting", None, None), catalog);
        let updated = posting.with_description(Some("aws and docker".to_string()), catalog);

        assert!(posting.skills().contains("excel"));
        assert!(!updated.skills().contains("excel"));
        assert!(updated.skills().contains("aws"));
        assert_eq!(updated.title, posting.title);
    }

    #[test]
    fn test_candidate_from_resume() {
        let candidate = Candidate::from_resume(
            Some("Experienced with Python, SQL and Tableau".to_string()),
            SkillCatalog::standard(),
        );
        assert_eq!(
            candidate.skills().iter().collect::<Vec<_>>(),
            vec!["python", "sql", "tableau"]
        );

        let empty = Candidate::from_resume(None, SkillCatalog::standard());
        assert!(empty.skills().is_empty());
    }
}
