use crate::domain::model::{RawPosting, SalaryInput};
use crate::utils::error::{EtlError, Result};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// CSV 的每一欄都當作可缺漏的文字
#[derive(Debug, Default, Deserialize)]
struct CsvPostingRow {
    title: Option<String>,
    company: Option<String>,
    location: Option<String>,
    date_posted: Option<String>,
    #[serde(alias = "salary_text")]
    salary: Option<String>,
    description: Option<String>,
    url: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl From<CsvPostingRow> for RawPosting {
    fn from(row: CsvPostingRow) -> Self {
        RawPosting {
            title: row.title.unwrap_or_default(),
            company: row.company.unwrap_or_default(),
            location: row.location.unwrap_or_default(),
            date_posted: non_blank(row.date_posted),
            salary: non_blank(row.salary).map(SalaryInput::Text),
            description: non_blank(row.description),
            url: row.url.unwrap_or_default(),
        }
    }
}

/// 解析有標題列的 CSV；缺少的欄位視為空值，壞掉的列略過
pub fn parse_csv(data: &[u8]) -> Result<Vec<RawPosting>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(data);

    let headers = reader.headers()?.clone();
    tracing::debug!("CSV columns: {:?}", headers.iter().collect::<Vec<_>>());

    let mut postings = Vec::new();
    for (line, row) in reader.deserialize::<CsvPostingRow>().enumerate() {
        match row {
            Ok(row) => postings.push(RawPosting::from(row)),
            Err(e) => tracing::warn!("⚠️ Skipping CSV row {}: {}", line + 1, e),
        }
    }

    Ok(postings)
}

/// 從 JSON 值取出職缺：陣列中的每個物件各為一筆，單一物件視為一筆
pub fn postings_from_value(value: serde_json::Value) -> Result<Vec<RawPosting>> {
    match value {
        serde_json::Value::Array(items) => {
            let mut postings = Vec::with_capacity(items.len());
            for (index, item) in items.into_iter().enumerate() {
                if !item.is_object() {
                    tracing::warn!("⚠️ Skipping non-object posting at index {}", index);
                    continue;
                }
                match serde_json::from_value::<RawPosting>(item) {
                    Ok(posting) => postings.push(posting),
                    Err(e) => tracing::warn!("⚠️ Skipping posting at index {}: {}", index, e),
                }
            }
            Ok(postings)
        }
        serde_json::Value::Object(_) => Ok(vec![serde_json::from_value(value)?]),
        other => Err(EtlError::SourceError {
            message: format!("Expected a JSON array of postings, got: {}", type_name(&other)),
        }),
    }
}

pub fn parse_json(data: &[u8]) -> Result<Vec<RawPosting>> {
    let value: serde_json::Value = serde_json::from_slice(data)?;
    postings_from_value(value)
}

fn type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// 以 HTTP GET 取得職缺 JSON
pub struct ApiSource {
    client: Client,
    endpoint: String,
}

impl ApiSource {
    pub fn new(endpoint: impl Into<String>, timeout_seconds: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub async fn fetch(&self) -> Result<Vec<RawPosting>> {
        tracing::debug!("Making API request to: {}", self.endpoint);
        let response = self.client.get(&self.endpoint).send().await?;
        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if !status.is_success() {
            return Err(EtlError::SourceError {
                message: format!("Postings endpoint returned HTTP {}", status),
            });
        }

        let json_data: serde_json::Value = response.json().await?;
        postings_from_value(json_data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[test]
    fn test_parse_csv_with_all_columns() {
        let csv = "title,company,location,date_posted,salary,description,url\n\
                   Data Analyst,Acme Corp,Remote,2024-03-15,3000-3500 EUR/month,\"Skills required: python, sql.\",https://example.com/job/0\n";
        let postings = parse_csv(csv.as_bytes()).unwrap();

        assert_eq!(postings.len(), 1);
        assert_eq!(postings[0].title, "Data Analyst");
        assert_eq!(postings[0].date_posted.as_deref(), Some("2024-03-15"));
        assert_eq!(
            postings[0].salary,
            Some(SalaryInput::Text("3000-3500 EUR/month".to_string()))
        );
        assert_eq!(postings[0].description.as_deref(), Some("Skills required: python, sql."));
    }

    #[test]
    fn test_parse_csv_tolerates_missing_columns_and_blanks() {
        let csv = "title,company,salary\nDevOps Engineer,Globex,\nML Engineer,Innotech,4000\n";
        let postings = parse_csv(csv.as_bytes()).unwrap();

        assert_eq!(postings.len(), 2);
        assert!(postings[0].salary.is_none());
        assert!(postings[0].description.is_none());
        assert!(postings[0].date_posted.is_none());
        assert_eq!(postings[1].salary, Some(SalaryInput::Text("4000".to_string())));
        assert_eq!(postings[1].location, "");
    }

    #[test]
    fn test_parse_json_array_skips_non_objects() {
        let json = r#"[
            {"title": "Frontend Developer", "description": "React and JavaScript", "salary": 3500},
            "not a posting",
            {"title": "Backend Developer"}
        ]"#;
        let postings = parse_json(json.as_bytes()).unwrap();

        assert_eq!(postings.len(), 2);
        assert_eq!(postings[0].salary, Some(SalaryInput::Amount(3500u64.into())));
        assert_eq!(postings[1].title, "Backend Developer");
    }

    #[test]
    fn test_parse_json_rejects_scalars() {
        assert!(parse_json(b"42").is_err());
        assert!(parse_json(b"not json").is_err());
    }

    #[tokio::test]
    async fn test_api_source_fetches_postings() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/jobs");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!([
                    {"title": "Data Scientist", "description": "python, aws"},
                    {"title": "Business Analyst", "description": "excel, power bi"}
                ]));
        });

        let source = ApiSource::new(server.url("/jobs"), 5).unwrap();
        let postings = source.fetch().await.unwrap();

        api_mock.assert();
        assert_eq!(postings.len(), 2);
        assert_eq!(postings[1].title, "Business Analyst");
    }

    #[tokio::test]
    async fn test_api_source_reports_http_failure() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/jobs");
            then.status(500);
        });

        let source = ApiSource::new(server.url("/jobs"), 5).unwrap();
        let result = source.fetch().await;

        api_mock.assert();
        assert!(matches!(result, Err(EtlError::SourceError { .. })));
    }
}
