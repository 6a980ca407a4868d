use httpmock::prelude::*;
use job_insight_etl::core::pipeline::{
    ANALYSIS_JSON_FILE, MARKET_ANALYSIS_FILE, RECOMMENDED_JOBS_FILE,
};
use job_insight_etl::{EtlEngine, JobMarketPipeline, LocalStorage, TomlConfig};
use std::path::Path;
use tempfile::TempDir;

const JOBS_CSV: &str = "title,company,location,date_posted,salary,description,url
Data Analyst,Acme Corp,Remote,2024-01-10,3000-3500 EUR/month,\"We are looking for a Data Analyst. Skills required: python, sql, excel.\",https://example.com/job/0
Frontend Developer,Globex,\"Berlin, Germany\",2024-01-22,4000-5000 EUR/month,\"We are looking for a Frontend Developer. Skills required: react, javascript.\",https://example.com/job/1
DevOps Engineer,Cyberdyne,\"Cluj-Napoca, Romania\",2024-02-03,,\"We are looking for a DevOps Engineer. Skills required: aws, docker.\",https://example.com/job/2
Business Analyst,Innotech,\"London, UK\",,2500-3000 EUR/month,\"We are looking for a Business Analyst. Skills required: excel, power bi, sql.\",https://example.com/job/3
";

fn toml_for(output_path: &str, source: &str, extra: &str) -> String {
    format!(
        r#"
[pipeline]
name = "integration"

{source}

[load]
output_path = "{output_path}"
output_formats = ["csv", "json"]
{extra}
"#
    )
}

fn normalized(path: &Path) -> String {
    path.to_str().unwrap().replace('\\', "/")
}

#[tokio::test]
async fn test_end_to_end_csv_with_resume() {
    let temp_dir = TempDir::new().unwrap();
    let jobs_path = temp_dir.path().join("jobs.csv");
    let resume_path = temp_dir.path().join("cv.txt");
    std::fs::write(&jobs_path, JOBS_CSV).unwrap();
    std::fs::write(&resume_path, "Junior analyst. Tools: Excel, SQL, some Python.").unwrap();

    let output_dir = temp_dir.path().join("reports");
    let toml_content = toml_for(
        &normalized(&output_dir),
        &format!("[source]\ntype = \"csv\"\npath = \"{}\"", normalized(&jobs_path)),
        &format!("\n[candidate]\nresume_path = \"{}\"", normalized(&resume_path)),
    );
    let config = TomlConfig::from_toml_str(&toml_content).unwrap();

    let pipeline = JobMarketPipeline::new(LocalStorage::new("."), config).unwrap();
    let engine = EtlEngine::new(pipeline);
    let output = engine.run().await.unwrap();

    assert_eq!(output, normalized(&output_dir));

    let market = std::fs::read_to_string(output_dir.join(MARKET_ANALYSIS_FILE)).unwrap();
    assert!(market.starts_with("# Top Skills\nSkill,Count\n"));
    assert!(market.contains("sql,2\n"));
    assert!(market.contains("excel,2\n"));
    assert!(market.contains("# Salary by Skill\nSkill,Avg Salary\n"));
    assert!(market.contains("sql,2750.00\n"));
    assert!(market.contains("# Job Postings Over Time\nMonth,Postings\n2024-01,2\n2024-02,1\n"));

    let recs = std::fs::read_to_string(output_dir.join(RECOMMENDED_JOBS_FILE)).unwrap();
    let data_analyst = recs.lines().nth(2).unwrap();
    assert_eq!(data_analyst, "Data Analyst,Acme Corp,Remote,1.0000");
    assert!(recs.contains("# Missing Skills\nMissing Skill,Count\n"));
    assert!(!recs.contains("\npython,"));

    let json_text = std::fs::read_to_string(output_dir.join(ANALYSIS_JSON_FILE)).unwrap();
    let json: serde_json::Value = serde_json::from_str(&json_text).unwrap();
    assert_eq!(json["postings"].as_array().unwrap().len(), 4);
    assert_eq!(json["market"]["postings_by_period"]["2024-01"], 2);
    assert_eq!(json["recommendations"]["ranked"][0]["title"], "Data Analyst");
}

#[tokio::test]
async fn test_end_to_end_api_source_without_resume() {
    let temp_dir = TempDir::new().unwrap();
    let output_dir = temp_dir.path().join("out");

    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/postings");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!([
                {"title": "ML Engineer", "company": "Wayne Enterprises",
                 "date_posted": "2024-05-01", "salary": 4500,
                 "description": "Skills required: python, aws, docker."},
                {"title": "Data Scientist", "company": "Acme Corp", "date_posted": null,
                 "salary": "competitive", "description": "Skills required: python, sql."},
                {"title": "Mystery Role", "description": 12345}
            ]));
    });

    let toml_content = toml_for(
        &normalized(&output_dir),
        &format!("[source]\ntype = \"api\"\nendpoint = \"{}\"", server.url("/postings")),
        "",
    );
    let config = TomlConfig::from_toml_str(&toml_content).unwrap();

    let pipeline = JobMarketPipeline::new(LocalStorage::new("."), config).unwrap();
    let engine = EtlEngine::new_with_monitoring(pipeline, true);
    engine.run().await.unwrap();

    api_mock.assert();

    let market = std::fs::read_to_string(output_dir.join(MARKET_ANALYSIS_FILE)).unwrap();
    assert!(market.starts_with("# Top Skills\nSkill,Count\npython,2\n"));
    assert!(market.contains("python,4500.00\n"));
    assert!(market.contains("2024-05,1\n"));
    assert!(!output_dir.join(RECOMMENDED_JOBS_FILE).exists());
}

#[tokio::test]
async fn test_end_to_end_zip_bundle() {
    let temp_dir = TempDir::new().unwrap();
    let jobs_path = temp_dir.path().join("jobs.json");
    std::fs::write(
        &jobs_path,
        r#"[{"title": "Backend Developer", "description": "java and sql",
             "date_posted": "2024-07-04"}]"#,
    )
    .unwrap();

    let output_dir = temp_dir.path().join("bundle");
    let toml_content = toml_for(
        &normalized(&output_dir),
        &format!("[source]\ntype = \"json\"\npath = \"{}\"", normalized(&jobs_path)),
        "\n[load.compression]\nenabled = true\nfilename = \"job_insight.zip\"",
    );
    let config = TomlConfig::from_toml_str(&toml_content).unwrap();

    let pipeline = JobMarketPipeline::new(LocalStorage::new("."), config).unwrap();
    let output = EtlEngine::new(pipeline).run().await.unwrap();

    assert!(output.ends_with("job_insight.zip"));
    let zip_data = std::fs::read(output_dir.join("job_insight.zip")).unwrap();
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(zip_data)).unwrap();
    assert_eq!(archive.len(), 2);

    let mut csv_content = String::new();
    std::io::Read::read_to_string(
        &mut archive.by_name(MARKET_ANALYSIS_FILE).unwrap(),
        &mut csv_content,
    )
    .unwrap();
    assert!(csv_content.contains("sql,1\n"));
    assert!(csv_content.contains("java,1\n"));
}

#[tokio::test]
async fn test_missing_postings_file_fails_with_io_error() {
    let temp_dir = TempDir::new().unwrap();
    let toml_content = toml_for(
        &normalized(&temp_dir.path().join("out")),
        &format!(
            "[source]\ntype = \"csv\"\npath = \"{}\"",
            normalized(&temp_dir.path().join("missing.csv"))
        ),
        "",
    );
    let config = TomlConfig::from_toml_str(&toml_content).unwrap();

    let pipeline = JobMarketPipeline::new(LocalStorage::new("."), config).unwrap();
    let result = EtlEngine::new(pipeline).run().await;

    assert!(matches!(result, Err(job_insight_etl::EtlError::IoError(_))));
}
