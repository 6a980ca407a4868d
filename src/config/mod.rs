pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::domain::model::PostingSource;
#[cfg(feature = "cli")]
use crate::domain::ports::ConfigProvider;
#[cfg(feature = "cli")]
use crate::utils::error::{EtlError, Result};
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "job-insight-etl")]
#[command(about = "Job market analytics and résumé-based job recommendations")]
pub struct CliConfig {
    /// Postings file path (csv/json) or endpoint URL (api)
    #[arg(long)]
    pub postings: String,

    /// Source type: csv, json or api
    #[arg(long, default_value = "csv")]
    pub source_type: String,

    /// Plain-text résumé; recommendations are skipped without it
    #[arg(long)]
    pub resume: Option<String>,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    /// Override the skill catalog (comma separated)
    #[arg(long, value_delimiter = ',')]
    pub skills: Vec<String>,

    #[arg(long, default_value = "10")]
    pub top_n: usize,

    #[arg(long, value_delimiter = ',', default_value = "csv")]
    pub formats: Vec<String>,

    /// Bundle all outputs into this ZIP file
    #[arg(long)]
    pub zip: Option<String>,

    #[arg(long, default_value = "30")]
    pub timeout_seconds: u64,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log phase timings and memory usage")]
    pub monitor: bool,

    #[arg(long, default_value = "compact")]
    pub log_format: String,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn source(&self) -> Result<PostingSource> {
        PostingSource::from_parts(&self.source_type, &self.postings).ok_or_else(|| {
            EtlError::InvalidConfigValueError {
                field: "source_type".to_string(),
                value: self.source_type.clone(),
                reason: "Valid source types: csv, json, api".to_string(),
            }
        })
    }

    fn resume_path(&self) -> Option<&str> {
        self.resume.as_deref()
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn output_formats(&self) -> &[String] {
        &self.formats
    }

    fn bundle_name(&self) -> Option<&str> {
        self.zip.as_deref()
    }

    fn skills(&self) -> &[String] {
        &self.skills
    }

    fn top_n(&self) -> usize {
        self.top_n
    }

    fn request_timeout_seconds(&self) -> u64 {
        self.timeout_seconds
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        match self.source()? {
            PostingSource::Api(endpoint) => validation::validate_url("postings", &endpoint)?,
            PostingSource::CsvFile(path) => {
                validation::validate_path("postings", &path)?;
                validation::validate_file_extension("postings", &path, &["csv"])?;
            }
            PostingSource::JsonFile(path) => {
                validation::validate_path("postings", &path)?;
                validation::validate_file_extension("postings", &path, &["json"])?;
            }
        }

        if let Some(resume) = &self.resume {
            validation::validate_path("resume", resume)?;
            validation::validate_file_extension("resume", resume, &["txt", "md"])?;
        }

        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_positive_number("top_n", self.top_n, 1)?;
        validation::validate_positive_number("timeout_seconds", self.timeout_seconds as usize, 1)?;
        validation::validate_output_formats("formats", &self.formats)?;

        if let Some(zip) = &self.zip {
            validation::validate_file_extension("zip", zip, &["zip"])?;
        }

        crate::core::catalog::SkillCatalog::from_config(&self.skills)?;
        Ok(())
    }
}
