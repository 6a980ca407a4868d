use crate::core::catalog::SkillCatalog;
use crate::domain::model::PostingSource;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub pipeline: PipelineConfig,
    pub source: SourceConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub candidate: CandidateConfig,
    #[serde(default)]
    pub recommend: RecommendConfig,
    pub load: LoadConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub name: String,
    pub description: Option<String>,
    pub version: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub r#type: String,
    /// csv / json 的檔案路徑
    pub path: Option<String>,
    /// api 的端點
    pub endpoint: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CandidateConfig {
    pub resume_path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecommendConfig {
    pub top_n: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: String,
    #[serde(default = "default_output_formats")]
    pub output_formats: Vec<String>,
    pub compression: Option<CompressionConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressionConfig {
    pub enabled: bool,
    pub filename: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub log_level: Option<String>,
}

fn default_output_formats() -> Vec<String> {
    vec!["csv".to_string()]
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").unwrap())
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${JOBS_ENDPOINT})；未設定的變數保留原樣
    fn substitute_env_vars(content: &str) -> String {
        env_var_pattern()
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("pipeline.name", &self.pipeline.name)?;

        match self.source()? {
            PostingSource::Api(endpoint) => validation::validate_url("source.endpoint", &endpoint)?,
            PostingSource::CsvFile(path) => {
                validation::validate_path("source.path", &path)?;
                validation::validate_file_extension("source.path", &path, &["csv"])?;
            }
            PostingSource::JsonFile(path) => {
                validation::validate_path("source.path", &path)?;
                validation::validate_file_extension("source.path", &path, &["json"])?;
            }
        }

        if let Some(timeout) = self.source.timeout_seconds {
            validation::validate_positive_number("source.timeout_seconds", timeout as usize, 1)?;
        }

        if let Some(resume) = &self.candidate.resume_path {
            validation::validate_path("candidate.resume_path", resume)?;
            validation::validate_file_extension("candidate.resume_path", resume, &["txt", "md"])?;
        }

        if let Some(top_n) = self.recommend.top_n {
            validation::validate_positive_number("recommend.top_n", top_n, 1)?;
        }

        validation::validate_path("load.output_path", &self.load.output_path)?;
        validation::validate_output_formats("load.output_formats", &self.load.output_formats)?;

        if let Some(compression) = &self.load.compression {
            if compression.enabled {
                validation::validate_file_extension(
                    "load.compression.filename",
                    &compression.filename,
                    &["zip"],
                )?;
            }
        }

        SkillCatalog::from_config(&self.catalog.skills)?;
        Ok(())
    }

    /// 取得監控設定
    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn source(&self) -> Result<PostingSource> {
        let location = match self.source.r#type.to_ascii_lowercase().as_str() {
            "api" => validation::validate_required_field("source.endpoint", &self.source.endpoint)?,
            _ => validation::validate_required_field("source.path", &self.source.path)?,
        };

        PostingSource::from_parts(&self.source.r#type, location).ok_or_else(|| {
            EtlError::InvalidConfigValueError {
                field: "source.type".to_string(),
                value: self.source.r#type.clone(),
                reason: "Valid source types: csv, json, api".to_string(),
            }
        })
    }

    fn resume_path(&self) -> Option<&str> {
        self.candidate.resume_path.as_deref()
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn output_formats(&self) -> &[String] {
        &self.load.output_formats
    }

    fn bundle_name(&self) -> Option<&str> {
        self.load
            .compression
            .as_ref()
            .filter(|c| c.enabled)
            .map(|c| c.filename.as_str())
    }

    fn skills(&self) -> &[String] {
        &self.catalog.skills
    }

    fn top_n(&self) -> usize {
        self.recommend.top_n.unwrap_or(10)
    }

    fn request_timeout_seconds(&self) -> u64 {
        self.source.timeout_seconds.unwrap_or(30)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
