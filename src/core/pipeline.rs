use crate::adapters::export::{bundle_zip, render_sections};
use crate::adapters::source::{parse_csv, parse_json, ApiSource};
use crate::core::aggregator::MarketAggregator;
use crate::core::annotate::annotate_all;
use crate::core::catalog::SkillCatalog;
use crate::core::ranker::RecommendationRanker;
use crate::core::report::{market_tables, recommendation_tables};
use crate::domain::model::{AnalysisResult, Candidate, PostingSource, RawPosting};
use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
use crate::utils::error::Result;
use std::path::Path;

pub const MARKET_ANALYSIS_FILE: &str = "market_analysis.csv";
pub const RECOMMENDED_JOBS_FILE: &str = "recommended_jobs.csv";
pub const ANALYSIS_JSON_FILE: &str = "analysis.json";

/// 職缺市場分析 Pipeline：讀取職缺 → 標註、統計、推薦 → 輸出報表
pub struct JobMarketPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    catalog: SkillCatalog,
}

impl<S: Storage, C: ConfigProvider> JobMarketPipeline<S, C> {
    /// 技能目錄在此建立一次，之後所有階段共用
    pub fn new(storage: S, config: C) -> Result<Self> {
        let catalog = SkillCatalog::from_config(config.skills())?;
        tracing::debug!(
            "Skill catalog: {}",
            catalog.iter().collect::<Vec<_>>().join(", ")
        );
        Ok(Self {
            storage,
            config,
            catalog,
        })
    }

    pub fn catalog(&self) -> &SkillCatalog {
        &self.catalog
    }

    async fn load_candidate(&self) -> Result<Option<Candidate>> {
        let Some(path) = self.config.resume_path() else {
            tracing::info!("No résumé configured, skipping recommendations");
            return Ok(None);
        };

        let bytes = self.storage.read_file(path).await?;
        let text = String::from_utf8_lossy(&bytes).into_owned();
        let candidate = Candidate::from_resume(Some(text), &self.catalog);

        tracing::info!(
            "🧾 Detected {} skills in résumé: {}",
            candidate.skills().len(),
            candidate.skills().iter().collect::<Vec<_>>().join(", ")
        );
        Ok(Some(candidate))
    }

    fn output_file(&self, name: &str) -> String {
        Path::new(self.config.output_path())
            .join(name)
            .to_string_lossy()
            .into_owned()
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for JobMarketPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<RawPosting>> {
        let source = self.config.source()?;
        tracing::debug!("Reading postings from {:?}", source);

        let postings = match source {
            PostingSource::CsvFile(path) => parse_csv(&self.storage.read_file(&path).await?)?,
            PostingSource::JsonFile(path) => parse_json(&self.storage.read_file(&path).await?)?,
            PostingSource::Api(endpoint) => {
                ApiSource::new(endpoint, self.config.request_timeout_seconds())?
                    .fetch()
                    .await?
            }
        };

        if postings.is_empty() {
            tracing::warn!("⚠️ Postings source is empty, summaries will be empty");
        }
        Ok(postings)
    }

    async fn transform(&self, data: Vec<RawPosting>) -> Result<AnalysisResult> {
        let postings = annotate_all(&data, &self.catalog);
        let market = MarketAggregator::new(&self.catalog).aggregate(&postings);

        if let Some(top) = market.skill_counts.first() {
            tracing::info!("🔥 Most requested skill: {} ({} postings)", top.skill, top.count);
        }

        let recommendations = self.load_candidate().await?.map(|candidate| {
            RecommendationRanker::new(&self.catalog).rank(&postings, &candidate)
        });

        if let Some(recs) = &recommendations {
            for (position, result) in recs.top(self.config.top_n()).iter().enumerate() {
                tracing::info!(
                    "  {}. {} @ {} ({}) - {:.0}%",
                    position + 1,
                    result.title,
                    result.company,
                    result.location,
                    result.score * 100.0
                );
            }
        }

        Ok(AnalysisResult {
            postings,
            market,
            recommendations,
        })
    }

    async fn load(&self, result: AnalysisResult) -> Result<String> {
        let formats = self.config.output_formats();
        let mut files: Vec<(String, Vec<u8>)> = Vec::new();

        if formats.iter().any(|f| f == "csv") {
            let market_csv = render_sections(&market_tables(&result.market))?;
            files.push((MARKET_ANALYSIS_FILE.to_string(), market_csv.into_bytes()));

            if let Some(recs) = &result.recommendations {
                let recs_csv = render_sections(&recommendation_tables(recs))?;
                files.push((RECOMMENDED_JOBS_FILE.to_string(), recs_csv.into_bytes()));
            }
        }

        if formats.iter().any(|f| f == "json") {
            let json_data = serde_json::to_vec_pretty(&result)?;
            files.push((ANALYSIS_JSON_FILE.to_string(), json_data));
        }

        if let Some(bundle) = self.config.bundle_name() {
            tracing::debug!("Creating ZIP file with {} files", files.len());
            let zip_data = bundle_zip(&files)?;
            let bundle_path = self.output_file(bundle);
            self.storage.write_file(&bundle_path, &zip_data).await?;
            return Ok(bundle_path);
        }

        for (name, data) in &files {
            self.storage.write_file(&self.output_file(name), data).await?;
        }
        Ok(self.config.output_path().to_string())
    }
}
