pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::{cli::LocalStorage, toml_config::TomlConfig};
pub use core::{
    aggregator::MarketAggregator, catalog::SkillCatalog, etl::EtlEngine,
    extractor::TextSkillExtractor, pipeline::JobMarketPipeline, ranker::RecommendationRanker,
    salary::SalaryParser, scorer::MatchScorer,
};
pub use domain::model::{
    AnalysisResult, Candidate, MarketSummary, MatchResult, Posting, RawPosting, Recommendations,
    SkillSet,
};
pub use utils::error::{EtlError, Result};
