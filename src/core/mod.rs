pub mod aggregator;
pub mod annotate;
pub mod catalog;
pub mod etl;
pub mod extractor;
pub mod pipeline;
pub mod ranker;
pub mod report;
pub mod salary;
pub mod scorer;

pub use crate::domain::model::{AnalysisResult, RawPosting};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
