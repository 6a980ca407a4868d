use crate::domain::model::{AnalysisResult, PostingSource, RawPosting};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn source(&self) -> Result<PostingSource>;
    fn resume_path(&self) -> Option<&str>;
    fn output_path(&self) -> &str;
    fn output_formats(&self) -> &[String];
    /// 設定時將所有輸出打包成此 ZIP 檔名
    fn bundle_name(&self) -> Option<&str>;
    /// 空陣列代表使用預設技能目錄
    fn skills(&self) -> &[String];
    fn top_n(&self) -> usize;

    fn request_timeout_seconds(&self) -> u64 {
        30
    }
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<RawPosting>>;
    async fn transform(&self, data: Vec<RawPosting>) -> Result<AnalysisResult>;
    async fn load(&self, result: AnalysisResult) -> Result<String>;
}
