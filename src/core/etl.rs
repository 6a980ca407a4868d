use crate::domain::ports::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("🚀 Starting job market analysis");

        // Extract
        tracing::info!("📥 Extracting postings...");
        let raw_postings = self.pipeline.extract().await?;
        tracing::info!("Extracted {} postings", raw_postings.len());
        self.monitor.log_phase("extract", raw_postings.len());

        // Transform
        tracing::info!("🛠️ Analyzing postings...");
        let result = self.pipeline.transform(raw_postings).await?;
        tracing::info!(
            "Annotated {} postings, {} distinct skills in demand",
            result.postings.len(),
            result.market.skill_counts.len()
        );
        self.monitor.log_phase("transform", result.postings.len());

        // Load
        tracing::info!("💾 Writing reports...");
        let processed = result.postings.len();
        let output_path = self.pipeline.load(result).await?;
        tracing::info!("Output saved to: {}", output_path);
        self.monitor.log_phase("load", processed);
        self.monitor.log_final_stats();

        Ok(output_path)
    }
}
