use clap::Parser;
use job_insight_etl::core::ConfigProvider;
use job_insight_etl::domain::model::PostingSource;
use job_insight_etl::utils::error::ErrorSeverity;
use job_insight_etl::utils::{logger, validation::Validate};
use job_insight_etl::{EtlEngine, JobMarketPipeline, LocalStorage, SkillCatalog, TomlConfig};

#[derive(Parser)]
#[command(name = "job-insight-toml")]
#[command(about = "Job market analysis driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "job-insight.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Override the résumé path from config
    #[arg(long)]
    resume: Option<String>,

    /// Dry run - show what would be processed without executing
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // 初始化日誌
    logger::init_cli_logger(args.verbose);

    tracing::info!("🚀 Starting TOML-based job market analysis");
    tracing::info!("📁 Loading configuration from: {}", args.config);

    // 載入 TOML 配置
    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 應用命令列覆蓋設定
    if let Some(resume) = &args.resume {
        config.candidate.resume_path = Some(resume.clone());
        tracing::info!("🔧 Résumé overridden to: {}", resume);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!("✅ Configuration loaded and validated successfully");
    display_config_summary(&config, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No actual processing will occur");
        perform_dry_run(&config)?;
        return Ok(());
    }

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let storage = LocalStorage::new(".");
    let pipeline = JobMarketPipeline::new(storage, config)?;
    let engine = EtlEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ Analysis completed successfully!");
            println!("✅ Analysis completed successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Analysis failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    println!("📋 Configuration Summary:");
    println!(
        "  Pipeline: {} v{}",
        config.pipeline.name,
        config.pipeline.version.as_deref().unwrap_or("-")
    );
    if let Ok(source) = config.source() {
        println!("  Source: {}", source.location());
    }
    println!("  Output: {}", config.output_path());
    println!("  Formats: {}", config.output_formats().join(", "));
    println!("  Résumé: {}", config.resume_path().unwrap_or("(none)"));
    println!("  Top N: {}", config.top_n());

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

fn perform_dry_run(config: &TomlConfig) -> anyhow::Result<()> {
    println!("🔍 Dry Run Analysis:");
    println!();

    println!("📡 Postings Source:");
    match config.source()? {
        PostingSource::CsvFile(path) => println!("  CSV file: {}", path),
        PostingSource::JsonFile(path) => println!("  JSON file: {}", path),
        PostingSource::Api(endpoint) => {
            println!("  API endpoint: {}", endpoint);
            println!("  Timeout: {}s", config.request_timeout_seconds());
        }
    }

    let catalog = SkillCatalog::from_config(config.skills())?;
    println!();
    println!("🧠 Skill Catalog ({} skills):", catalog.len());
    println!("  {}", catalog.iter().collect::<Vec<_>>().join(", "));

    println!();
    println!("💻 Recommendations:");
    match config.resume_path() {
        Some(path) => println!("  Résumé: {} (top {} shown)", path, config.top_n()),
        None => println!("  Skipped: no résumé configured"),
    }

    println!();
    println!("💾 Output Configuration:");
    println!("  Path: {}", config.output_path());
    println!("  Formats: {}", config.output_formats().join(", "));
    if let Some(bundle) = config.bundle_name() {
        println!("  Compression: {} (ZIP)", bundle);
    }

    println!();
    println!("✅ Dry run analysis complete. Use --verbose for more details during actual run.");

    Ok(())
}
