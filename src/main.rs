use clap::Parser;
use enrich_etl::utils::{logger, validation::Validate};
use enrich_etl::{CliConfig, Engine, EnrichClient, EnrichPipeline};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting enrich-etl CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let monitor_enabled = config.monitor;
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    // 建立 client 與管道
    let client = EnrichClient::new(&config.endpoint, config.timeout_seconds);
    let pipeline = EnrichPipeline::new(client, config);
    let engine = Engine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(report) => {
            if report.interrupted {
                std::process::exit(1);
            }

            let stats = report.stats;
            if stats.passed == stats.total {
                println!("✓ All tests PASSED!");
            } else if stats.meets_pass_threshold() {
                println!("⚠ Pass rate within 95% threshold");
            } else {
                println!("⚠ {} tests failed", stats.failed);
                std::process::exit(1);
            }
        }
        Err(e) => {
            tracing::error!("❌ Enrichment run failed: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}
