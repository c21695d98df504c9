use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_path, validate_positive_number, validate_url, Validate};
use chrono::Local;
use clap::Parser;

/// 預設輸出檔名帶上執行當下的時間戳，避免覆蓋前一次結果
fn default_output_name() -> String {
    format!("enriched-{}.csv", Local::now().format("%Y%m%d_%H%M%S"))
}

#[derive(Debug, Clone, Parser)]
#[command(name = "enrich-etl")]
#[command(about = "Replays event CSV exports against an enrichment API and validates the responses")]
pub struct CliConfig {
    /// Enrichment endpoint URL
    #[arg(long)]
    pub endpoint: String,

    /// Source CSV with EVENT_ID and FULL_EVENT_PAYLOAD columns
    #[arg(long)]
    pub input: String,

    /// Output CSV path
    #[arg(long, default_value_t = default_output_name())]
    pub output: String,

    /// Per-request timeout in seconds
    #[arg(long, default_value = "30")]
    pub timeout_seconds: u64,

    /// Report progress every N events
    #[arg(long, default_value = "100")]
    pub progress_interval: u64,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Enable system monitoring")]
    pub monitor: bool,
}

impl ConfigProvider for CliConfig {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn input_path(&self) -> &str {
        &self.input
    }

    fn output_path(&self) -> &str {
        &self.output
    }

    fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds
    }

    fn progress_interval(&self) -> u64 {
        self.progress_interval
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_url("endpoint", &self.endpoint)?;
        validate_path("input", &self.input)?;
        validate_path("output", &self.output)?;
        validate_positive_number("timeout_seconds", self.timeout_seconds, 1)?;
        validate_positive_number("progress_interval", self.progress_interval, 1)?;
        Ok(())
    }
}
