use crate::domain::model::EnrichOutcome;
use async_trait::async_trait;
use serde_json::Value;

/// 將單筆事件送往遠端 enrichment 服務的介面
#[async_trait]
pub trait Enricher: Send + Sync {
    async fn enrich(&self, event: &Value) -> EnrichOutcome;
}

pub trait ConfigProvider: Send + Sync {
    fn endpoint(&self) -> &str;
    fn input_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn timeout_seconds(&self) -> u64;
    fn progress_interval(&self) -> u64;
}
