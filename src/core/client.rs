use crate::domain::model::EnrichOutcome;
use crate::domain::ports::Enricher;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

/// 直接以 in-process HTTP client 呼叫 enrichment 端點，
/// 請求本體保留在記憶體內，不落地任何暫存檔
pub struct EnrichClient {
    client: Client,
    endpoint: String,
    timeout: Duration,
}

impl EnrichClient {
    pub fn new(endpoint: impl Into<String>, timeout_seconds: u64) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            timeout: Duration::from_secs(timeout_seconds),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait::async_trait]
impl Enricher for EnrichClient {
    async fn enrich(&self, event: &Value) -> EnrichOutcome {
        tracing::debug!("Posting event to: {}", self.endpoint);

        let result = self
            .client
            .post(&self.endpoint)
            .json(event)
            .timeout(self.timeout)
            .send()
            .await;

        let response = match result {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                return EnrichOutcome::Failure("Request timeout".to_string())
            }
            Err(e) => return EnrichOutcome::Failure(e.to_string()),
        };

        let status = response.status();
        tracing::debug!("Enrichment response status: {}", status);

        if status.as_u16() != 200 {
            return EnrichOutcome::Failure(format!("HTTP {}", status.as_u16()));
        }

        match response.json::<Value>().await {
            Ok(parsed) => EnrichOutcome::Success(parsed),
            Err(e) if e.is_timeout() => EnrichOutcome::Failure("Request timeout".to_string()),
            Err(_) => EnrichOutcome::Failure("Invalid JSON response".to_string()),
        }
    }
}
