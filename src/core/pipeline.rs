use crate::core::sanitizer::sanitize;
use crate::core::validator::validate;
use crate::domain::model::{EnrichOutcome, EventRow, OutputRow, RunReport, RunStats, Verdict};
use crate::domain::ports::{ConfigProvider, Enricher};
use crate::utils::error::{EtlError, Result};
use serde_json::{json, Value};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

const OUTPUT_HEADER: [&str; 4] = [
    "EVENT_ID",
    "TEST_RESULT",
    "FULL_EVENT_PAYLOAD",
    "ENRICHED_RESPONSE",
];

/// 逐筆執行 sanitize → enrich → validate 並寫出結果列的 orchestrator
pub struct EnrichPipeline<E: Enricher, C: ConfigProvider> {
    enricher: E,
    config: C,
    interrupted: Arc<AtomicBool>,
}

impl<E: Enricher, C: ConfigProvider> EnrichPipeline<E, C> {
    pub fn new(enricher: E, config: C) -> Self {
        Self {
            enricher,
            config,
            interrupted: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn config(&self) -> &C {
        &self.config
    }

    /// 中斷旗標，由外部（如 Ctrl-C handler）設置，記錄之間檢查
    pub fn interrupt_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.interrupted)
    }

    pub async fn run(&self) -> Result<RunReport> {
        let input_path = self.config.input_path();
        if !Path::new(input_path).exists() {
            return Err(EtlError::InputNotFound {
                path: input_path.to_string(),
            });
        }

        let mut reader = csv::Reader::from_path(input_path)?;

        let output_path = self.config.output_path().to_string();
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(&output_path)?;

        // 標頭列無論有無資料都要寫出
        writer.write_record(OUTPUT_HEADER)?;
        writer.flush()?;

        let started = Instant::now();
        let mut stats = RunStats::default();
        let mut interrupted = false;
        let progress_interval = self.config.progress_interval();

        for (idx, row) in reader.deserialize::<EventRow>().enumerate() {
            if self.interrupted.load(Ordering::SeqCst) {
                interrupted = true;
                break;
            }

            let line_no = idx as u64 + 1;
            let row = row?;
            let output = self.process_row(line_no, row).await?;
            stats.record(output.test_result);
            writer.serialize(&output)?;

            if line_no % progress_interval == 0 {
                // 定期落盤，中斷時已完成的列不會遺失
                writer.flush()?;
                let elapsed = started.elapsed().as_secs_f64();
                let rate = if elapsed > 0.0 {
                    line_no as f64 / elapsed
                } else {
                    0.0
                };
                tracing::info!(
                    "[{:5}] Processed: {} passed, {} failed ({:.1}% pass rate, {:.1} events/sec)",
                    line_no,
                    stats.passed,
                    stats.failed,
                    stats.pass_rate(),
                    rate
                );
            }
        }

        writer.flush()?;

        Ok(RunReport {
            stats,
            output_path,
            elapsed: started.elapsed(),
            interrupted,
        })
    }

    async fn process_row(&self, line_no: u64, row: EventRow) -> Result<OutputRow> {
        let event_id = if row.event_id.trim().is_empty() {
            format!("unknown_{}", line_no)
        } else {
            row.event_id.clone()
        };

        // 原始 payload 字串原封不動保留到輸出欄位
        let original = match serde_json::from_str::<Value>(&row.payload) {
            Ok(value) => value,
            Err(e) => {
                let envelope = json!({ "error": format!("Parse error: {}", e) });
                return Ok(OutputRow {
                    event_id,
                    test_result: Verdict::Fail,
                    full_event_payload: row.payload,
                    enriched_response: serde_json::to_string(&envelope)?,
                });
            }
        };

        let cleaned = sanitize(&original);

        let (test_result, enriched_response) = match self.enricher.enrich(&cleaned).await {
            EnrichOutcome::Failure(error) => {
                let envelope = json!({ "error": error });
                (Verdict::Fail, serde_json::to_string(&envelope)?)
            }
            EnrichOutcome::Success(response) => {
                let (verdict, reason) = validate(&response);
                match verdict {
                    Verdict::Pass => (Verdict::Pass, serde_json::to_string(&response)?),
                    Verdict::Fail => {
                        let envelope = json!({ "error": reason, "response": response });
                        (Verdict::Fail, serde_json::to_string(&envelope)?)
                    }
                }
            }
        };

        Ok(OutputRow {
            event_id,
            test_result,
            full_event_payload: row.payload,
            enriched_response,
        })
    }
}
