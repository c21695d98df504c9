use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 輸入 CSV 的單筆事件列
#[derive(Debug, Clone, Deserialize)]
pub struct EventRow {
    #[serde(rename = "EVENT_ID", default)]
    pub event_id: String,
    #[serde(rename = "FULL_EVENT_PAYLOAD")]
    pub payload: String,
}

/// 輸出 CSV 的單筆結果列，欄位順序即輸出欄位順序
#[derive(Debug, Clone, Serialize)]
pub struct OutputRow {
    #[serde(rename = "EVENT_ID")]
    pub event_id: String,
    #[serde(rename = "TEST_RESULT")]
    pub test_result: Verdict,
    #[serde(rename = "FULL_EVENT_PAYLOAD")]
    pub full_event_payload: String,
    #[serde(rename = "ENRICHED_RESPONSE")]
    pub enriched_response: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    Pass,
    Fail,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Pass => "PASS",
            Verdict::Fail => "FAIL",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Enrichment API 呼叫結果，成功帶回解析後的 JSON，失敗帶回原因
#[derive(Debug, Clone, PartialEq)]
pub enum EnrichOutcome {
    Success(serde_json::Value),
    Failure(String),
}

/// 單次執行的累計計數，僅由 orchestrator 在每筆記錄完成後更新
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub total: u64,
    pub passed: u64,
    pub failed: u64,
}

impl RunStats {
    pub fn record(&mut self, verdict: Verdict) {
        self.total += 1;
        match verdict {
            Verdict::Pass => self.passed += 1,
            Verdict::Fail => self.failed += 1,
        }
    }

    pub fn pass_rate(&self) -> f64 {
        if self.total == 0 {
            100.0
        } else {
            self.passed as f64 / self.total as f64 * 100.0
        }
    }

    pub fn fail_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.failed as f64 / self.total as f64 * 100.0
        }
    }

    /// 全數通過或通過率達 95% 即視為成功
    pub fn meets_pass_threshold(&self) -> bool {
        self.passed == self.total
            || (self.total > 0 && self.passed as f64 / self.total as f64 >= 0.95)
    }
}

/// 管道跑完（或被中斷）後的整體結果
#[derive(Debug, Clone)]
pub struct RunReport {
    pub stats: RunStats,
    pub output_path: String,
    pub elapsed: Duration,
    pub interrupted: bool,
}

impl RunReport {
    pub fn events_per_sec(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.stats.total as f64 / secs
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_record_keeps_total_consistent() {
        let mut stats = RunStats::default();
        stats.record(Verdict::Pass);
        stats.record(Verdict::Fail);
        stats.record(Verdict::Pass);

        assert_eq!(stats.total, 3);
        assert_eq!(stats.passed, 2);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.total, stats.passed + stats.failed);
    }

    #[test]
    fn test_pass_threshold_all_passed() {
        let stats = RunStats {
            total: 10,
            passed: 10,
            failed: 0,
        };
        assert!(stats.meets_pass_threshold());
    }

    #[test]
    fn test_pass_threshold_exact_95_percent() {
        let stats = RunStats {
            total: 20,
            passed: 19,
            failed: 1,
        };
        assert!(stats.meets_pass_threshold());
    }

    #[test]
    fn test_pass_threshold_below_95_percent() {
        let stats = RunStats {
            total: 20,
            passed: 18,
            failed: 2,
        };
        assert!(!stats.meets_pass_threshold());
    }

    #[test]
    fn test_pass_threshold_empty_run_counts_as_passed() {
        let stats = RunStats::default();
        assert!(stats.meets_pass_threshold());
        assert_eq!(stats.pass_rate(), 100.0);
        assert_eq!(stats.fail_rate(), 0.0);
    }

    #[test]
    fn test_verdict_display() {
        assert_eq!(Verdict::Pass.to_string(), "PASS");
        assert_eq!(Verdict::Fail.to_string(), "FAIL");
    }
}
