use crate::core::pipeline::EnrichPipeline;
use crate::domain::model::RunReport;
use crate::domain::ports::{ConfigProvider, Enricher};
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;
use std::sync::atomic::Ordering;

/// 把 pipeline 跑完整個流程並輸出摘要的執行器
pub struct Engine<E: Enricher, C: ConfigProvider> {
    pipeline: EnrichPipeline<E, C>,
    monitor: SystemMonitor,
}

impl<E: Enricher, C: ConfigProvider> Engine<E, C> {
    pub fn new(pipeline: EnrichPipeline<E, C>) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: EnrichPipeline<E, C>, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<RunReport> {
        let config = self.pipeline.config();
        println!("Enrichment CSV Processor with Validation");
        println!("Input:    {}", config.input_path());
        println!("Output:   {}", config.output_path());
        println!("Endpoint: {}", config.endpoint());
        println!("{}", "=".repeat(80));

        self.monitor.log_stats("startup");
        self.install_interrupt_handler();

        let report = self.pipeline.run().await?;

        self.monitor.log_final_stats();
        self.print_summary(&report);

        Ok(report)
    }

    /// Ctrl-C 只設旗標，當前記錄做完才停，已寫出的列保持完整
    fn install_interrupt_handler(&self) {
        let flag = self.pipeline.interrupt_flag();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("⚠ Interrupt received, stopping after current record");
                flag.store(true, Ordering::SeqCst);
            }
        });
    }

    fn print_summary(&self, report: &RunReport) {
        let stats = &report.stats;
        let elapsed = report.elapsed.as_secs_f64();

        if report.interrupted {
            println!();
            println!("⚠ Interrupted by user after {:.1} seconds", elapsed);
            println!(
                "Processed {} events ({} passed)",
                stats.total, stats.passed
            );
            println!("Partial output saved to: {}", report.output_path);
            return;
        }

        println!();
        println!("{}", "=".repeat(80));
        println!("ENRICHMENT COMPLETE");
        println!("{}", "=".repeat(80));
        println!("Total Events:     {}", stats.total);
        println!(
            "✓ PASSED:         {} ({:.1}%)",
            stats.passed,
            stats.pass_rate()
        );
        println!(
            "✗ FAILED:         {} ({:.1}%)",
            stats.failed,
            stats.fail_rate()
        );
        println!();
        println!("Time Elapsed:     {:.1} seconds", elapsed);
        println!("Average Rate:     {:.1} events/sec", report.events_per_sec());
        println!();
        println!("Output saved to: {}", report.output_path);
        println!("{}", "=".repeat(80));
    }
}
