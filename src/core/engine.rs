use crate::core::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::RunMonitor;

pub struct RunEngine<P: Pipeline> {
    pipeline: P,
    monitor: RunMonitor,
}

impl<P: Pipeline> RunEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self {
            pipeline,
            monitor: RunMonitor::new(false),
        }
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: RunMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<String> {
        println!("Starting enrichment run...");

        println!("Loading source table...");
        let table = self.pipeline.acquire().await?;
        println!("Loaded {} rows", table.len());
        self.monitor.stage_done("acquire");

        println!("Searching and extracting...");
        let result = self.pipeline.enrich(table).await?;
        println!("Collected {} result rows", result.output.len());
        if !result.entities_without_results.is_empty() {
            println!(
                "No search results for: {}",
                result.entities_without_results.join(", ")
            );
        }
        self.monitor.stage_done("enrich");

        println!("Exporting results...");
        let output_path = self.pipeline.export(result).await?;
        println!("Output saved to: {}", output_path);
        self.monitor.stage_done("export");

        self.monitor.log_summary();
        Ok(output_path)
    }
}
