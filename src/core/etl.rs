use crate::core::Pipeline;
use crate::domain::model::ConversionReport;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// Where `load` put the result; `None` for a dry run.
    pub output_path: Option<String>,
    pub report: ConversionReport,
}

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

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    pub async fn run(&self) -> Result<RunOutcome> {
        self.execute(true).await
    }

    /// Extract and transform only; nothing is written.
    pub async fn dry_run(&self) -> Result<RunOutcome> {
        self.execute(false).await
    }

    async fn execute(&self, load: bool) -> Result<RunOutcome> {
        tracing::debug!("Starting conversion");

        let tables = self.pipeline.extract().await?;
        self.monitor.log_stats("Extract");

        let conversion = self.pipeline.transform(tables).await?;
        self.monitor.log_stats("Transform");

        let report = conversion.report.clone();
        let output_path = if load {
            let path = self.pipeline.load(conversion).await?;
            self.monitor.log_stats("Load");
            tracing::info!("💾 Output saved to: {}", path);
            Some(path)
        } else {
            None
        };

        self.monitor.log_final_stats();
        Ok(RunOutcome {
            output_path,
            report,
        })
    }
}
