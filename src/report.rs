use std::{
    fs::File,
    io::{BufWriter, Write},
    path::PathBuf,
};

use miette::{Context, IntoDiagnostic};
use tracing::info;

use crate::{result::Result, types::DownloadOutcome};

/// Writes the outcomes of a run to a JSON file
#[derive(Debug, Clone)]
pub struct ReportWriter {
    path: PathBuf,
}

impl ReportWriter {
    pub const DEFAULT_PATH: &'static str = "download_report.json";

    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// Write every outcome, in order, replacing any previous report.
    pub fn write(&self, outcomes: &[DownloadOutcome]) -> Result<()> {
        let file = File::create(&self.path)
            .into_diagnostic()
            .wrap_err_with(|| format!("Could not create report file {}", self.path.display()))?;
        let mut writer = BufWriter::new(file);

        serde_json::to_writer_pretty(&mut writer, outcomes)
            .into_diagnostic()
            .wrap_err("Could not serialize the report")?;
        writeln!(writer)?;
        writer.flush()?;

        info!(
            "Report of {} clips written to {}",
            outcomes.len(),
            self.path.display()
        );
        Ok(())
    }
}
