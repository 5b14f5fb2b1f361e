use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};
use miette::{Context, IntoDiagnostic};
use serde::Deserialize;

use crate::{
    cli::Args, fetcher::ClipFetcher, report::ReportWriter, result::Result, types::Extension,
    types::PadFormat,
};

/// Prefix of the environment variables overriding the settings file
const ENV_PREFIX: &str = "CLIPFETCH";

/// Tunables of a run.
///
/// They are read from an optional TOML file, then from `CLIPFETCH_*`
/// environment variables, and finally from the command-line flags.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Maximum number of download attempts per clip
    pub attempts: u32,
    /// Prepended to the video identifiers to get the URL to download
    pub url_base: String,
    /// Downloader program. If unset, `yt-dlp` then `youtube-dl` are tried
    pub downloader: Option<String>,
    /// Program used to trim the videos
    pub ffmpeg: Option<String>,
    /// Container format of the videos
    pub extension: Extension,
    /// See [`crate::pool::WorkerPool::from_num_jobs`]
    pub num_jobs: i32,
    /// printf-style format of the times in the file names
    pub trim_format: String,
    /// Where the report is written
    pub report: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            attempts: ClipFetcher::DEFAULT_ATTEMPTS,
            url_base: "https://www.youtube.com/watch?v=".to_owned(),
            downloader: None,
            ffmpeg: None,
            extension: Extension::default(),
            num_jobs: 12,
            trim_format: PadFormat::DEFAULT.to_owned(),
            report: PathBuf::from(ReportWriter::DEFAULT_PATH),
        }
    }
}

impl Settings {
    /// Read the settings file if given, then the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(true));
        }

        Ok(builder
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()
            .into_diagnostic()
            .wrap_err("Could not read the settings")?
            .try_deserialize()
            .into_diagnostic()
            .wrap_err("Invalid settings")?)
    }

    /// Give precedence to the flags given on the command line
    pub fn merge_args(mut self, args: &Args) -> Self {
        if let Some(num_jobs) = args.num_jobs {
            self.num_jobs = num_jobs;
        }
        if let Some(trim_format) = &args.trim_format {
            self.trim_format = trim_format.clone();
        }
        if let Some(report) = &args.report {
            self.report = report.clone();
        }
        if let Some(attempts) = args.attempts {
            self.attempts = attempts;
        }
        if let Some(extension) = args.extension {
            self.extension = extension;
        }

        self
    }
}
