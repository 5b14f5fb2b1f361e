use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::types::Extension;

macro_rules! arg_env {
    ($v:literal) => {
        concat!("CLIPFETCH_", $v)
    };
}

/// Download the video clips listed in a dataset manifest and trim them to
/// their time window.
///
/// Clips already present in the output directory are not downloaded again,
/// so an interrupted run can simply be started over.
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Args {
    /// CSV file with a header row listing the clips, with either the
    /// `video-id,start-time,end-time` columns or the
    /// `youtube_id,time_start,time_end` ones. Other columns are ignored
    #[arg(env = arg_env!("INPUT"))]
    pub input_csv: PathBuf,

    /// Output directory where the videos will be saved
    #[arg(env = arg_env!("OUT"))]
    pub output_dir: PathBuf,

    /// printf-style format of the times in the file names:
    /// `<video-id>_<format(start)>_<format(end)>.<ext>` [default: %06d]
    #[arg(short = 'f', long)]
    pub trim_format: Option<String>,

    /// Number of parallel jobs. 1 runs everything sequentially, 0 or a
    /// negative value counts from the number of CPUs (-1 for all of them) [default: 12]
    #[arg(short = 'n', long, allow_negative_numbers = true)]
    pub num_jobs: Option<i32>,

    /// Unavailable at the moment: the value is accepted but ignored
    #[arg(long)]
    pub drop_duplicates: Option<String>,

    /// TOML settings file
    #[arg(short, long, env = arg_env!("CONFIG"))]
    pub config: Option<PathBuf>,

    /// Where to write the download report [default: download_report.json]
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Maximum number of download attempts per clip [default: 5]
    #[arg(long)]
    pub attempts: Option<u32>,

    /// Container format of the downloaded videos [default: mp4]
    #[arg(long = "ext", value_enum)]
    pub extension: Option<Extension>,

    /// Randomize the order in which the clips are downloaded.
    /// The report keeps the order of the manifest
    #[arg(long)]
    pub shuffle: bool,

    /// Print more logs. Can be repeated
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    pub fn log_level(&self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::INFO,
            1 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }
}
