mod batch;
mod cli;
mod fetcher;
mod io;
mod logging;
mod manifest;
mod outside;
mod pipeline;
mod pool;
mod report;
mod result;
mod settings;
mod trimmer;
mod types;

#[cfg(test)]
mod testing;

use clap::Parser;
use miette::{miette, Context, IntoDiagnostic};
use tracing::{debug, info, warn};

use crate::{
    batch::Batch,
    cli::Args,
    fetcher::ClipFetcher,
    io::ClipLayout,
    logging::init_logging,
    manifest::Manifest,
    outside::{Ffmpeg, Ytdl},
    pipeline::Pipeline,
    pool::WorkerPool,
    report::ReportWriter,
    result::Result,
    settings::Settings,
    trimmer::ClipTrimmer,
    types::PadFormat,
};

fn main() -> miette::Result<()> {
    // Initialize the environment & CLI
    let args = Args::parse();
    init_logging(args.log_level())?;

    let settings = Settings::load(args.config.as_deref())?.merge_args(&args);
    debug!("{settings:?}");

    if let Some(value) = &args.drop_duplicates {
        warn!("--drop-duplicates is not available at the moment, ignoring '{value}'");
    }

    let pad = PadFormat::parse(&settings.trim_format)?;

    let manifest = Manifest::load(&args.input_csv)?;
    info!("{} clips in the manifest", manifest.len());

    // Make sure the needed directories are created
    std::fs::create_dir_all(&args.output_dir)
        .into_diagnostic()
        .wrap_err("Could not create output directory")?;

    let (ytdl, ffmpeg) = load_external_components(&settings)?;

    let layout = ClipLayout::new(&args.output_dir, pad, settings.extension);
    let pool = WorkerPool::from_num_jobs(settings.num_jobs)?;
    debug!("Worker pool: {pool:?}");
    let report = ReportWriter::new(&settings.report);

    let pipeline = Pipeline {
        batch: Batch::new(&pool).with_shuffle(args.shuffle),
        fetcher: ClipFetcher::new(&ytdl, &layout, &settings.url_base, settings.attempts),
        trimmer: ClipTrimmer::new(&ffmpeg, &layout),
        report: &report,
    };
    pipeline.run(manifest.records())?;

    Ok(())
}

/// Load the external components
fn load_external_components(settings: &Settings) -> Result<(Ytdl, Ffmpeg)> {
    // Construct the handles concurrently as executing an external program
    // is not instantaneous. That way we can avoid adding the costs
    std::thread::scope(|scope| -> Result<(Ytdl, Ffmpeg)> {
        let ytdl_thread = scope.spawn(|| Ytdl::new(settings.downloader.as_deref()));
        let ffmpeg_thread = scope.spawn(|| Ffmpeg::new(settings.ffmpeg.as_deref()));

        let ytdl = ytdl_thread
            .join()
            .map_err(|_| miette!("Could not join thread"))?
            .map_err(|err| err.wrap_err_with(|| "Could not find the downloader"))?;
        let ffmpeg = ffmpeg_thread
            .join()
            .map_err(|_| miette!("Could not join thread"))?
            .map_err(|err| err.wrap_err_with(|| "Could not find ffmpeg"))?;

        Ok((ytdl, ffmpeg))
    })
}
