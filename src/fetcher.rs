use tracing::{debug, info, warn};

use crate::{
    io::ClipLayout,
    outside::StreamDownloader,
    result::Error,
    types::{ClipRecord, DownloadOutcome},
};

/// Downloads the video of a clip, retrying a bounded number of times.
#[derive(Debug)]
pub struct ClipFetcher<'a> {
    stream_dl: &'a dyn StreamDownloader,
    layout: &'a ClipLayout,
    url_base: &'a str,
    attempts: u32,
}

impl<'a> ClipFetcher<'a> {
    pub const DEFAULT_ATTEMPTS: u32 = 5;

    pub fn new(
        stream_dl: &'a dyn StreamDownloader,
        layout: &'a ClipLayout,
        url_base: &'a str,
        attempts: u32,
    ) -> Self {
        Self {
            stream_dl,
            layout,
            url_base,
            attempts: attempts.max(1),
        }
    }

    /// Fetch the video of one clip to its output path.
    ///
    /// Nothing is done when the video, or its trimmed clip, is already there.
    /// Failures are never returned as errors but reported in the outcome,
    /// along with the downloader output of the last attempt.
    pub fn fetch(&self, record: &ClipRecord) -> DownloadOutcome {
        let clip_id = self.layout.clip_id(record);

        if let Err(err) = record.validate() {
            warn!("Skipping clip '{clip_id}': {err}");
            return DownloadOutcome::failure(clip_id, err.to_string());
        }

        let output = self.layout.clip_path(record);
        if output.exists() || self.layout.trimmed_path(record).exists() {
            debug!("Clip '{clip_id}' already downloaded");
            return DownloadOutcome::success(clip_id, DownloadOutcome::EXISTS);
        }

        let url = format!("{}{}", self.url_base, record.video_id);
        let mut last_log = String::new();

        for attempt in 1..=self.attempts {
            info!(
                "Downloading '{clip_id}' (attempt {attempt}/{})",
                self.attempts
            );

            match self
                .stream_dl
                .download_video(&url, &output, self.layout.extension())
            {
                Ok(run) if run.success => {
                    let success = output.exists();
                    if !success {
                        warn!("Downloader succeeded but '{}' is missing", output.display());
                    }
                    return DownloadOutcome {
                        clip_id,
                        success,
                        message: DownloadOutcome::DOWNLOADED.to_owned(),
                    };
                }
                Ok(run) => {
                    debug!("Attempt {attempt} for '{clip_id}' failed: {}", run.log);
                    last_log = run.log;
                }
                Err(Error::UnavailableStream(log)) => {
                    warn!("Video of '{clip_id}' is unavailable, not retrying");
                    return DownloadOutcome::failure(clip_id, log);
                }
                Err(err) => {
                    debug!("Attempt {attempt} for '{clip_id}' could not run: {err}");
                    last_log = err.to_string();
                }
            }
        }

        warn!(
            "Could not download '{clip_id}' after {} attempts",
            self.attempts
        );
        DownloadOutcome::failure(clip_id, last_log)
    }
}
