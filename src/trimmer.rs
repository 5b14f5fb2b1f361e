use std::path::Path;

use miette::{Context, IntoDiagnostic};
use tracing::{debug, error, info, warn};

use crate::{
    io::{named_tempfile_in, ClipLayout},
    outside::StreamTransformer,
    result::Result,
    types::{ClipRecord, TrimOutcome},
};

/// Cuts downloaded videos down to the time window of their clip.
#[derive(Debug)]
pub struct ClipTrimmer<'a> {
    stream_tsf: &'a dyn StreamTransformer,
    layout: &'a ClipLayout,
}

impl<'a> ClipTrimmer<'a> {
    pub fn new(stream_tsf: &'a dyn StreamTransformer, layout: &'a ClipLayout) -> Self {
        Self { stream_tsf, layout }
    }

    /// Trim the downloaded video of a clip, then remove the untrimmed video.
    ///
    /// A clip that is already trimmed is left untouched, and a clip whose video
    /// is absent is skipped. Failures are logged and reported in the outcome.
    pub fn trim(&self, record: &ClipRecord) -> TrimOutcome {
        let clip_id = self.layout.clip_id(record);
        let input = self.layout.clip_path(record);
        let output = self.layout.trimmed_path(record);

        if output.exists() {
            debug!("Clip '{clip_id}' already trimmed");
            return TrimOutcome::AlreadyTrimmed;
        }

        if !input.exists() {
            warn!("Video not found: '{}'", input.display());
            return TrimOutcome::NotFound;
        }

        info!(
            "Trimming '{clip_id}' ({} - {})",
            record.start, record.end
        );
        match self.create_clip(&input, &output, record) {
            Ok(()) => {
                info!("Clip '{clip_id}' completed");
                TrimOutcome::Trimmed
            }
            Err(err) => {
                let err = miette::Report::from(err);
                error!("Could not trim '{clip_id}': {err:?}");
                TrimOutcome::Failed(format!("{err}"))
            }
        }
    }

    /// Create the clip in a temporary file next to the output, then move it
    /// in place and delete the input.
    ///
    /// That way, a file at the output path is always a complete clip.
    fn create_clip(&self, input: &Path, output: &Path, record: &ClipRecord) -> Result<()> {
        let tmp = named_tempfile_in(self.layout.out_dir(), self.layout.extension())?;

        self.stream_tsf
            .extract_clip(input, tmp.path(), record.start, record.end)
            .map_err(|err| err.wrap_err_with(|| "Could not extract the clip from the video"))?;

        tmp.persist(output)
            .into_diagnostic()
            .wrap_err_with(|| format!("Could not move the clip to '{}'", output.display()))?;

        std::fs::remove_file(input)
            .into_diagnostic()
            .wrap_err("Could not remove the untrimmed video")?;

        Ok(())
    }
}
