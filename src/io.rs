use std::path::{Path, PathBuf};

use miette::{Context, IntoDiagnostic};
use tempfile::NamedTempFile;

use crate::{
    result::Result,
    types::{ClipRecord, Extension, PadFormat},
};

/// Where the clips of a run are stored and how their files are named.
///
/// Every path is a pure function of the record, such that two different
/// records never share a file.
#[derive(Debug, Clone)]
pub struct ClipLayout {
    out_dir: PathBuf,
    pad: PadFormat,
    ext: Extension,
}

impl ClipLayout {
    pub fn new<P: Into<PathBuf>>(out_dir: P, pad: PadFormat, ext: Extension) -> Self {
        Self {
            out_dir: out_dir.into(),
            pad,
            ext,
        }
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    pub fn extension(&self) -> Extension {
        self.ext
    }

    /// Identifier of the clip: `<video-id>_<start>_<end>`
    pub fn clip_id(&self, record: &ClipRecord) -> String {
        format!(
            "{}_{}_{}",
            record.video_id,
            self.pad.render(record.start),
            self.pad.render(record.end)
        )
    }

    /// Path the downloader writes the full video to: `<out>/<clip-id>.<ext>`
    pub fn clip_path(&self, record: &ClipRecord) -> PathBuf {
        self.out_dir
            .join(format!("{}{}", self.clip_id(record), self.ext.with_dot()))
    }

    /// Path of the clip once trimmed: `<out>/<clip-id>_.<ext>`
    pub fn trimmed_path(&self, record: &ClipRecord) -> PathBuf {
        self.out_dir
            .join(format!("{}_{}", self.clip_id(record), self.ext.with_dot()))
    }
}

/// Create a named temporary file in the given directory and return its handle.
///
/// The file destructor will be called at the handle drop.
/// **As such, one must not simply get the file path and drop the handle.**
pub fn named_tempfile_in(dir: &Path, extension: Extension) -> Result<NamedTempFile> {
    Ok(tempfile::Builder::new()
        .prefix(".clipfetch-")
        .suffix(extension.with_dot())
        .tempfile_in(dir)
        .into_diagnostic()
        .wrap_err("Could not create a temporary file")?)
}
