use crate::result::{Error, Result};

/// Length of every YouTube video identifier
const VIDEO_ID_LEN: usize = 11;

/// One row of the manifest: a time window inside a source video.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipRecord {
    pub video_id: String,
    /// Start of the window, in seconds
    pub start: f64,
    /// End of the window, in seconds
    pub end: f64,
    /// Columns of the manifest that are not part of the clip definition,
    /// in file order
    pub extra: Vec<(String, String)>,
}

impl ClipRecord {
    pub fn new(video_id: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            video_id: video_id.into(),
            start,
            end,
            extra: Vec::new(),
        }
    }

    /// Check the record can be fetched: the video identifier must be exactly
    /// 11 characters among `A-Z`, `a-z`, `0-9`, `-` and `_`, and the window
    /// must satisfy `0 <= start < end`.
    pub fn validate(&self) -> Result<()> {
        let valid_char = |c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_';
        if self.video_id.chars().count() != VIDEO_ID_LEN || !self.video_id.chars().all(valid_char) {
            return Err(Error::InvalidVideoId(self.video_id.clone()));
        }

        // Written so that NaN values are rejected as well
        if !(self.start >= 0. && self.end > self.start) {
            return Err(Error::InvalidTimeWindow {
                start: self.start,
                end: self.end,
            });
        }

        Ok(())
    }
}
