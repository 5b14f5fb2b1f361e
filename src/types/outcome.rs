use serde::Serialize;

/// Result of fetching one clip, as written in the report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadOutcome {
    pub clip_id: String,
    pub success: bool,
    pub message: String,
}

impl DownloadOutcome {
    pub const EXISTS: &'static str = "Exists";
    pub const DOWNLOADED: &'static str = "Downloaded";

    pub fn success(clip_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            clip_id: clip_id.into(),
            success: true,
            message: message.into(),
        }
    }

    pub fn failure(clip_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            clip_id: clip_id.into(),
            success: false,
            message: message.into(),
        }
    }
}

/// Result of trimming one clip
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrimOutcome {
    Trimmed,
    /// The trimmed file was already there, nothing has been touched
    AlreadyTrimmed,
    /// The downloaded file is absent, usually because its download failed
    NotFound,
    Failed(String),
}
