use clap::ValueEnum;
use serde::Deserialize;

/// Container format requested from the downloader, also used as the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Extension {
    #[default]
    Mp4,
    Mkv,
    Webm,
}

impl Extension {
    /// Return the extension with the leading dot.
    /// e.g. ".ext"
    pub fn with_dot(self) -> &'static str {
        match self {
            Extension::Mp4 => ".mp4",
            Extension::Mkv => ".mkv",
            Extension::Webm => ".webm",
        }
    }

    /// Return the extension without the leading dot.
    /// e.g. "ext"
    pub fn with_no_dot(self) -> &'static str {
        &self.with_dot()[1..]
    }
}
