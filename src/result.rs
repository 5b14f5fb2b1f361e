use std::{fmt::Display, path::PathBuf};

use miette::miette;

#[derive(Debug)]
pub enum Error {
    /// The downloader reported that the stream cannot be fetched at all
    UnavailableStream(String),

    /// A video identifier that is not 11 characters of the YouTube alphabet
    InvalidVideoId(String),

    /// A time window that is negative or empty
    InvalidTimeWindow { start: f64, end: f64 },

    /// The manifest could not be opened or read
    ManifestFile { path: PathBuf, reason: String },

    /// Required manifest columns are absent, even after renaming
    MissingColumns(Vec<&'static str>),

    /// A manifest row whose values cannot be parsed
    InvalidRow { line: u64, reason: String },

    /// A padding format that is not a printf-style `%d` directive
    InvalidPadFormat(String),

    Miette(miette::Report),
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::UnavailableStream(log) => write!(f, "Unavailable stream: {log}"),
            Error::InvalidVideoId(id) => write!(
                f,
                "ValidationError: video id '{id}' must be 11 characters among \
                A-Z, a-z, 0-9, '-' and '_'"
            ),
            Error::InvalidTimeWindow { start, end } => write!(
                f,
                "ValidationError: invalid time window [{start}, {end}], \
                expected 0 <= start < end"
            ),
            Error::ManifestFile { path, reason } => write!(
                f,
                "FileError: could not read manifest '{}': {reason}",
                path.display()
            ),
            Error::MissingColumns(columns) => write!(
                f,
                "FormatError: manifest is missing the required columns: {}",
                columns.join(", ")
            ),
            Error::InvalidRow { line, reason } => {
                write!(f, "FormatError: manifest line {line}: {reason}")
            }
            Error::InvalidPadFormat(format) => write!(
                f,
                "Invalid trim format '{format}', expected a printf-style directive such as '%06d'"
            ),
            Error::Miette(report) => write!(f, "{report}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<miette::Report> for Error {
    fn from(err: miette::Report) -> Self {
        Error::Miette(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Miette(miette!("{err}"))
    }
}

impl From<Error> for miette::Report {
    fn from(err: Error) -> Self {
        match err {
            Error::Miette(err) => err,
            err => miette!("{err}"),
        }
    }
}

impl Error {
    pub fn wrap_err_with<D, F>(self, f: F) -> Error
    where
        D: Display + Send + Sync + 'static,
        F: FnOnce() -> D,
    {
        match self {
            Error::Miette(report) => Error::Miette(report.wrap_err(f())),
            err => err,
        }
    }
}

pub fn err_msg<D: Display>(msg: D) -> Error {
    Error::Miette(miette!("{msg}"))
}

pub fn bail<T, D: Display>(msg: D) -> Result<T> {
    Err(err_msg(msg))
}

pub type Result<T> = std::result::Result<T, Error>;
