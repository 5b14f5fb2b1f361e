use std::{fs::File, io::Read, path::Path};

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::{debug, warn};

use crate::{
    result::{Error, Result},
    types::ClipRecord,
};

const VIDEO_ID: &str = "video-id";
const START_TIME: &str = "start-time";
const END_TIME: &str = "end-time";

/// Column names of the Kinetics / HVU style manifests, and their canonical name
const RENAMES: [(&str, &str); 3] = [
    ("youtube_id", VIDEO_ID),
    ("time_start", START_TIME),
    ("time_end", END_TIME),
];

/// The clips listed in a CSV dataset file, in file order
#[derive(Debug, Clone, PartialEq)]
pub struct Manifest {
    records: Vec<ClipRecord>,
}

impl Manifest {
    /// Read the manifest file at the given path
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|err| Error::ManifestFile {
            path: path.to_owned(),
            reason: err.to_string(),
        })?;

        Self::from_reader(file).map_err(|err| match err {
            Error::ManifestFile { reason, .. } => Error::ManifestFile {
                path: path.to_owned(),
                reason,
            },
            err => err,
        })
    }

    /// Read a manifest from CSV data with a header row.
    ///
    /// The `youtube_id`, `time_start`, `time_end` columns are understood as
    /// `video-id`, `start-time`, `end-time`. Other columns are kept in the
    /// records' extra fields.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = reader
            .headers()
            .map_err(read_error)?
            .iter()
            .map(|name| {
                RENAMES
                    .iter()
                    .find(|(from, _)| *from == name)
                    .map_or(name, |(_, to)| *to)
                    .to_owned()
            })
            .collect();
        debug!("Manifest columns: {headers:?}");

        let column = |name: &str| headers.iter().position(|h| h == name);
        let (video_id, start, end) = match (column(VIDEO_ID), column(START_TIME), column(END_TIME))
        {
            (Some(video_id), Some(start), Some(end)) => (video_id, start, end),
            (video_id, start, end) => {
                let missing = [(video_id, VIDEO_ID), (start, START_TIME), (end, END_TIME)]
                    .into_iter()
                    .filter(|(idx, _)| idx.is_none())
                    .map(|(_, name)| name)
                    .collect();
                return Err(Error::MissingColumns(missing));
            }
        };

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row.map_err(read_error)?;
            let line = row.position().map_or(0, |pos| pos.line());

            if row.iter().all(str::is_empty) {
                warn!("Skipping empty manifest line {line}");
                continue;
            }

            let parse_time = |idx: usize, name: &str| -> Result<f64> {
                let value = row.get(idx).unwrap_or_default();
                value.parse().map_err(|_| Error::InvalidRow {
                    line,
                    reason: format!("{name} '{value}' is not a number"),
                })
            };

            records.push(ClipRecord {
                video_id: row.get(video_id).unwrap_or_default().to_owned(),
                start: parse_time(start, START_TIME)?,
                end: parse_time(end, END_TIME)?,
                extra: extra_columns(&headers, &row, [video_id, start, end]),
            });
        }

        Ok(Self { records })
    }

    pub fn records(&self) -> &[ClipRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
}

fn extra_columns(headers: &[String], row: &StringRecord, used: [usize; 3]) -> Vec<(String, String)> {
    headers
        .iter()
        .zip(row.iter())
        .enumerate()
        .filter(|(idx, _)| !used.contains(idx))
        .map(|(_, (name, value))| (name.clone(), value.to_owned()))
        .collect()
}

fn read_error(err: csv::Error) -> Error {
    match err.position() {
        Some(pos) if !err.is_io_error() => Error::InvalidRow {
            line: pos.line(),
            reason: err.to_string(),
        },
        _ if err.is_io_error() => Error::ManifestFile {
            path: Default::default(),
            reason: err.to_string(),
        },
        _ => Error::InvalidRow {
            line: 0,
            reason: err.to_string(),
        },
    }
}
