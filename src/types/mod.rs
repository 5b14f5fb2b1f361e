mod clip;
mod extension;
mod outcome;
mod pad_format;

pub use clip::ClipRecord;
pub use extension::Extension;
pub use outcome::{DownloadOutcome, TrimOutcome};
pub use pad_format::PadFormat;
