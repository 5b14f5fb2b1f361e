mod command;
mod ffmpeg;
mod ytdl;

pub use ffmpeg::{Ffmpeg, StreamTransformer};
pub use ytdl::{StreamDownloader, ToolRun, Ytdl};
