use std::{ffi::OsStr, fmt::Debug, path::Path};

use crate::result::Result;

use super::command::{assert_success_command, FFMPEG, FFXXX_DEFAULT_ARGS};

pub trait StreamTransformer: Sync + Debug {
    /// Extract a clip containing the stream data between `start` and `end`
    /// (in seconds) from the input file to the output file.
    ///
    /// The output file may already exist, in which case it is overwritten.
    fn extract_clip(&self, input: &Path, output: &Path, start: f64, end: f64) -> Result<()>;
}

/// Interface for the [ffmpeg](https://ffmpeg.org) program
#[derive(Debug)]
pub struct Ffmpeg {
    program: String,
}

impl Ffmpeg {
    /// Verify that the `ffmpeg` binary is reachable
    pub fn new(program: Option<&str>) -> Result<Self> {
        let program = program.unwrap_or(FFMPEG);
        assert_success_command(program, |cmd| cmd.arg("-version"))?;

        Ok(Self {
            program: program.to_owned(),
        })
    }
}

impl StreamTransformer for Ffmpeg {
    fn extract_clip(&self, input: &Path, output: &Path, start: f64, end: f64) -> Result<()> {
        // Seek on the input side, then copy the streams without re-encoding them
        assert_success_command(&self.program, |cmd| {
            cmd.args(FFXXX_DEFAULT_ARGS)
                .arg("-y")
                .args(["-ss", &start.to_string()])
                .args([OsStr::new("-i"), input.as_os_str()])
                .args(["-t", &(end - start).to_string()])
                .args(["-map", "0:v:0", "-map", "0:a?"])
                .args(["-c:v", "copy", "-c:a", "copy"])
                .arg(output)
        })
    }
}
