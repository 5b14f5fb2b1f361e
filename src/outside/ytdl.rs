use std::{
    ffi::OsStr,
    fmt::Debug,
    path::Path,
    process::{Command, Output},
};

use super::command::{assert_success_command, merged_output, run_command, Capture, YT_DL, YT_DLP};
use crate::{
    result::{bail, Error, Result},
    types::Extension,
};

/// Downloader messages telling that the video will never be downloadable,
/// in lowercase
const UNAVAILABLE_MESSAGES: [&str; 5] = [
    "video unavailable",
    "this video is unavailable",
    "private video",
    "this video has been removed",
    "account associated with this video has been terminated",
];

/// What a downloader run left behind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolRun {
    /// Whether the program exited with a success status code
    pub success: bool,
    /// The program `stdout` and `stderr`, joined
    pub log: String,
}

/// Interface for downloading video streams
pub trait StreamDownloader: Sync + Debug {
    /// Download the video at `url` to `output`, in the given container format.
    ///
    /// A program that ran but failed is not an error: the returned [`ToolRun`]
    /// tells whether it succeeded. An error is returned if the program could not
    /// be run, or [`Error::UnavailableStream`] if it reported that the video
    /// cannot be downloaded at all.
    fn download_video(&self, url: &str, output: &Path, ext: Extension) -> Result<ToolRun>;
}

/// Interface for the [youtube-dl](https://github.com/ytdl-org/youtube-dl) program
/// or its [yt-dlp](https://github.com/yt-dlp/yt-dlp) fork
#[derive(Debug)]
pub struct Ytdl {
    program: String,
}

impl Ytdl {
    /// Verify that the `yt-dlp` or `youtube-dl` binaries are reachable.
    ///
    /// If a program is given, only that one is checked.
    pub fn new(program: Option<&str>) -> Result<Self> {
        let (candidates, missing) = match program {
            Some(program) => (vec![program], format!("Downloader '{program}' not found")),
            None => (
                vec![YT_DLP, YT_DL],
                format!("Neither {YT_DLP} nor {YT_DL} found"),
            ),
        };

        for program in candidates {
            if assert_success_command(program, |cmd| cmd.arg("--version")).is_ok() {
                return Ok(Self {
                    program: program.to_owned(),
                });
            }
        }

        bail(missing)
    }

    /// Run the command and check if it failed with saying the stream is unavailable.
    /// In that case, return [`Error::UnavailableStream`].
    ///
    /// In other cases, return the output handle.
    pub fn run_check_availability<F>(&self, f: F, capture: Capture) -> Result<Output>
    where
        F: FnOnce(&mut Command) -> &mut Command,
    {
        let res = run_command(&self.program, f, capture | Capture::STDERR)?;

        let stderr = String::from_utf8_lossy(&res.stderr);
        if stderr.lines().any(is_unavailable_message) {
            Err(Error::UnavailableStream(merged_output(&res)))
        } else {
            Ok(res)
        }
    }
}

/// Whether the line is an error telling the video cannot be downloaded at all.
///
/// HTTP errors (e.g. `HTTP Error 503: Service Unavailable`) are transient and do not count.
fn is_unavailable_message(line: &str) -> bool {
    let Some(message) = line.strip_prefix("ERROR:") else {
        return false;
    };
    if message.contains("HTTP Error") {
        return false;
    }

    let message = message.to_lowercase();
    UNAVAILABLE_MESSAGES
        .iter()
        .any(|pattern| message.contains(pattern))
}

/// The format selection arguments for the container.
///
/// YouTube serves no mkv stream, so for mkv the best streams are merged into one.
fn format_arguments(ext: Extension) -> Vec<&'static str> {
    match ext {
        Extension::Mkv => vec!["-f", "bestvideo+bestaudio/best", "--merge-output-format", "mkv"],
        ext => vec!["-f", ext.with_no_dot()],
    }
}

impl StreamDownloader for Ytdl {
    fn download_video(&self, url: &str, output: &Path, ext: Extension) -> Result<ToolRun> {
        let res = self.run_check_availability(
            |cmd| {
                cmd.arg("--force-ipv4")
                    .arg("--quiet")
                    .arg("--no-warnings")
                    .args(format_arguments(ext))
                    .args([OsStr::new("-o"), output.as_os_str()])
                    .arg("--")
                    .arg(url)
            },
            Capture::STDOUT,
        )?;

        Ok(ToolRun {
            success: res.status.success(),
            log: merged_output(&res),
        })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use std::{fs, os::unix::fs::PermissionsExt, path::PathBuf};

    use tempfile::TempDir;

    use super::*;
    use crate::{
        fetcher::ClipFetcher,
        io::ClipLayout,
        types::{ClipRecord, PadFormat},
    };

    /// Write an executable shell script standing in for the downloader
    fn fake_program(dir: &TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("fake-ytdl");
        fs::write(
            &path,
            format!("#!/bin/sh\ncase \"$1\" in --version) exit 0;; esac\n{body}\n"),
        )
        .unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    fn ytdl(program: &Path) -> Ytdl {
        Ytdl::new(Some(program.to_str().unwrap())).unwrap()
    }

    #[test]
    fn missing_program() {
        let err = Ytdl::new(Some("clipfetch-no-such-downloader")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Downloader 'clipfetch-no-such-downloader' not found"
        );
    }

    #[test]
    fn download_arguments() {
        let dir = tempfile::tempdir().unwrap();
        let program = fake_program(&dir, r#"printf '%s\n' "$@""#);

        let run = ytdl(&program)
            .download_video(
                "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
                Path::new("/data/dQw4w9WgXcQ_000001_000002.mp4"),
                Extension::Mp4,
            )
            .unwrap();

        assert!(run.success);
        assert_eq!(
            run.log.lines().collect::<Vec<_>>(),
            [
                "--force-ipv4",
                "--quiet",
                "--no-warnings",
                "-f",
                "mp4",
                "-o",
                "/data/dQw4w9WgXcQ_000001_000002.mp4",
                "--",
                "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            ]
        );
    }

    #[test]
    fn mkv_merges_the_best_streams() {
        let dir = tempfile::tempdir().unwrap();
        let program = fake_program(&dir, r#"printf '%s\n' "$@""#);

        let run = ytdl(&program)
            .download_video("url", Path::new("out.mkv"), Extension::Mkv)
            .unwrap();

        assert_eq!(
            run.log.lines().collect::<Vec<_>>(),
            [
                "--force-ipv4",
                "--quiet",
                "--no-warnings",
                "-f",
                "bestvideo+bestaudio/best",
                "--merge-output-format",
                "mkv",
                "-o",
                "out.mkv",
                "--",
                "url",
            ]
        );
    }

    #[test]
    fn failed_download_keeps_the_log() {
        let dir = tempfile::tempdir().unwrap();
        let program = fake_program(&dir, "echo 'ERROR: HTTP Error 429' >&2\nexit 1");

        let run = ytdl(&program)
            .download_video("url", Path::new("out.mp4"), Extension::Mp4)
            .unwrap();

        assert!(!run.success);
        assert_eq!(run.log, "ERROR: HTTP Error 429");
    }

    #[test]
    fn unavailable_stream() {
        let dir = tempfile::tempdir().unwrap();
        let program = fake_program(
            &dir,
            "echo 'ERROR: [youtube] dQw4w9WgXcQ: Video unavailable' >&2\nexit 1",
        );

        let res = ytdl(&program).download_video("url", Path::new("out.mp4"), Extension::Mp4);
        assert!(matches!(res, Err(Error::UnavailableStream(log)) if log.contains("Video unavailable")));
    }

    #[test]
    fn unavailable_messages() {
        for line in [
            "ERROR: [youtube] dQw4w9WgXcQ: Video unavailable",
            "ERROR: [youtube] dQw4w9WgXcQ: Private video. Sign in if you've been granted access",
            "ERROR: [youtube] dQw4w9WgXcQ: This video has been removed by the uploader",
        ] {
            assert!(is_unavailable_message(line), "{line}");
        }

        for line in [
            "ERROR: unable to download video data: HTTP Error 503: Service Unavailable",
            "ERROR: HTTP Error 429: Too Many Requests",
            "WARNING: Video unavailable in your country, trying another client",
        ] {
            assert!(!is_unavailable_message(line), "{line}");
        }
    }

    #[test]
    fn service_unavailable_is_retried() {
        let dir = tempfile::tempdir().unwrap();
        let calls = dir.path().join("calls");
        let program = fake_program(
            &dir,
            &format!(
                "echo call >> '{}'\n\
                echo 'ERROR: unable to download video data: HTTP Error 503: Service Unavailable' >&2\n\
                exit 1",
                calls.display()
            ),
        );
        let ytdl = ytdl(&program);
        let layout = ClipLayout::new(dir.path(), PadFormat::default(), Extension::Mp4);

        let outcome = ClipFetcher::new(&ytdl, &layout, "https://www.youtube.com/watch?v=", 5)
            .fetch(&ClipRecord::new("dQw4w9WgXcQ", 1., 2.));

        assert!(!outcome.success);
        assert!(outcome.message.ends_with("HTTP Error 503: Service Unavailable"));
        assert_eq!(fs::read_to_string(&calls).unwrap().lines().count(), 5);
    }
}
