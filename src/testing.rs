//! Stand-ins for the external programs and the worker pool, used by the tests

use std::{
    fs,
    path::{Path, PathBuf},
    sync::Mutex,
};

use crate::{
    outside::{StreamDownloader, StreamTransformer, ToolRun},
    pool::{Executor, Job},
    result::{bail, Error, Result},
    types::Extension,
};

#[derive(Debug, Default, Clone, Copy)]
enum Behavior {
    #[default]
    Succeed,
    /// Fail this many times, then write the output file
    FailFirst(usize),
    Unavailable,
    /// Exit successfully without writing anything
    NoOutput,
}

#[derive(Debug, Default)]
pub struct FakeDownloader {
    behavior: Behavior,
    calls: Mutex<Vec<(String, PathBuf)>>,
}

impl FakeDownloader {
    pub fn failing(times: usize) -> Self {
        Self {
            behavior: Behavior::FailFirst(times),
            ..Default::default()
        }
    }

    pub fn unavailable() -> Self {
        Self {
            behavior: Behavior::Unavailable,
            ..Default::default()
        }
    }

    pub fn no_output() -> Self {
        Self {
            behavior: Behavior::NoOutput,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<(String, PathBuf)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl StreamDownloader for FakeDownloader {
    fn download_video(&self, url: &str, output: &Path, _ext: Extension) -> Result<ToolRun> {
        let attempt = {
            let mut calls = self.calls.lock().unwrap();
            calls.push((url.to_owned(), output.to_owned()));
            calls
                .iter()
                .filter(|(_, path)| path == output)
                .count()
        };

        match self.behavior {
            Behavior::FailFirst(times) if attempt <= times => Ok(ToolRun {
                success: false,
                log: format!("ERROR: attempt {attempt} failed"),
            }),
            Behavior::Unavailable => Err(Error::UnavailableStream(
                "ERROR: [youtube] Video unavailable".to_owned(),
            )),
            Behavior::NoOutput => Ok(ToolRun {
                success: true,
                log: String::new(),
            }),
            Behavior::Succeed | Behavior::FailFirst(_) => {
                fs::write(output, format!("video from {url}"))?;
                Ok(ToolRun {
                    success: true,
                    log: String::new(),
                })
            }
        }
    }
}

/// Writes the requested window in the output file instead of the stream data
#[derive(Debug, Default)]
pub struct FakeTransformer {
    fail: bool,
    calls: Mutex<Vec<(PathBuf, f64, f64)>>,
}

impl FakeTransformer {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<(PathBuf, f64, f64)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl StreamTransformer for FakeTransformer {
    fn extract_clip(&self, input: &Path, output: &Path, start: f64, end: f64) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push((input.to_owned(), start, end));

        if self.fail {
            return bail("Invalid data found when processing input");
        }

        fs::write(output, format!("clip [{start}, {end}]"))?;
        Ok(())
    }
}

/// Runs the jobs one after the other, the last one first, and returns the
/// results in that order.
#[derive(Debug)]
pub struct ReversingExecutor;

impl Executor for ReversingExecutor {
    fn execute<'a, T: Send + 'a>(&self, jobs: Vec<(usize, Job<'a, T>)>) -> Result<Vec<(usize, T)>> {
        Ok(jobs
            .into_iter()
            .rev()
            .map(|(idx, job)| (idx, job()))
            .collect())
    }
}
