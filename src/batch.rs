use tracing::{debug, info};

use crate::{
    fetcher::ClipFetcher,
    pool::{Executor, Job},
    result::{bail, Result},
    trimmer::ClipTrimmer,
    types::{ClipRecord, DownloadOutcome, TrimOutcome},
};

/// Runs one operation over every record of the manifest through an executor.
#[derive(Debug)]
pub struct Batch<'a, E> {
    executor: &'a E,
    shuffle: bool,
}

impl<'a, E: Executor> Batch<'a, E> {
    pub fn new(executor: &'a E) -> Self {
        Self {
            executor,
            shuffle: false,
        }
    }

    /// Randomize the order in which the records are submitted.
    /// The results stay in the order of the records.
    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    /// Fetch the video of every record.
    ///
    /// The outcomes are in the same order as the records. A failing record
    /// does not prevent the others from being fetched.
    pub fn download_all(
        &self,
        fetcher: &ClipFetcher<'_>,
        records: &[ClipRecord],
    ) -> Result<Vec<DownloadOutcome>> {
        info!("Downloading {} clips", records.len());
        let outcomes = self.run_ordered(records, |record| fetcher.fetch(record))?;

        let nb_success = outcomes.iter().filter(|outcome| outcome.success).count();
        info!("{nb_success}/{} clips downloaded", outcomes.len());

        Ok(outcomes)
    }

    /// Trim the downloaded video of every record.
    pub fn trim_all(
        &self,
        trimmer: &ClipTrimmer<'_>,
        records: &[ClipRecord],
    ) -> Result<Vec<TrimOutcome>> {
        info!("Trimming {} clips", records.len());
        let outcomes = self.run_ordered(records, |record| trimmer.trim(record))?;

        let count = |f: fn(&TrimOutcome) -> bool| outcomes.iter().filter(|o| f(o)).count();
        info!(
            "{} clips trimmed, {} already trimmed, {} not found, {} failed",
            count(|o| matches!(o, TrimOutcome::Trimmed)),
            count(|o| matches!(o, TrimOutcome::AlreadyTrimmed)),
            count(|o| matches!(o, TrimOutcome::NotFound)),
            count(|o| matches!(o, TrimOutcome::Failed(_))),
        );

        Ok(outcomes)
    }

    /// Apply the operation to every record with the executor, and put the
    /// results back in the order of the records.
    fn run_ordered<T, F>(&self, records: &[ClipRecord], f: F) -> Result<Vec<T>>
    where
        T: Send,
        F: Fn(&ClipRecord) -> T + Sync,
    {
        let f = &f;
        let mut jobs: Vec<(usize, Job<'_, T>)> = records
            .iter()
            .enumerate()
            .map(|(idx, record)| {
                let job: Job<'_, T> = Box::new(move || f(record));
                (idx, job)
            })
            .collect();

        if self.shuffle {
            debug!("Shuffling the submission order");
            fastrand::shuffle(&mut jobs);
        }

        let mut results = self.executor.execute(jobs)?;
        if results.len() != records.len() {
            return bail(format!(
                "Expected {} results but got {}",
                records.len(),
                results.len()
            ));
        }

        results.sort_unstable_by_key(|(idx, _)| *idx);
        Ok(results.into_iter().map(|(_, result)| result).collect())
    }
}
