use std::{num::NonZeroUsize, thread};

use crossbeam_channel::unbounded;
use miette::{Context, IntoDiagnostic};
use tracing::debug;

use crate::result::{err_msg, Result};

/// A unit of work whose result is sent back to the caller
pub type Job<'a, T> = Box<dyn FnOnce() -> T + Send + 'a>;

/// Something able to run a batch of independent jobs.
pub trait Executor: Sync {
    /// Run every job and return their results, tagged with the index
    /// they were given along with the job.
    ///
    /// The results may come back in any order.
    fn execute<'a, T: Send + 'a>(&self, jobs: Vec<(usize, Job<'a, T>)>) -> Result<Vec<(usize, T)>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerPool {
    /// Run the jobs one by one on the calling thread
    Sequential,
    /// Run the jobs on this number of threads
    Threads(NonZeroUsize),
}

impl WorkerPool {
    /// Choose the pool from the `num-jobs` setting.
    ///
    /// `1` runs sequentially. A positive value is the number of workers.
    /// Zero or a negative value counts from the available parallelism:
    /// `-1` uses every CPU, `-2` all but one, and so on, with at least one worker.
    pub fn from_num_jobs(num_jobs: i32) -> Result<Self> {
        if num_jobs == 1 {
            return Ok(Self::Sequential);
        }

        let workers = if num_jobs > 1 {
            num_jobs as usize
        } else {
            let cpus = thread::available_parallelism()
                .into_diagnostic()
                .wrap_err("Could not get the available parallelism")?
                .get() as i64;

            (cpus + 1 + i64::from(num_jobs.min(-1))).max(1) as usize
        };

        // `workers` is at least 1 in both branches
        Ok(Self::Threads(
            NonZeroUsize::new(workers).unwrap_or(NonZeroUsize::MIN),
        ))
    }
}

impl Executor for WorkerPool {
    fn execute<'a, T: Send + 'a>(&self, jobs: Vec<(usize, Job<'a, T>)>) -> Result<Vec<(usize, T)>> {
        let workers = match *self {
            WorkerPool::Sequential => {
                return Ok(jobs.into_iter().map(|(idx, job)| (idx, job())).collect());
            }
            WorkerPool::Threads(workers) => workers.get().min(jobs.len().max(1)),
        };

        let nb_jobs = jobs.len();
        let (job_send, job_receive) = unbounded();
        for job in jobs {
            job_send
                .send(job)
                .map_err(|_| err_msg("Could not queue job"))?;
        }

        // Drop the sender so that the workers stop once the queue is empty
        drop(job_send);

        let (result_send, result_receive) = unbounded();

        thread::scope(|scope| -> Result<()> {
            for id in 0..workers {
                let job_receive = job_receive.clone();
                let result_send = result_send.clone();

                thread::Builder::new()
                    .name(format!("worker-{id}"))
                    .spawn_scoped(scope, move || {
                        debug!("Worker started, waiting for a job");

                        for (idx, job) in job_receive {
                            if result_send.send((idx, job())).is_err() {
                                break;
                            }
                        }

                        debug!("No more jobs. Stopping the worker.");
                    })
                    .into_diagnostic()
                    .wrap_err("Could not spawn worker thread")?;
            }

            Ok(())
        })?;

        drop(result_send);

        let results: Vec<_> = result_receive.into_iter().collect();
        debug!("{} of {nb_jobs} jobs completed", results.len());
        Ok(results)
    }
}
