//! Single-worker dispatch queue with deferred jobs.
//!
//! All event handling and every delayed re-send run one at a time on the
//! queue's worker thread, which drives a current-thread tokio runtime.
//! Posting never blocks and a delayed job never holds up other jobs.

use crate::error::{Error, Result};
use std::panic::{self, AssertUnwindSafe};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tokio::runtime::{Builder, Runtime};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinSet;
use tokio::time::Instant;

type Job = Box<dyn FnOnce() + Send + 'static>;

/// A posted job, with the deadline for deferred ones.
struct Scheduled {
    deadline: Option<Instant>,
    job: Job,
}

/// Cloneable handle for posting work onto a [`DispatchQueue`].
#[derive(Clone)]
pub struct Dispatcher {
    sender: UnboundedSender<Scheduled>,
}

impl Dispatcher {
    /// Run `job` as soon as the worker is free.
    ///
    /// Returns `false` if the worker has exited.
    pub fn post<F>(&self, job: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        self.schedule(None, Box::new(job))
    }

    /// Run `job` once `delay` has elapsed.
    ///
    /// Returns `false` if the worker has exited.
    pub fn post_after<F>(&self, delay: Duration, job: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        self.schedule(Some(Instant::now() + delay), Box::new(job))
    }

    fn schedule(&self, deadline: Option<Instant>, job: Job) -> bool {
        self.sender.send(Scheduled { deadline, job }).is_ok()
    }
}

/// Owner of the dispatch worker thread.
///
/// Dropping the queue detaches the worker; it still runs every job that was
/// already scheduled and exits once no [`Dispatcher`] remains.
pub struct DispatchQueue {
    dispatcher: Dispatcher,
    worker: Option<JoinHandle<()>>,
}

impl DispatchQueue {
    /// Spawn the worker thread.
    pub fn spawn() -> Result<Self> {
        let runtime = Builder::new_current_thread()
            .enable_time()
            .build()
            .map_err(|e| Error::ThreadError(format!("failed to build dispatch runtime: {e}")))?;

        let (sender, receiver) = mpsc::unbounded_channel();
        let worker = thread::Builder::new()
            .name("sketchyrelay-dispatch".into())
            .spawn(move || run_worker(runtime, receiver))
            .map_err(|e| Error::ThreadError(format!("failed to spawn dispatch worker: {e}")))?;

        Ok(Self {
            dispatcher: Dispatcher { sender },
            worker: Some(worker),
        })
    }

    /// Get a handle for posting work.
    pub fn dispatcher(&self) -> Dispatcher {
        self.dispatcher.clone()
    }

    /// Release the queue's own handle and wait for the worker to finish.
    ///
    /// Blocks until every outstanding [`Dispatcher`] is dropped and all
    /// scheduled jobs have run.
    pub fn shutdown(mut self) -> Result<()> {
        let worker = self.worker.take();
        drop(self);

        if let Some(worker) = worker {
            worker
                .join()
                .map_err(|_| Error::ThreadError("failed to join dispatch worker".into()))?;
        }
        Ok(())
    }
}

fn run_worker(runtime: Runtime, mut receiver: UnboundedReceiver<Scheduled>) {
    runtime.block_on(async move {
        let mut deferred = JoinSet::new();

        while let Some(Scheduled { deadline, job }) = receiver.recv().await {
            match deadline {
                None => run_job(job),
                Some(deadline) => {
                    deferred.spawn(async move {
                        tokio::time::sleep_until(deadline).await;
                        run_job(job);
                    });
                }
            }
            while deferred.try_join_next().is_some() {}
        }

        // Every handle is gone; let the remaining deadlines pass.
        while deferred.join_next().await.is_some() {}
    });

    log::debug!("dispatch worker exiting");
}

fn run_job(job: Job) {
    if panic::catch_unwind(AssertUnwindSafe(job)).is_err() {
        log::error!("dispatch job panicked; continuing with the next job");
    }
}
