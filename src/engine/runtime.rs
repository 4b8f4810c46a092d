//! Bounded worker-pool runtime over the engine.
//!
//! Recommendations are fast, read-only, and parallelizable; aggregation
//! runs are slow, single-writer batch jobs. The runtime keeps them on
//! separate lanes so a rebuild can never starve inference: a pool of
//! recommend workers and a single rebuild worker, each fed by a bounded
//! channel. A full queue is an explicit [`LiftError::Busy`] instead of
//! unbounded buffering.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};

use crate::aggregate::{CancelToken, SmoothingConfig};
use crate::dataset::OutcomeDataset;
use crate::engine::DraftEngine;
use crate::error::{LiftError, LiftResult};
use crate::request::{RecommendRequest, RecommendResponse};

/// Runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Number of recommend workers.
    pub recommend_workers: usize,
    /// Maximum queued jobs per lane.
    pub queue_capacity: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self { recommend_workers: 2, queue_capacity: 1024 }
    }
}

enum Job {
    Recommend {
        request: RecommendRequest,
        reply: Sender<LiftResult<RecommendResponse>>,
    },
    Rebuild {
        dataset: OutcomeDataset,
        smoothing: SmoothingConfig,
        cancel: CancelToken,
        reply: Sender<LiftResult<u64>>,
    },
}

struct WorkerPool {
    tx: Sender<Job>,
    workers: Vec<JoinHandle<()>>,
    queue_capacity: usize,
}

impl WorkerPool {
    fn start(
        name: &'static str,
        workers: usize,
        queue_capacity: usize,
        engine: Arc<DraftEngine>,
    ) -> Self {
        let workers = workers.max(1);
        let queue_capacity = queue_capacity.max(1);
        let (tx, rx) = bounded::<Job>(queue_capacity);

        let mut handles = Vec::with_capacity(workers);
        for idx in 0..workers {
            let rx: Receiver<Job> = rx.clone();
            let engine = Arc::clone(&engine);
            let thread_name = format!("draftlift-{name}-{idx}");
            let handle = thread::Builder::new()
                .name(thread_name)
                .spawn(move || loop {
                    match rx.recv() {
                        Ok(Job::Recommend { request, reply }) => {
                            let _ = reply.send(engine.recommend(&request));
                        }
                        Ok(Job::Rebuild { dataset, smoothing, cancel, reply }) => {
                            let _ = reply.send(engine.rebuild(&dataset, &smoothing, &cancel));
                        }
                        Err(_) => break,
                    }
                })
                .expect("failed to spawn draftlift worker");
            handles.push(handle);
        }

        Self { tx, workers: handles, queue_capacity }
    }

    fn try_submit(&self, job: Job) -> LiftResult<()> {
        match self.tx.try_send(job) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => Err(LiftError::Busy { queued: self.queue_capacity }),
            Err(TrySendError::Disconnected(_)) => Err(LiftError::ShuttingDown),
        }
    }

    fn shutdown(self) {
        // Close the channel: workers drain queued jobs then exit.
        drop(self.tx);
        for handle in self.workers {
            let _ = handle.join();
        }
    }
}

/// Handle to a rebuild job submitted to the runtime.
pub struct RebuildHandle {
    cancel: CancelToken,
    rx: Receiver<LiftResult<u64>>,
}

impl RebuildHandle {
    /// Requests cooperative cancellation of the job.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Waits for the job; returns the activated version on success.
    ///
    /// # Errors
    /// The job's own failure, or [`LiftError::ShuttingDown`] if the runtime
    /// stopped before replying.
    pub fn join(self) -> LiftResult<u64> {
        self.rx.recv().map_err(|_| LiftError::ShuttingDown)?
    }
}

/// A two-lane runtime: concurrent recommendations, serialized rebuilds.
pub struct DraftRuntime {
    recommend: WorkerPool,
    rebuild: WorkerPool,
}

impl DraftRuntime {
    /// Starts the worker pools over an engine.
    #[must_use]
    pub fn new(engine: DraftEngine, config: RuntimeConfig) -> Self {
        let engine = Arc::new(engine);
        let recommend = WorkerPool::start(
            "recommend",
            config.recommend_workers,
            config.queue_capacity,
            Arc::clone(&engine),
        );
        // Aggregation is an infrequent single-writer batch job; one worker
        // serializes runs.
        let rebuild = WorkerPool::start("rebuild", 1, config.queue_capacity, engine);
        Self { recommend, rebuild }
    }

    /// Submits a recommendation request and waits for the result.
    ///
    /// # Errors
    /// [`LiftError::Busy`] when the recommend lane is full, plus any engine
    /// error.
    pub fn recommend(&self, request: RecommendRequest) -> LiftResult<RecommendResponse> {
        let (tx, rx) = bounded(1);
        self.recommend.try_submit(Job::Recommend { request, reply: tx })?;
        rx.recv().map_err(|_| LiftError::ShuttingDown)?
    }

    /// Submits an aggregation run on the rebuild lane, returning a handle
    /// that can cancel or await it.
    ///
    /// # Errors
    /// [`LiftError::Busy`] when the rebuild lane is full.
    pub fn submit_rebuild(
        &self,
        dataset: OutcomeDataset,
        smoothing: SmoothingConfig,
    ) -> LiftResult<RebuildHandle> {
        let cancel = CancelToken::new();
        let (tx, rx) = bounded(1);
        self.rebuild.try_submit(Job::Rebuild {
            dataset,
            smoothing,
            cancel: cancel.clone(),
            reply: tx,
        })?;
        Ok(RebuildHandle { cancel, rx })
    }

    /// Drains queued jobs and joins all workers.
    pub fn shutdown(self) {
        self.recommend.shutdown();
        self.rebuild.shutdown();
    }
}
