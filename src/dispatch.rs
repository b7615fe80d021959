//! Fan-out of sampling workers onto OS threads.
//!
//! Each assignment gets its own thread and its own random source. The
//! dispatcher then blocks in [`Dispatch::wait_all`] until every thread has
//! been joined, and only after that reads the published results.

use std::any::Any;
use std::io;
use std::sync::mpsc;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};

use tracing::{debug, warn};

use crate::collection::ResultCollection;
use crate::config::CollectMode;
use crate::error::{EstimateError, Result};
use crate::partition::SampleAssignment;
use crate::sampler::{run_assignment, PartialResult};
use crate::source::SourceFactory;

pub(crate) type Job = Box<dyn FnOnce() -> Result<()> + Send + 'static>;

enum Collector {
    Channel(mpsc::Receiver<PartialResult>),
    Locked(Arc<Mutex<ResultCollection>>),
}

/// Worker side of a [`Collector`].
#[derive(Clone)]
enum Publisher {
    Channel(mpsc::Sender<PartialResult>),
    Locked(Arc<Mutex<ResultCollection>>),
}

impl Publisher {
    fn publish(&self, result: PartialResult) -> Result<()> {
        match self {
            Publisher::Channel(tx) => tx.send(result).map_err(|_| {
                EstimateError::worker(result.worker_id, "result channel closed")
            }),
            Publisher::Locked(shared) => {
                // publish is a single insert, so a poisoned map is still whole
                let mut results = shared.lock().unwrap_or_else(PoisonError::into_inner);
                results.publish(result)
            }
        }
    }
}

/// Handles for one dispatched run.
pub struct Dispatch {
    handles: Vec<(usize, JoinHandle<Result<()>>)>,
    collector: Collector,
}

fn spawn_named(worker_id: usize, job: Job) -> io::Result<JoinHandle<Result<()>>> {
    thread::Builder::new()
        .name(format!("worker-{}", worker_id))
        .spawn(job)
}

/// Starts one thread per assignment.
///
/// The worker's source is built here, before its thread is spawned, so no
/// worker ever observes a half-constructed assignment. If a thread cannot be
/// created, the workers already started are joined and the run fails with
/// `WorkerFailure` for the worker that never started.
pub fn dispatch<F: SourceFactory + ?Sized>(
    assignments: &[SampleAssignment],
    sources: &F,
    mode: CollectMode,
) -> Result<Dispatch> {
    dispatch_with(assignments, sources, mode, spawn_named)
}

pub(crate) fn dispatch_with<F, S>(
    assignments: &[SampleAssignment],
    sources: &F,
    mode: CollectMode,
    mut spawn: S,
) -> Result<Dispatch>
where
    F: SourceFactory + ?Sized,
    S: FnMut(usize, Job) -> io::Result<JoinHandle<Result<()>>>,
{
    let (collector, publisher) = match mode {
        CollectMode::Channel => {
            let (tx, rx) = mpsc::channel::<PartialResult>();
            (Collector::Channel(rx), Publisher::Channel(tx))
        }
        CollectMode::Locked => {
            let shared = Arc::new(Mutex::new(ResultCollection::new()));
            (Collector::Locked(Arc::clone(&shared)), Publisher::Locked(shared))
        }
    };

    let mut handles = Vec::with_capacity(assignments.len());
    for &assignment in assignments {
        let mut source = sources.source_for(assignment.worker_id);
        let worker_publisher = publisher.clone();
        let job: Job = Box::new(move || {
            let result = run_assignment(assignment, &mut source)?;
            worker_publisher.publish(result)
        });

        match spawn(assignment.worker_id, job) {
            Ok(handle) => handles.push((assignment.worker_id, handle)),
            Err(e) => {
                warn!(worker_id = assignment.worker_id, error = %e, "failed to spawn worker");
                drop(publisher);
                let started = Dispatch { handles, collector };
                if let Err(err) = started.wait_all() {
                    debug!(error = %err, "started worker also failed");
                }
                return Err(EstimateError::worker(
                    assignment.worker_id,
                    format!("failed to spawn worker thread: {}", e),
                ));
            }
        }
    }

    Ok(Dispatch { handles, collector })
}

impl Dispatch {
    pub fn worker_count(&self) -> usize {
        self.handles.len()
    }

    /// Joins every worker, then gathers their results.
    ///
    /// All threads are joined even when one fails; the first failure (in
    /// worker id order) is returned and nothing is collected.
    pub fn wait_all(self) -> Result<ResultCollection> {
        let mut failure = None;

        for (worker_id, handle) in self.handles {
            let outcome = match handle.join() {
                Ok(outcome) => outcome,
                Err(panic) => Err(EstimateError::worker(worker_id, panic_message(&*panic))),
            };
            if let Err(err) = outcome {
                warn!(worker_id, error = %err, "worker failed");
                if failure.is_none() {
                    failure = Some(err);
                }
            }
        }

        if let Some(err) = failure {
            return Err(err);
        }

        let collection = match self.collector {
            Collector::Channel(rx) => {
                let mut collection = ResultCollection::new();
                // every sender is gone once the threads are joined
                for result in rx.iter() {
                    debug!(worker_id = result.worker_id, "received partial result");
                    collection.publish(result)?;
                }
                collection
            }
            Collector::Locked(shared) => match Arc::try_unwrap(shared) {
                Ok(mutex) => mutex.into_inner().unwrap_or_else(PoisonError::into_inner),
                Err(shared) => shared.lock().unwrap_or_else(PoisonError::into_inner).clone(),
            },
        };

        Ok(collection)
    }
}

pub(crate) fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(msg) = panic.downcast_ref::<&str>() {
        format!("panicked: {}", msg)
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        format!("panicked: {}", msg)
    } else {
        "panicked".to_string()
    }
}
