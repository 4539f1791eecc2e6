//! Feed consumer driving the card summary projection.
//!
//! [`ProjectionWorker`] is the synchronous core: it reads the event store's
//! global feed after its cursor and applies each event in order.
//! [`ProjectionWorkerThread`] runs it on a background thread.

use std::sync::mpsc::{channel, Sender, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{error, info, warn};

use super::{ApplyOutcome, CardSummaryProjection, WorkerError};
use crate::event_store::EventStore;
use crate::read_model::ReadModelStore;

/// Counters accumulated by a worker.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct WorkerStats {
    pub events_applied: usize,
    pub duplicates_skipped: usize,
    pub polls: usize,
    /// The error that halted the worker, if any.
    pub fault: Option<WorkerError>,
}

pub struct ProjectionWorker<E, S> {
    events: E,
    projection: CardSummaryProjection<S>,
    cursor: u64,
    batch_size: usize,
    stats: WorkerStats,
}

impl<E: EventStore, S: ReadModelStore> ProjectionWorker<E, S> {
    /// Resumes after the projection's current watermark. Events are applied
    /// in global order, so nothing at or below the watermark is pending.
    pub fn new(
        events: E,
        projection: CardSummaryProjection<S>,
        batch_size: usize,
    ) -> Result<Self, WorkerError> {
        let cursor = projection.watermark()?;
        Ok(ProjectionWorker {
            events,
            projection,
            cursor,
            batch_size: batch_size.max(1),
            stats: WorkerStats::default(),
        })
    }

    /// Start from an explicit position instead of the watermark.
    pub fn from_position(mut self, cursor: u64) -> Self {
        self.cursor = cursor;
        self
    }

    pub fn cursor(&self) -> u64 {
        self.cursor
    }

    pub fn projection(&self) -> &CardSummaryProjection<S> {
        &self.projection
    }

    pub fn stats(&self) -> &WorkerStats {
        &self.stats
    }

    /// Apply at most one batch. Returns how many events were read.
    ///
    /// On failure the cursor stays on the last successful event, so the
    /// failing event is the first one retried.
    pub fn run_once(&mut self) -> Result<usize, WorkerError> {
        self.stats.polls += 1;
        let batch = self.events.read_feed(self.cursor, self.batch_size)?;

        for stored in &batch {
            let outcome = self
                .projection
                .apply(stored)
                .map_err(|source| WorkerError::Apply {
                    global_sequence: stored.global_sequence,
                    source,
                })?;
            match outcome {
                ApplyOutcome::Applied(_) => self.stats.events_applied += 1,
                ApplyOutcome::Duplicate => self.stats.duplicates_skipped += 1,
            }
            self.cursor = stored.global_sequence;
        }

        Ok(batch.len())
    }

    /// Run batches until the feed is exhausted. Returns events read.
    pub fn catch_up(&mut self) -> Result<usize, WorkerError> {
        let mut total = 0;
        loop {
            let read = self.run_once()?;
            total += read;
            if read < self.batch_size {
                return Ok(total);
            }
        }
    }
}

/// Background thread polling the feed into the projection.
///
/// Halts on a consistency fault and records it in [`WorkerStats::fault`];
/// transient feed or storage errors are logged and retried on the next poll.
pub struct ProjectionWorkerThread {
    stop_tx: Sender<()>,
    handle: Option<JoinHandle<WorkerStats>>,
}

impl ProjectionWorkerThread {
    pub fn spawn<E, S>(mut worker: ProjectionWorker<E, S>, poll_interval: Duration) -> Self
    where
        E: EventStore + 'static,
        S: ReadModelStore + 'static,
    {
        let (stop_tx, stop_rx) = channel();

        let handle = thread::spawn(move || {
            info!(cursor = worker.cursor(), "projection worker started");

            loop {
                match stop_rx.try_recv() {
                    Ok(()) | Err(TryRecvError::Disconnected) => break,
                    Err(TryRecvError::Empty) => {}
                }

                match worker.catch_up() {
                    Ok(_) => {}
                    Err(err) if is_fatal(&err) => {
                        error!(cursor = worker.cursor(), error = %err, "projection worker halted");
                        worker.stats.fault = Some(err);
                        break;
                    }
                    Err(err) => {
                        warn!(
                            cursor = worker.cursor(),
                            error = %err,
                            "projection poll failed, retrying"
                        );
                    }
                }

                thread::sleep(poll_interval);
            }

            info!(
                cursor = worker.cursor(),
                events_applied = worker.stats.events_applied,
                "projection worker stopped"
            );
            worker.stats
        });

        Self {
            stop_tx,
            handle: Some(handle),
        }
    }

    /// Signal the worker to stop, wait for it, and return its stats.
    ///
    /// A worker that panicked reports [`WorkerError::Panicked`] as its fault;
    /// its counters are lost with the thread.
    pub fn stop(mut self) -> WorkerStats {
        let _ = self.stop_tx.send(());
        let Some(handle) = self.handle.take() else {
            return WorkerStats::default();
        };
        handle.join().unwrap_or_else(|_| {
            error!("projection worker thread panicked");
            WorkerStats {
                fault: Some(WorkerError::Panicked),
                ..WorkerStats::default()
            }
        })
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map(|h| h.is_finished()).unwrap_or(true)
    }
}

impl Drop for ProjectionWorkerThread {
    fn drop(&mut self) {
        let _ = self.stop_tx.send(());
    }
}

fn is_fatal(err: &WorkerError) -> bool {
    match err {
        WorkerError::Feed(_) => false,
        WorkerError::Apply { source, .. } | WorkerError::Projection(source) => {
            source.is_consistency_fault()
        }
        WorkerError::Panicked => true,
    }
}
