//! Background issuance of many cards with the same face value.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{channel, RecvTimeoutError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::{info, warn};
use uuid::Uuid;

use super::CommandSubmitter;
use crate::config::{BulkConfig, MAX_ID_LENGTH};
use crate::giftcard::GiftCardCommand;

/// Live counters shared between the issuing thread and observers.
#[derive(Debug, Default)]
pub struct BulkProgress {
    success: AtomicUsize,
    error: AtomicUsize,
    remaining: AtomicUsize,
}

impl BulkProgress {
    fn new(number: usize) -> Self {
        BulkProgress {
            remaining: AtomicUsize::new(number),
            ..Self::default()
        }
    }

    pub fn snapshot(&self) -> BulkSnapshot {
        BulkSnapshot {
            success: self.success.load(Ordering::SeqCst),
            error: self.error.load(Ordering::SeqCst),
            remaining: self.remaining.load(Ordering::SeqCst),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BulkSnapshot {
    pub success: usize,
    pub error: usize,
    pub remaining: usize,
}

impl BulkSnapshot {
    pub fn is_complete(&self) -> bool {
        self.remaining == 0
    }
}

/// Issues `number` cards of `amount` on a background thread.
///
/// A second thread calls the progress callback every
/// [`BulkConfig::report_interval`] while issuing, and once more after the
/// last command completes.
pub struct BulkIssuer {
    progress: Arc<BulkProgress>,
    issuer: Option<JoinHandle<()>>,
    reporter: Option<JoinHandle<()>>,
}

impl BulkIssuer {
    pub fn spawn<C, F>(
        submitter: C,
        number: usize,
        amount: i64,
        config: &BulkConfig,
        mut callback: F,
    ) -> Self
    where
        C: CommandSubmitter + 'static,
        F: FnMut(BulkSnapshot) + Send + 'static,
    {
        let progress = Arc::new(BulkProgress::new(number));
        let id_length = config.id_length.clamp(1, MAX_ID_LENGTH);
        let interval = config.report_interval();
        let (done_tx, done_rx) = channel::<()>();

        let issuer = {
            let progress = Arc::clone(&progress);
            thread::spawn(move || {
                for _ in 0..number {
                    let command = GiftCardCommand::issue(card_id(id_length), amount);
                    match submitter.submit(command) {
                        Ok(_) => {
                            progress.success.fetch_add(1, Ordering::SeqCst);
                        }
                        Err(err) => {
                            warn!(error = %err, "bulk issue failed");
                            progress.error.fetch_add(1, Ordering::SeqCst);
                        }
                    }
                    progress.remaining.fetch_sub(1, Ordering::SeqCst);
                }
                drop(done_tx);
            })
        };

        let reporter = {
            let progress = Arc::clone(&progress);
            thread::spawn(move || {
                loop {
                    let snapshot = progress.snapshot();
                    if snapshot.is_complete() {
                        break;
                    }
                    callback(snapshot);
                    match done_rx.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => continue,
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }

                let last = progress.snapshot();
                callback(last);
                info!(
                    success = last.success,
                    error = last.error,
                    amount,
                    "bulk issue finished"
                );
            })
        };

        BulkIssuer {
            progress,
            issuer: Some(issuer),
            reporter: Some(reporter),
        }
    }

    pub fn progress(&self) -> &Arc<BulkProgress> {
        &self.progress
    }

    pub fn snapshot(&self) -> BulkSnapshot {
        self.progress.snapshot()
    }

    /// Block until every command has completed and the final progress
    /// callback has run.
    pub fn wait(mut self) -> BulkSnapshot {
        for handle in [self.issuer.take(), self.reporter.take()].into_iter().flatten() {
            if handle.join().is_err() {
                warn!("bulk issuer thread panicked");
            }
        }
        self.progress.snapshot()
    }
}

/// Random upper-case card id of `length` hex characters.
fn card_id(length: usize) -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(length);
    id.make_ascii_uppercase();
    id
}
