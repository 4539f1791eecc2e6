//! One handle over both sides of the ledger.

use std::sync::Arc;

use tracing::info;

use crate::config::LedgerConfig;
use crate::event_store::{EventStore, InMemoryEventStore};
use crate::giftcard::{GiftCard, GiftCardCommand};
use crate::projection::{
    CardSummary, CardSummaryProjection, CountCardSummariesQuery, CountCardSummariesResponse,
    FetchCardSummariesQuery, ProjectionError, ProjectionWorker, ProjectionWorkerThread,
    WorkerError,
};
use crate::read_model::{InMemoryReadModelStore, ReadModelStore};
use crate::service::{BulkIssuer, BulkSnapshot, CommandSubmitter, GiftCardService, SubmitError};

/// Commands go to the service and land in the event store; queries are
/// answered from the `card_summary` projection only, which trails the store
/// until a worker or [`catch_up`](GiftCardLedger::catch_up) feeds it.
pub struct GiftCardLedger<E, S> {
    config: LedgerConfig,
    service: Arc<GiftCardService<E>>,
    projection: CardSummaryProjection<S>,
}

impl GiftCardLedger<InMemoryEventStore, InMemoryReadModelStore> {
    pub fn in_memory(config: LedgerConfig) -> Self {
        Self::new(config, InMemoryEventStore::new(), InMemoryReadModelStore::new())
    }
}

impl<E, S> GiftCardLedger<E, S>
where
    E: EventStore + Clone + 'static,
    S: ReadModelStore + Clone + 'static,
{
    pub fn new(config: LedgerConfig, events: E, summaries: S) -> Self {
        let projection =
            CardSummaryProjection::with_max_page_size(summaries, config.query.max_page_size);
        GiftCardLedger {
            config,
            service: Arc::new(GiftCardService::new(events)),
            projection,
        }
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub fn service(&self) -> &Arc<GiftCardService<E>> {
        &self.service
    }

    pub fn projection(&self) -> &CardSummaryProjection<S> {
        &self.projection
    }

    pub fn submit(&self, command: GiftCardCommand) -> Result<u64, SubmitError> {
        self.service.submit(command)
    }

    /// Card state replayed from the event store.
    pub fn load(&self, id: &str) -> Result<GiftCard, SubmitError> {
        self.service.load(id)
    }

    pub fn count(
        &self,
        query: &CountCardSummariesQuery,
    ) -> Result<CountCardSummariesResponse, ProjectionError> {
        self.projection.count(query)
    }

    pub fn fetch(
        &self,
        query: &FetchCardSummariesQuery,
    ) -> Result<Vec<CardSummary>, ProjectionError> {
        self.projection.fetch(query)
    }

    /// Drain the event feed into the projection on the calling thread.
    /// Returns the number of events read.
    pub fn catch_up(&self) -> Result<usize, WorkerError> {
        self.worker()?.catch_up()
    }

    pub fn spawn_projection_worker(&self) -> Result<ProjectionWorkerThread, WorkerError> {
        let worker = self.worker()?;
        info!(
            batch_size = self.config.projection.batch_size,
            poll_interval_ms = self.config.projection.poll_interval_ms,
            "spawning projection worker"
        );
        Ok(ProjectionWorkerThread::spawn(
            worker,
            self.config.projection.poll_interval(),
        ))
    }

    pub fn bulk_issue<F>(&self, number: usize, amount: i64, callback: F) -> BulkIssuer
    where
        F: FnMut(BulkSnapshot) + Send + 'static,
    {
        BulkIssuer::spawn(
            Arc::clone(&self.service),
            number,
            amount,
            &self.config.bulk,
            callback,
        )
    }

    fn worker(&self) -> Result<ProjectionWorker<E, S>, WorkerError> {
        let projection = CardSummaryProjection::with_max_page_size(
            self.projection.store().clone(),
            self.config.query.max_page_size,
        );
        ProjectionWorker::new(
            self.service.events().clone(),
            projection,
            self.config.projection.batch_size,
        )
    }
}

impl<E, S> CommandSubmitter for GiftCardLedger<E, S>
where
    E: EventStore + Clone + 'static,
    S: ReadModelStore + Clone + 'static,
{
    fn submit(&self, command: GiftCardCommand) -> Result<u64, SubmitError> {
        GiftCardLedger::submit(self, command)
    }
}
