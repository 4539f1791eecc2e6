use tracing::{debug, error};

use super::{
    CardSummary, ConsistencyError, CountCardSummariesQuery, CountCardSummariesResponse,
    FetchCardSummariesQuery, ProjectionError,
};
use crate::event_store::StoredEvent;
use crate::giftcard::GiftCardEvent;
use crate::read_model::{ReadModelStore, Versioned};

/// What [`CardSummaryProjection::apply`] did with a delivered event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied(CardSummary),
    /// Already folded into the row; only the watermark was considered.
    Duplicate,
}

/// Maintains the `card_summary` read model from the gift-card event stream.
///
/// Every row carries, as its version, the stream sequence of the last event
/// applied to it. That is what makes redelivery harmless: anything at or
/// below the stored version has been seen.
pub struct CardSummaryProjection<S> {
    store: S,
    max_page_size: usize,
}

impl<S: ReadModelStore> CardSummaryProjection<S> {
    pub fn new(store: S) -> Self {
        Self::with_max_page_size(store, usize::MAX)
    }

    pub fn with_max_page_size(store: S, max_page_size: usize) -> Self {
        CardSummaryProjection {
            store,
            max_page_size,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn apply(&self, stored: &StoredEvent) -> Result<ApplyOutcome, ProjectionError> {
        let event = GiftCardEvent::try_from(&stored.record)?;
        if event.id() != stored.aggregate_id {
            return Err(self.fault(
                stored,
                ConsistencyError::StreamMismatch {
                    stream: stored.aggregate_id.clone(),
                    actual: event.id().to_string(),
                },
            ));
        }

        let sequence = stored.sequence();
        let written = self
            .store
            .modify::<CardSummary, ProjectionError, _>(
                &stored.aggregate_id,
                stored.global_sequence,
                |current| fold(current, &event, sequence),
            )
            .map_err(|err| match err {
                ProjectionError::Consistency(fault) => self.fault(stored, fault),
                other => other,
            })?;

        match written {
            Some(row) => {
                debug!(
                    card_id = %stored.aggregate_id,
                    event = event.name(),
                    sequence,
                    global_sequence = stored.global_sequence,
                    remaining_value = row.data.remaining_value,
                    "applied event to card summary"
                );
                Ok(ApplyOutcome::Applied(row.data))
            }
            None => {
                debug!(
                    card_id = %stored.aggregate_id,
                    sequence,
                    global_sequence = stored.global_sequence,
                    "skipped duplicate delivery"
                );
                Ok(ApplyOutcome::Duplicate)
            }
        }
    }

    /// Matching row count, read together with the watermark.
    pub fn count(
        &self,
        query: &CountCardSummariesQuery,
    ) -> Result<CountCardSummariesResponse, ProjectionError> {
        let snapshot = self
            .store
            .count_prefix::<CardSummary>(&query.filter.id_starts_with)?;
        Ok(CountCardSummariesResponse {
            count: snapshot.value,
            last_event: snapshot.watermark,
        })
    }

    /// A page of matching rows in ascending id order. `limit` is clamped to
    /// the configured maximum page size.
    pub fn fetch(
        &self,
        query: &FetchCardSummariesQuery,
    ) -> Result<Vec<CardSummary>, ProjectionError> {
        let limit = query.limit.min(self.max_page_size);
        let snapshot = self.store.scan_prefix::<CardSummary>(
            &query.filter.id_starts_with,
            query.offset,
            limit,
        )?;
        Ok(snapshot.value.into_iter().map(|row| row.data).collect())
    }

    pub fn watermark(&self) -> Result<u64, ProjectionError> {
        Ok(self.store.watermark::<CardSummary>()?)
    }

    fn fault(&self, stored: &StoredEvent, fault: ConsistencyError) -> ProjectionError {
        error!(
            card_id = %stored.aggregate_id,
            sequence = stored.sequence(),
            global_sequence = stored.global_sequence,
            error = %fault,
            "card summary projection fault"
        );
        ProjectionError::Consistency(fault)
    }
}

fn fold(
    current: Option<Versioned<CardSummary>>,
    event: &GiftCardEvent,
    sequence: u64,
) -> Result<Option<Versioned<CardSummary>>, ProjectionError> {
    let id = event.id();

    let Some(mut row) = current else {
        return match event {
            GiftCardEvent::Issued { amount, .. } if sequence == 1 => {
                require_positive(event, *amount, sequence)?;
                Ok(Some(Versioned {
                    data: CardSummary::issued(id, *amount),
                    version: sequence,
                }))
            }
            GiftCardEvent::Issued { .. } => Err(ConsistencyError::SequenceGap {
                id: id.to_string(),
                expected: 1,
                actual: sequence,
            }
            .into()),
            other => Err(ConsistencyError::MissingSummary {
                id: id.to_string(),
                event: other.name(),
                sequence,
            }
            .into()),
        };
    };

    if sequence <= row.version {
        return Ok(None);
    }
    if sequence != row.version + 1 {
        return Err(ConsistencyError::SequenceGap {
            id: id.to_string(),
            expected: row.version + 1,
            actual: sequence,
        }
        .into());
    }

    match event {
        GiftCardEvent::Issued { .. } => {
            return Err(ConsistencyError::AlreadyIssued {
                id: id.to_string(),
                sequence,
            }
            .into());
        }
        GiftCardEvent::Redeemed { amount, .. } => {
            require_positive(event, *amount, sequence)?;
            let remaining = row.data.remaining_value;
            row.data.remaining_value = remaining
                .checked_sub(*amount)
                .filter(|left| *left >= 0)
                .ok_or_else(|| ConsistencyError::Overdrawn {
                    id: id.to_string(),
                    amount: *amount,
                    remaining,
                })?;
        }
        GiftCardEvent::Cancelled { .. } => row.data.remaining_value = 0,
    }

    row.version = sequence;
    Ok(Some(row))
}

fn require_positive(
    event: &GiftCardEvent,
    amount: i64,
    sequence: u64,
) -> Result<(), ConsistencyError> {
    if amount > 0 {
        return Ok(());
    }
    Err(ConsistencyError::InvalidAmount {
        id: event.id().to_string(),
        event: event.name(),
        amount,
        sequence,
    })
}
