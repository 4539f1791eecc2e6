use std::sync::Arc;

use tracing::{debug, info, warn};

use super::SubmitError;
use crate::aggregate::{expected_version, hydrate, Aggregate, StreamKey};
use crate::event_store::EventStore;
use crate::giftcard::{GiftCard, GiftCardCommand};
use crate::lock::{InMemoryLockManager, LockGuard, LockManager};

/// Anything that accepts gift-card commands.
pub trait CommandSubmitter: Send + Sync {
    /// Decide `command` and append the resulting event. Returns the event's
    /// global sequence number.
    fn submit(&self, command: GiftCardCommand) -> Result<u64, SubmitError>;
}

impl<T: CommandSubmitter + ?Sized> CommandSubmitter for Arc<T> {
    fn submit(&self, command: GiftCardCommand) -> Result<u64, SubmitError> {
        (**self).submit(command)
    }
}

/// Command side of the ledger.
///
/// Each command holds its card's lock from load through append, so it
/// decides against every previously accepted command for that card. The
/// append still carries the expected version; a writer that bypasses the
/// lock surfaces as [`SubmitError::ConcurrencyConflict`].
pub struct GiftCardService<E, L = InMemoryLockManager> {
    events: E,
    locks: L,
}

impl<E: EventStore> GiftCardService<E> {
    pub fn new(events: E) -> Self {
        Self::with_locks(events, InMemoryLockManager::new())
    }
}

impl<E: EventStore, L: LockManager> GiftCardService<E, L> {
    pub fn with_locks(events: E, locks: L) -> Self {
        GiftCardService { events, locks }
    }

    pub fn events(&self) -> &E {
        &self.events
    }

    pub fn submit(&self, command: GiftCardCommand) -> Result<u64, SubmitError> {
        let id = command.id();
        let lock = self
            .locks
            .get_lock(&StreamKey::of::<GiftCard>(id).to_string())?;
        let _guard = LockGuard::acquire(lock)?;

        let history = self.events.load_events(id)?;
        let card: GiftCard = hydrate(&history)?;

        let event = match card.handle(&command) {
            Ok(event) => event,
            Err(rejection) => {
                info!(
                    card_id = id,
                    command = command.name(),
                    reason = %rejection,
                    "command rejected"
                );
                return Err(rejection.into());
            }
        };

        let version = expected_version(&history);
        match self.events.append(id, version, event.to_record()?) {
            Ok(global_sequence) => {
                debug!(
                    card_id = id,
                    event = event.name(),
                    sequence = version + 1,
                    global_sequence,
                    "command accepted"
                );
                Ok(global_sequence)
            }
            Err(err) => {
                let err = SubmitError::from(err);
                if err.is_conflict() {
                    warn!(card_id = id, command = command.name(), error = %err, "append conflict");
                }
                Err(err)
            }
        }
    }

    /// Current state of a card, rebuilt from its stream. Unknown ids yield
    /// a card that does not exist.
    pub fn load(&self, id: &str) -> Result<GiftCard, SubmitError> {
        let history = self.events.load_events(id)?;
        Ok(hydrate(&history)?)
    }
}

impl<E: EventStore, L: LockManager> CommandSubmitter for GiftCardService<E, L> {
    fn submit(&self, command: GiftCardCommand) -> Result<u64, SubmitError> {
        GiftCardService::submit(self, command)
    }
}
