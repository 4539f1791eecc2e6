use serde::{Deserialize, Serialize};

use super::validate::validate;
use super::{GiftCardCommand, GiftCardEvent, Rejection, ReplayError};
use crate::aggregate::Aggregate;

/// Replayed state of one card.
///
/// `remaining_value` stays within `[0, initial_value]` for every history
/// [`apply`](Aggregate::apply) accepts. Cancelling zeroes the balance but the
/// card keeps existing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GiftCard {
    id: String,
    initial_value: i64,
    remaining_value: i64,
    exists: bool,
}

impl GiftCard {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn initial_value(&self) -> i64 {
        self.initial_value
    }

    pub fn remaining_value(&self) -> i64 {
        self.remaining_value
    }

    pub fn exists(&self) -> bool {
        self.exists
    }

    fn ensure_issued(&self, id: &str, event: &'static str) -> Result<(), ReplayError> {
        if !self.exists {
            return Err(ReplayError::NotIssued {
                id: id.to_string(),
                event,
            });
        }
        if self.id != id {
            return Err(ReplayError::ForeignEvent {
                expected: self.id.clone(),
                actual: id.to_string(),
            });
        }
        Ok(())
    }
}

impl Aggregate for GiftCard {
    const AGGREGATE_TYPE: &'static str = "gift_card";

    type Command = GiftCardCommand;
    type Event = GiftCardEvent;
    type Rejection = Rejection;
    type ReplayError = ReplayError;

    fn apply(&mut self, event: &GiftCardEvent) -> Result<(), ReplayError> {
        match event {
            GiftCardEvent::Issued { id, amount } => {
                if self.exists {
                    return Err(ReplayError::AlreadyIssued { id: id.clone() });
                }
                if *amount <= 0 {
                    return Err(ReplayError::InvalidAmount {
                        id: id.clone(),
                        event: GiftCardEvent::ISSUED,
                        amount: *amount,
                    });
                }
                self.id = id.clone();
                self.initial_value = *amount;
                self.remaining_value = *amount;
                self.exists = true;
            }
            GiftCardEvent::Redeemed { id, amount } => {
                self.ensure_issued(id, GiftCardEvent::REDEEMED)?;
                if *amount <= 0 {
                    return Err(ReplayError::InvalidAmount {
                        id: id.clone(),
                        event: GiftCardEvent::REDEEMED,
                        amount: *amount,
                    });
                }
                if *amount > self.remaining_value {
                    return Err(ReplayError::Overdrawn {
                        id: id.clone(),
                        amount: *amount,
                        remaining: self.remaining_value,
                    });
                }
                self.remaining_value -= amount;
            }
            GiftCardEvent::Cancelled { id } => {
                self.ensure_issued(id, GiftCardEvent::CANCELLED)?;
                self.remaining_value = 0;
            }
        }
        Ok(())
    }

    fn handle(&self, command: &GiftCardCommand) -> Result<GiftCardEvent, Rejection> {
        if let Some(rejection) = validate(self, command) {
            return Err(rejection);
        }

        Ok(match command {
            GiftCardCommand::Issue { id, amount } => GiftCardEvent::Issued {
                id: id.clone(),
                amount: *amount,
            },
            GiftCardCommand::Redeem { id, amount } => GiftCardEvent::Redeemed {
                id: id.clone(),
                amount: *amount,
            },
            GiftCardCommand::Cancel { id } => GiftCardEvent::Cancelled { id: id.clone() },
        })
    }
}
