//! Guard clauses evaluated before any event is constructed.

use super::{GiftCard, GiftCardCommand, Rejection};

/// Returns the rejection for `command` against `card`, or `None` if the
/// command is allowed.
pub fn validate(card: &GiftCard, command: &GiftCardCommand) -> Option<Rejection> {
    match command {
        GiftCardCommand::Issue { id, amount } => {
            if card.exists() {
                return Some(Rejection::AlreadyIssued { id: id.clone() });
            }
            positive(*amount)
        }
        GiftCardCommand::Redeem { id, amount } => {
            if !card.exists() {
                return Some(Rejection::NotFound { id: id.clone() });
            }
            if let Some(rejection) = positive(*amount) {
                return Some(rejection);
            }
            if *amount > card.remaining_value() {
                return Some(Rejection::InsufficientBalance {
                    id: id.clone(),
                    requested: *amount,
                    remaining: card.remaining_value(),
                });
            }
            None
        }
        GiftCardCommand::Cancel { id } => {
            if !card.exists() {
                return Some(Rejection::NotFound { id: id.clone() });
            }
            None
        }
    }
}

fn positive(amount: i64) -> Option<Rejection> {
    if amount <= 0 {
        Some(Rejection::InvalidAmount { amount })
    } else {
        None
    }
}
