use serde::{Deserialize, Serialize};

/// An intent against one card. Not durable until it has produced an event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GiftCardCommand {
    Issue { id: String, amount: i64 },
    Redeem { id: String, amount: i64 },
    Cancel { id: String },
}

impl GiftCardCommand {
    pub fn issue(id: impl Into<String>, amount: i64) -> Self {
        GiftCardCommand::Issue {
            id: id.into(),
            amount,
        }
    }

    pub fn redeem(id: impl Into<String>, amount: i64) -> Self {
        GiftCardCommand::Redeem {
            id: id.into(),
            amount,
        }
    }

    pub fn cancel(id: impl Into<String>) -> Self {
        GiftCardCommand::Cancel { id: id.into() }
    }

    /// Target aggregate identifier.
    pub fn id(&self) -> &str {
        match self {
            GiftCardCommand::Issue { id, .. }
            | GiftCardCommand::Redeem { id, .. }
            | GiftCardCommand::Cancel { id } => id,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            GiftCardCommand::Issue { .. } => "Issue",
            GiftCardCommand::Redeem { .. } => "Redeem",
            GiftCardCommand::Cancel { .. } => "Cancel",
        }
    }
}
