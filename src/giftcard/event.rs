use serde::{Deserialize, Serialize};

use crate::event_record::{EventRecord, PayloadError};

/// A durable fact about one card.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GiftCardEvent {
    Issued { id: String, amount: i64 },
    Redeemed { id: String, amount: i64 },
    Cancelled { id: String },
}

impl GiftCardEvent {
    pub const ISSUED: &'static str = "Issued";
    pub const REDEEMED: &'static str = "Redeemed";
    pub const CANCELLED: &'static str = "Cancelled";

    pub fn id(&self) -> &str {
        match self {
            GiftCardEvent::Issued { id, .. }
            | GiftCardEvent::Redeemed { id, .. }
            | GiftCardEvent::Cancelled { id } => id,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            GiftCardEvent::Issued { .. } => Self::ISSUED,
            GiftCardEvent::Redeemed { .. } => Self::REDEEMED,
            GiftCardEvent::Cancelled { .. } => Self::CANCELLED,
        }
    }

    /// Encode into an unsequenced record ready for appending.
    pub fn to_record(&self) -> Result<EventRecord, PayloadError> {
        EventRecord::encode(self.name(), self)
    }
}

impl TryFrom<&EventRecord> for GiftCardEvent {
    type Error = PayloadError;

    fn try_from(record: &EventRecord) -> Result<Self, Self::Error> {
        let event: GiftCardEvent = record.decode()?;
        if event.name() != record.event_name {
            return Err(PayloadError::new(format!(
                "record named {} holds a {} payload",
                record.event_name,
                event.name()
            )));
        }
        Ok(event)
    }
}
