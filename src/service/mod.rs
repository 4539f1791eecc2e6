//! Command side: per-card serialized submit, plus bulk issuance on top of it.

mod bulk;
mod error;
mod gift_card_service;

pub use bulk::{BulkIssuer, BulkProgress, BulkSnapshot};
pub use error::SubmitError;
pub use gift_card_service::{CommandSubmitter, GiftCardService};
