use serde::{Deserialize, Serialize};

use crate::read_model::ReadModel;

/// Read-side view of one card.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardSummary {
    pub id: String,
    pub initial_value: i64,
    pub remaining_value: i64,
}

impl CardSummary {
    pub fn issued(id: impl Into<String>, amount: i64) -> Self {
        CardSummary {
            id: id.into(),
            initial_value: amount,
            remaining_value: amount,
        }
    }
}

impl ReadModel for CardSummary {
    const COLLECTION: &'static str = "card_summary";

    fn id(&self) -> &str {
        &self.id
    }
}
