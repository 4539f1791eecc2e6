use serde::{Deserialize, Serialize};

/// Prefix filter over card ids; the empty prefix matches every card.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardSummaryFilter {
    #[serde(default)]
    pub id_starts_with: String,
}

impl CardSummaryFilter {
    pub fn starting_with(prefix: impl Into<String>) -> Self {
        CardSummaryFilter {
            id_starts_with: prefix.into(),
        }
    }

    pub fn matches(&self, id: &str) -> bool {
        id.starts_with(&self.id_starts_with)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountCardSummariesQuery {
    #[serde(default)]
    pub filter: CardSummaryFilter,
}

/// Matching row count plus the watermark it was read at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountCardSummariesResponse {
    pub count: usize,
    pub last_event: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchCardSummariesQuery {
    pub offset: usize,
    pub limit: usize,
    #[serde(default)]
    pub filter: CardSummaryFilter,
}

impl FetchCardSummariesQuery {
    pub fn new(offset: usize, limit: usize, filter: CardSummaryFilter) -> Self {
        FetchCardSummariesQuery {
            offset,
            limit,
            filter,
        }
    }
}
