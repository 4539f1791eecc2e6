mod aggregate;

pub use aggregate::{expected_version, hydrate, replay, Aggregate, StreamKey};
