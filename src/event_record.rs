use std::time::SystemTime;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

/// An event payload that could not be encoded, or a record whose bytes do
/// not decode to the event it claims to be.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("payload error: {message}")]
pub struct PayloadError {
    pub message: String,
}

impl PayloadError {
    pub fn new(message: impl Into<String>) -> Self {
        PayloadError {
            message: message.into(),
        }
    }
}

impl From<bitcode::Error> for PayloadError {
    fn from(err: bitcode::Error) -> Self {
        PayloadError::new(err.to_string())
    }
}

/// One durable entry in a card's event stream.
///
/// `sequence` is the 1-based position of the event within its card's
/// stream, assigned by the event store on append; records built before
/// appending carry `0`. The payload is bitcode; JSON envelopes carry it as
/// base64.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub event_name: String,
    pub sequence: u64,
    pub recorded_at: SystemTime,
    #[serde(with = "base64_bytes")]
    pub payload: Vec<u8>,
}

impl EventRecord {
    pub fn new(event_name: impl Into<String>, payload: Vec<u8>, sequence: u64) -> Self {
        EventRecord {
            event_name: event_name.into(),
            sequence,
            recorded_at: SystemTime::now(),
            payload,
        }
    }

    /// Unsequenced record holding `payload` as bitcode.
    pub fn encode<T: Serialize>(
        event_name: impl Into<String>,
        payload: &T,
    ) -> Result<Self, PayloadError> {
        Ok(EventRecord::new(event_name, bitcode::serialize(payload)?, 0))
    }

    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, PayloadError> {
        Ok(bitcode::deserialize(&self.payload)?)
    }
}

mod base64_bytes {
    use base64::{engine::general_purpose::STANDARD, Engine};
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S, T>(bytes: T, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: AsRef<[u8]>,
    {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        STANDARD
            .decode(text)
            .map_err(|e| D::Error::custom(format!("invalid base64 payload: {e}")))
    }
}
