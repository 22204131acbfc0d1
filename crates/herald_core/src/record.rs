//! Channel message joined with sender identity.

use chrono::{DateTime, SecondsFormat, Utc};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// A non-empty channel message with the identity of its sender.
///
/// Serialized as `{message, username, firstName, lastName, timestamp}` with an
/// ISO-8601 timestamp in millisecond precision.
///
/// # Examples
///
/// ```
/// use herald_core::MessageRecord;
///
/// let record = MessageRecord::from_epoch_seconds("gm", Some("ada".into()), "Ada", "Lovelace", 0)
///     .unwrap();
/// assert_eq!(record.timestamp_iso(), "1970-01-01T00:00:00.000Z");
///
/// assert!(MessageRecord::from_epoch_seconds("", None, "Ada", "Lovelace", 0).is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase", try_from = "RawMessageRecord")]
pub struct MessageRecord {
    #[serde(rename = "message")]
    text: String,
    username: Option<String>,
    first_name: String,
    last_name: String,
    #[serde(serialize_with = "serialize_iso")]
    timestamp: DateTime<Utc>,
}

impl MessageRecord {
    /// Build a record, or `None` when `text` is empty.
    pub fn new(
        text: impl Into<String>,
        username: Option<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Option<Self> {
        let text = text.into();
        if text.is_empty() {
            return None;
        }
        Some(Self {
            text,
            username,
            first_name: first_name.into(),
            last_name: last_name.into(),
            timestamp,
        })
    }

    /// Build a record from a Unix timestamp in seconds.
    ///
    /// Returns `None` for empty text or an out-of-range timestamp.
    pub fn from_epoch_seconds(
        text: impl Into<String>,
        username: Option<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        epoch_seconds: i64,
    ) -> Option<Self> {
        let timestamp = DateTime::from_timestamp(epoch_seconds, 0)?;
        Self::new(text, username, first_name, last_name, timestamp)
    }

    /// Timestamp rendered as ISO-8601 with milliseconds, e.g. `2024-05-01T12:00:00.000Z`.
    pub fn timestamp_iso(&self) -> String {
        self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

fn serialize_iso<S>(timestamp: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&timestamp.to_rfc3339_opts(SecondsFormat::Millis, true))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMessageRecord {
    message: String,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    first_name: String,
    #[serde(default)]
    last_name: String,
    timestamp: DateTime<Utc>,
}

impl TryFrom<RawMessageRecord> for MessageRecord {
    type Error = String;

    fn try_from(raw: RawMessageRecord) -> Result<Self, Self::Error> {
        MessageRecord::new(
            raw.message,
            raw.username,
            raw.first_name,
            raw.last_name,
            raw.timestamp,
        )
        .ok_or_else(|| "message text must not be empty".to_string())
    }
}
