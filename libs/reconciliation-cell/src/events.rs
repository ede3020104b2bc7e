// libs/reconciliation-cell/src/events.rs
use serde_json::Value;
use tracing::warn;

/// Recognized file suffix for Veradigm drops; other object-created
/// notifications are ignored.
const INGESTED_SUFFIX: &str = ".csv";

/// Triggering event shapes the orchestrator dispatches on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerEvent {
    /// Object-created notification for an uploaded delimited file.
    FileDrop { bucket: String, key: String },
    /// Periodic scheduled fire with no payload beyond its type tag.
    Scheduled,
}

impl TriggerEvent {
    /// Classifies a raw event payload. Unrecognized shapes (and
    /// object-created notifications for non-CSV keys) return `None`.
    pub fn from_json(event: &Value) -> Option<Self> {
        if let Some(records) = event.get("Records").and_then(Value::as_array) {
            let record = records.first()?;
            let bucket = record.pointer("/s3/bucket/name")?.as_str()?;
            let key = record.pointer("/s3/object/key")?.as_str()?;
            if !key.to_lowercase().ends_with(INGESTED_SUFFIX) {
                warn!("Ignoring object-created event for non-CSV key '{}'", key);
                return None;
            }
            return Some(TriggerEvent::FileDrop {
                bucket: bucket.to_string(),
                key: key.to_string(),
            });
        }

        if event.get("detail-type").and_then(Value::as_str) == Some("Scheduled Event") {
            return Some(TriggerEvent::Scheduled);
        }

        warn!("Unrecognized event shape, ignoring");
        None
    }
}
