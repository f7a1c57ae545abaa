//! Pick Event Logger
//!
//! One structured record per pick lifecycle step, on the `pick_events` target.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use vidpick_core::{PickResult, PickerKind};

use crate::redact::redact_reference;

pub const PICK_EVENTS_TARGET: &str = "pick_events";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PickEvent {
    PickStarted {
        platform: String,
    },
    PickerResolved {
        picker: String,
        request_code: Option<i32>,
    },
    PickFinished {
        outcome: String,
        reference: Option<String>,
        duration_ms: Option<u64>,
    },
    CopyFinished {
        reference: String,
        bytes: u64,
    },
    Failed {
        code: String,
        message: String,
    },
}

impl PickEvent {
    pub fn picker_resolved(kind: PickerKind, request_code: Option<i32>) -> Self {
        Self::PickerResolved { picker: kind.to_string(), request_code }
    }

    /// Summarizes a finished pick. Failures become [`PickEvent::Failed`].
    pub fn from_result(result: &PickResult) -> Self {
        match result {
            PickResult::Cancelled => Self::PickFinished {
                outcome: result.label().into(),
                reference: None,
                duration_ms: None,
            },
            PickResult::TooLong { source, duration_ms }
            | PickResult::Accepted { source, duration_ms, .. } => Self::PickFinished {
                outcome: result.label().into(),
                reference: Some(source.to_string()),
                duration_ms: Some(*duration_ms),
            },
            PickResult::Failed { kind, message } => Self::Failed {
                code: kind.code().into(),
                message: message.clone(),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PickEventEntry {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
    pub event: PickEvent,
}

pub struct PickEventLogger;

impl PickEventLogger {
    /// Logs a pick lifecycle event with references redacted.
    pub fn log_event(request_id: &str, event: PickEvent) -> PickEventEntry {
        let entry = PickEventEntry {
            request_id: request_id.into(),
            timestamp: Utc::now(),
            event: redact_event(event),
        };

        let json = serde_json::to_string(&entry).unwrap_or_default();
        info!(target: PICK_EVENTS_TARGET, event = %json, "Pick event");
        entry
    }
}

fn redact_event(mut event: PickEvent) -> PickEvent {
    match &mut event {
        PickEvent::PickFinished { reference: Some(r), .. } | PickEvent::CopyFinished { reference: r, .. } => {
            *r = redact_reference(r);
        }
        PickEvent::Failed { message, .. } => {
            *message = redact_reference(message);
        }
        _ => {}
    }
    event
}

#[cfg(test)]
mod tests {
    use super::*;
    use vidpick_core::{ErrorKind, MediaReference};

    #[test]
    fn entries_carry_redacted_references() {
        let result = PickResult::TooLong {
            source: MediaReference::new("content://media/video/7?sig=secret"),
            duration_ms: 61_000,
        };
        let entry = PickEventLogger::log_event("req-1", PickEvent::from_result(&result));
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["event"]["type"], "pick_finished");
        assert_eq!(json["event"]["outcome"], "too_long");
        assert_eq!(json["event"]["duration_ms"], 61_000);
        assert!(!json.to_string().contains("secret"));
    }

    #[test]
    fn failures_log_the_wire_code() {
        let result = PickResult::Failed { kind: ErrorKind::CopyFailure, message: "disk full".into() };
        let entry = PickEventLogger::log_event("req-2", PickEvent::from_result(&result));
        assert_eq!(entry.event, PickEvent::Failed { code: "copy_fail".into(), message: "disk full".into() });
    }
}
