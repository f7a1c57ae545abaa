//! Structured logging for the video picker.
//!
//! Handles reference redaction, JSON file output with daily rotation, and
//! pick lifecycle event logging.

pub mod event_logger;
pub mod logger;
pub mod redact;

pub use event_logger::{PickEvent, PickEventEntry, PickEventLogger, PICK_EVENTS_TARGET};
pub use logger::init_logger;
pub use redact::redact_reference;
