//! Core types, traits, and the pending-pick slot shared by the vidpick crates.

pub mod error;
pub mod message;
pub mod pending;
pub mod traits;
pub mod types;

pub use error::{ErrorKind, HostError, PickError, ResolverError};
pub use message::{
    PickerOutcome, PresentationRequest, ACTION_PICK, DEFAULT_REQUEST_CODE, DURATION_COLUMN,
    RESULT_CANCELED, RESULT_OK, UTI_MOVIE, VIDEO_EXTERNAL_CONTENT_URI, VIDEO_MIME_FILTER,
};
pub use pending::{PendingPick, PickTicket};
pub use traits::{ContentResolver, DisplayContext, DurationInspector, MediaStream, MetadataCursor};
pub use types::{
    CopyRequest, MediaReference, Platform, PickPhase, PickResult, PickerKind,
    ANDROID_PHOTO_PICKER_SDK, DEFAULT_MAX_DURATION_MS,
};
