use serde::{Deserialize, Serialize};

use crate::types::MediaReference;

/// Request code the plugin uses to recognise its own activity results.
pub const DEFAULT_REQUEST_CODE: i32 = 9911;

/// `Activity.RESULT_OK`.
pub const RESULT_OK: i32 = -1;

/// `Activity.RESULT_CANCELED`.
pub const RESULT_CANCELED: i32 = 0;

pub const ACTION_PICK: &str = "android.intent.action.PICK";
pub const VIDEO_EXTERNAL_CONTENT_URI: &str = "content://media/external/video/media";
pub const VIDEO_MIME_FILTER: &str = "video/*";

/// Uniform type identifier for movies on iOS.
pub const UTI_MOVIE: &str = "public.movie";

/// MediaStore column holding a video's duration in milliseconds.
pub const DURATION_COLUMN: &str = "duration";

/// What a launcher asks the host to put on screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PresentationRequest {
    /// Start the proxy activity hosting `PickVisualMedia(VideoOnly)`.
    VisualMediaPicker { request_code: i32, mime_type: String },
    /// Fire a gallery selection intent.
    GalleryIntent {
        request_code: i32,
        action: String,
        data: String,
        mime_type: String,
    },
    /// Present `UIImagePickerController` from the root view controller.
    ImagePicker { media_types: Vec<String>, animated: bool },
}

impl PresentationRequest {
    /// Request code for Android presentations; iOS has none.
    pub fn request_code(&self) -> Option<i32> {
        match self {
            PresentationRequest::VisualMediaPicker { request_code, .. }
            | PresentationRequest::GalleryIntent { request_code, .. } => Some(*request_code),
            PresentationRequest::ImagePicker { .. } => None,
        }
    }
}

/// Raw answer from the native picker UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerOutcome {
    Selected(MediaReference),
    Dismissed,
}

impl PickerOutcome {
    /// Interpret an Android activity result: anything but `RESULT_OK` with a
    /// data URI counts as a dismissal.
    pub fn from_activity_result(result_code: i32, data: Option<&str>) -> Self {
        match data {
            Some(uri) if result_code == RESULT_OK && !uri.is_empty() => {
                PickerOutcome::Selected(MediaReference::new(uri))
            }
            _ => PickerOutcome::Dismissed,
        }
    }

    /// Interpret the iOS delegate callback's media URL.
    pub fn from_media_url(url: Option<&str>) -> Self {
        match url {
            Some(url) if !url.is_empty() => PickerOutcome::Selected(MediaReference::new(url)),
            _ => PickerOutcome::Dismissed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_with_data_is_a_selection() {
        let outcome = PickerOutcome::from_activity_result(RESULT_OK, Some("content://media/7"));
        assert_eq!(outcome, PickerOutcome::Selected(MediaReference::new("content://media/7")));
    }

    #[test]
    fn missing_data_or_cancel_is_dismissal() {
        assert_eq!(PickerOutcome::from_activity_result(RESULT_OK, None), PickerOutcome::Dismissed);
        assert_eq!(
            PickerOutcome::from_activity_result(RESULT_CANCELED, Some("content://media/7")),
            PickerOutcome::Dismissed
        );
        assert_eq!(PickerOutcome::from_media_url(Some("")), PickerOutcome::Dismissed);
    }

    #[test]
    fn presentation_serializes_with_type_tag() {
        let req = PresentationRequest::ImagePicker {
            media_types: vec![UTI_MOVIE.into()],
            animated: true,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["type"], "image_picker");
        assert_eq!(json["media_types"][0], "public.movie");
        assert_eq!(req.request_code(), None);
    }
}
