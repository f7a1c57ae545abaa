//! Native picker launchers, one per platform picker.
//!
//! The launcher is chosen once from the [`Platform`] description. Each
//! variant only knows what to ask the host to present; waiting for the
//! answer is shared.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::oneshot;
use tracing::{debug, info};
use vidpick_core::{
    DisplayContext, MediaReference, PickError, PickPhase, PickTicket, PickerKind, PickerOutcome,
    Platform, PresentationRequest, ACTION_PICK, UTI_MOVIE, VIDEO_EXTERNAL_CONTENT_URI,
    VIDEO_MIME_FILTER,
};

#[async_trait]
pub trait PickerLauncher: Send + Sync {
    fn kind(&self) -> PickerKind;

    /// What the host is asked to show.
    fn presentation(&self) -> PresentationRequest;

    /// Present the picker and wait for the user's choice.
    ///
    /// `context` is released before waiting, so the host may tear it down
    /// and recreate it while the picker is on screen. `None` means the user
    /// dismissed the picker.
    async fn launch(
        &self,
        context: Arc<dyn DisplayContext>,
        ticket: &PickTicket<'_>,
        answer: oneshot::Receiver<PickerOutcome>,
    ) -> Result<Option<MediaReference>, PickError> {
        let request = self.presentation();
        context.present(&request)?;
        drop(context);

        info!(picker = %self.kind(), pick_id = %ticket.id(), "Picker presented");
        ticket.advance(PickPhase::AwaitingUserChoice);

        match answer.await {
            Ok(PickerOutcome::Selected(reference)) => Ok(Some(reference)),
            Ok(PickerOutcome::Dismissed) => {
                debug!(pick_id = %ticket.id(), "Picker dismissed");
                Ok(None)
            }
            Err(_) => Err(PickError::Launch("host detached before the picker answered".into())),
        }
    }
}

/// Android 13+ visual media picker, videos only.
#[derive(Debug, Clone)]
pub struct PhotoPickerLauncher {
    pub request_code: i32,
}

#[async_trait]
impl PickerLauncher for PhotoPickerLauncher {
    fn kind(&self) -> PickerKind {
        PickerKind::PhotoPicker
    }

    fn presentation(&self) -> PresentationRequest {
        PresentationRequest::VisualMediaPicker {
            request_code: self.request_code,
            mime_type: VIDEO_MIME_FILTER.into(),
        }
    }
}

/// `ACTION_PICK` on the external video collection, for older Android.
#[derive(Debug, Clone)]
pub struct GalleryLauncher {
    pub request_code: i32,
}

#[async_trait]
impl PickerLauncher for GalleryLauncher {
    fn kind(&self) -> PickerKind {
        PickerKind::GalleryIntent
    }

    fn presentation(&self) -> PresentationRequest {
        PresentationRequest::GalleryIntent {
            request_code: self.request_code,
            action: ACTION_PICK.into(),
            data: VIDEO_EXTERNAL_CONTENT_URI.into(),
            mime_type: VIDEO_MIME_FILTER.into(),
        }
    }
}

/// iOS image picker restricted to movies.
#[derive(Debug, Clone, Default)]
pub struct MoviePickerLauncher;

#[async_trait]
impl PickerLauncher for MoviePickerLauncher {
    fn kind(&self) -> PickerKind {
        PickerKind::MoviePicker
    }

    fn presentation(&self) -> PresentationRequest {
        PresentationRequest::ImagePicker { media_types: vec![UTI_MOVIE.into()], animated: true }
    }
}

pub fn select_launcher(platform: Platform, request_code: i32) -> Arc<dyn PickerLauncher> {
    let launcher: Arc<dyn PickerLauncher> = match platform {
        Platform::Android { .. } if platform.has_photo_picker() => {
            Arc::new(PhotoPickerLauncher { request_code })
        }
        Platform::Android { .. } => Arc::new(GalleryLauncher { request_code }),
        Platform::Ios => Arc::new(MoviePickerLauncher),
    };
    debug!(?platform, picker = %launcher.kind(), "Selected picker");
    launcher
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::Mutex;
    use vidpick_core::{ContentResolver, HostError, PendingPick};

    #[derive(Default)]
    struct RecordingHost {
        presented: Mutex<Vec<PresentationRequest>>,
        refuse: bool,
    }

    impl DisplayContext for RecordingHost {
        fn package_name(&self) -> &str {
            "app.test"
        }

        fn cache_dir(&self) -> PathBuf {
            PathBuf::from("/nonexistent")
        }

        fn content_resolver(&self) -> Option<Arc<dyn ContentResolver>> {
            None
        }

        fn present(&self, request: &PresentationRequest) -> Result<(), HostError> {
            if self.refuse {
                return Err(HostError::NoHandler("video/*".into()));
            }
            self.presented.lock().unwrap().push(request.clone());
            Ok(())
        }
    }

    #[test]
    fn selection_follows_platform_capability() {
        assert_eq!(select_launcher(Platform::Android { sdk_int: 34 }, 1).kind(), PickerKind::PhotoPicker);
        assert_eq!(select_launcher(Platform::Android { sdk_int: 33 }, 1).kind(), PickerKind::PhotoPicker);
        assert_eq!(select_launcher(Platform::Android { sdk_int: 29 }, 1).kind(), PickerKind::GalleryIntent);
        assert_eq!(select_launcher(Platform::Ios, 1).kind(), PickerKind::MoviePicker);
    }

    #[test]
    fn gallery_filters_to_video() {
        let request = GalleryLauncher { request_code: 9911 }.presentation();
        assert_eq!(request.request_code(), Some(9911));
        let PresentationRequest::GalleryIntent { action, mime_type, .. } = request else {
            panic!("expected gallery intent");
        };
        assert_eq!(action, ACTION_PICK);
        assert_eq!(mime_type, "video/*");
    }

    #[tokio::test]
    async fn launch_returns_selected_reference() {
        let host = Arc::new(RecordingHost::default());
        let pending = PendingPick::new();
        let (ticket, rx) = pending.arm().unwrap();
        pending.resolve(PickerOutcome::Selected(MediaReference::new("file:///v.mp4")));

        let launcher = MoviePickerLauncher;
        let picked = launcher.launch(host.clone(), &ticket, rx).await.unwrap();
        assert_eq!(picked.unwrap().as_str(), "file:///v.mp4");
        assert_eq!(host.presented.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn refused_presentation_is_a_launch_failure() {
        let host = Arc::new(RecordingHost { refuse: true, ..Default::default() });
        let pending = PendingPick::new();
        let (ticket, rx) = pending.arm().unwrap();

        let err = GalleryLauncher { request_code: 1 }.launch(host, &ticket, rx).await.unwrap_err();
        assert_eq!(err.kind().code(), "intent_fail");
    }

    #[tokio::test]
    async fn abandoned_answer_is_a_launch_failure() {
        let host = Arc::new(RecordingHost::default());
        let pending = PendingPick::new();
        let (ticket, rx) = pending.arm().unwrap();
        pending.abandon();

        let err = PhotoPickerLauncher { request_code: 1 }.launch(host, &ticket, rx).await.unwrap_err();
        assert!(matches!(err, PickError::Launch(_)));
    }
}
