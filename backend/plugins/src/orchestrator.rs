//! The video picker: `pickVideo` and `copyVideoToPath`.
//!
//! One pick may be outstanding at a time. The pending slot is armed before the
//! picker is presented and cleared when the returned ticket drops, so every
//! exit path of [`VideoPicker::pick_video`] leaves it empty.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;
use vidpick_config::{PickerConfig, UnknownDurationPolicy};
use vidpick_core::{
    ContentResolver, CopyRequest, DisplayContext, DurationInspector, MediaReference, PendingPick,
    PickError, PickPhase, PickResult, PickerOutcome, Platform,
};
use vidpick_logging::{PickEvent, PickEventLogger, redact_reference};
use vidpick_media::{Destination, copy_granted, copy_reference, inspector_for};

use crate::launcher::{PickerLauncher, select_launcher};
use crate::lifecycle::ContextSlot;

pub struct VideoPicker {
    config: PickerConfig,
    platform: Platform,
    launcher: Arc<dyn PickerLauncher>,
    inspector: Arc<dyn DurationInspector>,
    context: ContextSlot,
    pending: PendingPick,
}

impl VideoPicker {
    /// Picker with the launcher and inspector native to `platform`.
    pub fn new(platform: Platform, config: PickerConfig) -> Self {
        let launcher = select_launcher(platform, config.request_code());
        let inspector = inspector_for(platform);
        Self::with_components(platform, config, launcher, inspector)
    }

    pub fn with_components(
        platform: Platform,
        config: PickerConfig,
        launcher: Arc<dyn PickerLauncher>,
        inspector: Arc<dyn DurationInspector>,
    ) -> Self {
        Self {
            config,
            platform,
            launcher,
            inspector,
            context: ContextSlot::new(),
            pending: PendingPick::new(),
        }
    }

    // ---------------------------------------------------------------------
    // Host lifecycle
    // ---------------------------------------------------------------------

    pub fn attach_context(&self, context: Arc<dyn DisplayContext>) {
        self.context.attach(context);
    }

    /// The pending pick survives; the host is expected to reattach.
    pub fn detach_context_for_config_change(&self) {
        self.context.detach_for_config_change();
    }

    pub fn reattach_context(&self, context: Arc<dyn DisplayContext>) {
        self.context.reattach(context);
    }

    /// Final detach. A pick still waiting on the picker fails with
    /// `intent_fail` since nobody is left to answer it.
    pub fn detach_context(&self) {
        self.context.detach();
        if self.pending.abandon() {
            warn!("Detached with a pick in flight; abandoning it");
        }
    }

    // ---------------------------------------------------------------------
    // Picker answers
    // ---------------------------------------------------------------------

    /// Android activity result. Returns false for request codes that belong
    /// to someone else.
    pub fn on_activity_result(&self, request_code: i32, result_code: i32, data: Option<&str>) -> bool {
        if request_code != self.config.request_code() {
            return false;
        }
        self.pending.resolve(PickerOutcome::from_activity_result(result_code, data));
        true
    }

    /// iOS delegate: the user picked a movie (or the picker gave no URL).
    pub fn on_picker_finished(&self, media_url: Option<&str>) -> bool {
        self.pending.resolve(PickerOutcome::from_media_url(media_url))
    }

    /// iOS delegate: the user cancelled.
    pub fn on_picker_cancelled(&self) -> bool {
        self.pending.resolve(PickerOutcome::Dismissed)
    }

    pub fn is_pick_pending(&self) -> bool {
        self.pending.is_pending()
    }

    pub fn phase(&self) -> PickPhase {
        self.pending.phase()
    }

    // ---------------------------------------------------------------------
    // Requests
    // ---------------------------------------------------------------------

    /// Run one pick cycle to its terminal result.
    pub async fn pick_video(&self) -> PickResult {
        let request_id = Uuid::new_v4().to_string();
        let span = info_span!("pick_video", request_id = %request_id);

        async {
            PickEventLogger::log_event(
                &request_id,
                PickEvent::PickStarted { platform: format!("{:?}", self.platform) },
            );
            let result = match self.run_pick(&request_id).await {
                Ok(result) => result,
                Err(err) => {
                    warn!(code = err.kind().code(), error = %redact_reference(&err.to_string()), "Pick failed");
                    PickResult::from(err)
                }
            };
            PickEventLogger::log_event(&request_id, PickEvent::from_result(&result));
            result
        }
        .instrument(span)
        .await
    }

    async fn run_pick(&self, request_id: &str) -> Result<PickResult, PickError> {
        let context = self.context.current().ok_or(PickError::NoContext)?;
        let (ticket, answer) = self.pending.arm()?;

        PickEventLogger::log_event(
            request_id,
            PickEvent::picker_resolved(self.launcher.kind(), self.launcher.presentation().request_code()),
        );

        let Some(reference) = self.launcher.launch(context, &ticket, answer).await? else {
            return Ok(PickResult::Cancelled);
        };
        ticket.advance(PickPhase::Evaluating);

        // The context may have been recreated while the picker was up.
        let context = self.context.current().ok_or(PickError::NoResolver)?;
        let resolver = context.content_resolver().ok_or(PickError::NoResolver)?;
        let package = context.package_name().to_string();
        let cache_dir = self.cache_dir_for(context.as_ref());
        drop(context);

        // Covers inspection and the copy below.
        resolver
            .grant_read_permission(&package, &reference)
            .await
            .map_err(|e| PickError::Copy(format!("could not grant read permission: {e}")))?;

        let duration_ms = self.evaluate(resolver.as_ref(), &reference).await?;
        if duration_ms > self.config.max_duration_ms() {
            info!(duration_ms, max = self.config.max_duration_ms(), "Clip too long; not copying");
            return Ok(PickResult::TooLong { source: reference, duration_ms });
        }

        ticket.advance(PickPhase::Copying);
        let destination = Destination::Generated {
            dir: cache_dir,
            prefix: self.config.picked_prefix().to_string(),
            extension: self.config.extension().to_string(),
        };
        let report = copy_granted(resolver.as_ref(), &reference, destination).await?;
        PickEventLogger::log_event(
            request_id,
            PickEvent::CopyFinished { reference: reference.to_string(), bytes: report.bytes },
        );

        Ok(PickResult::Accepted { source: reference, duration_ms, local_path: report.path })
    }

    async fn evaluate(
        &self,
        resolver: &dyn ContentResolver,
        reference: &MediaReference,
    ) -> Result<u64, PickError> {
        if let Some(duration_ms) = self.inspector.inspect(resolver, reference).await {
            debug!(duration_ms, "Duration inspected");
            return Ok(duration_ms);
        }
        match self.config.unknown_duration() {
            UnknownDurationPolicy::Accept => {
                warn!(reference = %redact_reference(reference.as_str()), "Duration unknown; treating as 0 ms");
                Ok(0)
            }
            UnknownDurationPolicy::Reject => {
                Err(PickError::DurationUnavailable(redact_reference(reference.as_str())))
            }
        }
    }

    fn cache_dir_for(&self, context: &dyn DisplayContext) -> PathBuf {
        let base = context.cache_dir();
        match self.config.cache_subdir() {
            Some(subdir) => base.join(subdir),
            None => base,
        }
    }

    /// Copy `request.uri` into `request.dest_dir` without showing any UI.
    ///
    /// Arguments are checked before anything touches the filesystem.
    pub async fn copy_video_to_path(&self, request: CopyRequest) -> Result<PathBuf, PickError> {
        let uri = required(request.uri, "uri")?;
        let dest_dir = PathBuf::from(required(request.dest_dir, "destDir")?);
        let file_name = request.file_name.filter(|name| !name.trim().is_empty());
        if let Some(name) = &file_name {
            check_file_name(name)?;
        }

        let context = self.context.current().ok_or(PickError::NoResolver)?;
        let resolver = context.content_resolver().ok_or(PickError::NoResolver)?;
        let package = context.package_name().to_string();
        drop(context);

        let destination = match file_name {
            Some(name) => Destination::Exact(dest_dir.join(name)),
            None => Destination::Generated {
                dir: dest_dir,
                prefix: self.config.copied_prefix().to_string(),
                extension: self.config.extension().to_string(),
            },
        };

        let reference = MediaReference::new(uri);
        let report = copy_reference(resolver.as_ref(), &package, &reference, destination).await?;
        PickEventLogger::log_event(
            &Uuid::new_v4().to_string(),
            PickEvent::CopyFinished { reference: reference.to_string(), bytes: report.bytes },
        );
        Ok(report.path)
    }
}

fn required(value: Option<String>, name: &str) -> Result<String, PickError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| PickError::BadArguments(format!("Missing {name}")))
}

/// A file name must name a file directly inside the destination directory.
fn check_file_name(name: &str) -> Result<(), PickError> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) if !name.contains(['/', '\\']) => Ok(()),
        _ => Err(PickError::BadArguments(format!("Invalid fileName '{name}'"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vidpick_core::ErrorKind;

    fn picker() -> VideoPicker {
        VideoPicker::new(Platform::Android { sdk_int: 34 }, PickerConfig::default())
    }

    #[tokio::test]
    async fn pick_without_context_is_no_activity() {
        let picker = picker();
        let result = picker.pick_video().await;
        assert!(matches!(result, PickResult::Failed { kind: ErrorKind::NoContext, .. }));
        assert!(!picker.is_pick_pending());
    }

    #[tokio::test]
    async fn copy_checks_arguments_before_context() {
        let picker = picker();
        let err = picker.copy_video_to_path(CopyRequest::new("x", "")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadArguments);

        let err = picker.copy_video_to_path(CopyRequest::default()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadArguments);

        let err = picker.copy_video_to_path(CopyRequest::new("x", "/tmp/out")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoResolver);
    }

    #[test]
    fn file_names_must_stay_in_the_directory() {
        assert!(check_file_name("clip.mp4").is_ok());
        assert!(check_file_name("../clip.mp4").is_err());
        assert!(check_file_name("a/b.mp4").is_err());
        assert!(check_file_name("..").is_err());
        assert!(check_file_name("/abs.mp4").is_err());
    }

    #[test]
    fn foreign_request_codes_are_ignored() {
        let picker = picker();
        assert!(!picker.on_activity_result(1, -1, Some("content://v/1")));
        assert!(picker.on_activity_result(9911, -1, Some("content://v/1")));
    }
}
