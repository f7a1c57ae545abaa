use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::AsyncRead;

use crate::error::{HostError, ResolverError};
use crate::message::PresentationRequest;
use crate::types::MediaReference;

/// Readable byte stream over a media reference. Dropping it closes it.
pub type MediaStream = Box<dyn AsyncRead + Send + Unpin>;

/// The host's foreground screen (an Android activity or the iOS root view
/// controller). Owned by the host; the plugin only ever borrows it.
pub trait DisplayContext: Send + Sync {
    /// Package / bundle identifier used when granting URI permissions.
    fn package_name(&self) -> &str;

    /// Private, app-scoped cache directory.
    fn cache_dir(&self) -> PathBuf;

    /// Content-resolution service, if the host exposes one.
    fn content_resolver(&self) -> Option<Arc<dyn ContentResolver>>;

    /// Put the native picker on screen. Returns once the UI is launched; the
    /// user's answer arrives later through the plugin's result callbacks.
    fn present(&self, request: &PresentationRequest) -> Result<(), HostError>;
}

/// Row cursor returned by a metadata query. Dropping it closes it.
pub trait MetadataCursor: Send {
    fn move_to_first(&mut self) -> bool;

    fn column_index(&self, column: &str) -> Option<usize>;

    fn get_i64(&self, index: usize) -> Option<i64>;
}

/// Platform content-resolution service.
#[async_trait]
pub trait ContentResolver: Send + Sync {
    /// Grant `package` temporary read access to `reference`.
    async fn grant_read_permission(
        &self,
        package: &str,
        reference: &MediaReference,
    ) -> Result<(), ResolverError>;

    /// Open a read stream. `Ok(None)` means the provider had nothing to open.
    async fn open_input_stream(
        &self,
        reference: &MediaReference,
    ) -> Result<Option<MediaStream>, ResolverError>;

    /// Query metadata columns. `Ok(None)` means the provider returned no cursor.
    async fn query(
        &self,
        reference: &MediaReference,
        projection: &[&str],
    ) -> Result<Option<Box<dyn MetadataCursor>>, ResolverError>;
}

/// Determines a video's playback duration.
#[async_trait]
pub trait DurationInspector: Send + Sync {
    /// Duration in milliseconds, or `None` when it cannot be determined.
    /// Never fails: inspection problems are reported as `None`.
    async fn inspect(&self, resolver: &dyn ContentResolver, reference: &MediaReference) -> Option<u64>;
}
