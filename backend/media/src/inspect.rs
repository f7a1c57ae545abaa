//! Duration inspectors.
//!
//! Android answers from MediaStore metadata; iOS hands over a movie file, so
//! its inspector reads the container header instead.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};
use vidpick_logging::redact_reference;
use vidpick_core::{
    ContentResolver, DurationInspector, MediaReference, MetadataCursor, Platform, DURATION_COLUMN,
};

use crate::container;

/// Reads the `duration` column through the resolver's metadata query.
#[derive(Debug, Default, Clone, Copy)]
pub struct MetadataInspector;

#[async_trait]
impl DurationInspector for MetadataInspector {
    async fn inspect(&self, resolver: &dyn ContentResolver, reference: &MediaReference) -> Option<u64> {
        let cursor = match resolver.query(reference, &[DURATION_COLUMN]).await {
            Ok(Some(cursor)) => cursor,
            Ok(None) => {
                debug!(reference = %redact_reference(reference.as_str()), "No metadata cursor");
                return None;
            }
            Err(e) => {
                warn!(reference = %redact_reference(reference.as_str()), error = %redact_reference(&e.to_string()), "Metadata query failed");
                return None;
            }
        };
        // The cursor is consumed here and closed on return, row or not.
        duration_from_cursor(cursor)
    }
}

fn duration_from_cursor(mut cursor: Box<dyn MetadataCursor>) -> Option<u64> {
    if !cursor.move_to_first() {
        return None;
    }
    let index = cursor.column_index(DURATION_COLUMN)?;
    let value = cursor.get_i64(index)?;
    u64::try_from(value).ok()
}

/// Opens the media stream and reads the movie header.
#[derive(Debug, Default, Clone, Copy)]
pub struct ContainerInspector;

#[async_trait]
impl DurationInspector for ContainerInspector {
    async fn inspect(&self, resolver: &dyn ContentResolver, reference: &MediaReference) -> Option<u64> {
        let mut stream = match resolver.open_input_stream(reference).await {
            Ok(Some(stream)) => stream,
            Ok(None) => return None,
            Err(e) => {
                warn!(reference = %redact_reference(reference.as_str()), error = %redact_reference(&e.to_string()), "Could not open stream for the container header");
                return None;
            }
        };
        match container::read_duration_ms(&mut stream).await {
            Ok(ms) => ms,
            Err(e) => {
                warn!(reference = %redact_reference(reference.as_str()), error = %redact_reference(&e.to_string()), "Container header unreadable");
                None
            }
        }
    }
}

/// Inspector matching what each platform's picker hands back.
pub fn inspector_for(platform: Platform) -> Arc<dyn DurationInspector> {
    match platform {
        Platform::Android { .. } => Arc::new(MetadataInspector),
        Platform::Ios => Arc::new(ContainerInspector),
    }
}
