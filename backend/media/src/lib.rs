//! Media-side collaborators of the picker: duration inspection, byte copying,
//! MIME helpers, and a filesystem content resolver.

pub mod container;
pub mod copier;
pub mod fs_resolver;
pub mod inspect;
pub mod mime_detect;

pub use container::{read_duration_ms, MovieHeader};
pub use copier::{copy_granted, copy_reference, generated_file_name, CopyError, CopyReport, Destination};
pub use fs_resolver::FsContentResolver;
pub use inspect::{inspector_for, ContainerInspector, MetadataInspector};
pub use mime_detect::{detect_mime_type, is_iso_bmff, is_video, matches_filter};
