//! The native video picker plugin: picker launchers, host lifecycle, the
//! request orchestrator and its method channel.

pub mod channel;
pub mod launcher;
pub mod lifecycle;
pub mod orchestrator;

pub use channel::{
    handle_call, pick_result_to_response, spawn_channel, ChannelError, MethodCall, MethodChannel,
    MethodResponse, CHANNEL_NAME, METHOD_COPY_VIDEO_TO_PATH, METHOD_PICK_VIDEO,
};
pub use launcher::{
    select_launcher, GalleryLauncher, MoviePickerLauncher, PhotoPickerLauncher, PickerLauncher,
};
pub use lifecycle::{ContextSlot, ContextState};
pub use orchestrator::VideoPicker;
