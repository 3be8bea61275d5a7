pub mod audio;
pub mod policy;
pub mod source;

pub use audio::{AudioSessionBinding, AudioSessionRegistry, AudioType, REGISTERED_AUDIO_SESSION_ID};
pub use policy::{last_track_index, should_restart, LogIdAllocator};
pub use source::{
    compositor_shape, CompositorShape, GeometryId, LoadControl, MediaSource, RenderingStyle,
    VideoShape, VideoSource,
};
