pub mod config;
pub mod dimensions;
pub mod layout;
pub mod media;

pub use config::{ConfigError, LayoutConfig};
pub use dimensions::{
    normalize_for_max_resolution, panel_dimensions_in_meters, PanelSize, PixelSize,
};
pub use layout::{menu_offset, select_layout, AlphaMode, MeshRecipe, PanelLayout};
pub use media::{DisplayState, MediaInfo, MediaShape};
