use mediapanel_layout::MeshRecipe;
use serde::{Deserialize, Serialize};

/// Height in meters of a rectilinear video panel; width follows the aspect.
pub const BASE_PANEL_SIZE: f32 = 0.7;
const EQUIRECT_RADIUS: f32 = 50.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum VideoSource {
    /// Video bundled with the application.
    Raw { resource: String },
    Url {
        url: String,
        #[serde(default)]
        drm_license_url: Option<String>,
    },
}

impl VideoSource {
    pub fn is_remote(&self) -> bool {
        matches!(self, VideoSource::Url { .. })
    }

    pub fn drm_license_url(&self) -> Option<&str> {
        match self {
            VideoSource::Url {
                drm_license_url, ..
            } => drm_license_url.as_deref(),
            VideoSource::Raw { .. } => None,
        }
    }

    pub fn is_dash(&self) -> bool {
        match self {
            VideoSource::Url { url, .. } => url.ends_with(".mpd"),
            VideoSource::Raw { .. } => false,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VideoShape {
    Rectilinear,
    Equirect180,
    Equirect360,
    /// Geometry described by the stream's [`GeometryId`].
    Ybvr,
}

/// Projection geometries a YBVR stream may announce.
#[repr(u32)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, enumn::N, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GeometryId {
    Equirectangular = 0,
    Cm32 = 1,
    Acm = 2,
    Acme = 3,
    Cm180 = 4,
    Equidome = 5,
    Plane = 6,
    App = 7,
    Appe = 8,
    Ap3 = 9,
    ControlRoom = 10,
    ControlRoomV2 = 11,
    Unknown = 12,
}

impl GeometryId {
    pub fn from_code(code: u32) -> Self {
        Self::n(code).unwrap_or(Self::Unknown)
    }

    /// Surface to play this geometry on, or `None` if it is not supported.
    pub fn mesh_recipe(&self) -> Option<MeshRecipe> {
        match self {
            GeometryId::Equirectangular => Some(MeshRecipe::Sphere {
                radius: 1.0,
                longitudes: 32,
                latitudes: 32,
            }),
            GeometryId::Cm32 => Some(MeshRecipe::Cubemap { size: 1.0 }),
            GeometryId::Plane | GeometryId::ControlRoom | GeometryId::ControlRoomV2 => {
                Some(MeshRecipe::Quad {
                    width: 16.0,
                    height: 9.0,
                })
            }
            unsupported => {
                tracing::warn!("Unsupported YBVR geometry {:?}", unsupported);
                None
            }
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RenderingStyle {
    Readable,
    DirectToSurface,
    CustomPanel,
    CustomDirectToSurface,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MediaSource {
    pub video_source: VideoSource,
    pub video_shape: VideoShape,
    pub aspect_ratio: f32,
    #[serde(default)]
    pub position_ms: u64,
    #[serde(default = "MediaSource::default_geometry")]
    pub geometry: GeometryId,
    #[serde(default = "MediaSource::default_rendering_style")]
    pub rendering_style: RenderingStyle,
}

impl MediaSource {
    fn default_geometry() -> GeometryId {
        GeometryId::Unknown
    }

    fn default_rendering_style() -> RenderingStyle {
        RenderingStyle::Readable
    }

    pub fn drm_enabled(&self) -> bool {
        self.video_source.drm_license_url().is_some()
    }

    /// Panel size in meters for rectilinear video.
    pub fn panel_size(&self) -> (f32, f32) {
        (self.aspect_ratio * BASE_PANEL_SIZE, BASE_PANEL_SIZE)
    }

    pub fn supports_hero_lighting(&self) -> bool {
        self.video_shape == VideoShape::Rectilinear
            && self.rendering_style != RenderingStyle::DirectToSurface
    }
}

/// Shape of the compositor layer a video is drawn on.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum CompositorShape {
    Quad { width: f32, height: f32 },
    Equirect180 { radius: f32 },
    Equirect360 { radius: f32 },
}

/// `None` for YBVR streams, which draw onto their own geometry instead of a
/// compositor layer.
pub fn compositor_shape(source: &MediaSource) -> Option<CompositorShape> {
    match source.video_shape {
        VideoShape::Rectilinear => {
            let (width, height) = source.panel_size();
            Some(CompositorShape::Quad { width, height })
        }
        VideoShape::Equirect180 => Some(CompositorShape::Equirect180 {
            radius: EQUIRECT_RADIUS,
        }),
        VideoShape::Equirect360 => Some(CompositorShape::Equirect360 {
            radius: EQUIRECT_RADIUS,
        }),
        VideoShape::Ybvr => None,
    }
}

/// Player buffering thresholds in milliseconds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LoadControl {
    pub min_buffer_ms: u32,
    pub max_buffer_ms: u32,
    pub buffer_for_playback_ms: u32,
    pub buffer_for_playback_after_rebuffer_ms: u32,
}

impl LoadControl {
    pub const REMOTE: Self = Self {
        min_buffer_ms: 10_000,
        max_buffer_ms: 30_000,
        buffer_for_playback_ms: 1_000,
        buffer_for_playback_after_rebuffer_ms: 2_000,
    };

    /// `None` keeps the player's defaults.
    pub fn for_source(source: &VideoSource) -> Option<Self> {
        source.is_remote().then_some(Self::REMOTE)
    }
}
