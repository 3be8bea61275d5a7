use crate::dimensions::PixelSize;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// How a piece of media is projected. Codes match the gallery's stored media
/// type column.
#[repr(u32)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, enumn::N, Serialize, Deserialize)]
#[serde(from = "String", into = "&'static str")]
pub enum MediaShape {
    Image2d = 0,
    Video2d = 1,
    Panorama180 = 2,
    Image360 = 3,
    Video360 = 4,
    SpatialVideo = 5,
    Unknown = 6,
}

impl MediaShape {
    pub const ALL: [MediaShape; 7] = [
        MediaShape::Image2d,
        MediaShape::Video2d,
        MediaShape::Panorama180,
        MediaShape::Image360,
        MediaShape::Video360,
        MediaShape::SpatialVideo,
        MediaShape::Unknown,
    ];

    /// Unrecognised codes classify as [`MediaShape::Unknown`].
    pub fn from_code(code: u32) -> Self {
        Self::n(code).unwrap_or(Self::Unknown)
    }

    /// Accepts the kebab-case names and numeric codes. Anything else is
    /// [`MediaShape::Unknown`].
    pub fn from_name(name: &str) -> Self {
        let name = name.trim();
        if let Ok(code) = name.parse::<u32>() {
            return Self::from_code(code);
        }
        Self::ALL
            .into_iter()
            .find(|shape| shape.name().eq_ignore_ascii_case(name))
            .unwrap_or(Self::Unknown)
    }

    pub fn name(&self) -> &'static str {
        match self {
            MediaShape::Image2d => "image-2d",
            MediaShape::Video2d => "video-2d",
            MediaShape::Panorama180 => "panorama-180",
            MediaShape::Image360 => "image-360",
            MediaShape::Video360 => "video-360",
            MediaShape::SpatialVideo => "spatial-video",
            MediaShape::Unknown => "unknown",
        }
    }

    pub fn is_360(&self) -> bool {
        matches!(self, MediaShape::Image360 | MediaShape::Video360)
    }
}

impl fmt::Display for MediaShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<MediaShape> for &'static str {
    fn from(shape: MediaShape) -> Self {
        shape.name()
    }
}

impl From<String> for MediaShape {
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

impl FromStr for MediaShape {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_name(s))
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DisplayState {
    Minimized,
    Maximized,
}

impl FromStr for DisplayState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "min" | "minimized" => Ok(DisplayState::Minimized),
            "max" | "maximized" => Ok(DisplayState::Maximized),
            other => Err(format!("Unknown display state '{}'", other)),
        }
    }
}

/// What the layout needs to know about a gallery item.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaInfo {
    #[serde(default)]
    pub shape: Option<MediaShape>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

impl MediaInfo {
    pub fn new(shape: Option<MediaShape>, width: Option<u32>, height: Option<u32>) -> Self {
        Self {
            shape,
            width,
            height,
        }
    }

    /// Pixel size when both dimensions are known and non-zero.
    pub fn pixel_size(&self) -> Option<PixelSize> {
        match (self.width, self.height) {
            (Some(width), Some(height)) if width > 0 && height > 0 => {
                Some(PixelSize::new(width, height))
            }
            _ => None,
        }
    }
}
