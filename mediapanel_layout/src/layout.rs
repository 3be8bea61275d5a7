//! Choice of panel size and surface geometry for each kind of media.

use crate::{
    config::LayoutConfig,
    dimensions::{dp_to_px, panel_size, texture_size, PanelSize, PixelSize},
    media::{DisplayState, MediaInfo, MediaShape},
};
use mediapanel_geometry::{shapes, MaterialHandle, Mesh};
use nalgebra_glm as glm;
use serde::Serialize;

pub const HOLE_PUNCH_SHADER: &str = "data/shaders/punch/punch";

const MINIMIZED_ENCLOSURE_SIZE: f32 = 1.0;
const MAXIMIZED_ENCLOSURE_SIZE: f32 = 2.0;
const PANORAMA_FRACTION_OF_SCREEN: f32 = 0.1;

/// Surface a panel is drawn on.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum MeshRecipe {
    /// The runtime's default rectangular panel.
    FlatPanel,
    Quad {
        width: f32,
        height: f32,
    },
    Cubemap {
        size: f32,
    },
    Sphere {
        radius: f32,
        longitudes: u32,
        latitudes: u32,
    },
    /// Curved surface provided by the runtime.
    Cylinder {
        radius: f32,
        height: f32,
        arc: f32,
    },
}

impl MeshRecipe {
    pub const PANORAMA_CYLINDER: Self = MeshRecipe::Cylinder {
        radius: 5.0,
        height: 5.0,
        arc: 0.7,
    };

    /// Generates the mesh, or `None` when the runtime supplies the surface.
    pub fn generate(&self, material: MaterialHandle) -> Option<Mesh> {
        match *self {
            MeshRecipe::FlatPanel | MeshRecipe::Cylinder { .. } => None,
            MeshRecipe::Quad { width, height } => Some(shapes::quad(width, height, material)),
            MeshRecipe::Cubemap { size } => Some(shapes::cubemap(size, material)),
            MeshRecipe::Sphere {
                radius,
                longitudes,
                latitudes,
            } => Some(shapes::sphere(radius, longitudes, latitudes, material)),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlphaMode {
    Opaque,
    HolePunch,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PanelLayout {
    pub size: PanelSize,
    /// Texture size of the panel, when the runtime should not pick one.
    pub layout_px: Option<PixelSize>,
    pub mesh: MeshRecipe,
    pub alpha_mode: AlphaMode,
    pub shader: Option<&'static str>,
    /// Draw the panel on a compositor layer.
    pub enable_layer: bool,
    pub fraction_of_screen: Option<f32>,
}

impl PanelLayout {
    fn flat(size: PanelSize, layout_px: Option<PixelSize>) -> Self {
        Self {
            size,
            layout_px,
            mesh: MeshRecipe::FlatPanel,
            alpha_mode: AlphaMode::Opaque,
            shader: None,
            enable_layer: true,
            fraction_of_screen: None,
        }
    }

    fn hole_punched(size: PanelSize, layout_px: Option<PixelSize>, mesh: MeshRecipe) -> Self {
        Self {
            size,
            layout_px,
            mesh,
            alpha_mode: AlphaMode::HolePunch,
            shader: Some(HOLE_PUNCH_SHADER),
            enable_layer: false,
            fraction_of_screen: None,
        }
    }
}

/// Absent or unknown shapes get the flat layout.
pub fn select_layout(media: &MediaInfo, state: DisplayState, config: &LayoutConfig) -> PanelLayout {
    let size = panel_size(media, config);
    let layout_px = texture_size(media, config);
    let shape = media.shape.unwrap_or(MediaShape::Unknown);
    let sphere = |radius| MeshRecipe::Sphere {
        radius,
        longitudes: config.sphere_segments,
        latitudes: config.sphere_segments,
    };

    let layout = match (shape, state) {
        (MediaShape::Panorama180, DisplayState::Minimized) => PanelLayout::hole_punched(
            size,
            Some(layout_px),
            MeshRecipe::Cubemap {
                size: MINIMIZED_ENCLOSURE_SIZE,
            },
        ),
        (MediaShape::Panorama180, DisplayState::Maximized) => PanelLayout {
            fraction_of_screen: Some(PANORAMA_FRACTION_OF_SCREEN),
            ..PanelLayout::hole_punched(size.scaled(2.0), None, MeshRecipe::PANORAMA_CYLINDER)
        },
        (shape, DisplayState::Minimized) if shape.is_360() => PanelLayout::hole_punched(
            size.square_of_smaller_side(),
            Some(layout_px),
            sphere(MINIMIZED_ENCLOSURE_SIZE),
        ),
        (shape, DisplayState::Maximized) if shape.is_360() => {
            PanelLayout::hole_punched(size, Some(layout_px), sphere(MAXIMIZED_ENCLOSURE_SIZE))
        }
        (_, DisplayState::Minimized) => PanelLayout::flat(size, Some(layout_px)),
        (_, DisplayState::Maximized) => PanelLayout::flat(size.scaled(2.0), None),
    };

    tracing::debug!("Selected {:?} layout for {} media: {:?}", state, shape, layout);
    layout
}

/// Offset from a maximized panel's centre to where the immersive menu sits
/// below it.
pub fn menu_offset(media: &MediaInfo, config: &LayoutConfig) -> glm::Vec3 {
    let medium_spacing = dp_to_px(config.medium_spacing_dp, config.dpi) as f32 * config.pixels_to_meters;
    let half_menu = config.menu_height / 2.0;
    let panel_height = panel_size(media, config).height;

    let y = match media.shape {
        Some(MediaShape::Image2d | MediaShape::Video2d | MediaShape::SpatialVideo) => {
            -panel_height / 2.0 - half_menu - medium_spacing
        }
        Some(MediaShape::Panorama180) => -panel_height - half_menu - medium_spacing,
        Some(MediaShape::Image360 | MediaShape::Video360 | MediaShape::Unknown) | None => -panel_height,
    };
    glm::vec3(0.0, y, 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn media(shape: Option<MediaShape>) -> MediaInfo {
        MediaInfo::new(shape, Some(1920), Some(1080))
    }

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn flat_shapes_double_when_maximized() {
        let config = LayoutConfig::default();
        for shape in [
            Some(MediaShape::Image2d),
            Some(MediaShape::Video2d),
            Some(MediaShape::SpatialVideo),
            Some(MediaShape::Unknown),
            None,
        ] {
            let min = select_layout(&media(shape), DisplayState::Minimized, &config);
            let max = select_layout(&media(shape), DisplayState::Maximized, &config);
            assert_eq!(min.mesh, MeshRecipe::FlatPanel);
            assert_eq!(max.mesh, MeshRecipe::FlatPanel);
            assert!(min.enable_layer && max.enable_layer);
            assert_eq!(min.layout_px, Some(PixelSize::new(1920, 1080)));
            assert_eq!(max.layout_px, None);
            assert!(approx(max.size.width, 2.0 * min.size.width));
            assert!(approx(max.size.height, 2.0 * min.size.height));
        }
    }

    #[test]
    fn spherical_media_escalates_radius() {
        let config = LayoutConfig::default();
        for shape in [MediaShape::Image360, MediaShape::Video360] {
            let min = select_layout(&media(Some(shape)), DisplayState::Minimized, &config);
            let max = select_layout(&media(Some(shape)), DisplayState::Maximized, &config);
            assert_eq!(
                min.mesh,
                MeshRecipe::Sphere {
                    radius: 1.0,
                    longitudes: 32,
                    latitudes: 32,
                }
            );
            assert_eq!(
                max.mesh,
                MeshRecipe::Sphere {
                    radius: 2.0,
                    longitudes: 32,
                    latitudes: 32,
                }
            );
            assert_eq!(min.size.width, min.size.height);
            assert!(approx(min.size.width, 1.0));
            assert!(approx(max.size.width, 1920.0 / 1080.0));
            assert_eq!(min.alpha_mode, AlphaMode::HolePunch);
            assert_eq!(max.shader, Some(HOLE_PUNCH_SHADER));
        }
    }

    #[test]
    fn panorama_uses_cubemap_then_cylinder() {
        let config = LayoutConfig::default();
        let info = media(Some(MediaShape::Panorama180));
        let min = select_layout(&info, DisplayState::Minimized, &config);
        let max = select_layout(&info, DisplayState::Maximized, &config);
        assert_eq!(min.mesh, MeshRecipe::Cubemap { size: 1.0 });
        assert_eq!(max.mesh, MeshRecipe::PANORAMA_CYLINDER);
        assert_eq!(max.fraction_of_screen, Some(0.1));
        assert!(approx(max.size.height, 2.0));
        assert!(max.mesh.generate(MaterialHandle(0)).is_none());
    }

    #[test]
    fn recipes_generate_expected_meshes() {
        let material = MaterialHandle(9);
        assert!(MeshRecipe::FlatPanel.generate(material).is_none());
        let cube = MeshRecipe::Cubemap { size: 2.0 }.generate(material).unwrap();
        assert_eq!(cube.vertex_count(), 24);
        let sphere = MeshRecipe::Sphere {
            radius: 1.0,
            longitudes: 8,
            latitudes: 4,
        }
        .generate(material)
        .unwrap();
        assert_eq!(sphere.vertex_count(), 45);
        assert_eq!(sphere.materials, vec![material]);
    }

    #[test]
    fn sphere_segments_come_from_config() {
        let config = LayoutConfig {
            sphere_segments: 8,
            ..LayoutConfig::default()
        };
        let layout = select_layout(&media(Some(MediaShape::Video360)), DisplayState::Maximized, &config);
        assert!(matches!(layout.mesh, MeshRecipe::Sphere { longitudes: 8, latitudes: 8, .. }));
    }

    #[test]
    fn menu_sits_below_panel() {
        let config = LayoutConfig::default();
        let spacing = 16.0 * 0.000254;

        let flat = menu_offset(&media(Some(MediaShape::Video2d)), &config);
        assert!(approx(flat.y, -0.5 - 0.05 - spacing));

        let panorama = menu_offset(&media(Some(MediaShape::Panorama180)), &config);
        assert!(approx(panorama.y, -1.0 - 0.05 - spacing));

        let sphere = menu_offset(&media(Some(MediaShape::Image360)), &config);
        assert!(approx(sphere.y, -1.0));

        let unknown = menu_offset(&MediaInfo::default(), &config);
        assert!(approx(unknown.y, -0.9));
        assert_eq!(unknown.x, 0.0);
    }
}
