//! Conversion of media pixel sizes into physical panel sizes.

use crate::{config::LayoutConfig, media::MediaInfo};
use serde::Serialize;

/// Density at which one density-independent pixel is one pixel.
const BASELINE_DPI: u32 = 160;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PixelSize {
    pub width: u32,
    pub height: u32,
}

/// Width and height in meters.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct PanelSize {
    pub width: f32,
    pub height: f32,
}

impl PixelSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub const fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

impl PanelSize {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn scaled(&self, factor: f32) -> Self {
        Self::new(self.width * factor, self.height * factor)
    }

    pub fn square_of_smaller_side(&self) -> Self {
        let side = self.width.min(self.height);
        Self::new(side, side)
    }
}

/// Scales `size` down to fit `max_resolution_px`. Sides never truncate to
/// zero; a collapsed side is raised to 1 and the other one capped.
pub fn normalize_for_max_resolution(size: PixelSize, max_resolution_px: u64) -> PixelSize {
    let resolution = size.area();
    if resolution <= max_resolution_px {
        return size;
    }

    let reduction_ratio = (max_resolution_px as f64 / resolution as f64).sqrt();
    let mut width = ((size.width as f64 * reduction_ratio) as u32).max(1);
    let mut height = ((size.height as f64 * reduction_ratio) as u32).max(1);
    let cap = |other: u32| (max_resolution_px / other as u64).min(u32::MAX as u64) as u32;
    if width as u64 * height as u64 > max_resolution_px {
        if width == 1 {
            height = cap(width);
        } else {
            width = cap(height);
        }
    }

    tracing::debug!(
        "Normalized {}x{} to {}x{}",
        size.width,
        size.height,
        width,
        height
    );
    PixelSize::new(width, height)
}

pub fn dp_to_px(dp: u32, dpi: u32) -> u32 {
    (dp as u64 * dpi as u64 / BASELINE_DPI as u64) as u32
}

/// `None` when either dimension is unknown or zero.
pub fn panel_dimensions_in_meters(
    width: Option<u32>,
    height: Option<u32>,
    config: &LayoutConfig,
) -> Option<PanelSize> {
    let width = width.filter(|&w| w > 0)?;
    let height = height.filter(|&h| h > 0)?;
    let pixels = normalize_for_max_resolution(PixelSize::new(width, height), config.max_resolution_px);
    let meters = PanelSize::new(
        pixels.width as f32 * config.pixels_to_meters,
        pixels.height as f32 * config.pixels_to_meters,
    );
    let offset = dp_to_px(config.spacing_offset_dp, config.dpi) as f32 * config.pixels_to_meters;

    let min = config.min_panel_meters;
    let meters = if meters.width >= min && meters.height >= min {
        meters
    } else {
        meters.scaled(min / meters.width.min(meters.height))
    };

    Some(PanelSize::new(meters.width + offset, meters.height + offset))
}

pub fn panel_size(media: &MediaInfo, config: &LayoutConfig) -> PanelSize {
    panel_dimensions_in_meters(media.width, media.height, config).unwrap_or_else(|| {
        let [width, height] = config.fallback_panel;
        PanelSize::new(width, height)
    })
}

/// Pixel size of the texture backing the panel.
pub fn texture_size(media: &MediaInfo, config: &LayoutConfig) -> PixelSize {
    if let Some(pixels) = media.pixel_size() {
        return normalize_for_max_resolution(pixels, config.max_resolution_px);
    }

    let panel = panel_size(media, config);
    let spacing = dp_to_px(config.spacing_offset_dp, config.dpi);
    let height_dp = (config.default_texture_dp as f32 * (panel.height / panel.width)) as u32;
    PixelSize::new(
        dp_to_px(config.default_texture_dp, config.dpi) + spacing,
        dp_to_px(height_dp + spacing, config.dpi),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAX: u64 = 20_000_000;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn within_budget_is_unchanged() {
        for (w, h) in [(1, 1), (1920, 1080), (5000, 4000), (20_000_000, 1), (4472, 4472)] {
            let size = PixelSize::new(w, h);
            assert_eq!(normalize_for_max_resolution(size, MAX), size);
        }
    }

    #[test]
    fn over_budget_scales_by_square_root() {
        let out = normalize_for_max_resolution(PixelSize::new(8000, 6000), MAX);
        assert!(out.width.abs_diff(5164) <= 1, "{:?}", out);
        assert!(out.height.abs_diff(3873) <= 1, "{:?}", out);
        assert!(out.area() <= MAX);
    }

    #[test]
    fn over_budget_keeps_aspect_ratio() {
        for (w, h) in [(8000, 6000), (16384, 8192), (10000, 3000), (7680, 7680), (60000, 1000)] {
            let out = normalize_for_max_resolution(PixelSize::new(w, h), MAX);
            assert!(out.area() <= MAX);
            let before = w as f64 / h as f64;
            let after = out.width as f64 / out.height as f64;
            // Truncation moves each side by less than one pixel.
            let tolerance = before * (1.0 / out.height as f64 + 1.0 / out.width as f64);
            assert!((before - after).abs() <= tolerance, "{}x{} -> {:?}", w, h, out);
        }
    }

    #[test]
    fn normalization_is_idempotent() {
        for (w, h) in [(8000, 6000), (100_000, 100_000), (12345, 6789)] {
            let once = normalize_for_max_resolution(PixelSize::new(w, h), MAX);
            assert_eq!(normalize_for_max_resolution(once, MAX), once);
        }
    }

    #[test]
    fn degenerate_aspect_never_collapses() {
        let out = normalize_for_max_resolution(PixelSize::new(1, 100_000_000), MAX);
        assert_eq!(out.width, 1);
        assert!(out.height > 0);
        assert!(out.area() <= MAX);

        let out = normalize_for_max_resolution(PixelSize::new(u32::MAX, 2), MAX);
        assert!(out.width > 0 && out.height > 0);
        assert!(out.area() <= MAX);
    }

    #[test]
    fn unknown_dimension_gives_none() {
        let config = LayoutConfig::default();
        assert_eq!(panel_dimensions_in_meters(None, Some(100), &config), None);
        assert_eq!(panel_dimensions_in_meters(Some(100), None, &config), None);
        assert_eq!(panel_dimensions_in_meters(Some(0), Some(100), &config), None);
    }

    #[test]
    fn large_media_keeps_meter_size() {
        let config = LayoutConfig::default();
        let size = panel_dimensions_in_meters(Some(8000), Some(8000), &config).unwrap();
        let pixels = normalize_for_max_resolution(PixelSize::new(8000, 8000), MAX);
        assert_eq!(pixels, PixelSize::new(4472, 4472));
        assert!(approx(size.width, pixels.width as f32 * 0.000254));
        assert!(approx(size.height, pixels.height as f32 * 0.000254));
        assert!(size.width >= 1.0 && size.height >= 1.0);
    }

    #[test]
    fn small_media_grows_smaller_side_to_minimum() {
        let config = LayoutConfig::default();
        let size = panel_dimensions_in_meters(Some(1920), Some(1080), &config).unwrap();
        assert!(approx(size.height, 1.0));
        assert!(approx(size.width, 1920.0 / 1080.0));

        let portrait = panel_dimensions_in_meters(Some(1080), Some(1920), &config).unwrap();
        assert!(approx(portrait.width, 1.0));
        assert!(approx(portrait.height, 1920.0 / 1080.0));
    }

    #[test]
    fn one_side_below_minimum_rescales_both() {
        let config = LayoutConfig::default();
        // 5000 px = 1.27 m, 2000 px = 0.508 m
        let size = panel_dimensions_in_meters(Some(5000), Some(2000), &config).unwrap();
        assert!(approx(size.height, 1.0));
        assert!(approx(size.width, 2.5));
    }

    #[test]
    fn spacing_offset_added_after_scaling() {
        let config = LayoutConfig {
            spacing_offset_dp: 100,
            dpi: 320,
            ..LayoutConfig::default()
        };
        assert_eq!(dp_to_px(100, 320), 200);
        let offset = 200.0 * 0.000254;
        let size = panel_dimensions_in_meters(Some(1000), Some(1000), &config).unwrap();
        assert!(approx(size.width, 1.0 + offset));
        assert!(approx(size.height, 1.0 + offset));
    }

    #[test]
    fn unknown_media_uses_fallbacks() {
        let config = LayoutConfig::default();
        let media = MediaInfo::default();
        assert_eq!(panel_size(&media, &config), PanelSize::new(1.2, 0.9));
        let texture = texture_size(&media, &config);
        assert_eq!(texture.width, 1280);
        assert!(texture.height.abs_diff(960) <= 1, "{:?}", texture);

        let known = MediaInfo {
            width: Some(8000),
            height: Some(6000),
            ..MediaInfo::default()
        };
        assert_eq!(
            texture_size(&known, &config),
            normalize_for_max_resolution(PixelSize::new(8000, 6000), MAX)
        );
    }
}
