use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// Tunables of panel sizing. Every field has a default, so a config file only
/// needs to name what it overrides.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Pixel budget a media texture is scaled down to fit.
    pub max_resolution_px: u64,
    pub pixels_to_meters: f32,
    /// Smallest physical panel side in meters.
    pub min_panel_meters: f32,
    pub spacing_offset_dp: u32,
    pub dpi: u32,
    pub default_texture_dp: u32,
    /// Panel size in meters used when the media dimensions are unknown.
    pub fallback_panel: [f32; 2],
    pub medium_spacing_dp: u32,
    pub menu_height: f32,
    pub sphere_segments: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            max_resolution_px: 20 * 1000 * 1000,
            pixels_to_meters: 0.0254 / 100.0,
            min_panel_meters: 1.0,
            spacing_offset_dp: 0,
            dpi: 160,
            default_texture_dp: 1280,
            fallback_panel: [1.2, 0.9],
            medium_spacing_dp: 16,
            menu_height: 0.1,
            sphere_segments: 32,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config value '{field}': {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

impl LayoutConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let file_contents = fs::read_to_string(path)?;
        Self::from_json_str(&file_contents)
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        tracing::debug!("Loaded layout config {:?}", config);
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field, reason| Err(ConfigError::Invalid { field, reason });
        if self.max_resolution_px == 0 {
            return invalid("max_resolution_px", "must be positive");
        }
        if !(self.pixels_to_meters > 0.0) {
            return invalid("pixels_to_meters", "must be positive");
        }
        if !(self.min_panel_meters > 0.0) {
            return invalid("min_panel_meters", "must be positive");
        }
        if self.dpi == 0 {
            return invalid("dpi", "must be positive");
        }
        if self.fallback_panel.iter().any(|&side| !(side > 0.0)) {
            return invalid("fallback_panel", "sides must be positive");
        }
        if self.sphere_segments == 0 {
            return invalid("sphere_segments", "must be at least 1");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_object_gives_defaults() {
        let config = LayoutConfig::from_json_str("{}").unwrap();
        assert_eq!(config, LayoutConfig::default());
        assert_eq!(config.max_resolution_px, 20_000_000);
    }

    #[test]
    fn partial_override() {
        let config =
            LayoutConfig::from_json_str(r#"{ "dpi": 320, "fallback_panel": [2.0, 1.0] }"#).unwrap();
        assert_eq!(config.dpi, 320);
        assert_eq!(config.fallback_panel, [2.0, 1.0]);
        assert_eq!(config.sphere_segments, 32);
    }

    #[test]
    fn rejects_invalid_values() {
        let err = LayoutConfig::from_json_str(r#"{ "min_panel_meters": 0.0 }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "min_panel_meters",
                ..
            }
        ));
        assert!(matches!(
            LayoutConfig::from_json_str(r#"{ "dpi": "high" }"#),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "max_resolution_px": 1000 }}"#).unwrap();
        let config = LayoutConfig::load(file.path()).unwrap();
        assert_eq!(config.max_resolution_px, 1000);

        assert!(matches!(
            LayoutConfig::load(file.path().with_extension("missing")),
            Err(ConfigError::Io(_))
        ));
    }
}
