use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::remap::RangeMap;

/// Errors from loading or validating animator configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("source range [{source_min}, {source_max}] must be finite and increasing")]
    DegenerateRange { source_min: f32, source_max: f32 },
    #[error("angle step `{name}` is not finite: {value}")]
    NonFiniteStep { name: &'static str, value: f32 },
}

/// How accumulated rotation angles are kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AngleMode {
    /// Angles grow without bound.
    #[default]
    Unbounded,
    /// Angles are reduced into `[0, 2π)` after every increment.
    Wrapped,
}

/// Tunables for the per-frame animator.
///
/// Every field has a default, so a JSON file only needs the keys it changes:
///
/// ```json
/// { "propeller_step": 0.5, "angle_mode": "wrapped" }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimatorConfig {
    /// Pointer y to airplane y.
    pub vertical: RangeMap,
    /// Pointer x to airplane x.
    pub horizontal: RangeMap,
    /// Radians per frame.
    pub propeller_step: f32,
    pub sea_step: f32,
    pub sky_step: f32,
    pub angle_mode: AngleMode,
}

impl Default for AnimatorConfig {
    fn default() -> Self {
        Self {
            vertical: RangeMap {
                source_min: -0.75,
                source_max: 0.75,
                target_min: 25.0,
                target_max: 175.0,
            },
            horizontal: RangeMap {
                source_min: -0.75,
                source_max: 0.75,
                target_min: -100.0,
                target_max: 100.0,
            },
            propeller_step: 0.3,
            sea_step: 0.005,
            sky_step: 0.01,
            angle_mode: AngleMode::Unbounded,
        }
    }
}

impl AnimatorConfig {
    /// Read a JSON config file and validate it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json(&text)?;
        tracing::info!(path = %path.display(), "loaded animator config");
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.vertical.validate()?;
        self.horizontal.validate()?;
        for (name, value) in [
            ("propeller_step", self.propeller_step),
            ("sea_step", self.sea_step),
            ("sky_step", self.sky_step),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NonFiniteStep { name, value });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let c = AnimatorConfig::default();
        assert!(c.validate().is_ok());
        assert_eq!(c.propeller_step, 0.3);
        assert_eq!(c.angle_mode, AngleMode::Unbounded);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let c = AnimatorConfig::from_json(r#"{ "sky_step": 0.02, "angle_mode": "wrapped" }"#)
            .unwrap();
        assert_eq!(c.sky_step, 0.02);
        assert_eq!(c.angle_mode, AngleMode::Wrapped);
        assert_eq!(c.sea_step, 0.005);
        assert_eq!(c.vertical, AnimatorConfig::default().vertical);
    }

    #[test]
    fn degenerate_range_is_rejected() {
        let json = r#"{ "vertical": { "source_min": 1.0, "source_max": 1.0,
                                      "target_min": 0.0, "target_max": 1.0 } }"#;
        assert!(matches!(
            AnimatorConfig::from_json(json),
            Err(ConfigError::DegenerateRange { .. })
        ));
    }

    #[test]
    fn non_finite_step_is_rejected() {
        let c = AnimatorConfig {
            sea_step: f32::NAN,
            ..AnimatorConfig::default()
        };
        assert!(matches!(
            c.validate(),
            Err(ConfigError::NonFiniteStep { name: "sea_step", .. })
        ));
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            AnimatorConfig::from_json("{ not json"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "propeller_step": 0.5 }}"#).unwrap();
        let c = AnimatorConfig::load(file.path()).unwrap();
        assert_eq!(c.propeller_step, 0.5);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = AnimatorConfig::load(dir.path().join("missing.json"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
