//! Scene configuration.
//!
//! Every section is optional in JSON; missing fields take their defaults.

use serde::Deserialize;

use crate::camera::CameraConfig;
use crate::error::{ConfigError, Result};
use crate::geometry::{PathConfig, MAX_SAMPLES_PER_SEGMENT};
use crate::timeline::DriverConfig;

/// Configuration for one mounted [`crate::scene::Scene`].
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub driver: DriverConfig,
    pub camera: CameraConfig,
    pub path: PathConfig,
    /// Seed for the camera shake; drawn from the OS when absent.
    pub shake_seed: Option<u64>,
}

impl SceneConfig {
    /// Parses and validates a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON or
    /// [`ConfigError::InvalidValue`] for out-of-range values.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(ConfigError::from)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every section.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError::InvalidValue`] found.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        self.driver.validate()?;
        self.camera.validate()?;
        let samples = self.path.samples_per_segment;
        if !(1..=MAX_SAMPLES_PER_SEGMENT).contains(&samples) {
            return Err(ConfigError::InvalidValue {
                field: "path.samples_per_segment",
                reason: format!("{samples} is not in [1, {MAX_SAMPLES_PER_SEGMENT}]"),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::StarpathError;
    use approx::assert_relative_eq;

    #[test]
    fn empty_object_gives_defaults() {
        let config = SceneConfig::from_json("{}").unwrap();
        assert_eq!(config, SceneConfig::default());
        assert_relative_eq!(config.driver.smoothing, 0.08);
        assert_relative_eq!(config.driver.threshold_start, 0.85);
        assert_relative_eq!(config.camera.smoothing, 0.05);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let json = r#"{
            "driver": { "threshold_start": 0.9 },
            "camera": { "offset": [0, 2, 6] },
            "path": { "entry": [-1, 0, 0] },
            "shake_seed": 42
        }"#;
        let config = SceneConfig::from_json(json).unwrap();
        assert_relative_eq!(config.driver.threshold_start, 0.9);
        assert_relative_eq!(config.driver.smoothing, 0.08);
        assert_eq!(config.camera.offset, [0.0, 2.0, 6.0]);
        assert_eq!(config.camera.look_offset, [0.0, 0.0, -5.0]);
        assert_eq!(config.path.entry, Some([-1.0, 0.0, 0.0]));
        assert_eq!(config.path.exit, None);
        assert_eq!(config.shake_seed, Some(42));
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let err = SceneConfig::from_json(r#"{"camera": {"smoothing": 0}}"#).unwrap_err();
        assert!(matches!(
            err,
            StarpathError::Config(ConfigError::InvalidValue { field: "camera.smoothing", .. })
        ));
        let err = SceneConfig::from_json(r#"{"path": {"samples_per_segment": 0}}"#).unwrap_err();
        assert!(matches!(err, StarpathError::Config(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn huge_sample_counts_are_rejected() {
        for json in [
            r#"{"path": {"samples_per_segment": 4097}}"#,
            r#"{"path": {"samples_per_segment": 9223372036854775807}}"#,
        ] {
            let err = SceneConfig::from_json(json).unwrap_err();
            assert!(
                matches!(
                    err,
                    StarpathError::Config(ConfigError::InvalidValue {
                        field: "path.samples_per_segment",
                        ..
                    })
                ),
                "{json}"
            );
        }
        assert!(SceneConfig::from_json(r#"{"path": {"samples_per_segment": 4096}}"#).is_ok());
    }
}
