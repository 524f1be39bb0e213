//! Chase camera trailing the agent.
//!
//! The rig derives its pose from the agent's smoothed pose, never from raw
//! progress, and lags it by a second, slower smoothing stage.

use rand::Rng;
use serde::Deserialize;

use crate::error::{ConfigError, GeometryError, Result};
use crate::math::{lerp_point, Point3, UnitQuaternion, Vector3, TOLERANCE};

/// Tuning for a [`CameraRig`].
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Camera offset in the agent's local frame (`-Z` is forward).
    pub offset: [f64; 3],
    /// Look-at offset in the agent's local frame.
    pub look_offset: [f64; 3],
    /// Camera position smoothing factor, in `(0, 1)`.
    pub smoothing: f64,
    /// Vertical field of view outside the warp band, in degrees.
    pub base_fov: f64,
    /// Extra field of view at full warp intensity, in degrees.
    pub warp_fov: f64,
    /// Peak-to-peak shake amplitude on X and Y at full warp intensity.
    pub shake: [f64; 2],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            offset: [0.0, 5.0, 10.0],
            look_offset: [0.0, 0.0, -5.0],
            smoothing: 0.05,
            base_fov: 75.0,
            warp_fov: 40.0,
            shake: [0.5, 0.3],
        }
    }
}

impl CameraConfig {
    /// Checks the configured values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if a value is out of range.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if !(self.smoothing > 0.0 && self.smoothing < 1.0) {
            return Err(ConfigError::InvalidValue {
                field: "camera.smoothing",
                reason: format!("{} is not in (0, 1)", self.smoothing),
            });
        }
        if !(self.base_fov > 0.0 && self.base_fov + self.warp_fov.max(0.0) < 180.0) {
            return Err(ConfigError::InvalidValue {
                field: "camera.base_fov",
                reason: "field of view must stay within (0, 180) degrees".into(),
            });
        }
        Ok(())
    }
}

/// Where the camera is and what it looks at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Point3,
    pub look_at: Point3,
    /// Vertical field of view in degrees.
    pub fov_degrees: f64,
}

impl CameraPose {
    /// Adds warp shake: uniform jitter of up to half the configured
    /// amplitude on X and Y, scaled by `intensity`.
    #[must_use]
    pub fn shaken(mut self, amplitude: [f64; 2], intensity: f64, rng: &mut impl Rng) -> Self {
        if intensity <= 0.0 {
            return self;
        }
        self.position.x += (rng.random::<f64>() - 0.5) * intensity * amplitude[0];
        self.position.y += (rng.random::<f64>() - 0.5) * intensity * amplitude[1];
        self
    }
}

/// Smoothed chase camera.
#[derive(Debug, Clone)]
pub struct CameraRig {
    config: CameraConfig,
    offset: Vector3,
    look_offset: Vector3,
    position: Option<Point3>,
}

impl CameraRig {
    /// Creates a rig.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::ZeroVector`] if the camera offset has zero
    /// length, since the camera would sit inside the agent, or a config
    /// error for out-of-range values.
    pub fn new(config: CameraConfig) -> Result<Self> {
        config.validate()?;
        let offset = Vector3::from(config.offset);
        if offset.norm() < TOLERANCE || !offset.iter().all(|c| c.is_finite()) {
            return Err(GeometryError::ZeroVector.into());
        }
        Ok(Self {
            config,
            offset,
            look_offset: Vector3::from(config.look_offset),
            position: None,
        })
    }

    #[must_use]
    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    /// Current camera position, `None` before the first update.
    #[must_use]
    pub fn position(&self) -> Option<&Point3> {
        self.position.as_ref()
    }

    /// Pose the camera is heading toward for the given agent pose.
    #[must_use]
    pub fn ideal(&self, agent: &Point3, orientation: &UnitQuaternion) -> (Point3, Point3) {
        (agent + orientation * self.offset, agent + orientation * self.look_offset)
    }

    /// Advances one frame. The first update snaps to the ideal pose.
    pub fn update(
        &mut self,
        agent: &Point3,
        orientation: &UnitQuaternion,
        warp_intensity: f64,
    ) -> CameraPose {
        let (ideal_position, look_at) = self.ideal(agent, orientation);

        let mut position = match self.position {
            Some(current) => lerp_point(&current, &ideal_position, self.config.smoothing),
            None => ideal_position,
        };
        // Never collapse onto the agent: the look-at would degenerate.
        if (position - agent).norm() < TOLERANCE {
            position = ideal_position;
        }
        self.position = Some(position);

        CameraPose {
            position,
            look_at,
            fov_degrees: self.config.base_fov
                + warp_intensity.clamp(0.0, 1.0) * self.config.warp_fov,
        }
    }

    /// Forgets the current position so the next update snaps again.
    pub fn reset(&mut self) {
        self.position = None;
    }
}
