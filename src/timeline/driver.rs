use serde::Deserialize;

use crate::error::{ConfigError, Result};
use crate::geometry::Path;
use crate::math::{lerp_point, look_rotation, Point3, UnitQuaternion, Vector3};

use super::{
    TimelineEvent, APPROACH_BOOST, APPROACH_FALLOFF, DEFAULT_SMOOTHING, DEFAULT_THRESHOLD_START,
};

/// Tuning for a [`TimelineDriver`].
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Exponential smoothing factor applied to the agent position, in `(0, 1)`.
    pub smoothing: f64,
    /// Progress at which the warp band begins, in `[0, 1)`.
    pub threshold_start: f64,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            smoothing: DEFAULT_SMOOTHING,
            threshold_start: DEFAULT_THRESHOLD_START,
        }
    }
}

impl DriverConfig {
    /// Checks the configured values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if a value is out of range.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if !(self.smoothing > 0.0 && self.smoothing < 1.0) {
            return Err(ConfigError::InvalidValue {
                field: "driver.smoothing",
                reason: format!("{} is not in (0, 1)", self.smoothing),
            });
        }
        if !(0.0..1.0).contains(&self.threshold_start) {
            return Err(ConfigError::InvalidValue {
                field: "driver.threshold_start",
                reason: format!("{} is not in [0, 1)", self.threshold_start),
            });
        }
        Ok(())
    }

    /// Intensity of the warp band at `progress`: 0 below the band, rising
    /// linearly to 1 at the end of the journey.
    #[must_use]
    pub fn threshold_intensity(&self, progress: f64) -> f64 {
        ((progress - self.threshold_start) / (1.0 - self.threshold_start)).clamp(0.0, 1.0)
    }
}

/// Per-session state of a [`TimelineDriver`].
///
/// Only the driver mutates this; everything else reads it.
#[derive(Debug, Clone, PartialEq)]
pub struct DriverState {
    current_position: Point3,
    last_waypoint_index: Option<usize>,
    in_threshold_region: bool,
}

impl DriverState {
    fn new(start: Point3) -> Self {
        Self {
            current_position: start,
            last_waypoint_index: None,
            in_threshold_region: false,
        }
    }

    /// Smoothed agent position.
    #[must_use]
    pub fn current_position(&self) -> &Point3 {
        &self.current_position
    }

    /// Most recently crossed waypoint, `None` before the first frame.
    #[must_use]
    pub fn last_waypoint_index(&self) -> Option<usize> {
        self.last_waypoint_index
    }

    #[must_use]
    pub fn is_in_threshold_region(&self) -> bool {
        self.in_threshold_region
    }
}

/// Everything the host needs after one [`TimelineDriver::update`].
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// The progress value this frame was computed from.
    pub progress: f64,
    /// Unsmoothed point on the path at `progress`.
    pub target: Point3,
    /// Smoothed agent position.
    pub position: Point3,
    /// Unit direction of travel at `progress`.
    pub tangent: Vector3,
    /// Agent orientation; local `-Z` follows `tangent`.
    pub orientation: UnitQuaternion,
    /// Waypoint index for `progress`, in `[0, N - 1]`.
    pub waypoint_index: usize,
    /// Warp band intensity in `[0, 1]`.
    pub threshold_intensity: f64,
    /// Per-waypoint scale boost in `[0, APPROACH_BOOST]`, indexed like
    /// [`Path::waypoints`]. Renderers scale each waypoint by `1 + boost`.
    pub approach_boosts: Vec<f64>,
    /// Events raised this frame: at most one crossing, then at most one
    /// threshold edge.
    pub events: Vec<TimelineEvent>,
}

/// Converts progress into agent motion and edge-triggered events.
///
/// Single writer: the host's frame loop calls [`TimelineDriver::update`]
/// once per rendered frame. Progress may move in either direction.
#[derive(Debug, Clone)]
pub struct TimelineDriver {
    path: Path,
    config: DriverConfig,
    state: DriverState,
}

impl TimelineDriver {
    /// Creates a driver over `path`. The agent starts at the beginning of
    /// the path.
    ///
    /// # Errors
    ///
    /// Returns a config error if `config` is invalid. A [`Path`] always has
    /// at least one waypoint and a non-degenerate curve; empty or collapsed
    /// paths are already refused by [`crate::geometry::PathBuilder::build`].
    pub fn new(path: Path, config: DriverConfig) -> Result<Self> {
        config.validate()?;
        let start = path.point_at(0.0)?;
        Ok(Self {
            path,
            config,
            state: DriverState::new(start),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    #[must_use]
    pub fn state(&self) -> &DriverState {
        &self.state
    }

    /// Waypoint index for `progress`: `floor(progress * (N - 1))`, clamped.
    #[must_use]
    pub fn waypoint_index(&self, progress: f64) -> usize {
        let last = self.path.waypoint_count() - 1;
        #[allow(clippy::cast_precision_loss)]
        let raw = (progress * last as f64).floor();
        if raw <= 0.0 {
            0
        } else {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let index = raw as usize;
            index.min(last)
        }
    }

    /// Scale boost of waypoint `index` at `progress`: peaks at
    /// [`APPROACH_BOOST`] when `progress == index / N` and falls off linearly
    /// to zero `1 / APPROACH_FALLOFF` either side.
    #[must_use]
    pub fn approach_boost(&self, index: usize, progress: f64) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        let center = index as f64 / self.path.waypoint_count() as f64;
        (1.0 - (progress - center).abs() * APPROACH_FALLOFF).max(0.0) * APPROACH_BOOST
    }

    /// Advances one frame.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::GeometryError::ParameterOutOfRange`] if
    /// `progress` is outside `[0, 1]`. The state is left untouched in that case.
    pub fn update(&mut self, progress: f64) -> Result<Frame> {
        let target = self.path.point_at(progress)?;
        let tangent = self.path.tangent_at(progress)?;
        let orientation = look_rotation(&tangent);

        self.state.current_position =
            lerp_point(&self.state.current_position, &target, self.config.smoothing);

        let mut events = Vec::new();

        let index = self.waypoint_index(progress);
        if self.state.last_waypoint_index != Some(index) {
            let event = if index == self.path.waypoint_count() - 1 {
                tracing::info!("[driver] journey complete at waypoint {index}");
                TimelineEvent::JourneyComplete { index }
            } else {
                tracing::debug!(
                    "[driver] crossed waypoint {index} (previous {:?})",
                    self.state.last_waypoint_index
                );
                TimelineEvent::WaypointCrossed { index }
            };
            events.push(event);
            self.state.last_waypoint_index = Some(index);
        }

        let threshold_intensity = self.config.threshold_intensity(progress);
        let in_region = threshold_intensity > 0.0;
        if in_region != self.state.in_threshold_region {
            self.state.in_threshold_region = in_region;
            if in_region {
                tracing::debug!("[driver] entered warp band at progress {progress:.3}");
                events.push(TimelineEvent::ThresholdEntered);
            } else {
                tracing::debug!("[driver] left warp band at progress {progress:.3}");
                events.push(TimelineEvent::ThresholdExited);
            }
        }

        Ok(Frame {
            progress,
            target,
            position: self.state.current_position,
            tangent,
            orientation,
            waypoint_index: index,
            threshold_intensity,
            approach_boosts: (0..self.path.waypoint_count())
                .map(|i| self.approach_boost(i, progress))
                .collect(),
            events,
        })
    }

    /// Restarts the session: agent back at the start, no waypoint crossed,
    /// outside the warp band.
    ///
    /// # Errors
    ///
    /// Only fails if the path cannot be evaluated at its start, which a built
    /// path always can.
    pub fn reset(&mut self) -> Result<()> {
        self.state = DriverState::new(self.path.point_at(0.0)?);
        Ok(())
    }
}
