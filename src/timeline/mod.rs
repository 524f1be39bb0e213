//! Progress-driven choreography.
//!
//! [`TimelineDriver`] turns a normalized progress value into a smoothed agent
//! pose, waypoint-crossing events and a warp intensity, once per frame.

mod driver;
mod event;

pub use driver::{DriverConfig, DriverState, Frame, TimelineDriver};
pub use event::TimelineEvent;

/// Fraction of the remaining distance the agent covers each frame.
pub const DEFAULT_SMOOTHING: f64 = 0.08;

/// Progress at which the terminal warp band begins.
pub const DEFAULT_THRESHOLD_START: f64 = 0.85;

/// Extra scale a waypoint gains when the journey is right on top of it.
pub const APPROACH_BOOST: f64 = 0.3;

/// How fast the approach boost falls off with progress distance; the boost
/// is gone `1 / APPROACH_FALLOFF` away from the waypoint.
pub const APPROACH_FALLOFF: f64 = 10.0;
