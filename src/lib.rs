pub mod camera;
pub mod catalog;
pub mod config;
pub mod cue;
pub mod error;
pub mod geometry;
pub mod icon;
pub mod math;
pub mod scene;
pub mod session;
pub mod timeline;
pub mod waypoint;

pub use error::{Result, StarpathError};
