//! Named stops along the journey.
//!
//! Waypoints are created once at startup, either from JSON records or from
//! the built-in catalogue in [`crate::catalog`], and never change afterwards.

use std::collections::HashSet;
use std::fmt;

use serde::Deserialize;

use crate::error::{ConfigError, Result};
use crate::math::Point3;

/// An sRGB display colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses a `#RRGGBB` hex string.
    #[must_use]
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#')?;
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// One named stop along the journey.
#[derive(Debug, Clone, PartialEq)]
pub struct Waypoint {
    name: String,
    position: Point3,
    scale: f64,
    color: Color,
    description: String,
}

impl Waypoint {
    /// Creates a new waypoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank, the position is not finite, or
    /// the scale is not a positive finite number.
    pub fn new(
        name: impl Into<String>,
        position: Point3,
        scale: f64,
        color: Color,
        description: impl Into<String>,
    ) -> Result<Self> {
        let name = name.into();
        let invalid = |reason: &str| ConfigError::InvalidWaypoint {
            name: name.clone(),
            reason: reason.to_string(),
        };

        if name.trim().is_empty() {
            return Err(invalid("name must not be blank").into());
        }
        if !position.coords.iter().all(|c| c.is_finite()) {
            return Err(invalid("position must be finite").into());
        }
        if !(scale.is_finite() && scale > 0.0) {
            return Err(invalid("scale must be positive").into());
        }

        Ok(Self {
            name,
            position,
            scale,
            color,
            description: description.into(),
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn position(&self) -> &Point3 {
        &self.position
    }

    #[must_use]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    #[must_use]
    pub fn color(&self) -> Color {
        self.color
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }
}

/// A waypoint record as it appears in configuration files.
#[derive(Debug, Clone, Deserialize)]
pub struct WaypointSpec {
    pub name: String,
    pub position: [f64; 3],
    pub scale: f64,
    pub color: String,
    #[serde(alias = "info", default)]
    pub description: String,
}

impl TryFrom<WaypointSpec> for Waypoint {
    type Error = crate::error::StarpathError;

    fn try_from(spec: WaypointSpec) -> Result<Self> {
        let color = Color::from_hex(&spec.color).ok_or_else(|| ConfigError::InvalidWaypoint {
            name: spec.name.clone(),
            reason: format!("color {:?} is not #RRGGBB", spec.color),
        })?;
        let [x, y, z] = spec.position;
        Waypoint::new(spec.name, Point3::new(x, y, z), spec.scale, color, spec.description)
    }
}

/// Validates a list of waypoint records, in travel order.
///
/// # Errors
///
/// Returns an error if any record is invalid or two records share a name.
pub fn from_specs(specs: Vec<WaypointSpec>) -> Result<Vec<Waypoint>> {
    let mut seen = HashSet::new();
    let mut waypoints = Vec::with_capacity(specs.len());
    for spec in specs {
        if !seen.insert(spec.name.clone()) {
            return Err(ConfigError::DuplicateName(spec.name).into());
        }
        waypoints.push(Waypoint::try_from(spec)?);
    }
    Ok(waypoints)
}

/// Parses a JSON array of waypoint records.
///
/// # Errors
///
/// Returns an error if the JSON is malformed or any record is invalid.
pub fn load_json(json: &str) -> Result<Vec<Waypoint>> {
    let specs: Vec<WaypointSpec> = serde_json::from_str(json).map_err(ConfigError::from)?;
    from_specs(specs)
}
