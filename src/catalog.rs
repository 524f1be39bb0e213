//! The built-in solar-system journey.

use crate::error::Result;
use crate::geometry::Path;
use crate::math::Point3;
use crate::waypoint::{Color, Waypoint};

/// Where the ship starts, behind the Sun.
pub const ENTRY: [f64; 3] = [-20.0, 5.0, 15.0];

/// Where the ship heads after the last stop.
pub const EXIT: [f64; 3] = [540.0, 8.0, 15.0];

/// `(name, x, scale, colour, description)` in travel order.
#[rustfmt::skip]
const PLANETS: [(&str, f64, f64, Color, &str); 10] = [
    ("Sun", 0.0, 12.0, Color::rgb(0xFD, 0xB8, 0x13), "The heart of our solar system. Your journey begins here!"),
    ("Mercury", 60.0, 2.0, Color::rgb(0x8C, 0x78, 0x53), "Closest to the Sun, with a fast and hot orbit."),
    ("Venus", 100.0, 2.5, Color::rgb(0xFF, 0xC6, 0x49), "The hottest planet. A thick atmosphere traps the heat."),
    ("Earth", 140.0, 2.8, Color::rgb(0x6B, 0x93, 0xD6), "Our beautiful home planet, perfect for life."),
    ("Mars", 180.0, 2.2, Color::rgb(0xCD, 0x5C, 0x5C), "The red planet and a future human destination."),
    ("Jupiter", 240.0, 8.0, Color::rgb(0xD8, 0xCA, 0x9D), "Gas giant with the Great Red Spot storm."),
    ("Saturn", 300.0, 7.0, Color::rgb(0xFA, 0xD5, 0xA5), "The ringed planet, its rings made of ice and rock."),
    ("Uranus", 360.0, 4.0, Color::rgb(0x4F, 0xD0, 0xE7), "Ice giant rotating on its side."),
    ("Neptune", 420.0, 4.0, Color::rgb(0x4B, 0x70, 0xDD), "Windiest planet, with supersonic wind speeds."),
    ("Pluto", 480.0, 1.5, Color::rgb(0xC4, 0xA4, 0x84), "Dwarf planet at the edge. Journey complete!"),
];

/// The ten stops from the Sun to Pluto, laid out along +X.
///
/// # Errors
///
/// Never fails for the built-in table; the `Result` carries waypoint
/// validation through.
pub fn solar_system() -> Result<Vec<Waypoint>> {
    PLANETS
        .iter()
        .map(|&(name, x, scale, color, description)| {
            Waypoint::new(name, Point3::new(x, 0.0, 0.0), scale, color, description)
        })
        .collect()
}

/// Flies above and in front of each planet, bobbing gently so the ship
/// does not travel a dead-straight line.
#[must_use]
pub fn flyby(index: usize, waypoint: &Waypoint) -> Point3 {
    #[allow(clippy::cast_precision_loss)]
    let bob = (index as f64 * 0.5).sin() * 3.0;
    Point3::new(waypoint.position().x, bob + 3.0, 10.0)
}

/// The solar-system journey path, using the fly-by route.
///
/// # Errors
///
/// Propagates path construction errors.
pub fn solar_path() -> Result<Path> {
    Path::builder(solar_system()?)
        .entry(Point3::from(ENTRY))
        .exit(Point3::from(EXIT))
        .route(flyby)
        .build()
}
