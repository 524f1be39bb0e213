use serde::Deserialize;

use crate::error::{GeometryError, PathError, Result};
use crate::math::{look_rotation, Point3, UnitQuaternion, Vector3, TOLERANCE};
use crate::waypoint::Waypoint;

use super::arc_length::ArcLengthTable;
use super::curve::{CatmullRom, Curve};

/// Default arc-length samples per spline segment.
pub const DEFAULT_SAMPLES_PER_SEGMENT: usize = 64;

/// Upper bound on arc-length samples per spline segment.
pub const MAX_SAMPLES_PER_SEGMENT: usize = 4096;

/// Step used when the analytic tangent degenerates and a chord is used instead.
const CHORD_STEP: f64 = 1e-4;

/// Build options for a [`Path`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PathConfig {
    /// Synthetic point before the first waypoint. Reflected from the first
    /// two waypoints when absent.
    pub entry: Option<[f64; 3]>,
    /// Synthetic point after the last waypoint. Reflected from the last two
    /// waypoints when absent.
    pub exit: Option<[f64; 3]>,
    /// Arc-length samples per spline segment.
    pub samples_per_segment: usize,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            entry: None,
            exit: None,
            samples_per_segment: DEFAULT_SAMPLES_PER_SEGMENT,
        }
    }
}

/// Maps a waypoint (and its index) to the point the path actually passes.
///
/// The identity route threads the curve through each waypoint's position;
/// a fly-by route can pass above or beside it instead.
pub type Route = fn(usize, &Waypoint) -> Point3;

/// Builder for [`Path`].
#[derive(Debug, Clone)]
pub struct PathBuilder {
    waypoints: Vec<Waypoint>,
    entry: Option<Point3>,
    exit: Option<Point3>,
    route: Option<Route>,
    samples_per_segment: usize,
}

impl PathBuilder {
    #[must_use]
    pub fn new(waypoints: Vec<Waypoint>) -> Self {
        Self {
            waypoints,
            entry: None,
            exit: None,
            route: None,
            samples_per_segment: DEFAULT_SAMPLES_PER_SEGMENT,
        }
    }

    /// Applies the options from a [`PathConfig`].
    #[must_use]
    pub fn config(mut self, config: &PathConfig) -> Self {
        self.entry = config.entry.map(Point3::from);
        self.exit = config.exit.map(Point3::from);
        self.samples_per_segment = config.samples_per_segment;
        self
    }

    #[must_use]
    pub fn entry(mut self, entry: Point3) -> Self {
        self.entry = Some(entry);
        self
    }

    #[must_use]
    pub fn exit(mut self, exit: Point3) -> Self {
        self.exit = Some(exit);
        self
    }

    #[must_use]
    pub fn route(mut self, route: Route) -> Self {
        self.route = Some(route);
        self
    }

    #[must_use]
    pub fn samples_per_segment(mut self, samples: usize) -> Self {
        self.samples_per_segment = samples;
        self
    }

    /// Builds the path.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::InvalidPath`] if there are no waypoints, two
    /// consecutive route points coincide, a single waypoint is given without
    /// explicit entry and exit points, or the sample count is zero or above
    /// [`MAX_SAMPLES_PER_SEGMENT`].
    pub fn build(self) -> Result<Path> {
        if self.waypoints.is_empty() {
            return Err(PathError::InvalidPath("no waypoints".into()).into());
        }
        if !(1..=MAX_SAMPLES_PER_SEGMENT).contains(&self.samples_per_segment) {
            return Err(PathError::InvalidPath(format!(
                "samples per segment must be in [1, {MAX_SAMPLES_PER_SEGMENT}], got {}",
                self.samples_per_segment
            ))
            .into());
        }

        let knots: Vec<Point3> = self
            .waypoints
            .iter()
            .enumerate()
            .map(|(i, w)| self.route.map_or(*w.position(), |route| route(i, w)))
            .collect();

        let n = knots.len();
        let (entry, exit) = match (self.entry, self.exit) {
            (Some(entry), Some(exit)) => (entry, exit),
            _ if n < 2 => {
                return Err(PathError::InvalidPath(
                    "a single waypoint needs explicit entry and exit points".into(),
                )
                .into())
            }
            (entry, exit) => (
                entry.unwrap_or_else(|| reflect(&knots[0], &knots[1])),
                exit.unwrap_or_else(|| reflect(&knots[n - 1], &knots[n - 2])),
            ),
        };

        // The traversed span: waypoints only, or entry→waypoint→exit when
        // there is a single stop.
        let controls = if let [only] = knots.as_slice() {
            vec![reflect(&entry, only), entry, *only, exit, reflect(&exit, only)]
        } else {
            let mut controls = Vec::with_capacity(knots.len() + 2);
            controls.push(entry);
            controls.extend_from_slice(&knots);
            controls.push(exit);
            controls
        };

        for pair in controls.windows(2) {
            if (pair[1] - pair[0]).norm() < TOLERANCE {
                return Err(PathError::InvalidPath(format!(
                    "consecutive path points coincide at {}",
                    pair[0]
                ))
                .into());
            }
        }

        let spline = CatmullRom::centripetal(&controls)?;
        let samples = spline
            .segment_count()
            .checked_mul(self.samples_per_segment)
            .ok_or_else(|| PathError::InvalidPath("too many arc-length samples".into()))?;
        let table = ArcLengthTable::build(&spline, samples)?;

        Ok(Path {
            waypoints: self.waypoints,
            controls,
            spline,
            table,
        })
    }
}

/// Mirrors `neighbour` through `anchor`.
fn reflect(anchor: &Point3, neighbour: &Point3) -> Point3 {
    anchor + (anchor - neighbour)
}

/// The journey curve: a centripetal Catmull-Rom spline threaded through the
/// waypoints, with synthetic entry and exit points smoothing both ends.
///
/// Queries take an arc-length fraction in `[0, 1]`, so equal steps in
/// progress cover equal distances. The path is immutable; rebuilding means
/// constructing a new one.
#[derive(Debug, Clone)]
pub struct Path {
    waypoints: Vec<Waypoint>,
    controls: Vec<Point3>,
    spline: CatmullRom,
    table: ArcLengthTable,
}

impl Path {
    /// Builds a path through `waypoints` with default options.
    ///
    /// # Errors
    ///
    /// See [`PathBuilder::build`].
    pub fn new(waypoints: Vec<Waypoint>) -> Result<Self> {
        PathBuilder::new(waypoints).build()
    }

    #[must_use]
    pub fn builder(waypoints: Vec<Waypoint>) -> PathBuilder {
        PathBuilder::new(waypoints)
    }

    /// Waypoints in travel order.
    #[must_use]
    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    #[must_use]
    pub fn waypoint_count(&self) -> usize {
        self.waypoints.len()
    }

    /// All spline control points, synthetic ones included.
    #[must_use]
    pub fn control_points(&self) -> &[Point3] {
        &self.controls
    }

    /// Approximate length of the traversed curve.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.table.total_length()
    }

    fn parameter(&self, t: f64) -> Result<f64> {
        if t.is_finite() && (0.0..=1.0).contains(&t) {
            Ok(self.table.parameter_at(t))
        } else {
            Err(GeometryError::ParameterOutOfRange {
                parameter: "t",
                value: t,
                min: 0.0,
                max: 1.0,
            }
            .into())
        }
    }

    /// Position at arc-length fraction `t`.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::ParameterOutOfRange`] if `t` is outside
    /// `[0, 1]` or not finite.
    pub fn point_at(&self, t: f64) -> Result<Point3> {
        self.spline.evaluate(self.parameter(t)?)
    }

    /// Unit direction of travel at arc-length fraction `t`.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::ParameterOutOfRange`] for `t` outside
    /// `[0, 1]`, or [`GeometryError::ZeroVector`] if no direction can be
    /// recovered at all.
    pub fn tangent_at(&self, t: f64) -> Result<Vector3> {
        let u = self.parameter(t)?;
        if let Ok(tangent) = self.spline.tangent(u) {
            return Ok(tangent);
        }

        // Stationary point, e.g. where the path doubles back: use the
        // incoming chord, or the outgoing one at the very start.
        let here = self.spline.evaluate(u)?;
        let chord = if u > 0.0 {
            here - self.spline.evaluate((u - CHORD_STEP).max(0.0))?
        } else {
            self.spline.evaluate(CHORD_STEP.min(1.0))? - here
        };
        let len = chord.norm();
        if len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        Ok(chord / len)
    }

    /// Orientation facing along the path at `t`: local `-Z` is the direction
    /// of travel and `+Y` stays near world up.
    ///
    /// # Errors
    ///
    /// Same as [`Path::tangent_at`].
    pub fn orientation_at(&self, t: f64) -> Result<UnitQuaternion> {
        Ok(look_rotation(&self.tangent_at(t)?))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::StarpathError;
    use crate::waypoint::Color;
    use approx::assert_relative_eq;

    fn waypoint(name: &str, x: f64, y: f64, z: f64) -> Waypoint {
        Waypoint::new(name, Point3::new(x, y, z), 1.0, Color::rgb(255, 255, 255), "").unwrap()
    }

    fn three_in_a_row() -> Path {
        Path::new(vec![
            waypoint("a", 0.0, 0.0, 0.0),
            waypoint("b", 10.0, 0.0, 0.0),
            waypoint("c", 20.0, 0.0, 0.0),
        ])
        .unwrap()
    }

    fn winding() -> Path {
        Path::new(vec![
            waypoint("a", 0.0, 0.0, 0.0),
            waypoint("b", 12.0, 5.0, -3.0),
            waypoint("c", 20.0, -4.0, 2.0),
            waypoint("d", 35.0, 1.0, 0.0),
        ])
        .unwrap()
    }

    #[test]
    fn three_waypoint_scenario() {
        let path = three_in_a_row();
        assert_relative_eq!(
            path.point_at(0.0).unwrap(),
            Point3::new(0.0, 0.0, 0.0),
            epsilon = 1e-9
        );
        assert_relative_eq!(
            path.point_at(1.0).unwrap(),
            Point3::new(20.0, 0.0, 0.0),
            epsilon = 1e-9
        );
        assert_relative_eq!(
            path.point_at(0.5).unwrap(),
            Point3::new(10.0, 0.0, 0.0),
            epsilon = 1e-3
        );
        assert_relative_eq!(path.length(), 20.0, epsilon = 1e-6);
    }

    #[test]
    fn default_boundaries_are_reflections() {
        let path = three_in_a_row();
        let controls = path.control_points();
        assert_eq!(controls.len(), 5);
        assert_relative_eq!(controls[0], Point3::new(-10.0, 0.0, 0.0));
        assert_relative_eq!(controls[4], Point3::new(30.0, 0.0, 0.0));
    }

    #[test]
    fn empty_waypoint_list_is_invalid_path() {
        let err = Path::new(Vec::new()).unwrap_err();
        assert!(matches!(err, StarpathError::Path(PathError::InvalidPath(_))));
    }

    #[test]
    fn coincident_waypoints_are_rejected() {
        let err = Path::new(vec![waypoint("a", 1.0, 1.0, 1.0), waypoint("b", 1.0, 1.0, 1.0)]);
        assert!(matches!(err, Err(StarpathError::Path(PathError::InvalidPath(_)))));
    }

    #[test]
    fn single_waypoint_needs_boundaries() {
        assert!(Path::new(vec![waypoint("only", 0.0, 0.0, 0.0)]).is_err());

        let path = Path::builder(vec![waypoint("only", 0.0, 0.0, 0.0)])
            .entry(Point3::new(-5.0, 0.0, 0.0))
            .exit(Point3::new(5.0, 0.0, 0.0))
            .build()
            .unwrap();
        assert_relative_eq!(
            path.point_at(0.0).unwrap(),
            Point3::new(-5.0, 0.0, 0.0),
            epsilon = 1e-9
        );
        assert_relative_eq!(
            path.point_at(0.5).unwrap(),
            Point3::new(0.0, 0.0, 0.0),
            epsilon = 1e-3
        );
        assert_relative_eq!(
            path.point_at(1.0).unwrap(),
            Point3::new(5.0, 0.0, 0.0),
            epsilon = 1e-9
        );
    }

    #[test]
    fn out_of_range_parameter_fails() {
        let path = three_in_a_row();
        for t in [-0.001, 1.001, f64::NAN, f64::INFINITY] {
            let err = path.point_at(t).unwrap_err();
            assert!(
                matches!(err, StarpathError::Geometry(GeometryError::ParameterOutOfRange { .. })),
                "t={t}"
            );
            assert!(path.tangent_at(t).is_err());
        }
    }

    #[test]
    fn points_are_finite_and_continuous() {
        let path = winding();
        let steps = 2000;
        let dt = 1.0 / f64::from(steps);
        // Arc-length parameterization bounds each step by the curve length.
        let bound = path.length() * dt * 1.5;
        let mut prev = path.point_at(0.0).unwrap();
        for i in 1..=steps {
            let p = path.point_at(f64::from(i) * dt).unwrap();
            assert!(p.coords.iter().all(|c| c.is_finite()));
            let step = (p - prev).norm();
            assert!(step <= bound, "step {i}: {step} > {bound}");
            prev = p;
        }
    }

    #[test]
    fn tangents_are_unit_length() {
        let path = winding();
        for i in 0..=100 {
            let t = f64::from(i) / 100.0;
            let tangent = path.tangent_at(t).unwrap();
            assert_relative_eq!(tangent.norm(), 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn doubling_back_keeps_a_unit_tangent() {
        let path = Path::new(vec![
            waypoint("out", 0.0, 0.0, 0.0),
            waypoint("turn", 10.0, 0.0, 0.0),
            waypoint("back", 0.0, 0.0, 0.0),
        ])
        .unwrap();
        // The spline comes to rest at the turn.
        assert!(path.spline.tangent(0.5).is_err());
        assert_relative_eq!(
            path.point_at(0.5).unwrap(),
            Point3::new(10.0, 0.0, 0.0),
            epsilon = 1e-6
        );

        let tangent = path.tangent_at(0.5).unwrap();
        assert_relative_eq!(tangent, Vector3::x(), epsilon = 1e-6);
        assert!(path.orientation_at(0.5).is_ok());
    }

    #[test]
    fn sample_count_is_bounded() {
        let stops = || vec![waypoint("a", 0.0, 0.0, 0.0), waypoint("b", 10.0, 0.0, 0.0)];
        for samples in [0, MAX_SAMPLES_PER_SEGMENT + 1, usize::MAX] {
            let err = Path::builder(stops()).samples_per_segment(samples).build().unwrap_err();
            assert!(matches!(err, StarpathError::Path(PathError::InvalidPath(_))), "{samples}");
        }
        let path = Path::builder(stops())
            .samples_per_segment(MAX_SAMPLES_PER_SEGMENT)
            .build()
            .unwrap();
        assert_relative_eq!(path.length(), 10.0, epsilon = 1e-6);
    }

    #[test]
    fn orientation_faces_direction_of_travel() {
        let path = three_in_a_row();
        let q = path.orientation_at(0.3).unwrap();
        assert_relative_eq!(q * -Vector3::z(), Vector3::x(), epsilon = 1e-6);
    }

    #[test]
    fn route_shifts_the_traversed_points() {
        fn above(_: usize, w: &Waypoint) -> Point3 {
            w.position() + Vector3::new(0.0, 3.0, 10.0)
        }
        let path = Path::builder(vec![waypoint("a", 0.0, 0.0, 0.0), waypoint("b", 10.0, 0.0, 0.0)])
            .route(above)
            .build()
            .unwrap();
        assert_relative_eq!(
            path.point_at(0.0).unwrap(),
            Point3::new(0.0, 3.0, 10.0),
            epsilon = 1e-9
        );
        assert_relative_eq!(
            path.point_at(1.0).unwrap(),
            Point3::new(10.0, 3.0, 10.0),
            epsilon = 1e-9
        );
    }
}
