use crate::error::{GeometryError, Result};
use crate::math::{Point3, Vector3, TOLERANCE};

use super::{Curve, CurveDomain};

/// Knot spacings below this are treated as coincident when computing
/// centripetal parameterization.
const MIN_KNOT_SPACING: f64 = 1e-4;

/// One cubic Hermite piece: `P(u) = c0 + c1*u + c2*u^2 + c3*u^3`, `u` in `[0, 1]`.
#[derive(Debug, Clone, Copy)]
struct Segment {
    c0: Vector3,
    c1: Vector3,
    c2: Vector3,
    c3: Vector3,
}

impl Segment {
    /// Centripetal piece between `p1` and `p2`, with `p0` and `p3` shaping
    /// the end tangents.
    fn centripetal(p0: &Point3, p1: &Point3, p2: &Point3, p3: &Point3) -> Self {
        let mut dt0 = (p1 - p0).norm().sqrt();
        let mut dt1 = (p2 - p1).norm().sqrt();
        let mut dt2 = (p3 - p2).norm().sqrt();

        if dt1 < MIN_KNOT_SPACING {
            dt1 = 1.0;
        }
        if dt0 < MIN_KNOT_SPACING {
            dt0 = dt1;
        }
        if dt2 < MIN_KNOT_SPACING {
            dt2 = dt1;
        }

        let (x0, x1, x2, x3) = (p0.coords, p1.coords, p2.coords, p3.coords);
        let t1 = ((x1 - x0) / dt0 - (x2 - x0) / (dt0 + dt1) + (x2 - x1) / dt1) * dt1;
        let t2 = ((x2 - x1) / dt1 - (x3 - x1) / (dt1 + dt2) + (x3 - x2) / dt2) * dt1;

        Self {
            c0: x1,
            c1: t1,
            c2: x1 * -3.0 + x2 * 3.0 - t1 * 2.0 - t2,
            c3: x1 * 2.0 - x2 * 2.0 + t1 + t2,
        }
    }

    fn point(&self, u: f64) -> Point3 {
        Point3::from(self.c0 + self.c1 * u + self.c2 * (u * u) + self.c3 * (u * u * u))
    }

    fn derivative(&self, u: f64) -> Vector3 {
        self.c1 + self.c2 * (2.0 * u) + self.c3 * (3.0 * u * u)
    }
}

/// A centripetal Catmull-Rom spline (alpha = 0.5).
///
/// Built from `n >= 4` control points; the curve runs from the second to the
/// second-to-last point, the outer two only shape the end tangents. The
/// parametric domain is `[0, 1]`, split uniformly across the `n - 3`
/// segments. The centripetal form never forms cusps or self-intersections
/// within a segment, and the direction of travel is continuous at the joins
/// unless the control points double back on themselves.
#[derive(Debug, Clone)]
pub struct CatmullRom {
    segments: Vec<Segment>,
}

impl CatmullRom {
    /// Creates a new centripetal spline through `controls`.
    ///
    /// # Errors
    ///
    /// Returns an error if fewer than four control points are given or any
    /// point is non-finite.
    pub fn centripetal(controls: &[Point3]) -> Result<Self> {
        if controls.len() < 4 {
            return Err(GeometryError::Degenerate(format!(
                "catmull-rom needs at least 4 control points, got {}",
                controls.len()
            ))
            .into());
        }
        if controls.iter().any(|p| !p.coords.iter().all(|c| c.is_finite())) {
            return Err(GeometryError::Degenerate("non-finite control point".into()).into());
        }

        let segments = controls
            .windows(4)
            .map(|w| Segment::centripetal(&w[0], &w[1], &w[2], &w[3]))
            .collect();
        Ok(Self { segments })
    }

    /// Returns the number of cubic segments.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Maps a global parameter onto `(segment, local u)`.
    fn locate(&self, t: f64) -> (&Segment, f64) {
        let n = self.segments.len();
        #[allow(clippy::cast_precision_loss)]
        let scaled = t * n as f64;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let index = (scaled.floor() as usize).min(n - 1);
        #[allow(clippy::cast_precision_loss)]
        let local = scaled - index as f64;
        (&self.segments[index], local)
    }

    fn check_domain(&self, t: f64) -> Result<()> {
        let domain = self.domain();
        if t.is_finite() && domain.contains(t) {
            Ok(())
        } else {
            Err(GeometryError::ParameterOutOfRange {
                parameter: "t",
                value: t,
                min: domain.t_min,
                max: domain.t_max,
            }
            .into())
        }
    }

    /// Returns the (unnormalized) derivative with respect to the global parameter.
    ///
    /// # Errors
    ///
    /// Returns an error if `t` is outside `[0, 1]`.
    pub fn derivative(&self, t: f64) -> Result<Vector3> {
        self.check_domain(t)?;
        let (segment, u) = self.locate(t);
        #[allow(clippy::cast_precision_loss)]
        let n = self.segments.len() as f64;
        Ok(segment.derivative(u) * n)
    }
}

impl Curve for CatmullRom {
    fn evaluate(&self, t: f64) -> Result<Point3> {
        self.check_domain(t)?;
        let (segment, u) = self.locate(t);
        Ok(segment.point(u))
    }

    fn tangent(&self, t: f64) -> Result<Vector3> {
        let d = self.derivative(t)?;
        let len = d.norm();
        if len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        Ok(d / len)
    }

    fn domain(&self) -> CurveDomain {
        CurveDomain::new(0.0, 1.0)
    }
}
