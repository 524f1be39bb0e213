use crate::error::{GeometryError, Result};
use crate::math::TOLERANCE;

use super::curve::Curve;

/// Cumulative chord lengths sampled uniformly over a curve's domain.
///
/// Used to turn an arc-length fraction into a curve parameter, so equal steps
/// in progress cover equal distances along the path.
#[derive(Debug, Clone)]
pub struct ArcLengthTable {
    t_min: f64,
    t_max: f64,
    /// `lengths[i]` is the distance travelled up to sample `i`; `lengths[0] == 0`.
    lengths: Vec<f64>,
}

impl ArcLengthTable {
    /// Samples `curve` at `samples + 1` evenly spaced parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if `samples` is zero, evaluation fails, or the curve
    /// has zero length.
    pub fn build(curve: &impl Curve, samples: usize) -> Result<Self> {
        if samples == 0 {
            return Err(GeometryError::Degenerate("arc-length table needs samples".into()).into());
        }
        let domain = curve.domain();
        let span = domain.t_max - domain.t_min;

        let mut lengths = Vec::with_capacity(samples + 1);
        lengths.push(0.0);
        let mut prev = curve.evaluate(domain.t_min)?;
        let mut total = 0.0;
        for i in 1..=samples {
            #[allow(clippy::cast_precision_loss)]
            let t = if i == samples {
                domain.t_max
            } else {
                domain.t_min + span * (i as f64 / samples as f64)
            };
            let p = curve.evaluate(t)?;
            total += (p - prev).norm();
            lengths.push(total);
            prev = p;
        }

        if total < TOLERANCE {
            return Err(GeometryError::Degenerate("curve has zero length".into()).into());
        }

        Ok(Self {
            t_min: domain.t_min,
            t_max: domain.t_max,
            lengths,
        })
    }

    /// Total approximate length of the curve.
    #[must_use]
    pub fn total_length(&self) -> f64 {
        self.lengths.last().copied().unwrap_or(0.0)
    }

    /// Maps an arc-length fraction in `[0, 1]` to a curve parameter.
    ///
    /// The caller validates the range; inputs are clamped here.
    #[must_use]
    pub fn parameter_at(&self, fraction: f64) -> f64 {
        let fraction = fraction.clamp(0.0, 1.0);
        let target = fraction * self.total_length();
        let samples = self.lengths.len() - 1;

        // First sample strictly past the target, minus one.
        let upper = self.lengths.partition_point(|&l| l <= target);
        let i = upper.saturating_sub(1).min(samples - 1);

        let before = self.lengths[i];
        let after = self.lengths[i + 1];
        let span = after - before;
        let within = if span > TOLERANCE {
            ((target - before) / span).clamp(0.0, 1.0)
        } else {
            0.0
        };

        #[allow(clippy::cast_precision_loss)]
        let u = (i as f64 + within) / samples as f64;
        self.t_min + (self.t_max - self.t_min) * u
    }
}
