//! Cubic bezier easing, like CSS `cubic-bezier()`.

use crate::error::Error;

/// Bisection steps before [`CubicBezier::value`] settles for the current
/// estimate. Convergence to the 1e-5 tolerance takes about 17.
const MAX_ITERATIONS: usize = 100;

const TOLERANCE: f64 = 0.00001;

/// Unit bezier from (0, 0) to (1, 1) through `(x1, y1)` and `(x2, y2)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
   x1: f64,
   y1: f64,
   x2: f64,
   y2: f64,
}

impl CubicBezier {
   pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
      Self { x1, y1, x2, y2 }
   }

   /// Builds a curve from the first four control values of a frame.
   pub fn from_controls(controls: &[f64]) -> Result<Self, Error> {
      match *controls {
         [x1, y1, x2, y2, ..] => Ok(Self::new(x1, y1, x2, y2)),
         _ => Err(Error::MalformedData(format!(
            "cubic curve needs 4 control values, got {}",
            controls.len()
         ))),
      }
   }

   /// Returns the eased progress for `time`.
   ///
   /// Outside `(0, 1)` the curve is extended linearly along its boundary
   /// tangent instead of being solved.
   #[expect(clippy::float_cmp, reason = "checking boundary conditions")]
   pub fn value(&self, time: f64) -> f64 {
      if time <= 0.0 {
         let gradient = if self.x1 > 0.0 {
            self.y1 / self.x1
         } else if self.y1 == 0.0 && self.x2 > 0.0 {
            self.y2 / self.x2
         } else {
            0.0
         };
         return gradient * time;
      }

      if time >= 1.0 {
         let gradient = if self.x2 < 1.0 {
            (self.y2 - 1.0) / (self.x2 - 1.0)
         } else if self.x2 == 1.0 && self.x1 < 1.0 {
            (self.y1 - 1.0) / (self.x1 - 1.0)
         } else {
            0.0
         };
         return 1.0 + gradient * (time - 1.0);
      }

      let mut low = 0.0_f64;
      let mut high = 1.0_f64;
      let mut mid = 0.0_f64;

      for _ in 0..MAX_ITERATIONS {
         if low >= high {
            break;
         }

         mid = (low + high) / 2.0;
         let estimate = bezier(self.x1, self.x2, mid);

         if (time - estimate).abs() < TOLERANCE {
            break;
         }

         if estimate < time {
            low = mid;
         } else {
            high = mid;
         }
      }

      bezier(self.y1, self.y2, mid)
   }
}

/// One coordinate of the curve: `3p(1-m)²m + 3q(1-m)m² + m³`.
#[expect(clippy::suboptimal_flops, reason = "must match JS rounding exactly")]
fn bezier(p: f64, q: f64, m: f64) -> f64 {
   3.0 * p * (1.0 - m) * (1.0 - m) * m + 3.0 * q * (1.0 - m) * m * m + m * m * m
}

#[cfg(test)]
mod tests {
   use super::*;

   #[test]
   fn cubic_curve_value() {
      let cubic = CubicBezier::new(0.1, 0.2, 0.3, 0.4);
      let value = cubic.value(0.5);
      assert!(value > 0.0 && value < 1.0);
   }

   #[test]
   fn linear_curve_is_identity() {
      let cubic = CubicBezier::new(1.0 / 3.0, 1.0 / 3.0, 2.0 / 3.0, 2.0 / 3.0);
      for time in [0.1, 0.25, 0.5, 0.9] {
         assert!((cubic.value(time) - time).abs() < 0.0001);
      }
   }

   #[test]
   fn cubic_curve_boundaries() {
      let cubic = CubicBezier::new(0.25, 0.1, 0.25, 1.0);
      assert!((cubic.value(0.0) - 0.0).abs() < f64::EPSILON);
      assert!((cubic.value(1.0) - 1.0).abs() < f64::EPSILON);
   }

   #[test]
   fn cubic_curve_extrapolation() {
      let cubic = CubicBezier::new(0.4, 0.2, 0.6, 0.8);
      // start gradient 0.2 / 0.4, end gradient -0.2 / -0.4
      assert!((cubic.value(-0.1) - (-0.05)).abs() < 1e-12);
      assert!((cubic.value(1.1) - 1.05).abs() < 1e-12);
   }

   #[test]
   fn extrapolation_fallback_gradients() {
      // x1 == 0 and y1 == 0 uses the second control point.
      let cubic = CubicBezier::new(0.0, 0.0, 0.5, 1.0);
      assert!((cubic.value(-1.0) - (-2.0)).abs() < 1e-12);

      // x2 == 1 uses the first control point.
      let cubic = CubicBezier::new(0.5, 0.0, 1.0, 1.0);
      assert!((cubic.value(2.0) - 3.0).abs() < 1e-12);

      // Nothing usable means flat extension.
      let cubic = CubicBezier::new(0.0, 0.5, 1.5, 1.0);
      assert!((cubic.value(-3.0) - 0.0).abs() < f64::EPSILON);
      assert!((cubic.value(3.0) - 1.0).abs() < f64::EPSILON);
   }

   #[test]
   fn degenerate_curve_terminates() {
      // A NaN estimate never satisfies the tolerance check.
      let cubic = CubicBezier::new(f64::NAN, 0.5, 0.5, 0.5);
      let value = cubic.value(0.5);
      assert!(value.is_finite());
   }

   #[test]
   fn from_controls_needs_four_values() {
      let cubic = CubicBezier::from_controls(&[0.1, 0.2, 0.3, 0.4, 0.5]).unwrap();
      assert_eq!(cubic, CubicBezier::new(0.1, 0.2, 0.3, 0.4));

      let err = CubicBezier::from_controls(&[0.1, 0.2]).unwrap_err();
      assert_eq!(err.kind(), crate::ErrorKind::MalformedData);
   }
}
