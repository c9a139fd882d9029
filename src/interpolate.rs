//! Element-wise linear interpolation.

use crate::error::Error;

/// Interpolates `from` towards `to` by `factor`.
pub fn interpolate(from: &[f64], to: &[f64], factor: f64) -> Result<Vec<f64>, Error> {
   if from.len() != to.len() {
      return Err(Error::ShapeMismatch {
         from: from.len(),
         to:   to.len(),
      });
   }

   Ok(from
      .iter()
      .zip(to)
      .map(|(&start, &end)| lerp(start, end, factor))
      .collect())
}

/// `from * (1 - factor) + to * factor`, unfused to match JS.
#[expect(clippy::suboptimal_flops, reason = "must match JS rounding exactly")]
pub fn lerp(from: f64, to: f64, factor: f64) -> f64 {
   from * (1.0 - factor) + to * factor
}
