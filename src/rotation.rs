//! 2D rotation matrices.

use std::f64::consts::PI;

/// Sine and cosine of `degrees`, converted as `degrees * PI / 180`.
///
/// `f64::to_radians` multiplies by a pre-divided constant, which rounds
/// differently from X's JS.
fn sin_cos(degrees: f64) -> (f64, f64) {
   (degrees * PI / 180.0).sin_cos()
}

/// Converts degrees to a 2x2 rotation matrix: `[cos, -sin, sin, cos]`.
pub fn rotation_matrix(degrees: f64) -> [f64; 4] {
   let (sin, cos) = sin_cos(degrees);
   [cos, -sin, sin, cos]
}

/// Converts degrees to a CSS-style affine transform:
/// `[cos, sin, -sin, cos, 0, 0]`.
pub fn affine_matrix(degrees: f64) -> [f64; 6] {
   let (sin, cos) = sin_cos(degrees);
   [cos, sin, -sin, cos, 0.0, 0.0]
}
