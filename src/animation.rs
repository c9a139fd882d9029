//! Animation key derivation from one `loading-x-anim` keyframe.
//!
//! X renders a short SVG animation on page load. Sampling it at a time picked
//! by the verification key gives a color and rotation, which are encoded as
//! hex and mixed into every transaction ID hash.

use std::{
   fmt::Write as _,
   iter,
};

use crate::{
   cubic_curve::CubicBezier,
   error::Error,
   interpolate::interpolate,
   numeric::{
      float_to_hex,
      js_round,
      odd_coefficient,
      round2,
      solve,
   },
   rotation::rotation_matrix,
};

/// Length of X's animation timeline, in the units of the frame time.
pub const TOTAL_ANIMATION_TIME: f64 = 4096.0;

/// Key bytes are reduced to a nibble before use.
pub const NIBBLE_MODULUS: u8 = 16;

/// Two colors, one rotation and at least four curve values, padded the way
/// X's paths always are.
pub const MIN_FRAME_VALUES: usize = 13;

const CURVE_OFFSET: usize = 7;

/// One keyframe row parsed from SVG path data.
///
/// Layout: `[r, g, b, r, g, b, rotation, curve...]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame(Vec<i32>);

impl Frame {
   pub fn as_slice(&self) -> &[i32] {
      &self.0
   }

   fn color(&self, start: usize) -> Vec<f64> {
      self.0[start..start + 3]
         .iter()
         .map(|&channel| f64::from(channel))
         .chain(iter::once(1.0))
         .collect()
   }

   fn rotation(&self) -> f64 {
      f64::from(self.0[6])
   }

   fn curve(&self) -> Result<CubicBezier, Error> {
      let controls = self.0[CURVE_OFFSET..]
         .iter()
         .enumerate()
         .map(|(idx, &val)| solve(f64::from(val), odd_coefficient(idx), 1.0, false))
         .collect::<Vec<_>>();
      CubicBezier::from_controls(&controls)
   }
}

impl TryFrom<Vec<i32>> for Frame {
   type Error = Error;

   fn try_from(values: Vec<i32>) -> Result<Self, Self::Error> {
      if values.len() < MIN_FRAME_VALUES {
         return Err(Error::MalformedData(format!(
            "frame has {} values, need at least {MIN_FRAME_VALUES}",
            values.len()
         )));
      }
      Ok(Self(values))
   }
}

impl TryFrom<&[i32]> for Frame {
   type Error = Error;

   fn try_from(values: &[i32]) -> Result<Self, Self::Error> {
      Self::try_from(values.to_vec())
   }
}

/// Multiplies the key byte nibbles at `indices` and converts the product to
/// a fraction of the animation timeline.
pub fn target_time(key_bytes: &[u8], indices: &[usize]) -> Result<f64, Error> {
   let mut frame_time = 1.0;
   for &index in indices {
      let byte = key_bytes.get(index).ok_or(Error::OutOfRange {
         what: "key byte index",
         index,
         len: key_bytes.len(),
      })?;
      frame_time *= f64::from(byte % NIBBLE_MODULUS);
   }

   Ok(js_round(frame_time / 10.0) * 10.0 / TOTAL_ANIMATION_TIME)
}

/// Samples `frame` at `target_time` and encodes the result.
#[expect(
   clippy::cast_possible_truncation,
   reason = "color values are clamped to 0-255"
)]
pub fn animation_key(frame: &Frame, target_time: f64) -> Result<String, Error> {
   let progress = frame.curve()?.value(target_time);

   let color = interpolate(&frame.color(0), &frame.color(3), progress)?;

   let to_rotation = solve(frame.rotation(), 60.0, 360.0, true);
   let rotation = interpolate(&[0.0], &[to_rotation], progress)?;
   let matrix = rotation_matrix(rotation[0]);

   let mut key = String::with_capacity(32);

   // Alpha is not part of the key.
   for channel in &color[..3] {
      let channel = channel.clamp(0.0, 255.0).round() as i32;
      // Writing to a String cannot fail.
      let _ = write!(key, "{channel:x}");
   }

   for entry in matrix {
      let hex = float_to_hex(round2(entry).abs()).to_lowercase();
      if hex.is_empty() || hex.starts_with('.') {
         key.push('0');
      }
      key.push_str(&hex);
   }

   key.push_str("00");
   key.retain(|chr| chr != '.' && chr != '-');
   Ok(key)
}
