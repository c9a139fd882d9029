//! JavaScript-compatible number handling.
//!
//! X's client code does its arithmetic in JS doubles, so every helper here
//! keeps the exact operation order of the JS source. Reordering or fusing
//! (`mul_add`) changes the last bit, which changes the animation key.

/// Most fractional digits [`float_to_hex`] emits.
pub const MAX_FRACTION_DIGITS: usize = 20;

/// Returns -1.0 for odd numbers, 0.0 for even.
///
/// X uses this as the lower bound when scaling bezier control values.
pub const fn odd_coefficient(num: usize) -> f64 {
   if num % 2 == 1 { -1.0 } else { 0.0 }
}

/// Rounds using JavaScript's `Math.round()` semantics.
///
/// Rust rounds -0.5 away from zero to -1, JavaScript rounds it up to -0.
#[expect(clippy::float_cmp, reason = "checking for exact -0.5 boundary case")]
pub fn js_round(num: f64) -> f64 {
   if num - num.trunc() == -0.5 {
      num.ceil()
   } else {
      num.round()
   }
}

/// Rounds to two decimal places, half away from zero.
pub fn round2(num: f64) -> f64 {
   (num * 100.0).round() / 100.0
}

/// Maps `value` from `0..=255` onto `min_val..=max_val`.
///
/// Floors the result when `floor` is set, otherwise rounds it to two decimal
/// places.
pub fn solve(value: f64, min_val: f64, max_val: f64, floor: bool) -> f64 {
   let result = value * (max_val - min_val) / 255.0 + min_val;
   if floor { result.floor() } else { round2(result) }
}

/// Formats a non-negative float in base 16, like JS `Number#toString(16)`
/// without its final rounding (e.g. 10.0 -> "A", 0.5 -> "0.8").
///
/// Each fractional digit is truncated, and at most
/// [`MAX_FRACTION_DIGITS`] of them are produced.
#[expect(
   clippy::cast_possible_truncation,
   reason = "digits are always in 0..16"
)]
#[expect(clippy::cast_sign_loss, reason = "input is non-negative")]
#[expect(
   clippy::while_float,
   reason = "intentionally iterating on diminishing fraction"
)]
pub fn float_to_hex(value: f64) -> String {
   if value == 0.0 {
      return "0".to_owned();
   }

   let digit = |value: u64| -> char {
      char::from_digit(value as u32, 16).map_or('0', |chr| chr.to_ascii_uppercase())
   };

   let integer = value.floor();
   let mut fraction = value - integer;

   let mut whole = Vec::new();
   let mut quotient = integer as u64;
   while quotient > 0 {
      whole.push(digit(quotient % 16));
      quotient /= 16;
   }

   let mut result = if whole.is_empty() {
      "0".to_owned()
   } else {
      whole.iter().rev().collect()
   };

   if fraction > 0.0 {
      result.push('.');
      let mut emitted = 0;
      while fraction > 0.0 && emitted < MAX_FRACTION_DIGITS {
         fraction *= 16.0;
         let integer_part = fraction.floor();
         fraction -= integer_part;
         result.push(digit(integer_part as u64));
         emitted += 1;
      }
   }

   result
}

#[cfg(test)]
mod tests {
   use proptest::prelude::*;

   use super::*;

   fn decode_fraction(digits: &str) -> f64 {
      digits
         .chars()
         .zip(1..)
         .map(|(chr, place)| f64::from(chr.to_digit(16).unwrap()) * 16f64.powi(-place))
         .sum()
   }

   #[test]
   fn odd_coefficient_values() {
      assert!((odd_coefficient(0) - 0.0).abs() < f64::EPSILON);
      assert!((odd_coefficient(1) - (-1.0)).abs() < f64::EPSILON);
      assert!((odd_coefficient(2) - 0.0).abs() < f64::EPSILON);
      assert!((odd_coefficient(101) - (-1.0)).abs() < f64::EPSILON);
   }

   #[test]
   fn js_round_positive_values() {
      assert!((js_round(0.4) - 0.0).abs() < f64::EPSILON);
      assert!((js_round(0.5) - 1.0).abs() < f64::EPSILON);
      assert!((js_round(1.5) - 2.0).abs() < f64::EPSILON);
      assert!((js_round(2.5) - 3.0).abs() < f64::EPSILON);
   }

   #[test]
   fn js_round_negative_values() {
      assert!((js_round(-0.4) - 0.0).abs() < f64::EPSILON);
      assert!((js_round(-0.5) - 0.0).abs() < f64::EPSILON);
      assert!((js_round(-0.6) - (-1.0)).abs() < f64::EPSILON);
      assert!((js_round(-1.5) - (-1.0)).abs() < f64::EPSILON);
   }

   #[test]
   fn js_round_negative_half_is_not_away_from_zero() {
      // -0.5 rounds up to -0, never down to -1.
      assert!(js_round(-0.5).abs() < f64::EPSILON);
      // -2.5 has a -0.5 remainder too.
      assert!((js_round(-2.5) + 2.0).abs() < f64::EPSILON);
      assert!((js_round(-2.6) + 3.0).abs() < f64::EPSILON);
   }

   #[test]
   fn solve_floor_and_round() {
      assert!((solve(255.0, 60.0, 360.0, true) - 360.0).abs() < f64::EPSILON);
      assert!((solve(0.0, 60.0, 360.0, true) - 60.0).abs() < f64::EPSILON);
      // 100 * 300 / 255 + 60 = 177.647...
      assert!((solve(100.0, 60.0, 360.0, true) - 177.0).abs() < f64::EPSILON);
      // 128 / 255 = 0.50196...
      assert!((solve(128.0, 0.0, 1.0, false) - 0.5).abs() < f64::EPSILON);
      // 128 * 2 / 255 - 1 = 0.00392...
      assert!((solve(128.0, -1.0, 1.0, false) - 0.0).abs() < f64::EPSILON);
      assert!((solve(0.0, -1.0, 1.0, false) + 1.0).abs() < f64::EPSILON);
   }

   #[test]
   fn float_to_hex_integers() {
      assert_eq!(float_to_hex(0.0), "0");
      assert_eq!(float_to_hex(10.0), "A");
      assert_eq!(float_to_hex(15.0), "F");
      assert_eq!(float_to_hex(16.0), "10");
      assert_eq!(float_to_hex(255.0), "FF");
      assert_eq!(float_to_hex(4096.0), "1000");
   }

   #[test]
   fn float_to_hex_fractions() {
      assert_eq!(float_to_hex(0.5), "0.8");
      assert_eq!(float_to_hex(0.25), "0.4");
      assert_eq!(float_to_hex(1.5), "1.8");
      assert_eq!(float_to_hex(10.75), "A.C");
   }

   #[test]
   fn float_to_hex_stops_when_exact() {
      // Multiplying by 16 is exact, so doubles terminate on their own.
      assert_eq!(float_to_hex(0.1), "0.1999999999999A");
      assert_eq!(float_to_hex(0.2), "0.33333333333334");
   }

   #[test]
   fn float_to_hex_caps_fraction_digits() {
      let hex = float_to_hex(1e-9);
      assert_eq!(hex, "0.000000044B82FA09B5A5");
      assert_eq!(hex.len(), 2 + MAX_FRACTION_DIGITS);
   }

   proptest! {
      #[test]
      fn js_round_matches_round_off_negative_half(num in -1.0e6f64..1.0e6) {
         prop_assume!(num - num.trunc() != -0.5);
         prop_assert_eq!(js_round(num), num.round());
      }

      #[test]
      fn float_to_hex_fraction_decodes(value in 0.0f64..4096.0) {
         let hex = float_to_hex(value);
         prop_assert!(!hex.starts_with('-'));
         let fraction = hex.split_once('.').map_or("", |(_, fraction)| fraction);
         prop_assert!(fraction.len() <= MAX_FRACTION_DIGITS);
         let expected = value - value.floor();
         prop_assert!((decode_fraction(fraction) - expected).abs() <= 16f64.powi(-20) + 1e-12);
      }
   }
}
