//! Transaction ID assembly.
//!
//! An ID is `base64(r || (key_bytes || time_le || sha256[..16] || salt) ^ r)`
//! with the padding dropped, where `r` is one random byte.

use std::slice;

use data_encoding::BASE64_NOPAD;
use hmac_sha256::Hash;

/// Secret keyword from X's client-side JavaScript.
pub const KEYWORD: &str = "obfiowerehiring";

/// Trailing byte of every payload.
pub const RANDOM_SALT: u8 = 3;

/// X's custom epoch: 2023-05-01 00:00:00 UTC.
pub const X_EPOCH: u64 = 1_682_924_400;

const HASH_PREFIX_LEN: usize = 16;

/// Everything an ID is derived from besides the request and the entropy.
#[derive(Debug, Clone, Copy)]
pub struct TokenParts<'a> {
   pub key_bytes:     &'a [u8],
   pub animation_key: &'a str,
   pub keyword:       &'a str,
   pub random_salt:   u8,
}

/// Converts Unix seconds to X's 32-bit timestamp.
///
/// Clocks before the X epoch wrap around, like the unsigned arithmetic in
/// X's client.
#[expect(
   clippy::cast_possible_truncation,
   reason = "timestamp is defined modulo 2^32"
)]
pub const fn encode_timestamp(unix_seconds: u64) -> u32 {
   unix_seconds.wrapping_sub(X_EPOCH) as u32
}

/// Builds the ID for one request.
pub fn assemble_token(
   parts: &TokenParts<'_>,
   method: &str,
   path: &str,
   timestamp: u32,
   random_byte: u8,
) -> String {
   let hash_input = format!(
      "{method}!{path}!{timestamp}{}{}",
      parts.keyword, parts.animation_key
   );
   let digest = Hash::hash(hash_input.as_bytes());

   let mut payload = Vec::with_capacity(1 + parts.key_bytes.len() + 4 + HASH_PREFIX_LEN + 1);
   payload.push(random_byte);
   payload.extend(
      parts
         .key_bytes
         .iter()
         .chain(&timestamp.to_le_bytes())
         .chain(&digest[..HASH_PREFIX_LEN])
         .chain(slice::from_ref(&parts.random_salt))
         .map(|&byte| byte ^ random_byte),
   );

   BASE64_NOPAD.encode(&payload)
}
