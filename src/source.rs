//! Clock and randomness used when minting transaction IDs.

use std::time::{
   SystemTime,
   UNIX_EPOCH,
};

use rand::Rng as _;

/// Source of the current Unix time in seconds.
pub trait Clock {
   fn now_unix_seconds(&self) -> u64;
}

/// Source of the per-ID XOR byte.
pub trait RandomByteSource {
   fn next_byte(&mut self) -> u8;
}

/// The system wall clock. Reads as 0 if the clock is before 1970.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
   fn now_unix_seconds(&self) -> u64 {
      SystemTime::now()
         .duration_since(UNIX_EPOCH)
         .map_or(0, |duration| duration.as_secs())
   }
}

/// A clock stuck at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub u64);

impl Clock for FixedClock {
   fn now_unix_seconds(&self) -> u64 {
      self.0
   }
}

/// Uniform bytes from the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandom;

impl RandomByteSource for ThreadRandom {
   fn next_byte(&mut self) -> u8 {
      rand::thread_rng().r#gen()
   }
}

/// Always yields the same byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedByte(pub u8);

impl RandomByteSource for FixedByte {
   fn next_byte(&mut self) -> u8 {
      self.0
   }
}

#[cfg(test)]
mod tests {
   use super::*;

   #[test]
   fn system_clock_is_after_x_epoch() {
      assert!(SystemClock.now_unix_seconds() > 1_682_924_400);
   }

   #[test]
   fn fixed_sources() {
      assert_eq!(FixedClock(1_700_000_000).now_unix_seconds(), 1_700_000_000);
      let mut random = FixedByte(0x11);
      assert_eq!(random.next_byte(), 0x11);
      assert_eq!(random.next_byte(), 0x11);
   }

   #[test]
   fn thread_random_varies() {
      let mut random = ThreadRandom;
      let first = random.next_byte();
      assert!((0..64).any(|_| random.next_byte() != first));
   }
}
