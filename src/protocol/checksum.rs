//! Incremental CRC32 accumulator.
//!
//! Thin functional wrapper over `crc32fast::Hasher`: `update` consumes the
//! accumulator and returns the advanced one, so a value can be moved
//! through the frame reader's steps without aliasing.
//!
//! # Example
//!
//! ```
//! use select_eventstream::protocol::Crc32;
//!
//! let whole = Crc32::new().update(b"hello world").finalize();
//! let split = Crc32::new().update(b"hello ").update(b"world").finalize();
//! assert_eq!(whole, split);
//! ```

use std::fmt;

use crc32fast::Hasher;

/// Running CRC32 (IEEE) checksum.
#[derive(Clone)]
pub struct Crc32 {
    hasher: Hasher,
}

impl Crc32 {
    /// Start at the CRC32 initial state.
    pub fn new() -> Self {
        Self {
            hasher: Hasher::new(),
        }
    }

    /// Fold `bytes` into the checksum.
    #[must_use]
    pub fn update(mut self, bytes: &[u8]) -> Self {
        self.hasher.update(bytes);
        self
    }

    /// Current checksum value. Does not consume the accumulator.
    pub fn finalize(&self) -> u32 {
        self.hasher.clone().finalize()
    }
}

impl Default for Crc32 {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Crc32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Crc32")
            .field(&format_args!("{:#010x}", self.finalize()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_checksum_is_zero() {
        assert_eq!(Crc32::new().finalize(), 0);
    }

    #[test]
    fn test_known_vector() {
        // Standard CRC32 check value.
        assert_eq!(Crc32::new().update(b"123456789").finalize(), 0xCBF43926);
    }

    #[test]
    fn test_incremental_matches_one_shot() {
        let data = b"the quick brown fox jumps over the lazy dog";
        let one_shot = crc32fast::hash(data);

        let mut acc = Crc32::new();
        for chunk in data.chunks(7) {
            acc = acc.update(chunk);
        }
        assert_eq!(acc.finalize(), one_shot);
    }

    #[test]
    fn test_finalize_is_repeatable() {
        let acc = Crc32::new().update(b"abc");
        let first = acc.finalize();
        assert_eq!(acc.finalize(), first);

        let extended = acc.update(b"def");
        assert_ne!(extended.finalize(), first);
        assert_eq!(extended.finalize(), crc32fast::hash(b"abcdef"));
    }

    #[test]
    fn test_clone_forks_independently() {
        let prelude = Crc32::new().update(b"12345678");
        let message = prelude.clone().update(b"more");

        assert_eq!(prelude.finalize(), crc32fast::hash(b"12345678"));
        assert_eq!(message.finalize(), crc32fast::hash(b"12345678more"));
    }
}
