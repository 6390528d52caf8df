//! Wire format constants and prelude encoding.
//!
//! Every message starts with a 12-byte prelude:
//! ```text
//! ┌──────────────┬───────────────┬─────────────┐
//! │ Total length │ Header length │ Prelude CRC │
//! │ 4 bytes      │ 4 bytes       │ 4 bytes     │
//! │ uint32 BE    │ uint32 BE     │ uint32 BE   │
//! └──────────────┴───────────────┴─────────────┘
//! ```
//!
//! followed by `header_length` header bytes, the payload, and a 4-byte
//! message CRC. All multi-byte integers are Big Endian.

use crate::error::{Result, SelectError};

use super::checksum::Crc32;

/// Length of the two length fields (the part covered by the prelude CRC).
pub const PRELUDE_LEN: usize = 8;

/// Length of the prelude CRC field.
pub const PRELUDE_CRC_LEN: usize = 4;

/// Prelude plus its CRC (exactly 12).
pub const PRELUDE_TOTAL_LEN: usize = PRELUDE_LEN + PRELUDE_CRC_LEN;

/// Length of the trailing message CRC.
pub const MESSAGE_CRC_LEN: usize = 4;

/// Bytes of every frame that are neither headers nor payload (16).
pub const MESSAGE_OVERHEAD: u32 = (PRELUDE_TOTAL_LEN + MESSAGE_CRC_LEN) as u32;

/// Header value type byte for strings.
pub const HEADER_VALUE_TYPE_STRING: u8 = 7;

/// Separator between the type marker and the header name.
pub const HEADER_NAME_SEPARATOR: u8 = b':';

/// Decoded message prelude.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prelude {
    /// Length of the whole message, including this field and both CRCs.
    pub total_length: u32,
    /// Length of the header block.
    pub header_length: u32,
    /// CRC of the two length fields, as read from the wire.
    pub prelude_crc: u32,
}

impl Prelude {
    /// Build a prelude for the given lengths with a correct CRC.
    pub fn new(total_length: u32, header_length: u32) -> Self {
        let mut lengths = [0u8; PRELUDE_LEN];
        lengths[0..4].copy_from_slice(&total_length.to_be_bytes());
        lengths[4..8].copy_from_slice(&header_length.to_be_bytes());
        Self {
            total_length,
            header_length,
            prelude_crc: Crc32::new().update(&lengths).finalize(),
        }
    }

    /// Encode to the 12-byte wire form.
    pub fn encode(&self) -> [u8; PRELUDE_TOTAL_LEN] {
        let mut buf = [0u8; PRELUDE_TOTAL_LEN];
        buf[0..4].copy_from_slice(&self.total_length.to_be_bytes());
        buf[4..8].copy_from_slice(&self.header_length.to_be_bytes());
        buf[8..12].copy_from_slice(&self.prelude_crc.to_be_bytes());
        buf
    }

    /// Decode from bytes without validating anything.
    ///
    /// Returns `None` if buffer is too short.
    pub fn decode(buf: &[u8]) -> Option<Self> {
        if buf.len() < PRELUDE_TOTAL_LEN {
            return None;
        }
        Some(Self {
            total_length: u32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]]),
            header_length: u32::from_be_bytes([buf[4], buf[5], buf[6], buf[7]]),
            prelude_crc: u32::from_be_bytes([buf[8], buf[9], buf[10], buf[11]]),
        })
    }

    /// CRC computed over the two length fields.
    pub fn expected_crc(&self) -> u32 {
        Crc32::new()
            .update(&self.total_length.to_be_bytes())
            .update(&self.header_length.to_be_bytes())
            .finalize()
    }

    /// Check the stored prelude CRC against the length fields.
    pub fn verify_crc(&self) -> Result<()> {
        let expected = self.expected_crc();
        if self.prelude_crc != expected {
            return Err(SelectError::HeaderChecksumMismatch {
                expected,
                actual: self.prelude_crc,
            });
        }
        Ok(())
    }

    /// Payload length implied by the length fields.
    pub fn payload_length(&self) -> Result<usize> {
        self.total_length
            .checked_sub(self.header_length)
            .and_then(|rest| rest.checked_sub(MESSAGE_OVERHEAD))
            .map(|len| len as usize)
            .ok_or(SelectError::InvalidLength {
                total_length: self.total_length,
                header_length: self.header_length,
            })
    }

    /// Validate the length fields for protocol compliance.
    ///
    /// Checks:
    /// - Total length doesn't exceed max
    /// - Lengths leave room for the fixed overhead
    pub fn validate(&self, max_message_size: u32) -> Result<()> {
        if self.total_length > max_message_size {
            return Err(SelectError::MessageTooLarge {
                size: self.total_length,
                max: max_message_size,
            });
        }
        self.payload_length().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prelude_encode_decode_roundtrip() {
        let original = Prelude::new(100, 40);
        let decoded = Prelude::decode(&original.encode()).unwrap();
        assert_eq!(original, decoded);
        assert!(decoded.verify_crc().is_ok());
    }

    #[test]
    fn test_prelude_big_endian_byte_order() {
        let prelude = Prelude {
            total_length: 0x01020304,
            header_length: 0x05060708,
            prelude_crc: 0x090A0B0C,
        };
        let bytes = prelude.encode();
        assert_eq!(
            bytes,
            [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0A, 0x0B, 0x0C]
        );
    }

    #[test]
    fn test_prelude_crc_covers_length_fields_only() {
        let prelude = Prelude::new(16, 0);
        let bytes = prelude.encode();
        assert_eq!(prelude.prelude_crc, crc32fast::hash(&bytes[..PRELUDE_LEN]));
    }

    #[test]
    fn test_decode_too_short_buffer() {
        let buf = [0u8; 11];
        assert!(Prelude::decode(&buf).is_none());
    }

    #[test]
    fn test_verify_crc_mismatch() {
        let mut prelude = Prelude::new(32, 8);
        let expected = prelude.prelude_crc;
        prelude.prelude_crc ^= 1;

        let err = prelude.verify_crc().unwrap_err();
        assert!(matches!(
            err,
            SelectError::HeaderChecksumMismatch { expected: e, actual: a }
                if e == expected && a == expected ^ 1
        ));
    }

    #[test]
    fn test_payload_length() {
        assert_eq!(Prelude::new(16, 0).payload_length().unwrap(), 0);
        assert_eq!(Prelude::new(50, 20).payload_length().unwrap(), 14);
    }

    #[test]
    fn test_payload_length_negative_rejected() {
        let err = Prelude::new(20, 10).payload_length().unwrap_err();
        assert!(matches!(
            err,
            SelectError::InvalidLength {
                total_length: 20,
                header_length: 10
            }
        ));

        assert!(Prelude::new(15, 0).payload_length().is_err());
        assert!(Prelude::new(0, u32::MAX).payload_length().is_err());
    }

    #[test]
    fn test_validate_too_large() {
        let prelude = Prelude::new(1_000_000, 0);
        let result = prelude.validate(1024);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("exceeds maximum"));
        assert!(prelude.validate(u32::MAX).is_ok());
    }

    #[test]
    fn test_overhead_is_16() {
        assert_eq!(PRELUDE_TOTAL_LEN, 12);
        assert_eq!(MESSAGE_OVERHEAD, 16);
    }
}
