//! Frame struct and the single-message reader.
//!
//! A frame is one complete message: prelude, header block, payload and
//! trailing message CRC. Both checksums are verified before a [`Frame`] is
//! handed out. The prelude CRC is checked first, so a corrupted length
//! field is caught before any payload read is attempted.
//!
//! # Example
//!
//! ```
//! use select_eventstream::protocol::{build_frame, read_frame, ByteCursor, Headers};
//!
//! let headers = Headers::new()
//!     .with("message-type", "event")
//!     .with("event-type", "Records");
//! let bytes = build_frame(&headers, b"a,b,c").unwrap();
//!
//! let mut cursor = ByteCursor::new(&bytes);
//! let frame = read_frame(&mut cursor, u32::MAX).unwrap();
//!
//! assert_eq!(frame.event_type(), Some("Records"));
//! assert_eq!(frame.payload(), b"a,b,c");
//! assert!(cursor.is_empty());
//! ```

use bytes::Bytes;

use crate::error::{Result, SelectError};

use super::checksum::Crc32;
use super::cursor::ByteCursor;
use super::headers::{encode_headers, parse_headers, Headers};
use super::wire_format::{
    Prelude, MESSAGE_CRC_LEN, MESSAGE_OVERHEAD, PRELUDE_LEN, PRELUDE_TOTAL_LEN,
};

/// Header carrying `event` or `error`.
pub const MESSAGE_TYPE_HEADER: &str = "message-type";

/// Header naming the event kind.
pub const EVENT_TYPE_HEADER: &str = "event-type";

/// Header naming the payload encoding.
pub const CONTENT_TYPE_HEADER: &str = "content-type";

/// A complete, checksum-verified frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Decoded prelude.
    pub prelude: Prelude,
    /// Decoded headers.
    pub headers: Headers,
    /// Payload bytes.
    pub payload: Bytes,
    /// Message CRC as read from the wire.
    pub message_crc: u32,
}

impl Frame {
    /// Value of a header, last write wins.
    #[inline]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    /// The `message-type` header.
    #[inline]
    pub fn message_type(&self) -> Option<&str> {
        self.header(MESSAGE_TYPE_HEADER)
    }

    /// The `event-type` header.
    #[inline]
    pub fn event_type(&self) -> Option<&str> {
        self.header(EVENT_TYPE_HEADER)
    }

    /// The `content-type` header.
    #[inline]
    pub fn content_type(&self) -> Option<&str> {
        self.header(CONTENT_TYPE_HEADER)
    }

    /// Get a reference to the payload bytes.
    #[inline]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Get the payload length.
    #[inline]
    pub fn payload_len(&self) -> usize {
        self.payload.len()
    }

    /// Size of this frame on the wire.
    #[inline]
    pub fn wire_len(&self) -> usize {
        self.prelude.total_length as usize
    }
}

/// Read one frame from the cursor.
///
/// Leaves the cursor positioned after the frame's message CRC.
///
/// # Errors
///
/// - [`SelectError::HeaderChecksumMismatch`] if the prelude CRC is wrong
/// - [`SelectError::InvalidLength`] / [`SelectError::MessageTooLarge`] if the
///   (checksum-valid) lengths are unusable
/// - [`SelectError::Underrun`] if the frame is cut short, or if a
///   checksum-valid header block is malformed
/// - [`SelectError::MessageChecksumMismatch`] if the message CRC is wrong
pub fn read_frame(cursor: &mut ByteCursor<'_>, max_message_size: u32) -> Result<Frame> {
    let raw_prelude = cursor.read(PRELUDE_TOTAL_LEN)?;
    let prelude = Prelude::decode(raw_prelude).ok_or(SelectError::Underrun {
        needed: PRELUDE_TOTAL_LEN,
        remaining: raw_prelude.len(),
    })?;

    // Prelude CRC covers the length fields; message CRC covers all 12 bytes.
    let prelude_acc = Crc32::new().update(&raw_prelude[..PRELUDE_LEN]);
    let mut message_acc = prelude_acc.clone().update(&raw_prelude[PRELUDE_LEN..]);

    let expected = prelude_acc.finalize();
    if prelude.prelude_crc != expected {
        return Err(SelectError::HeaderChecksumMismatch {
            expected,
            actual: prelude.prelude_crc,
        });
    }

    // Lengths are trustworthy from here on.
    prelude.validate(max_message_size)?;
    let payload_length = prelude.payload_length()?;

    // Header bytes are parsed only once the message CRC vouches for them.
    let block: &[u8] = if prelude.header_length > 0 {
        let block = cursor.read(prelude.header_length as usize)?;
        message_acc = message_acc.update(block);
        block
    } else {
        &[]
    };

    let payload = if payload_length > 0 {
        let body = cursor.read(payload_length)?;
        message_acc = message_acc.update(body);
        Bytes::copy_from_slice(body)
    } else {
        Bytes::new()
    };

    let message_crc = cursor.read_u32_be()?;
    let expected = message_acc.finalize();
    if message_crc != expected {
        return Err(SelectError::MessageChecksumMismatch {
            expected,
            actual: message_crc,
        });
    }

    let headers = parse_headers(block)?;

    Ok(Frame {
        prelude,
        headers,
        payload,
        message_crc,
    })
}

/// Build a complete frame as a single byte vector.
///
/// # Errors
///
/// Returns [`SelectError::HeaderTooLong`] for headers that cannot be encoded
/// and [`SelectError::MessageTooLarge`] if the frame would not fit a u32
/// length.
///
/// # Example
///
/// ```
/// use select_eventstream::protocol::{build_frame, Headers};
///
/// let bytes = build_frame(&Headers::new(), b"hello").unwrap();
/// assert_eq!(bytes.len(), 16 + 5); // overhead + payload
/// ```
pub fn build_frame(headers: &Headers, payload: &[u8]) -> Result<Vec<u8>> {
    let block = encode_headers(headers)?;

    let total = PRELUDE_TOTAL_LEN + block.len() + payload.len() + MESSAGE_CRC_LEN;
    let total_length = u32::try_from(total).map_err(|_| SelectError::MessageTooLarge {
        size: u32::MAX,
        max: u32::MAX,
    })?;
    debug_assert!(total_length >= MESSAGE_OVERHEAD);

    // Block length is bounded by total_length.
    let prelude = Prelude::new(total_length, block.len() as u32);

    let mut buf = Vec::with_capacity(total);
    buf.extend_from_slice(&prelude.encode());
    buf.extend_from_slice(&block);
    buf.extend_from_slice(payload);

    let message_crc = Crc32::new().update(&buf).finalize();
    buf.extend_from_slice(&message_crc.to_be_bytes());

    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records_headers() -> Headers {
        Headers::new()
            .with(MESSAGE_TYPE_HEADER, "event")
            .with(EVENT_TYPE_HEADER, "Records")
            .with(CONTENT_TYPE_HEADER, "application/octet-stream")
    }

    #[test]
    fn test_read_frame_roundtrip() {
        let bytes = build_frame(&records_headers(), b"a,b,c\n").unwrap();
        let mut cursor = ByteCursor::new(&bytes);
        let frame = read_frame(&mut cursor, u32::MAX).unwrap();

        assert_eq!(frame.headers, records_headers());
        assert_eq!(frame.payload(), b"a,b,c\n");
        assert_eq!(frame.message_type(), Some("event"));
        assert_eq!(frame.event_type(), Some("Records"));
        assert_eq!(frame.content_type(), Some("application/octet-stream"));
        assert_eq!(frame.wire_len(), bytes.len());
        assert!(cursor.is_empty());
    }

    #[test]
    fn test_build_frame_layout() {
        let bytes = build_frame(&records_headers(), b"xyz").unwrap();
        let prelude = Prelude::decode(&bytes).unwrap();

        assert_eq!(prelude.total_length as usize, bytes.len());
        assert!(prelude.verify_crc().is_ok());
        assert_eq!(prelude.payload_length().unwrap(), 3);

        let crc_offset = bytes.len() - MESSAGE_CRC_LEN;
        let stored = u32::from_be_bytes(bytes[crc_offset..].try_into().unwrap());
        assert_eq!(stored, crc32fast::hash(&bytes[..crc_offset]));
    }

    #[test]
    fn test_empty_headers_and_payload() {
        let bytes = build_frame(&Headers::new(), b"").unwrap();
        assert_eq!(bytes.len(), MESSAGE_OVERHEAD as usize);

        let frame = read_frame(&mut ByteCursor::new(&bytes), u32::MAX).unwrap();
        assert!(frame.headers.is_empty());
        assert_eq!(frame.payload_len(), 0);
        assert_eq!(frame.message_type(), None);
    }

    #[test]
    fn test_message_crc_checked_for_empty_payload() {
        let headers = Headers::new().with(EVENT_TYPE_HEADER, "End");
        let mut bytes = build_frame(&headers, b"").unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0xFF;

        let err = read_frame(&mut ByteCursor::new(&bytes), u32::MAX).unwrap_err();
        assert!(matches!(err, SelectError::MessageChecksumMismatch { .. }));
    }

    #[test]
    fn test_prelude_corruption_detected() {
        let bytes = build_frame(&records_headers(), b"payload").unwrap();

        for i in 0..PRELUDE_TOTAL_LEN {
            let mut corrupted = bytes.clone();
            corrupted[i] ^= 0x01;
            let err = read_frame(&mut ByteCursor::new(&corrupted), u32::MAX).unwrap_err();
            assert!(
                matches!(err, SelectError::HeaderChecksumMismatch { .. }),
                "byte {i}: {err:?}"
            );
        }
    }

    #[test]
    fn test_body_corruption_detected() {
        let bytes = build_frame(&records_headers(), b"payload").unwrap();
        let body_end = bytes.len() - MESSAGE_CRC_LEN;

        let payload_start = body_end - 7;
        for i in payload_start..body_end {
            let mut corrupted = bytes.clone();
            corrupted[i] ^= 0x20;
            let err = read_frame(&mut ByteCursor::new(&corrupted), u32::MAX).unwrap_err();
            assert!(
                matches!(err, SelectError::MessageChecksumMismatch { .. }),
                "byte {i}: {err:?}"
            );
        }
    }

    #[test]
    fn test_header_block_corruption_detected() {
        let bytes = build_frame(&records_headers(), b"payload").unwrap();
        let header_length = Prelude::decode(&bytes).unwrap().header_length as usize;
        let block = PRELUDE_TOTAL_LEN..PRELUDE_TOTAL_LEN + header_length;

        for i in block {
            for bit in 0..8 {
                let mut corrupted = bytes.clone();
                corrupted[i] ^= 1 << bit;
                let err = read_frame(&mut ByteCursor::new(&corrupted), u32::MAX).unwrap_err();
                assert!(
                    matches!(err, SelectError::MessageChecksumMismatch { .. }),
                    "byte {i} bit {bit}: {err:?}"
                );
            }
        }
    }

    #[test]
    fn test_malformed_header_block_with_valid_crc() {
        // Name length 9 with only one byte behind it.
        let block = [9u8, b':'];
        let total = PRELUDE_TOTAL_LEN + block.len() + MESSAGE_CRC_LEN;

        let mut bytes = Prelude::new(total as u32, block.len() as u32).encode().to_vec();
        bytes.extend_from_slice(&block);
        let crc = crc32fast::hash(&bytes);
        bytes.extend_from_slice(&crc.to_be_bytes());

        let err = read_frame(&mut ByteCursor::new(&bytes), u32::MAX).unwrap_err();
        assert!(matches!(err, SelectError::Underrun { needed: 9, remaining: 1 }));
    }

    #[test]
    fn test_prelude_checked_before_payload_read() {
        // Claims a 1 GB message but only 12 bytes exist.
        let mut bytes = Prelude::new(1 << 30, 0).encode().to_vec();
        bytes[PRELUDE_LEN] ^= 0xFF;

        let err = read_frame(&mut ByteCursor::new(&bytes), u32::MAX).unwrap_err();
        assert!(matches!(err, SelectError::HeaderChecksumMismatch { .. }));
    }

    #[test]
    fn test_truncated_frame_underrun() {
        let bytes = build_frame(&records_headers(), b"payload").unwrap();
        let truncated = &bytes[..bytes.len() - 2];

        let err = read_frame(&mut ByteCursor::new(truncated), u32::MAX).unwrap_err();
        assert!(matches!(err, SelectError::Underrun { needed: 4, remaining: 2 }));
    }

    #[test]
    fn test_short_prelude_underrun() {
        let err = read_frame(&mut ByteCursor::new(&[0u8; 6]), u32::MAX).unwrap_err();
        assert!(matches!(err, SelectError::Underrun { .. }));
    }

    #[test]
    fn test_negative_payload_length() {
        // Valid prelude CRC, but header length exceeds the total.
        let bytes = Prelude::new(20, 10).encode();
        let err = read_frame(&mut ByteCursor::new(&bytes), u32::MAX).unwrap_err();
        assert!(matches!(err, SelectError::InvalidLength { .. }));
    }

    #[test]
    fn test_max_message_size_enforced() {
        let bytes = build_frame(&records_headers(), &[0u8; 128]).unwrap();
        let err = read_frame(&mut ByteCursor::new(&bytes), 64).unwrap_err();
        assert!(matches!(err, SelectError::MessageTooLarge { max: 64, .. }));
    }

    #[test]
    fn test_sequential_frames() {
        let mut stream = build_frame(&records_headers(), b"one").unwrap();
        stream.extend(build_frame(&records_headers(), b"two").unwrap());

        let mut cursor = ByteCursor::new(&stream);
        assert_eq!(read_frame(&mut cursor, u32::MAX).unwrap().payload(), b"one");
        assert_eq!(read_frame(&mut cursor, u32::MAX).unwrap().payload(), b"two");
        assert!(cursor.is_empty());
    }
}
