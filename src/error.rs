//! Error types for select-eventstream.

use thiserror::Error;

/// Main error type for all decoding operations.
///
/// Every variant is fatal to the decode call that produced it. Retrying is
/// the caller's business and happens at the request level.
#[derive(Debug, Error)]
pub enum SelectError {
    /// A read asked for more bytes than the buffer holds.
    #[error("Buffer underrun: needed {needed} bytes, {remaining} remaining")]
    Underrun { needed: usize, remaining: usize },

    /// The prelude CRC does not match the two length fields.
    #[error("Header checksum mismatch: prelude CRC {actual:#010x} does not equal expected CRC {expected:#010x}")]
    HeaderChecksumMismatch { expected: u32, actual: u32 },

    /// The trailing message CRC does not match the frame contents.
    #[error("Message checksum mismatch: message CRC {actual:#010x} does not equal expected CRC {expected:#010x}")]
    MessageChecksumMismatch { expected: u32, actual: u32 },

    /// The server reported an error event.
    #[error("{code}: \"{message}\"")]
    Protocol { code: String, message: String },

    /// Progress or Stats event carrying something other than `text/xml`.
    #[error("Unexpected content-type {} sent for event-type {event_type}", .content_type.as_deref().unwrap_or("<none>"))]
    UnsupportedContentType {
        event_type: String,
        content_type: Option<String>,
    },

    /// Length fields that cannot describe a valid frame.
    #[error("Invalid frame length: total {total_length}, headers {header_length}")]
    InvalidLength { total_length: u32, header_length: u32 },

    /// A frame larger than the configured limit.
    #[error("Message size {size} exceeds maximum {max}")]
    MessageTooLarge { size: u32, max: u32 },

    /// A header that does not fit the wire encoding.
    #[error("Header too long: {0}")]
    HeaderTooLong(String),

    /// Transport ended with a partial frame buffered.
    #[error("Stream truncated: {buffered} bytes of an incomplete frame buffered")]
    Truncated { buffered: usize },

    /// Input ran out before the End event.
    #[error("Stream ended without an End event")]
    MissingEnd,

    /// The decoder was finished after an earlier error stopped it.
    #[error("Decoding already failed")]
    Failed,

    /// JSON configuration error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error from the underlying reader.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using SelectError.
pub type Result<T> = std::result::Result<T, SelectError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_error_display() {
        let err = SelectError::Protocol {
            code: "InternalError".to_string(),
            message: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "InternalError: \"boom\"");
    }

    #[test]
    fn test_checksum_display_uses_hex() {
        let err = SelectError::HeaderChecksumMismatch {
            expected: 0xDEADBEEF,
            actual: 1,
        };
        let msg = err.to_string();
        assert!(msg.contains("0xdeadbeef"), "got: {msg}");
        assert!(msg.contains("0x00000001"), "got: {msg}");
    }

    #[test]
    fn test_unsupported_content_type_display() {
        let err = SelectError::UnsupportedContentType {
            event_type: "Progress".to_string(),
            content_type: Some("application/json".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "Unexpected content-type application/json sent for event-type Progress"
        );

        let err = SelectError::UnsupportedContentType {
            event_type: "Stats".to_string(),
            content_type: None,
        };
        assert!(err.to_string().contains("<none>"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<u32>("nope").unwrap_err();
        let err: SelectError = json_err.into();
        assert!(matches!(err, SelectError::Json(_)));
        assert!(err.to_string().starts_with("JSON error"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "eof");
        let err: SelectError = io_err.into();
        assert!(matches!(err, SelectError::Io(_)));
        assert!(err.to_string().contains("I/O error"));
    }
}
