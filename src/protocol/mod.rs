//! Protocol module - wire format, framing, and frame types.
//!
//! This module implements the binary event-stream layer:
//! - 12-byte prelude with its own CRC
//! - Header block of length-prefixed name/value pairs
//! - Single-frame reader over a borrowed buffer
//! - Frame buffer for accumulating partial reads

mod checksum;
mod cursor;
mod frame;
mod frame_buffer;
mod headers;
mod wire_format;

pub use checksum::Crc32;
pub use cursor::ByteCursor;
pub use frame::{
    build_frame, read_frame, Frame, CONTENT_TYPE_HEADER, EVENT_TYPE_HEADER, MESSAGE_TYPE_HEADER,
};
pub use frame_buffer::FrameBuffer;
pub use headers::{encode_headers, parse_headers, HeaderEntry, Headers};
pub use wire_format::{
    Prelude, HEADER_NAME_SEPARATOR, HEADER_VALUE_TYPE_STRING, MESSAGE_CRC_LEN, MESSAGE_OVERHEAD,
    PRELUDE_CRC_LEN, PRELUDE_LEN, PRELUDE_TOTAL_LEN,
};
