//! # select-eventstream
//!
//! Decoder for the binary event stream that object-storage "select" queries
//! return their results in.
//!
//! The stream is a sequence of self-contained frames. Each frame carries a
//! CRC-protected prelude, a block of string headers, an optional payload,
//! and a CRC over the whole message. The decoder validates both checksums,
//! classifies each frame by its headers, and collects the result:
//!
//! - `Records` payloads are concatenated into the record buffer
//! - `Progress` / `Stats` XML documents are kept (latest wins)
//! - `End` finishes the stream
//! - `error` messages abort decoding with the server's code and message
//!
//! ## Layers
//!
//! - [`protocol`]: byte cursor, CRC accumulator, headers, frame reader
//! - [`select`]: event classification, dispatch state machine, results
//!
//! ## Example
//!
//! ```
//! use bytes::Bytes;
//! use select_eventstream::decode_select_response;
//! use select_eventstream::protocol::{build_frame, Headers};
//!
//! let records = Headers::new()
//!     .with("message-type", "event")
//!     .with("event-type", "Records");
//! let end = Headers::new()
//!     .with("message-type", "event")
//!     .with("event-type", "End");
//!
//! let mut body = build_frame(&records, b"1,alice\n").unwrap();
//! body.extend(build_frame(&end, b"").unwrap());
//!
//! let results = decode_select_response(Bytes::from(body)).unwrap();
//! assert_eq!(results.records(), b"1,alice\n");
//! ```

pub mod config;
pub mod error;
pub mod protocol;
pub mod select;

pub use config::DecoderConfig;
pub use error::{Result, SelectError};
pub use select::{
    decode_from_reader, decode_select_response, DecodeState, DecodedEvent, SelectDecoder,
    SelectResults,
};
