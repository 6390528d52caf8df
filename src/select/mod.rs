//! Select module - event classification, dispatch, and results.
//!
//! - [`DecodedEvent`] - typed view of one frame
//! - [`SelectDecoder`] - the dispatch state machine and decode loop
//! - [`SelectResults`] - records, progress, stats, and the raw response
//! - [`decode_from_reader`] - the same loop over an async reader

mod decoder;
mod event;
mod reader;
mod results;

pub use decoder::{decode_select_response, SelectDecoder};
pub use event::{
    event_types, DecodedEvent, MessageType, ERROR_CODE_HEADER, ERROR_MESSAGE_HEADER,
    MESSAGE_TYPE_ERROR, MESSAGE_TYPE_EVENT, XML_CONTENT_TYPE,
};
pub use reader::decode_from_reader;
pub use results::{DecodeState, SelectResults};
