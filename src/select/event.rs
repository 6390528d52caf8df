//! Typed classification of decoded frames.
//!
//! Turns the `message-type` / `event-type` / `content-type` headers of a
//! [`Frame`] into a [`DecodedEvent`], so the dispatcher matches on variants
//! instead of comparing header strings.

use bytes::Bytes;

use crate::error::{Result, SelectError};
use crate::protocol::Frame;

/// `message-type` value for events.
pub const MESSAGE_TYPE_EVENT: &str = "event";

/// `message-type` value for server errors.
pub const MESSAGE_TYPE_ERROR: &str = "error";

/// Header carrying the server error code.
pub const ERROR_CODE_HEADER: &str = "error-code";

/// Header carrying the server error message.
pub const ERROR_MESSAGE_HEADER: &str = "error-message";

/// The only content type accepted for Progress and Stats.
pub const XML_CONTENT_TYPE: &str = "text/xml";

/// Event type names.
pub mod event_types {
    pub const RECORDS: &str = "Records";
    pub const PROGRESS: &str = "Progress";
    pub const STATS: &str = "Stats";
    pub const END: &str = "End";
}

/// Value of the `message-type` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageType {
    Event,
    Error,
    /// Present but unrecognized.
    Other(String),
    /// Header absent.
    Missing,
}

impl MessageType {
    /// Classify a frame's `message-type` header.
    pub fn of(frame: &Frame) -> Self {
        match frame.message_type() {
            Some(MESSAGE_TYPE_EVENT) => MessageType::Event,
            Some(MESSAGE_TYPE_ERROR) => MessageType::Error,
            Some(other) => MessageType::Other(other.to_string()),
            None => MessageType::Missing,
        }
    }
}

/// A classified frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedEvent {
    /// Record bytes, delivered verbatim.
    Records(Bytes),
    /// Progress XML document.
    Progress(String),
    /// Stats XML document.
    Stats(String),
    /// End of the result stream.
    End,
    /// Anything else. Carries no assumed payload.
    Continuation { event_type: Option<String> },
}

impl DecodedEvent {
    /// Classify a frame.
    ///
    /// # Errors
    ///
    /// - [`SelectError::Protocol`] for `error` messages
    /// - [`SelectError::UnsupportedContentType`] for Progress/Stats that are
    ///   not `text/xml`
    pub fn from_frame(frame: Frame) -> Result<Self> {
        match MessageType::of(&frame) {
            MessageType::Error => Err(SelectError::Protocol {
                code: frame.header(ERROR_CODE_HEADER).unwrap_or_default().to_string(),
                message: frame
                    .header(ERROR_MESSAGE_HEADER)
                    .unwrap_or_default()
                    .to_string(),
            }),
            MessageType::Event => Self::from_event(&frame),
            MessageType::Other(_) | MessageType::Missing => Ok(DecodedEvent::Continuation {
                event_type: frame.event_type().map(str::to_string),
            }),
        }
    }

    fn from_event(frame: &Frame) -> Result<Self> {
        match frame.event_type() {
            Some(event_types::END) => Ok(DecodedEvent::End),
            Some(event_types::RECORDS) => Ok(DecodedEvent::Records(frame.payload.clone())),
            Some(event_types::PROGRESS) => {
                xml_payload(frame, event_types::PROGRESS).map(DecodedEvent::Progress)
            }
            Some(event_types::STATS) => {
                xml_payload(frame, event_types::STATS).map(DecodedEvent::Stats)
            }
            other => Ok(DecodedEvent::Continuation {
                event_type: other.map(str::to_string),
            }),
        }
    }

    /// Event name for logging.
    pub fn name(&self) -> &str {
        match self {
            DecodedEvent::Records(_) => event_types::RECORDS,
            DecodedEvent::Progress(_) => event_types::PROGRESS,
            DecodedEvent::Stats(_) => event_types::STATS,
            DecodedEvent::End => event_types::END,
            DecodedEvent::Continuation { event_type } => {
                event_type.as_deref().unwrap_or("<none>")
            }
        }
    }
}

/// Payload text of a Progress/Stats frame, after the content-type check.
fn xml_payload(frame: &Frame, event_type: &str) -> Result<String> {
    match frame.content_type() {
        Some(XML_CONTENT_TYPE) => Ok(String::from_utf8_lossy(frame.payload()).into_owned()),
        other => Err(SelectError::UnsupportedContentType {
            event_type: event_type.to_string(),
            content_type: other.map(str::to_string),
        }),
    }
}
