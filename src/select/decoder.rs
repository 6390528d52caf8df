//! Decode loop and event dispatch.
//!
//! [`SelectDecoder`] drives the `Streaming → Done | Failed` state machine:
//! every frame is classified into a [`DecodedEvent`] and applied to the
//! [`SelectResults`] it owns. Errors are fatal and drop the partial results.
//!
//! # Example
//!
//! ```
//! use bytes::Bytes;
//! use select_eventstream::protocol::{build_frame, Headers};
//! use select_eventstream::decode_select_response;
//!
//! let event = |kind: &str| Headers::new().with("message-type", "event").with("event-type", kind);
//!
//! let mut body = build_frame(&event("Records"), b"a,b,c").unwrap();
//! body.extend(build_frame(&event("Records"), b"d,e,f").unwrap());
//! body.extend(build_frame(&event("End"), b"").unwrap());
//!
//! let results = decode_select_response(Bytes::from(body)).unwrap();
//! assert_eq!(results.records(), b"a,b,cd,e,f");
//! assert!(results.is_complete());
//! ```

use std::ops::ControlFlow;

use bytes::Bytes;

use super::event::DecodedEvent;
use super::results::{DecodeState, SelectResults};
use crate::config::DecoderConfig;
use crate::error::{Result, SelectError};
use crate::protocol::{read_frame, ByteCursor, Frame};

/// Decode a complete select response body with the default configuration.
pub fn decode_select_response(body: Bytes) -> Result<SelectResults> {
    SelectDecoder::new().decode(body)
}

/// Event dispatcher owning the results of one decode call.
#[derive(Debug, Default)]
pub struct SelectDecoder {
    config: DecoderConfig,
    results: SelectResults,
}

impl SelectDecoder {
    /// Create a decoder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a decoder with custom configuration.
    pub fn with_config(config: DecoderConfig) -> Self {
        Self {
            config,
            results: SelectResults::new(),
        }
    }

    /// Configuration in use.
    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Current state.
    pub fn state(&self) -> DecodeState {
        self.results.state()
    }

    /// Decode a fully buffered response body.
    ///
    /// Reads frames while bytes remain, stopping at the End event. Bytes
    /// after End are not read.
    pub fn decode(mut self, body: Bytes) -> Result<SelectResults> {
        let mut cursor = ByteCursor::new(&body);

        while !cursor.is_empty() {
            let frame = self.fail_on_err(read_frame(&mut cursor, self.config.max_message_size))?;
            if self.dispatch(frame, || body.clone())?.is_break() {
                if !cursor.is_empty() {
                    tracing::debug!("Ignoring {} bytes after End event", cursor.remaining());
                }
                break;
            }
        }

        self.finish()
    }

    /// Apply one frame.
    ///
    /// `response` supplies the raw response handle if this frame is End.
    /// Returns `Break` once the stream is done.
    ///
    /// # Errors
    ///
    /// Server error events and unsupported content types are returned as
    /// errors and move the decoder to `Failed`.
    pub fn dispatch(
        &mut self,
        frame: Frame,
        response: impl FnOnce() -> Bytes,
    ) -> Result<ControlFlow<()>> {
        if self.state() != DecodeState::Streaming {
            tracing::debug!("Frame after decoding stopped, ignoring");
            return Ok(ControlFlow::Break(()));
        }

        let event = self.fail_on_err(DecodedEvent::from_frame(frame))?;
        tracing::debug!("Dispatching {} event", event.name());

        match event {
            DecodedEvent::Records(data) => self.results.append_records(&data),
            DecodedEvent::Progress(xml) => self.results.set_progress(xml),
            DecodedEvent::Stats(xml) => self.results.set_stats(xml),
            DecodedEvent::End => {
                self.results.complete(Some(response()));
                tracing::debug!(
                    "End event received, {} record bytes",
                    self.results.records().len()
                );
                return Ok(ControlFlow::Break(()));
            }
            DecodedEvent::Continuation { event_type } => {
                tracing::warn!(
                    "Unimplemented event {} detected, skipping",
                    event_type.as_deref().unwrap_or("<none>")
                );
            }
        }

        Ok(ControlFlow::Continue(()))
    }

    /// Close the decode call once input is exhausted.
    ///
    /// Without an End event the partial results are returned as-is (state
    /// `Streaming`), unless the configuration requires End.
    ///
    /// # Errors
    ///
    /// - [`SelectError::MissingEnd`] when End is required and absent
    /// - [`SelectError::Failed`] when an earlier error stopped decoding
    pub fn finish(self) -> Result<SelectResults> {
        match self.state() {
            DecodeState::Done => Ok(self.results),
            DecodeState::Failed => Err(SelectError::Failed),
            DecodeState::Streaming if self.config.require_end_event => Err(SelectError::MissingEnd),
            DecodeState::Streaming => {
                tracing::debug!("Input exhausted before End event, returning partial results");
                Ok(self.results)
            }
        }
    }

    /// Move to `Failed` if `result` is an error.
    fn fail_on_err<T>(&mut self, result: Result<T>) -> Result<T> {
        if result.is_err() {
            self.results.set_state(DecodeState::Failed);
        }
        result
    }
}
