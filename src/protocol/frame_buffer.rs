//! Frame buffer for accumulating partial reads.
//!
//! Uses `bytes::BytesMut` to collect transport chunks and a small state
//! machine to cut complete frames out of them:
//! - `WaitingForPrelude`: Need at least 12 bytes
//! - `WaitingForMessage`: Prelude verified, need the rest of the frame
//!
//! Running short of bytes is never an error here; it only means "push more".
//! Whether a partial frame at end of input is a truncation is decided by
//! [`FrameBuffer::finish`], which the owner calls once the transport is
//! exhausted.
//!
//! # Example
//!
//! ```
//! use select_eventstream::protocol::{build_frame, FrameBuffer, Headers};
//!
//! let bytes = build_frame(&Headers::new().with("event-type", "End"), b"").unwrap();
//! let mut buffer = FrameBuffer::new();
//!
//! assert!(buffer.push(&bytes[..5]).unwrap().is_empty());
//! let frames = buffer.push(&bytes[5..]).unwrap();
//! assert_eq!(frames.len(), 1);
//! assert!(buffer.finish().is_ok());
//! ```

use bytes::BytesMut;

use super::cursor::ByteCursor;
use super::frame::{read_frame, Frame};
use super::wire_format::{Prelude, PRELUDE_TOTAL_LEN};
use crate::config::DEFAULT_MAX_MESSAGE_SIZE;
use crate::error::{Result, SelectError};

/// State machine for frame parsing.
#[derive(Debug, Clone, Copy)]
enum State {
    /// Waiting for the 12-byte prelude.
    WaitingForPrelude,
    /// Prelude verified, waiting for `total` bytes in all.
    WaitingForMessage { total: usize },
}

/// Buffer for accumulating incoming bytes and extracting complete frames.
pub struct FrameBuffer {
    /// Accumulated bytes from transport reads.
    buffer: BytesMut,
    /// Current parsing state.
    state: State,
    /// Maximum allowed message size.
    max_message_size: u32,
}

impl FrameBuffer {
    /// Create a new frame buffer with default settings.
    ///
    /// Default capacity: 64KB, max message: [`DEFAULT_MAX_MESSAGE_SIZE`].
    pub fn new() -> Self {
        Self::with_max_message(DEFAULT_MAX_MESSAGE_SIZE)
    }

    /// Create a new frame buffer with custom max message size.
    pub fn with_max_message(max_message_size: u32) -> Self {
        Self {
            buffer: BytesMut::with_capacity(64 * 1024),
            state: State::WaitingForPrelude,
            max_message_size,
        }
    }

    /// Push data into the buffer and extract all complete frames.
    ///
    /// Partial data is kept for the next push.
    ///
    /// # Errors
    ///
    /// Returns error if a prelude or message checksum fails, or a frame
    /// exceeds the configured maximum.
    pub fn push(&mut self, data: &[u8]) -> Result<Vec<Frame>> {
        self.buffer.extend_from_slice(data);

        let mut frames = Vec::new();
        while let Some(frame) = self.try_extract_one()? {
            frames.push(frame);
        }

        Ok(frames)
    }

    /// Append data to the buffer without extracting frames.
    ///
    /// Pair with [`next_frame`](Self::next_frame) to stop extracting part
    /// way through the buffered data.
    pub fn extend(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// Extract the next complete frame, if one is buffered.
    pub fn next_frame(&mut self) -> Result<Option<Frame>> {
        self.try_extract_one()
    }

    /// Try to extract a single frame from the buffer.
    ///
    /// Returns:
    /// - `Ok(Some(frame))` if a complete frame was extracted
    /// - `Ok(None)` if more data is needed
    /// - `Err(...)` if the stream is corrupt
    fn try_extract_one(&mut self) -> Result<Option<Frame>> {
        match self.state {
            State::WaitingForPrelude => {
                let Some(prelude) = Prelude::decode(&self.buffer) else {
                    return Ok(None);
                };

                // Never wait on a length that has not been checksummed.
                prelude.verify_crc()?;
                prelude.validate(self.max_message_size)?;

                let total = prelude.total_length as usize;
                self.buffer.reserve(total.saturating_sub(self.buffer.len()));
                self.state = State::WaitingForMessage { total };

                self.try_extract_one()
            }

            State::WaitingForMessage { total } => {
                if self.buffer.len() < total {
                    return Ok(None);
                }

                let message = self.buffer.split_to(total).freeze();
                self.state = State::WaitingForPrelude;

                let mut cursor = ByteCursor::new(&message);
                read_frame(&mut cursor, self.max_message_size).map(Some)
            }
        }
    }

    /// Signal that the transport is exhausted.
    ///
    /// # Errors
    ///
    /// Returns [`SelectError::Truncated`] if a partial frame is buffered.
    pub fn finish(&self) -> Result<()> {
        if self.buffer.is_empty() {
            Ok(())
        } else {
            Err(SelectError::Truncated {
                buffered: self.buffer.len(),
            })
        }
    }

    /// Get the number of buffered bytes.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Clear the buffer and reset state.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.state = State::WaitingForPrelude;
    }

    /// Get the current state for debugging.
    #[cfg(test)]
    fn state_name(&self) -> &'static str {
        match self.state {
            State::WaitingForPrelude => "WaitingForPrelude",
            State::WaitingForMessage { .. } => "WaitingForMessage",
        }
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameBuffer")
            .field("buffered", &self.buffer.len())
            .field("state", &self.state)
            .field("max_message_size", &self.max_message_size)
            .finish()
    }
}
