//! Decoder configuration.
//!
//! Can be built in code or loaded from JSON; missing fields take their
//! defaults.
//!
//! # Example
//!
//! ```
//! use select_eventstream::DecoderConfig;
//!
//! let config = DecoderConfig::from_json(r#"{ "require_end_event": true }"#).unwrap();
//! assert!(config.require_end_event);
//! assert_eq!(config.read_buffer_size, 64 * 1024);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Default maximum message size (16 MiB payload plus headers).
pub const DEFAULT_MAX_MESSAGE_SIZE: u32 = 16 * 1024 * 1024 + 128 * 1024;

/// Default chunk size for reader-based decoding.
pub const DEFAULT_READ_BUFFER_SIZE: usize = 64 * 1024;

/// Configuration for [`SelectDecoder`](crate::SelectDecoder).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    /// Largest accepted frame, checked once the prelude CRC has passed.
    pub max_message_size: u32,
    /// Fail with `MissingEnd` when input runs out before the End event.
    pub require_end_event: bool,
    /// Bytes requested per read in reader-based decoding.
    pub read_buffer_size: usize,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
            require_end_event: false,
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
        }
    }
}

impl DecoderConfig {
    /// Parse a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`SelectError::Json`](crate::SelectError::Json) if the input
    /// is not a valid configuration.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Set the maximum message size.
    #[must_use]
    pub fn with_max_message_size(mut self, max_message_size: u32) -> Self {
        self.max_message_size = max_message_size;
        self
    }

    /// Require an End event for success.
    #[must_use]
    pub fn with_require_end_event(mut self, require: bool) -> Self {
        self.require_end_event = require;
        self
    }

    /// Set the reader chunk size. Zero is bumped to one.
    #[must_use]
    pub fn with_read_buffer_size(mut self, size: usize) -> Self {
        self.read_buffer_size = size.max(1);
        self
    }
}
