//! Accumulated output of one decode call.
//!
//! # Example
//!
//! ```
//! use std::io::Read;
//! use select_eventstream::SelectResults;
//!
//! let mut results = SelectResults::new();
//! results.append_records(b"a,b,c\n");
//! results.append_records(b"d,e,f\n");
//!
//! let mut text = String::new();
//! results.records_reader().read_to_string(&mut text).unwrap();
//! assert_eq!(text, "a,b,c\nd,e,f\n");
//! ```

use bytes::buf::Reader;
use bytes::{Buf, Bytes, BytesMut};

/// Position of a decode call in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodeState {
    /// Still consuming frames.
    #[default]
    Streaming,
    /// End event seen.
    Done,
    /// A fatal error stopped decoding.
    Failed,
}

/// Records, progress, stats and the raw response of a select query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectResults {
    records: BytesMut,
    progress: Option<String>,
    stats: Option<String>,
    response: Option<Bytes>,
    state: DecodeState,
}

impl SelectResults {
    /// Create empty results in the `Streaming` state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append record bytes verbatim.
    pub fn append_records(&mut self, data: &[u8]) {
        self.records.extend_from_slice(data);
    }

    /// Replace the progress document.
    pub fn set_progress(&mut self, xml: String) {
        self.progress = Some(xml);
    }

    /// Replace the stats document.
    pub fn set_stats(&mut self, xml: String) {
        self.stats = Some(xml);
    }

    /// Attach the raw response and mark the stream as complete.
    pub fn complete(&mut self, response: Option<Bytes>) {
        self.response = response;
        self.state = DecodeState::Done;
    }

    pub(crate) fn set_state(&mut self, state: DecodeState) {
        self.state = state;
    }

    /// All record bytes received so far.
    pub fn records(&self) -> &[u8] {
        &self.records
    }

    /// Record bytes as a `std::io::Read` stream, borrowed from the results.
    pub fn records_reader(&self) -> Reader<&[u8]> {
        self.records().reader()
    }

    /// Take the record bytes without copying.
    pub fn into_records(self) -> Bytes {
        self.records.freeze()
    }

    /// Latest progress XML, if any arrived.
    pub fn progress(&self) -> Option<&str> {
        self.progress.as_deref()
    }

    /// Latest stats XML, if any arrived.
    pub fn stats(&self) -> Option<&str> {
        self.stats.as_deref()
    }

    /// Raw response the stream was decoded from, set on End.
    pub fn response(&self) -> Option<&Bytes> {
        self.response.as_ref()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> DecodeState {
        self.state
    }

    /// Check if the End event was seen.
    pub fn is_complete(&self) -> bool {
        self.state == DecodeState::Done
    }
}
