//! Header block encoding and decoding.
//!
//! The header block is a sequence of entries:
//! ```text
//! ┌──────────┬──────────────────┬────────────┬───────────┬───────────┐
//! │ Name len │ ":" + name       │ Value type │ Value len │ Value     │
//! │ 1 byte   │ name len bytes   │ 1 byte     │ uint16 BE │ N bytes   │
//! └──────────┴──────────────────┴────────────┴───────────┴───────────┘
//! ```
//!
//! Every value is treated as a string regardless of its type byte.

use std::collections::BTreeMap;

use crate::error::{Result, SelectError};

use super::cursor::ByteCursor;
use super::wire_format::{HEADER_NAME_SEPARATOR, HEADER_VALUE_TYPE_STRING};

/// Single decoded header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderEntry {
    pub name: String,
    pub value: String,
}

/// Ordered header list.
///
/// Duplicates are kept in arrival order. Lookups resolve to the last entry
/// with a given name, so the last write wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<HeaderEntry>,
}

impl Headers {
    /// Create an empty header list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a header.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push(HeaderEntry {
            name: name.into(),
            value: value.into(),
        });
    }

    /// Builder-style [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Value of the last header named `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|entry| entry.name == name)
            .map(|entry| entry.value.as_str())
    }

    /// All entries in wire order, duplicates included.
    pub fn entries(&self) -> &[HeaderEntry] {
        &self.entries
    }

    /// Number of entries, duplicates included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if there are no headers.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Collapse into a name → value map, last write wins.
    pub fn to_map(&self) -> BTreeMap<String, String> {
        self.entries
            .iter()
            .map(|entry| (entry.name.clone(), entry.value.clone()))
            .collect()
    }
}

/// Decode a header block.
///
/// # Errors
///
/// Returns [`SelectError::Underrun`] if any length field overruns the block.
pub fn parse_headers(block: &[u8]) -> Result<Headers> {
    let mut cursor = ByteCursor::new(block);
    let mut headers = Headers::new();

    while !cursor.is_empty() {
        let name_len = cursor.read_u8()? as usize;
        let name = header_name(cursor.read(name_len)?);

        let value_type = cursor.read_u8()?;
        if value_type != HEADER_VALUE_TYPE_STRING {
            tracing::trace!("Header {} has value type {}, reading as string", name, value_type);
        }

        let value_len = cursor.read_u16_be()? as usize;
        let value = String::from_utf8_lossy(cursor.read(value_len)?).into_owned();

        headers.insert(name, value);
    }

    Ok(headers)
}

/// Name portion of a raw name field: everything after the first separator.
fn header_name(raw: &[u8]) -> String {
    let name = match raw.iter().position(|&b| b == HEADER_NAME_SEPARATOR) {
        Some(idx) => &raw[idx + 1..],
        None => raw,
    };
    String::from_utf8_lossy(name).into_owned()
}

/// Encode headers into a header block.
///
/// Names are written with a leading `:` and every value as a string.
///
/// # Errors
///
/// Returns [`SelectError::HeaderTooLong`] if a name exceeds 254 bytes or a
/// value exceeds 65535 bytes.
pub fn encode_headers(headers: &Headers) -> Result<Vec<u8>> {
    let mut buf = Vec::new();

    for entry in headers.entries() {
        let name_len = u8::try_from(entry.name.len() + 1).map_err(|_| {
            SelectError::HeaderTooLong(format!("name of {} bytes", entry.name.len()))
        })?;
        let value_len = u16::try_from(entry.value.len()).map_err(|_| {
            SelectError::HeaderTooLong(format!(
                "value of {} bytes for {}",
                entry.value.len(),
                entry.name
            ))
        })?;

        buf.push(name_len);
        buf.push(HEADER_NAME_SEPARATOR);
        buf.extend_from_slice(entry.name.as_bytes());
        buf.push(HEADER_VALUE_TYPE_STRING);
        buf.extend_from_slice(&value_len.to_be_bytes());
        buf.extend_from_slice(entry.value.as_bytes());
    }

    Ok(buf)
}
