//! Pull-based reader over a borrowed byte slice.
//!
//! Every read either returns exactly the requested number of bytes or fails
//! with [`SelectError::Underrun`]. Returned slices borrow the underlying
//! buffer; nothing is copied.
//!
//! # Example
//!
//! ```
//! use select_eventstream::protocol::ByteCursor;
//!
//! let data = [0, 0, 0, 42, 0xFF];
//! let mut cursor = ByteCursor::new(&data);
//!
//! assert_eq!(cursor.read_u32_be().unwrap(), 42);
//! assert_eq!(cursor.remaining(), 1);
//! assert!(cursor.read(2).is_err());
//! ```

use crate::error::{Result, SelectError};

/// Cursor over an in-memory buffer.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    /// Create a cursor positioned at the start of `buf`.
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Read exactly `n` bytes and advance past them.
    ///
    /// On underrun the position is left unchanged.
    pub fn read(&mut self, n: usize) -> Result<&'a [u8]> {
        let remaining = self.remaining();
        if n > remaining {
            return Err(SelectError::Underrun {
                needed: n,
                remaining,
            });
        }
        let start = self.pos;
        self.pos += n;
        Ok(&self.buf[start..self.pos])
    }

    /// Read a fixed-size array.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read(N)?);
        Ok(out)
    }

    /// Read a single byte.
    #[inline]
    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_array::<1>()?[0])
    }

    /// Read a big-endian u16.
    #[inline]
    pub fn read_u16_be(&mut self) -> Result<u16> {
        Ok(u16::from_be_bytes(self.read_array()?))
    }

    /// Read a big-endian u32.
    #[inline]
    pub fn read_u32_be(&mut self) -> Result<u32> {
        Ok(u32::from_be_bytes(self.read_array()?))
    }

    /// Number of unread bytes.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Check if every byte has been read.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Bytes consumed so far.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }
}
