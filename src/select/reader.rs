//! Decoding straight from an async byte source.
//!
//! Feeds reads into a [`FrameBuffer`] and dispatches frames as they
//! complete. Running short mid-frame only means "read more"; a partial frame
//! left when the reader hits EOF is reported as
//! [`SelectError::Truncated`](crate::SelectError::Truncated).

use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt};

use super::decoder::SelectDecoder;
use super::results::SelectResults;
use crate::config::DecoderConfig;
use crate::error::Result;
use crate::protocol::FrameBuffer;

/// Decode a select response from an async reader.
///
/// The raw bytes read up to and including the End frame are kept as the
/// response handle. Until End arrives, every byte read is held twice: once
/// as the handle and once in the frame buffer until its frame completes.
///
/// # Example
///
/// ```
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// use select_eventstream::protocol::{build_frame, Headers};
/// use select_eventstream::{decode_from_reader, DecoderConfig};
///
/// let end = Headers::new().with("message-type", "event").with("event-type", "End");
/// let body = build_frame(&end, b"").unwrap();
///
/// let results = decode_from_reader(&body[..], DecoderConfig::default()).await.unwrap();
/// assert!(results.is_complete());
/// # }
/// ```
pub async fn decode_from_reader<R>(mut reader: R, config: DecoderConfig) -> Result<SelectResults>
where
    R: AsyncRead + Unpin,
{
    let mut frame_buffer = FrameBuffer::with_max_message(config.max_message_size);
    let mut buf = vec![0u8; config.read_buffer_size.max(1)];
    let mut raw = BytesMut::new();
    let mut consumed = 0usize;
    let mut decoder = SelectDecoder::with_config(config);

    loop {
        let n = reader.read(&mut buf).await?;
        if n == 0 {
            frame_buffer.finish()?;
            return decoder.finish();
        }

        raw.extend_from_slice(&buf[..n]);
        frame_buffer.extend(&buf[..n]);

        while let Some(frame) = frame_buffer.next_frame()? {
            consumed += frame.wire_len();
            if decoder
                .dispatch(frame, || raw.split_to(consumed).freeze())?
                .is_break()
            {
                return decoder.finish();
            }
        }
    }
}
