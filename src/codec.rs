//! `tokio_util` codec framing SIP messages on a byte stream.
//!
//! [`SipFrameCodec`] applies the same `Content-Length` framing as the
//! push-based [`Decoder`](crate::Decoder) but yields each complete message as
//! [`Bytes`], so it can sit under `FramedRead`/`Framed` for hosts that prefer
//! a pull-based stream. Encoding is a passthrough: messages are written as
//! given.
//!
//! Unlike the push-based decoder, the codec bounds its buffer. A message
//! whose length, or an unframed backlog whose size, exceeds the maximum frame
//! length is rejected with [`FramingError::OversizedFrame`].

use std::io;

use bytes::{Bytes, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::{buffer::ByteBuffer, decoder::frame_length, error::FramingError};

/// Minimum frame length in bytes.
///
/// Frame lengths passed to [`SipFrameCodec::new`] are clamped to at least this
/// value.
pub const MIN_FRAME_LENGTH: usize = 64;

/// Maximum frame length in bytes (16 MiB).
pub const MAX_FRAME_LENGTH: usize = 16 * 1024 * 1024;

/// Default maximum message length, the largest UDP datagram payload.
pub const DEFAULT_MAX_FRAME_LENGTH: usize = 65_535;

fn clamp_frame_length(value: usize) -> usize { value.clamp(MIN_FRAME_LENGTH, MAX_FRAME_LENGTH) }

/// Framing codec yielding one complete SIP message per item.
///
/// # Examples
///
/// ```
/// use bytes::BytesMut;
/// use sipframe::SipFrameCodec;
/// use tokio_util::codec::Decoder;
///
/// let mut codec = SipFrameCodec::default();
/// let mut wire = BytesMut::from(&b"ACK sip:a@b SIP/2.0\r\nContent-Length: 0\r\n\r\nACK"[..]);
/// let frame = codec.decode(&mut wire).expect("within limits").expect("complete");
/// assert!(frame.starts_with(b"ACK sip:a@b"));
/// assert_eq!(&wire[..], b"ACK");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SipFrameCodec {
    max_frame_length: usize,
}

impl SipFrameCodec {
    /// Construct a codec accepting messages up to `max_frame_length` bytes.
    #[must_use]
    pub fn new(max_frame_length: usize) -> Self {
        Self {
            max_frame_length: clamp_frame_length(max_frame_length),
        }
    }

    #[must_use]
    pub const fn max_frame_length(&self) -> usize { self.max_frame_length }

    fn oversized(&self, size: usize) -> io::Error {
        tracing::warn!(size, max = self.max_frame_length, "sip: oversized message");
        FramingError::OversizedFrame {
            size,
            max: self.max_frame_length,
        }
        .into()
    }
}

impl Default for SipFrameCodec {
    fn default() -> Self {
        Self {
            max_frame_length: DEFAULT_MAX_FRAME_LENGTH,
        }
    }
}

impl Decoder for SipFrameCodec {
    type Item = Bytes;
    type Error = io::Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        match frame_length(&*src) {
            Some(len) if len > self.max_frame_length => Err(self.oversized(len)),
            Some(len) => Ok(Some(src.take_prefix(len))),
            None if src.len() > self.max_frame_length => Err(self.oversized(src.len())),
            None => Ok(None),
        }
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        match self.decode(src)? {
            Some(frame) => Ok(Some(frame)),
            None if src.is_empty() => Ok(None),
            None => {
                let bytes_received = src.len();
                tracing::debug!(bytes_received, "sip: stream closed mid-message");
                Err(FramingError::IncompleteMessage { bytes_received }.into())
            }
        }
    }
}

impl Encoder<Bytes> for SipFrameCodec {
    type Error = io::Error;

    fn encode(&mut self, item: Bytes, dst: &mut BytesMut) -> Result<(), Self::Error> {
        if item.len() > self.max_frame_length {
            return Err(self.oversized(item.len()));
        }
        dst.extend_from_slice(&item);
        Ok(())
    }
}
