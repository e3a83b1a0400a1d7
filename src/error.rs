//! Error types for the decoder and its framing codec.
//!
//! Malformed-but-framed input is never an error: unknown headers, unmatched
//! parameters, and missing quotes are skipped, and a missing or unparsable
//! `Content-Length` simply withholds the message. Errors are reserved for
//! caller contract violations and for caller-imposed resource limits.

use std::{io, num::NonZeroUsize};

use thiserror::Error;

/// Errors reported by [`Decoder::on_data`](crate::Decoder::on_data).
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum DecoderError {
    /// More bytes are buffered than the configured cap while no complete
    /// message can be framed.
    #[error("buffered {buffered} bytes without a complete message (limit {limit})")]
    BufferLimitExceeded {
        /// Bytes held by the transport buffer.
        buffered: usize,
        /// Configured cap.
        limit: NonZeroUsize,
    },

    /// A resume was requested but no message is suspended.
    #[error("resume requested with no suspended message")]
    NoSuspendedMessage,
}

/// Framing errors raised by [`SipFrameCodec`](crate::codec::SipFrameCodec).
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FramingError {
    /// A framed message, or the unframed backlog, exceeds the maximum.
    #[error("message exceeds max length: {size} > {max}")]
    OversizedFrame {
        /// Message length declared by the headers, or bytes buffered so far.
        size: usize,
        /// Maximum allowed message length.
        max: usize,
    },

    /// The stream ended in the middle of a message.
    #[error("stream ended with {bytes_received} bytes of an incomplete message")]
    IncompleteMessage {
        /// Bytes buffered when the stream ended.
        bytes_received: usize,
    },
}

impl From<FramingError> for io::Error {
    fn from(err: FramingError) -> Self {
        match err {
            FramingError::OversizedFrame { .. } => io::Error::new(io::ErrorKind::InvalidData, err),
            FramingError::IncompleteMessage { .. } => {
                io::Error::new(io::ErrorKind::UnexpectedEof, err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{io, num::NonZeroUsize};

    use super::{DecoderError, FramingError};

    #[test]
    fn buffer_limit_message_names_both_sizes() {
        let err = DecoderError::BufferLimitExceeded {
            buffered: 2048,
            limit: NonZeroUsize::new(1024).expect("non-zero"),
        };
        assert_eq!(
            err.to_string(),
            "buffered 2048 bytes without a complete message (limit 1024)"
        );
    }

    #[test]
    fn framing_errors_map_to_io_kinds() {
        let oversized: io::Error = FramingError::OversizedFrame { size: 9, max: 4 }.into();
        assert_eq!(oversized.kind(), io::ErrorKind::InvalidData);

        let truncated: io::Error = FramingError::IncompleteMessage { bytes_received: 3 }.into();
        assert_eq!(truncated.kind(), io::ErrorKind::UnexpectedEof);
    }
}
