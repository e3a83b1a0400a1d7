//! Helpers delivering bytes to a decoder the way a transport would.

use bytes::BytesMut;
use sipframe::{Decoder, DecoderCallbacks, DecoderError};

/// Append `bytes` to `buffer` one `chunk_size` slice at a time, calling
/// [`Decoder::on_data`] after each append.
///
/// # Panics
///
/// Panics if `chunk_size` is zero.
///
/// # Errors
///
/// Returns the first error reported by the decoder.
pub fn feed_into<C: DecoderCallbacks>(
    decoder: &mut Decoder<C>,
    buffer: &mut BytesMut,
    bytes: &[u8],
    chunk_size: usize,
) -> Result<(), DecoderError> {
    assert!(chunk_size > 0, "chunk size must be non-zero");
    for chunk in bytes.chunks(chunk_size) {
        buffer.extend_from_slice(chunk);
        decoder.on_data(&mut *buffer, false)?;
    }
    Ok(())
}

/// Feed `bytes` through a fresh buffer in `chunk_size` slices, returning
/// whatever the decoder left buffered.
///
/// # Errors
///
/// Returns the first error reported by the decoder.
pub fn feed_in_chunks<C: DecoderCallbacks>(
    decoder: &mut Decoder<C>,
    bytes: &[u8],
    chunk_size: usize,
) -> Result<BytesMut, DecoderError> {
    let mut buffer = BytesMut::with_capacity(bytes.len());
    feed_into(decoder, &mut buffer, bytes, chunk_size)?;
    Ok(buffer)
}
