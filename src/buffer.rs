//! Byte queue abstraction consumed by the decoder.
//!
//! The decoder never owns the transport buffer. It scans, copies out of, and
//! drains whatever growable byte queue the host transport exposes through
//! [`ByteBuffer`]. An implementation for [`BytesMut`] is provided so the
//! decoder can sit directly behind a `tokio_util` read loop.

use bytes::{Bytes, BytesMut};

/// Growable byte queue supporting search, bounded copy-out, and prefix drain.
pub trait ByteBuffer {
    /// Number of buffered bytes.
    fn len(&self) -> usize;

    /// Whether the buffer holds no bytes.
    fn is_empty(&self) -> bool { self.len() == 0 }

    /// Find `needle` starting at `start`, considering only bytes before `end`
    /// when an end bound is supplied.
    ///
    /// Returns the absolute offset of the first match.
    fn search(&self, needle: &[u8], start: usize, end: Option<usize>) -> Option<usize>;

    /// Copy at most `len` bytes beginning at `start` into a new vector.
    ///
    /// Ranges running past the end of the buffer are truncated.
    fn copy_out(&self, start: usize, len: usize) -> Vec<u8>;

    /// Remove the first `len` bytes and return them as a standalone buffer.
    ///
    /// Callers must not request more than [`len`](Self::len) bytes.
    fn take_prefix(&mut self, len: usize) -> Bytes;
}

/// Locate `needle` inside `haystack[start..end]`, returning an absolute offset.
#[must_use]
pub fn find_bytes(haystack: &[u8], needle: &[u8], start: usize, end: Option<usize>) -> Option<usize> {
    let end = end.map_or(haystack.len(), |bound| bound.min(haystack.len()));
    if needle.is_empty() || start >= end || end - start < needle.len() {
        return None;
    }
    haystack[start..end]
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|pos| pos + start)
}

impl ByteBuffer for BytesMut {
    fn len(&self) -> usize { BytesMut::len(self) }

    fn search(&self, needle: &[u8], start: usize, end: Option<usize>) -> Option<usize> {
        find_bytes(self, needle, start, end)
    }

    fn copy_out(&self, start: usize, len: usize) -> Vec<u8> {
        let start = start.min(BytesMut::len(self));
        let end = start.saturating_add(len).min(BytesMut::len(self));
        self[start..end].to_vec()
    }

    fn take_prefix(&mut self, len: usize) -> Bytes { self.split_to(len).freeze() }
}

#[cfg(test)]
mod tests {
    use bytes::BytesMut;
    use rstest::rstest;

    use super::{ByteBuffer, find_bytes};

    #[rstest]
    #[case(b"abc\r\n\r\nbody".as_slice(), b"\r\n\r\n".as_slice(), 0, None, Some(3))]
    #[case(b"abc\r\n\r\nbody".as_slice(), b"\r\n\r\n".as_slice(), 4, None, None)]
    #[case(b"abc\r\n\r\nbody".as_slice(), b"body".as_slice(), 0, Some(10), None)]
    #[case(b"abc\r\n\r\nbody".as_slice(), b"body".as_slice(), 0, Some(11), Some(7))]
    #[case(b"abc".as_slice(), b"".as_slice(), 0, None, None)]
    #[case(b"abc".as_slice(), b"c".as_slice(), 0, Some(99), Some(2))]
    fn search_honours_bounds(
        #[case] haystack: &[u8],
        #[case] needle: &[u8],
        #[case] start: usize,
        #[case] end: Option<usize>,
        #[case] expected: Option<usize>,
    ) {
        assert_eq!(find_bytes(haystack, needle, start, end), expected);
    }

    #[test]
    fn copy_out_truncates_at_buffer_end() {
        let buf = BytesMut::from(&b"Content-Length: 12"[..]);
        assert_eq!(buf.copy_out(16, 10), b"12".to_vec());
        assert!(buf.copy_out(40, 3).is_empty());
    }

    #[test]
    fn take_prefix_leaves_remainder() {
        let mut buf = BytesMut::from(&b"firstsecond"[..]);
        let prefix = buf.take_prefix(5);
        assert_eq!(&prefix[..], b"first");
        assert_eq!(&buf[..], b"second");
        assert_eq!(ByteBuffer::len(&buf), 6);
    }
}
