//! `Content-Length` framing over a buffered byte stream.
//!
//! A message is complete once the blank line ending its header block has
//! arrived, the header block declares a `Content-Length`, and the declared
//! number of body bytes follows the blank line. Anything less is a partial
//! message and yields no frame.

use crate::buffer::ByteBuffer;

/// Blank line separating the header block from the body.
pub const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";

/// Header declaring the body length. Matched case-sensitively.
pub const CONTENT_LENGTH: &[u8] = b"Content-Length:";

const CRLF: &[u8] = b"\r\n";

/// Length of the first complete message buffered in `data`.
///
/// Returns `None` while the header block, the `Content-Length` header, or
/// the declared body is still incomplete. Both searches are bounded by the
/// first blank line.
///
/// # Examples
///
/// ```
/// use bytes::BytesMut;
/// use sipframe::decoder::frame_length;
///
/// let wire = BytesMut::from(&b"BYE sip:a@b SIP/2.0\r\nContent-Length: 2\r\n\r\nokEXTRA"[..]);
/// assert_eq!(frame_length(&wire), Some(wire.len() - "EXTRA".len()));
///
/// let partial = BytesMut::from(&b"BYE sip:a@b SIP/2.0\r\nContent-Length: 2\r\n\r\no"[..]);
/// assert_eq!(frame_length(&partial), None);
/// ```
pub fn frame_length<B: ByteBuffer + ?Sized>(data: &B) -> Option<usize> {
    let body_start = data.search(HEADER_TERMINATOR, 0, None)? + HEADER_TERMINATOR.len();
    let value_start = data.search(CONTENT_LENGTH, 0, Some(body_start))? + CONTENT_LENGTH.len();
    let value_end = data
        .search(CRLF, value_start, Some(body_start))
        .unwrap_or(body_start);

    let content_length = parse_content_length(&data.copy_out(value_start, value_end - value_start));
    let full_message_length = body_start.saturating_add(content_length);
    (full_message_length <= data.len()).then_some(full_message_length)
}

/// Parse a declared body length, reading the leading decimal digits after
/// optional whitespace.
///
/// Values that cannot be read degrade to zero rather than stalling the
/// stream.
#[must_use]
pub fn parse_content_length(raw: &[u8]) -> usize {
    let trimmed = raw.trim_ascii_start();
    let digits = trimmed
        .iter()
        .position(|byte| !byte.is_ascii_digit())
        .map_or(trimmed, |end| &trimmed[..end]);
    std::str::from_utf8(digits)
        .ok()
        .and_then(|text| text.parse().ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use bytes::BytesMut;
    use rstest::rstest;

    use super::{frame_length, parse_content_length};

    #[rstest]
    #[case(b" 42".as_slice(), 42)]
    #[case(b"0".as_slice(), 0)]
    #[case(b"\t17 ".as_slice(), 17)]
    #[case(b" 12abc".as_slice(), 12)]
    #[case(b" abc".as_slice(), 0)]
    #[case(b" -5".as_slice(), 0)]
    #[case(b"".as_slice(), 0)]
    #[case(b" 99999999999999999999999999".as_slice(), 0)]
    fn parses_leading_digits(#[case] raw: &[u8], #[case] expected: usize) {
        assert_eq!(parse_content_length(raw), expected);
    }

    #[test]
    fn waits_for_header_terminator() {
        let wire = BytesMut::from(&b"INVITE sip:a@b SIP/2.0\r\nContent-Length: 0\r\n"[..]);
        assert_eq!(frame_length(&wire), None);
    }

    #[test]
    fn waits_when_content_length_is_missing() {
        let wire = BytesMut::from(&b"INVITE sip:a@b SIP/2.0\r\nVia: x\r\n\r\nbody"[..]);
        assert_eq!(frame_length(&wire), None);
    }

    #[test]
    fn ignores_content_length_inside_body() {
        let wire =
            BytesMut::from(&b"INVITE sip:a@b SIP/2.0\r\nVia: x\r\n\r\nContent-Length: 0\r\n\r\n"[..]);
        assert_eq!(frame_length(&wire), None);
    }

    #[test]
    fn malformed_length_frames_empty_body() {
        let head = b"INVITE sip:a@b SIP/2.0\r\nContent-Length: many\r\n\r\n";
        let mut wire = BytesMut::from(&head[..]);
        wire.extend_from_slice(b"v=0\r\n");
        assert_eq!(frame_length(&wire), Some(head.len()));
    }

    #[test]
    fn frames_exactly_header_block_plus_body() {
        let head = b"SIP/2.0 200 OK\r\nContent-Length: 4\r\n\r\n";
        let mut wire = BytesMut::from(&head[..]);
        wire.extend_from_slice(b"bodyNEXT");
        assert_eq!(frame_length(&wire), Some(head.len() + 4));
    }
}
