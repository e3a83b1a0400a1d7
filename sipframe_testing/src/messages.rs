//! Builders for well-formed SIP messages.

/// Message under construction.
///
/// `Content-Length` is always appended last and always matches the body.
///
/// ```rust
/// use sipframe_testing::SipMessage;
///
/// let wire = SipMessage::response(200, "OK")
///     .header("CSeq: 1 INVITE")
///     .body("v=0\r\n")
///     .build();
/// assert!(wire.starts_with("SIP/2.0 200 OK\r\nCSeq: 1 INVITE\r\n"));
/// assert!(wire.ends_with("Content-Length: 5\r\n\r\nv=0\r\n"));
/// ```
#[derive(Clone, Debug)]
pub struct SipMessage {
    top_line: String,
    headers: Vec<String>,
    body: String,
}

impl SipMessage {
    /// Request with the given method and request URI.
    pub fn request(method: &str, uri: &str) -> Self {
        Self::with_top_line(format!("{method} {uri} SIP/2.0"))
    }

    /// Response with the given status code and reason phrase.
    pub fn response(status: u16, reason: &str) -> Self {
        Self::with_top_line(format!("SIP/2.0 {status} {reason}"))
    }

    /// Message starting with an arbitrary top line.
    pub fn with_top_line(top_line: impl Into<String>) -> Self {
        Self {
            top_line: top_line.into(),
            headers: Vec::new(),
            body: String::new(),
        }
    }

    /// Append a complete header line, without its line terminator.
    #[must_use]
    pub fn header(mut self, line: impl Into<String>) -> Self {
        self.headers.push(line.into());
        self
    }

    /// Append a `Via` carrying `branch`.
    #[must_use]
    pub fn via(self, branch: &str) -> Self {
        self.header(format!("Via: SIP/2.0/UDP 192.0.2.10:5060;branch={branch}"))
    }

    #[must_use]
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Render the message as sent on the wire.
    pub fn build(&self) -> String {
        let mut wire = format!("{}\r\n", self.top_line);
        for header in &self.headers {
            wire.push_str(header);
            wire.push_str("\r\n");
        }
        wire.push_str(&format!("Content-Length: {}\r\n\r\n", self.body.len()));
        wire.push_str(&self.body);
        wire
    }
}
