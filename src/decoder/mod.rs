//! Stream reassembly and message decoding.
//!
//! [`Decoder`] is driven by a push-based byte source: every delivery lands in
//! a caller-owned [`ByteBuffer`] and is handed to [`Decoder::on_data`]. The
//! decoder frames as many complete messages as the buffer holds, decodes
//! each into a [`MessageMetadata`], and runs a [`DecoderStateMachine`]
//! against a fresh event handler. A handler that suspends parks the machine
//! inside the decoder until the caller resumes it; no further messages are
//! framed meanwhile.

mod framing;
mod params;

use std::{borrow::Cow, sync::Arc};

use bytes::Bytes;

pub use framing::{CONTENT_LENGTH, HEADER_TERMINATOR, frame_length, parse_content_length};
pub use params::get_param_from_header;

use crate::{
    buffer::{ByteBuffer, find_bytes},
    config::DecoderConfig,
    error::DecoderError,
    header::{HeaderContext, HeaderHandler},
    metadata::MessageMetadata,
    sip::{self, MsgType},
    state_machine::{DecoderEventHandler, DecoderStateMachine, FilterStatus, RunStatus},
};

const CRLF: &[u8] = b"\r\n";

/// Host-side factory for per-message event handlers.
pub trait DecoderCallbacks {
    /// Handler type receiving lifecycle events.
    type Handler: DecoderEventHandler;

    /// Create the handler for a freshly decoded message.
    fn new_decoder_event_handler(&mut self, metadata: &Arc<MessageMetadata>) -> Self::Handler;
}

/// Reassembling decoder for one byte stream.
///
/// One decoder serves one connection; its per-message state is accessed
/// strictly sequentially.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use bytes::BytesMut;
/// use sipframe::{
///     Decoder,
///     DecoderCallbacks,
///     DecoderConfig,
///     DecoderEventHandler,
///     FilterStatus,
///     MessageMetadata,
///     MethodType,
/// };
///
/// struct Methods(Vec<MethodType>);
/// struct Collect(MethodType);
///
/// impl DecoderEventHandler for Collect {
///     fn transport_begin(&mut self, _: &Arc<MessageMetadata>) -> FilterStatus {
///         FilterStatus::Continue
///     }
///     fn message_begin(&mut self, m: &Arc<MessageMetadata>) -> FilterStatus {
///         self.0 = m.method_type();
///         FilterStatus::Continue
///     }
///     fn message_end(&mut self) -> FilterStatus { FilterStatus::Continue }
///     fn transport_end(&mut self) -> FilterStatus { FilterStatus::Continue }
/// }
///
/// impl DecoderCallbacks for Methods {
///     type Handler = Collect;
///     fn new_decoder_event_handler(&mut self, m: &Arc<MessageMetadata>) -> Collect {
///         self.0.push(m.method_type());
///         Collect(MethodType::Other)
///     }
/// }
///
/// let mut decoder = Decoder::new(Methods(Vec::new()), DecoderConfig::default());
/// let mut wire = BytesMut::from(&b"BYE sip:a@b SIP/2.0\r\nContent-Length: 0\r\n\r\n"[..]);
/// decoder.on_data(&mut wire, false).expect("no buffer cap configured");
/// assert_eq!(decoder.callbacks().0, [MethodType::Bye]);
/// assert!(wire.is_empty());
/// ```
pub struct Decoder<C: DecoderCallbacks> {
    callbacks: C,
    config: DecoderConfig,
    active: Option<DecoderStateMachine<C::Handler>>,
}

impl<C: DecoderCallbacks> Decoder<C> {
    #[must_use]
    pub fn new(callbacks: C, config: DecoderConfig) -> Self {
        Self {
            callbacks,
            config,
            active: None,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &DecoderConfig { &self.config }

    #[must_use]
    pub const fn callbacks(&self) -> &C { &self.callbacks }

    pub const fn callbacks_mut(&mut self) -> &mut C { &mut self.callbacks }

    /// The message parked by a suspending handler, if any.
    #[must_use]
    pub const fn suspended(&self) -> Option<&DecoderStateMachine<C::Handler>> {
        self.active.as_ref()
    }

    /// Feed newly buffered bytes, or resume a suspended message.
    ///
    /// With `resuming` set, the parked state machine runs again; once it
    /// completes, reassembly continues over whatever `data` accumulated
    /// meanwhile. Without `resuming`, reassembly runs only when no message
    /// is parked. Framed bytes are drained from `data`; partial messages
    /// stay buffered. The returned status is always
    /// [`FilterStatus::StopIteration`]: the decoder never pulls input.
    ///
    /// # Errors
    ///
    /// Returns [`DecoderError::NoSuspendedMessage`] when resuming with
    /// nothing parked, and [`DecoderError::BufferLimitExceeded`] when a
    /// configured cap is exceeded while no complete message is buffered.
    pub fn on_data<B: ByteBuffer + ?Sized>(
        &mut self,
        data: &mut B,
        resuming: bool,
    ) -> Result<FilterStatus, DecoderError> {
        if resuming {
            let active = self
                .active
                .as_mut()
                .ok_or(DecoderError::NoSuspendedMessage)?;
            if active.run() == RunStatus::Done {
                self.complete();
                self.reassemble(data)?;
            }
        } else if self.active.is_none() {
            self.reassemble(data)?;
        }
        Ok(FilterStatus::StopIteration)
    }

    fn reassemble<B: ByteBuffer + ?Sized>(&mut self, data: &mut B) -> Result<(), DecoderError> {
        while !data.is_empty() {
            let Some(full_message_length) = frame_length(&*data) else {
                return self.check_buffer_limit(data.len());
            };
            let message = data.take_prefix(full_message_length);
            if self.on_data_ready(message) == RunStatus::Suspended {
                break;
            }
        }
        Ok(())
    }

    fn check_buffer_limit(&self, buffered: usize) -> Result<(), DecoderError> {
        match self.config.max_buffered_bytes {
            Some(limit) if buffered > limit.get() => {
                tracing::warn!(
                    buffered,
                    limit = limit.get(),
                    "sip: buffered bytes exceed limit"
                );
                crate::metrics::inc_buffer_limit_exceeded();
                Err(DecoderError::BufferLimitExceeded { buffered, limit })
            }
            _ => Ok(()),
        }
    }

    /// Decode one framed message and drive its lifecycle.
    fn on_data_ready(&mut self, message: Bytes) -> RunStatus {
        let len = message.len();
        let metadata = Arc::new(decode_message(message, &self.config));
        tracing::debug!(
            len,
            method = %metadata.method_type(),
            "sip: message framed"
        );
        crate::metrics::inc_decoded(metadata.method_type());

        let handler = self.callbacks.new_decoder_event_handler(&metadata);
        let mut state_machine = DecoderStateMachine::new(metadata, handler);
        let status = state_machine.run();
        match status {
            RunStatus::Done => self.complete(),
            RunStatus::Suspended => self.active = Some(state_machine),
        }
        status
    }

    fn complete(&mut self) {
        tracing::trace!("sip: message complete");
        self.active = None;
    }
}

/// Parse a framed message into its metadata.
///
/// The top line selects the message, method, and [`HeaderHandler`]; every
/// header line up to the blank line is then routed through that handler.
/// Requests without a `Route` take their domain from the request URI.
///
/// Lines are located on the raw bytes, so recorded operation offsets address
/// the framed message exactly. The stored raw message is never altered: a
/// top line that is not valid UTF-8 is classified from a lossy copy, and a
/// header line that is not valid UTF-8 is skipped.
///
/// # Examples
///
/// ```
/// use sipframe::{DecoderConfig, MethodType, MsgType, decoder::decode_message};
///
/// let metadata = decode_message(
///     "INVITE sip:a@b SIP/2.0\r\nVia: SIP/2.0/UDP x;branch=z9hG4bK1\r\nContent-Length: 0\r\n\r\n",
///     &DecoderConfig::default(),
/// );
/// assert_eq!(metadata.msg_type(), MsgType::Request);
/// assert_eq!(metadata.method_type(), MethodType::Invite);
/// assert_eq!(metadata.transaction_id(), Some("z9hG4bK1"));
/// assert_eq!(metadata.domain(), Some("b"));
/// ```
#[must_use]
pub fn decode_message(raw: impl Into<Bytes>, config: &DecoderConfig) -> MessageMetadata {
    let raw = raw.into();
    let mut metadata = MessageMetadata::default();
    let mut handler: Option<HeaderHandler> = None;
    let mut raw_offset = 0;

    while raw_offset < raw.len() {
        let rest = &raw[raw_offset..];
        let (line, consumed) = find_bytes(rest, CRLF, 0, None)
            .map_or((rest, rest.len()), |end| (&rest[..end], end + CRLF.len()));

        if let Some(handler) = handler.as_mut() {
            if let Ok(line) = std::str::from_utf8(line) {
                let mut ctx = HeaderContext {
                    metadata: &mut metadata,
                    config,
                    raw_offset,
                };
                handler.parse_header(sip::header_type(line), line, &mut ctx);
            } else {
                tracing::warn!(raw_offset, "sip: header line is not valid UTF-8, skipping");
            }
        } else {
            let top_line = String::from_utf8_lossy(line);
            if let Cow::Owned(_) = top_line {
                tracing::warn!(
                    len = raw.len(),
                    "sip: top line is not valid UTF-8, decoding lossily"
                );
            }
            parse_top_line(&top_line, &mut metadata);
            handler = Some(HeaderHandler::for_method(metadata.method_type()));
        }

        raw_offset += consumed;
        if raw[raw_offset..].starts_with(CRLF) {
            break;
        }
    }

    if metadata.top_route().is_none()
        && let Some(uri) = metadata.request_uri().map(str::to_owned)
    {
        metadata.set_domain(&uri, &config.domain_match_param_name);
    }

    metadata.set_raw_msg(raw);
    metadata
}

fn parse_top_line(top_line: &str, metadata: &mut MessageMetadata) {
    metadata.set_msg_type(sip::msg_type(top_line));
    metadata.set_method_type(sip::method_type(top_line));
    if metadata.msg_type() == MsgType::Request {
        metadata.set_request_uri(top_line);
    }
    get_param_from_header(top_line, metadata);
}
