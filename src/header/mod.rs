//! Per-method header handling.
//!
//! Each message is decoded by exactly one [`HeaderHandler`], chosen from the
//! message's [`MethodType`] by [`HandlerKind::for_method`]. A handler kind
//! is a closed variant whose dispatch table maps the header types it cares
//! about to a processor; header types missing from the table are ignored.
//! The handler itself only tracks which single-use headers it has already
//! seen. Decoded state lives in the [`MessageMetadata`] passed into every
//! call.

mod processors;

use processors::{
    process_auth,
    process_contact,
    process_cseq,
    process_event,
    process_p_cookie_ip_map,
    process_path,
    process_record_route,
    process_route,
    process_service_route,
    process_via,
    process_www_auth,
};

use crate::{
    config::DecoderConfig,
    metadata::MessageMetadata,
    sip::{HeaderType, MethodType},
};

/// Borrowed state a header processor acts on.
#[derive(Debug)]
pub struct HeaderContext<'a> {
    /// Metadata of the message being decoded.
    pub metadata: &'a mut MessageMetadata,
    /// Domain matching settings supplied by the host.
    pub config: &'a DecoderConfig,
    /// Byte offset of the current line within the raw message.
    pub raw_offset: usize,
}

type Processor = fn(&mut HeaderHandler, &mut HeaderContext<'_>, &str);

const INVITE_TABLE: &[(HeaderType, Processor)] = &[
    (HeaderType::Via, process_via),
    (HeaderType::Route, process_route),
    (HeaderType::RecordRoute, process_record_route),
    (HeaderType::Contact, process_contact),
    (HeaderType::PCookieIpMap, process_p_cookie_ip_map),
];

const OK200_TABLE: &[(HeaderType, Processor)] = &[
    (HeaderType::CSeq, process_cseq),
    (HeaderType::Contact, process_contact),
    (HeaderType::RecordRoute, process_record_route),
    (HeaderType::Via, process_via),
    (HeaderType::Path, process_path),
    (HeaderType::ServiceRoute, process_service_route),
    (HeaderType::PCookieIpMap, process_p_cookie_ip_map),
];

const REGISTER_TABLE: &[(HeaderType, Processor)] = &[
    (HeaderType::Route, process_route),
    (HeaderType::Via, process_via),
    (HeaderType::Contact, process_contact),
    (HeaderType::Path, process_path),
    (HeaderType::RecordRoute, process_record_route),
    (HeaderType::Authorization, process_auth),
    (HeaderType::PCookieIpMap, process_p_cookie_ip_map),
];

const SUBSCRIBE_TABLE: &[(HeaderType, Processor)] = &[
    (HeaderType::Event, process_event),
    (HeaderType::Route, process_route),
    (HeaderType::Via, process_via),
    (HeaderType::Contact, process_contact),
    (HeaderType::RecordRoute, process_record_route),
    (HeaderType::PCookieIpMap, process_p_cookie_ip_map),
];

// Error responses carry no routing state.
const FAILURE4XX_TABLE: &[(HeaderType, Processor)] = &[
    (HeaderType::Contact, process_contact),
    (HeaderType::WwwAuthenticate, process_www_auth),
    (HeaderType::Via, process_via),
    (HeaderType::PCookieIpMap, process_p_cookie_ip_map),
];

const GENERAL_TABLE: &[(HeaderType, Processor)] = &[
    (HeaderType::Route, process_route),
    (HeaderType::Via, process_via),
    (HeaderType::Contact, process_contact),
    (HeaderType::Path, process_path),
    (HeaderType::RecordRoute, process_record_route),
    (HeaderType::PCookieIpMap, process_p_cookie_ip_map),
];

const OTHERS_TABLE: &[(HeaderType, Processor)] = &[
    (HeaderType::Via, process_via),
    (HeaderType::Contact, process_contact),
    (HeaderType::Path, process_path),
    (HeaderType::RecordRoute, process_record_route),
    (HeaderType::ServiceRoute, process_service_route),
    (HeaderType::PCookieIpMap, process_p_cookie_ip_map),
];

/// Closed set of header handling variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HandlerKind {
    Invite,
    Ok200,
    Register,
    Subscribe,
    Failure4xx,
    /// `ACK`, `BYE`, and `CANCEL`.
    General,
    /// Every other method and status.
    Others,
}

impl HandlerKind {
    /// Select the handler variant for a decoded method.
    #[must_use]
    pub const fn for_method(method: MethodType) -> Self {
        match method {
            MethodType::Invite => Self::Invite,
            MethodType::Ok200 => Self::Ok200,
            MethodType::Register => Self::Register,
            MethodType::Subscribe => Self::Subscribe,
            MethodType::Failure4xx => Self::Failure4xx,
            MethodType::Ack | MethodType::Bye | MethodType::Cancel => Self::General,
            MethodType::Refer
            | MethodType::Update
            | MethodType::Notify
            | MethodType::Other => Self::Others,
        }
    }

    const fn table(self) -> &'static [(HeaderType, Processor)] {
        match self {
            Self::Invite => INVITE_TABLE,
            Self::Ok200 => OK200_TABLE,
            Self::Register => REGISTER_TABLE,
            Self::Subscribe => SUBSCRIBE_TABLE,
            Self::Failure4xx => FAILURE4XX_TABLE,
            Self::General => GENERAL_TABLE,
            Self::Others => OTHERS_TABLE,
        }
    }

    fn processor(self, header_type: HeaderType) -> Option<Processor> {
        self.table()
            .iter()
            .find(|(kind, _)| *kind == header_type)
            .map(|(_, processor)| *processor)
    }

    /// Whether this variant reacts to `header_type`.
    #[must_use]
    pub fn handles(self, header_type: HeaderType) -> bool { self.processor(header_type).is_some() }
}

/// Header dispatcher for a single message.
#[derive(Debug)]
pub struct HeaderHandler {
    kind: HandlerKind,
    first_via: bool,
    first_route: bool,
    first_record_route: bool,
    first_service_route: bool,
}

impl HeaderHandler {
    #[must_use]
    pub const fn new(kind: HandlerKind) -> Self {
        Self {
            kind,
            first_via: true,
            first_route: true,
            first_record_route: true,
            first_service_route: true,
        }
    }

    /// Build the handler matching `method`.
    #[must_use]
    pub const fn for_method(method: MethodType) -> Self { Self::new(HandlerKind::for_method(method)) }

    #[must_use]
    pub const fn kind(&self) -> HandlerKind { self.kind }

    /// Process one header line.
    ///
    /// Header types this variant does not handle are skipped silently.
    pub fn parse_header(
        &mut self,
        header_type: HeaderType,
        line: &str,
        ctx: &mut HeaderContext<'_>,
    ) {
        if let Some(processor) = self.kind.processor(header_type) {
            processor(self, ctx, line);
        }
    }
}
