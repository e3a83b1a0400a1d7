//! Protocol vocabulary: message kinds, methods, and recognised header names.
//!
//! Classification here is purely lexical. The top line decides the message
//! and method type once per message; every following header line is mapped
//! to a [`HeaderType`] by exact name match, with anything unknown folded into
//! [`HeaderType::Other`] and preserved verbatim in the raw message.

use std::fmt;

/// Protocol version token shared by request and status lines.
pub const SIP_VERSION: &str = "SIP/2.0";

/// Whether a message is a request or a response.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MsgType {
    /// Top line carries method, request URI, and version.
    #[default]
    Request,
    /// Top line carries version and status.
    Response,
}

/// Method (or, for responses, status class) distinguished by the decoder.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MethodType {
    Invite,
    Cancel,
    Register,
    Refer,
    Update,
    Subscribe,
    Notify,
    Ack,
    Bye,
    /// `200 OK` response.
    Ok200,
    /// Any `4xx` response.
    Failure4xx,
    /// Catch-all, also used as the null method.
    #[default]
    Other,
}

impl MethodType {
    /// Stable lowercase name, used as a log field and metric label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Invite => "invite",
            Self::Cancel => "cancel",
            Self::Register => "register",
            Self::Refer => "refer",
            Self::Update => "update",
            Self::Subscribe => "subscribe",
            Self::Notify => "notify",
            Self::Ack => "ack",
            Self::Bye => "bye",
            Self::Ok200 => "ok200",
            Self::Failure4xx => "failure4xx",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for MethodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// Header names the decoder routes to a processor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HeaderType {
    TopLine,
    CallId,
    Via,
    To,
    From,
    Contact,
    RecordRoute,
    CSeq,
    Route,
    Path,
    Event,
    ServiceRoute,
    WwwAuthenticate,
    Authorization,
    /// Header carrying the cookie to IP mapping; always stripped on rewrite.
    PCookieIpMap,
    Other,
}

/// Name of the header carrying the cookie to IP mapping.
pub const P_COOKIE_IP_MAP_HEADER: &str = "P-Nokia-Cookie-IP-Mapping";

const HEADER_NAMES: &[(&str, HeaderType)] = &[
    ("Call-ID", HeaderType::CallId),
    ("Via", HeaderType::Via),
    ("To", HeaderType::To),
    ("From", HeaderType::From),
    ("Contact", HeaderType::Contact),
    ("Record-Route", HeaderType::RecordRoute),
    ("CSeq", HeaderType::CSeq),
    ("Route", HeaderType::Route),
    ("Path", HeaderType::Path),
    ("Event", HeaderType::Event),
    ("Service-Route", HeaderType::ServiceRoute),
    ("WWW-Authenticate", HeaderType::WwwAuthenticate),
    ("Authorization", HeaderType::Authorization),
    (P_COOKIE_IP_MAP_HEADER, HeaderType::PCookieIpMap),
];

/// Request methods in match priority order.
const METHOD_KEYWORDS: &[(&str, MethodType)] = &[
    ("INVITE", MethodType::Invite),
    ("CANCEL", MethodType::Cancel),
    ("REGISTER", MethodType::Register),
    ("REFER", MethodType::Refer),
    ("UPDATE", MethodType::Update),
    ("SUBSCRIBE", MethodType::Subscribe),
    ("NOTIFY", MethodType::Notify),
    ("ACK", MethodType::Ack),
    ("BYE", MethodType::Bye),
];

/// Status markers in match priority order; `200` must precede the `4xx` class.
const STATUS_MARKERS: &[(&str, MethodType)] = &[
    ("2.0 200", MethodType::Ok200),
    ("2.0 4", MethodType::Failure4xx),
];

/// Classify a top line as request or response.
///
/// A response carries the version token followed by a space before its status.
#[must_use]
pub fn msg_type(top_line: &str) -> MsgType {
    if top_line.contains("SIP/2.0 ") {
        MsgType::Response
    } else {
        MsgType::Request
    }
}

/// Classify the method of a top line.
///
/// Requests are matched on their leading method token so that keywords
/// embedded in the request URI (`sip:ACKley@...`) cannot shadow the real
/// method. Responses are matched on their status marker.
#[must_use]
pub fn method_type(top_line: &str) -> MethodType {
    match msg_type(top_line) {
        MsgType::Request => {
            let token = top_line.split_whitespace().next().unwrap_or_default();
            METHOD_KEYWORDS
                .iter()
                .find(|(keyword, _)| *keyword == token)
                .map_or(MethodType::Other, |(_, method)| *method)
        }
        MsgType::Response => STATUS_MARKERS
            .iter()
            .find(|(marker, _)| top_line.contains(marker))
            .map_or(MethodType::Other, |(_, method)| *method),
    }
}

/// Classify a header line by its name, the text before the first `:`.
#[must_use]
pub fn header_type(line: &str) -> HeaderType {
    let name = line.split_once(':').map_or(line, |(name, _)| name);
    HEADER_NAMES
        .iter()
        .find(|(known, _)| *known == name)
        .map_or(HeaderType::Other, |(_, kind)| *kind)
}
