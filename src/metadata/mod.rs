//! Structured record of one decoded message.
//!
//! A [`MessageMetadata`] is created when the decoder frames a complete
//! message and is populated by a single decode pass. After that pass it is
//! shared read-only with the per-message event handler. The raw message text
//! is never modified; planned rewrites accumulate in an append-only
//! [`Operation`] log that a downstream rewriter replays.

mod domain;
mod operation;

use std::collections::HashMap;

use bytes::Bytes;

pub use domain::{HOST_PARAM, get_domain};
pub use operation::{Operation, OperationKind, OperationValue};

use crate::sip::{MethodType, MsgType};

const BRANCH_PARAM: &str = "branch=";
const EP_PARAM: &str = ";ep=";
const OPAQUE_PARAM: &str = ",opaque=";
const INST_IP_PARAM: &str = ";inst-ip=";
const X_SURI_PARAM: &str = "x-suri=";
const X_SURI_WITH_SCHEME: &str = "x-suri=sip:";

/// Parsed fields and pending rewrites for one message.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MessageMetadata {
    raw_msg: Bytes,
    msg_type: MsgType,
    method_type: MethodType,
    resp_method_type: Option<MethodType>,
    request_uri: Option<String>,
    transaction_id: Option<String>,
    top_route: Option<String>,
    domain: Option<String>,
    event_type: Option<String>,
    p_cookie_ip_map: Option<(String, String)>,
    params: HashMap<String, String>,
    operations: Vec<Operation>,
}

impl MessageMetadata {
    /// Wrap a complete raw message. All other fields start unset.
    #[must_use]
    pub fn new(raw_msg: impl Into<Bytes>) -> Self {
        Self {
            raw_msg: raw_msg.into(),
            ..Self::default()
        }
    }

    /// The message exactly as framed, byte for byte.
    ///
    /// [`Operation`] positions are offsets into these bytes.
    #[must_use]
    pub const fn raw_msg(&self) -> &Bytes { &self.raw_msg }

    /// The raw message as text, when it is entirely valid UTF-8.
    #[must_use]
    pub fn raw_str(&self) -> Option<&str> { std::str::from_utf8(&self.raw_msg).ok() }

    #[must_use]
    pub const fn msg_type(&self) -> MsgType { self.msg_type }

    #[must_use]
    pub const fn method_type(&self) -> MethodType { self.method_type }

    /// Method named by the `CSeq` of a `200 OK`.
    ///
    /// `Some(MethodType::Other)` marks a non-INVITE final response; `None`
    /// means the message was not a `200 OK` or carried no `CSeq`.
    #[must_use]
    pub const fn resp_method_type(&self) -> Option<MethodType> { self.resp_method_type }

    /// The full top line of a request.
    #[must_use]
    pub fn request_uri(&self) -> Option<&str> { self.request_uri.as_deref() }

    #[must_use]
    pub fn transaction_id(&self) -> Option<&str> { self.transaction_id.as_deref() }

    /// The first `Route` header line.
    #[must_use]
    pub fn top_route(&self) -> Option<&str> { self.top_route.as_deref() }

    #[must_use]
    pub fn domain(&self) -> Option<&str> { self.domain.as_deref() }

    /// Event package named by a `SUBSCRIBE`'s `Event` header.
    #[must_use]
    pub fn event_type(&self) -> Option<&str> { self.event_type.as_deref() }

    /// Cookie key and IP carried by the last cookie mapping header.
    #[must_use]
    pub fn p_cookie_ip_map(&self) -> Option<(&str, &str)> {
        self.p_cookie_ip_map
            .as_ref()
            .map(|(key, ip)| (key.as_str(), ip.as_str()))
    }

    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> { self.params.get(name).map(String::as_str) }

    #[must_use]
    pub const fn params(&self) -> &HashMap<String, String> { &self.params }

    /// Planned rewrites in the order they were recorded.
    #[must_use]
    pub fn operations(&self) -> &[Operation] { &self.operations }

    /// Attach the raw text once decoding has finished reading it.
    pub(crate) fn set_raw_msg(&mut self, raw_msg: Bytes) { self.raw_msg = raw_msg; }

    pub(crate) const fn set_msg_type(&mut self, msg_type: MsgType) { self.msg_type = msg_type; }

    pub(crate) const fn set_method_type(&mut self, method_type: MethodType) {
        self.method_type = method_type;
    }

    pub(crate) const fn set_resp_method_type(&mut self, method_type: MethodType) {
        self.resp_method_type = Some(method_type);
    }

    pub(crate) fn set_request_uri(&mut self, uri: &str) { self.request_uri = Some(uri.to_owned()); }

    pub(crate) fn set_top_route(&mut self, route: &str) { self.top_route = Some(route.to_owned()); }

    pub(crate) fn set_event_type(&mut self, event: &str) { self.event_type = Some(event.to_owned()); }

    pub(crate) fn set_p_cookie_ip_map(&mut self, key: &str, ip: &str) {
        self.p_cookie_ip_map = Some((key.to_owned(), ip.to_owned()));
    }

    pub(crate) fn add_param(&mut self, name: &str, value: &str) {
        self.params.insert(name.to_owned(), value.to_owned());
    }

    pub(crate) fn reset_params(&mut self) { self.params.clear(); }

    pub(crate) fn push_operation(&mut self, operation: Operation) { self.operations.push(operation); }

    /// Derive the domain from `header`; an unextractable domain clears it.
    pub(crate) fn set_domain(&mut self, header: &str, domain_match_param_name: &str) {
        self.domain = get_domain(header, domain_match_param_name).map(str::to_owned);
    }

    /// Record the transaction id carried by a `Via` line.
    ///
    /// The `branch` parameter is preferred; a `Via` without one contributes
    /// its whole value.
    pub(crate) fn set_transaction_id(&mut self, via: &str) {
        if let Some(start) = via.find(BRANCH_PARAM) {
            let branch = &via[start + BRANCH_PARAM.len()..];
            let end = branch.find([';', '>']).unwrap_or(branch.len());
            self.transaction_id = Some(branch[..end].to_owned());
            return;
        }
        let value = via.split_once(':').map_or(via, |(_, value)| value).trim();
        if !value.is_empty() {
            self.transaction_id = Some(value.to_owned());
        }
    }

    /// Plan insertion of an `ep` parameter into a routing header owned by
    /// this proxy.
    ///
    /// Nothing is recorded when the header already carries `;ep=`, has no
    /// bracketed URI, or names a domain other than `own_domain`.
    pub(crate) fn add_ep_operation(
        &mut self,
        raw_offset: usize,
        header: &str,
        own_domain: &str,
        domain_match_param_name: &str,
    ) {
        if header.contains(EP_PARAM) {
            return;
        }
        let Some(pos) = header.find('>') else {
            return;
        };
        let domain = get_domain(header, domain_match_param_name).unwrap_or_default();
        if domain != own_domain {
            tracing::trace!(
                header,
                domain,
                own_domain,
                "domain does not match own domain, skipping ep insertion"
            );
            return;
        }
        self.push_operation(Operation::insert(raw_offset + pos, EP_PARAM));
    }

    /// Plan appending an `opaque` parameter to an authentication challenge.
    pub(crate) fn add_opaque_operation(&mut self, raw_offset: usize, header: &str) {
        if header.contains(OPAQUE_PARAM) {
            return;
        }
        self.push_operation(Operation::insert(raw_offset + header.len(), OPAQUE_PARAM));
    }

    /// Plan removal of a stale `inst-ip` parameter and of the `sip:` scheme
    /// inside an accompanying `x-suri` parameter.
    pub(crate) fn delete_instip_operation(&mut self, raw_offset: usize, header: &str) {
        let Some(pos) = header.find(INST_IP_PARAM) else {
            return;
        };
        let end = header[pos + 1..]
            .find([';', '>'])
            .map_or(header.len(), |rel| pos + 1 + rel);
        self.push_operation(Operation::delete(raw_offset + pos, end - pos));

        if let Some(suri) = header.find(X_SURI_WITH_SCHEME) {
            self.push_operation(Operation::delete(
                raw_offset + suri + X_SURI_PARAM.len(),
                "sip:".len(),
            ));
        }
    }
}

#[cfg(test)]
mod tests;
