//! Header processors shared by the handler dispatch tables.
//!
//! Every processor receives the complete header line (name included) and the
//! line's byte offset via [`HeaderContext`], so recorded operations address
//! the raw message directly.

use super::{HeaderContext, HeaderHandler};
use crate::{decoder::get_param_from_header, metadata::Operation, sip::MethodType};

const LINE_TERMINATOR_LEN: usize = "\r\n".len();
const AUTH_OPAQUE: &str = "opaque=\"";

pub(super) fn process_via(handler: &mut HeaderHandler, ctx: &mut HeaderContext<'_>, header: &str) {
    if !handler.first_via {
        return;
    }
    handler.first_via = false;
    ctx.metadata.set_transaction_id(header);
}

/// The first `Route` becomes the top route and the authoritative parameter
/// and domain source.
pub(super) fn process_route(
    handler: &mut HeaderHandler,
    ctx: &mut HeaderContext<'_>,
    header: &str,
) {
    if !handler.first_route {
        return;
    }
    handler.first_route = false;

    get_param_from_header(header, ctx.metadata);
    ctx.metadata.set_top_route(header);
    ctx.metadata
        .set_domain(header, &ctx.config.domain_match_param_name);
}

pub(super) fn process_record_route(
    handler: &mut HeaderHandler,
    ctx: &mut HeaderContext<'_>,
    header: &str,
) {
    if !handler.first_record_route {
        return;
    }
    handler.first_record_route = false;
    add_ep_operation(ctx, header);
}

pub(super) fn process_service_route(
    handler: &mut HeaderHandler,
    ctx: &mut HeaderContext<'_>,
    header: &str,
) {
    if !handler.first_service_route {
        return;
    }
    handler.first_service_route = false;
    add_ep_operation(ctx, header);
}

pub(super) fn process_contact(
    _handler: &mut HeaderHandler,
    ctx: &mut HeaderContext<'_>,
    header: &str,
) {
    ctx.metadata.delete_instip_operation(ctx.raw_offset, header);
    add_ep_operation(ctx, header);
}

pub(super) fn process_path(
    _handler: &mut HeaderHandler,
    ctx: &mut HeaderContext<'_>,
    header: &str,
) {
    ctx.metadata.delete_instip_operation(ctx.raw_offset, header);
    add_ep_operation(ctx, header);
}

pub(super) fn process_www_auth(
    _handler: &mut HeaderHandler,
    ctx: &mut HeaderContext<'_>,
    header: &str,
) {
    ctx.metadata.add_opaque_operation(ctx.raw_offset, header);
}

/// Lift a quoted `opaque` token into the `ep` parameter.
pub(super) fn process_auth(
    _handler: &mut HeaderHandler,
    ctx: &mut HeaderContext<'_>,
    header: &str,
) {
    let Some(start) = header.find(AUTH_OPAQUE) else {
        return;
    };
    let value = &header[start + AUTH_OPAQUE.len()..];
    let Some(end) = value.find('"') else {
        return;
    };
    ctx.metadata.add_param("ep", &value[..end]);
}

/// Record the cookie mapping and schedule removal of the whole line.
pub(super) fn process_p_cookie_ip_map(
    _handler: &mut HeaderHandler,
    ctx: &mut HeaderContext<'_>,
    header: &str,
) {
    let Some((_, value)) = header.split_once(':') else {
        return;
    };
    let Some((key, ip)) = value.trim_start().split_once('=') else {
        return;
    };
    ctx.metadata.set_p_cookie_ip_map(key, ip);
    ctx.metadata.push_operation(Operation::delete(
        ctx.raw_offset,
        header.len() + LINE_TERMINATOR_LEN,
    ));
}

/// Distinguish the final response of an INVITE transaction.
pub(super) fn process_cseq(
    _handler: &mut HeaderHandler,
    ctx: &mut HeaderContext<'_>,
    header: &str,
) {
    let method = if header.contains("INVITE") {
        MethodType::Invite
    } else {
        MethodType::Other
    };
    ctx.metadata.set_resp_method_type(method);
}

pub(super) fn process_event(
    _handler: &mut HeaderHandler,
    ctx: &mut HeaderContext<'_>,
    header: &str,
) {
    let event = header
        .split_once("Event:")
        .map_or(header, |(_, event)| event)
        .trim();
    ctx.metadata.set_event_type(event);
}

fn add_ep_operation(ctx: &mut HeaderContext<'_>, header: &str) {
    ctx.metadata.add_ep_operation(
        ctx.raw_offset,
        header,
        &ctx.config.own_domain,
        &ctx.config.domain_match_param_name,
    );
}
