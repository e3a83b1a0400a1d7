//! Counters describing decoder activity.
//!
//! With the `metrics` feature enabled the helpers forward to the global
//! [`metrics`] recorder; without it they compile to no-ops.

use crate::sip::MethodType;

/// Messages framed and decoded, labelled by `method`.
pub const MESSAGES_DECODED: &str = "sipframe_messages_decoded_total";
/// Lifecycle runs suspended by an event handler.
pub const MESSAGES_SUSPENDED: &str = "sipframe_messages_suspended_total";
/// Deliveries rejected because the buffered byte cap was exceeded.
pub const BUFFER_LIMIT_EXCEEDED: &str = "sipframe_buffer_limit_exceeded_total";

#[cfg(feature = "metrics")]
pub fn inc_decoded(method: MethodType) {
    metrics::counter!(MESSAGES_DECODED, "method" => method.as_str()).increment(1);
}

#[cfg(not(feature = "metrics"))]
pub fn inc_decoded(_method: MethodType) {}

#[cfg(feature = "metrics")]
pub fn inc_suspended() { metrics::counter!(MESSAGES_SUSPENDED).increment(1); }

#[cfg(not(feature = "metrics"))]
pub fn inc_suspended() {}

#[cfg(feature = "metrics")]
pub fn inc_buffer_limit_exceeded() { metrics::counter!(BUFFER_LIMIT_EXCEEDED).increment(1); }

#[cfg(not(feature = "metrics"))]
pub fn inc_buffer_limit_exceeded() {}
