//! Decoder configuration.
//!
//! The decoder needs two domain-matching inputs from its host, used when
//! deciding whether a routing header belongs to this proxy, plus an optional
//! cap on how many unframed bytes a caller is willing to hold.

use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

use crate::metadata::HOST_PARAM;

/// Settings consumed by [`Decoder`](crate::Decoder).
///
/// # Examples
///
/// ```
/// use std::num::NonZeroUsize;
///
/// use sipframe::DecoderConfig;
///
/// let config = DecoderConfig::default()
///     .own_domain("scscf.example.com")
///     .domain_match_param_name("x-suri")
///     .max_buffered_bytes(NonZeroUsize::new(64 * 1024));
///
/// assert_eq!(config.own_domain, "scscf.example.com");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    /// Domain this proxy answers for. Routing headers naming it receive an
    /// `ep` insertion.
    ///
    /// Default: empty.
    pub own_domain: String,

    /// URI parameter that identifies the routing domain; `host` selects the
    /// URI host itself.
    ///
    /// Default: `host`.
    pub domain_match_param_name: String,

    /// Largest number of buffered bytes tolerated while no complete message
    /// can be framed.
    ///
    /// Default: unbounded.
    pub max_buffered_bytes: Option<NonZeroUsize>,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            own_domain: String::new(),
            domain_match_param_name: HOST_PARAM.to_owned(),
            max_buffered_bytes: None,
        }
    }
}

impl DecoderConfig {
    /// Set the domain owned by this proxy.
    #[must_use]
    pub fn own_domain(mut self, domain: impl Into<String>) -> Self {
        self.own_domain = domain.into();
        self
    }

    /// Set the parameter used for domain matching.
    #[must_use]
    pub fn domain_match_param_name(mut self, name: impl Into<String>) -> Self {
        self.domain_match_param_name = name.into();
        self
    }

    /// Set or clear the buffered byte cap.
    #[must_use]
    pub fn max_buffered_bytes(mut self, limit: Option<NonZeroUsize>) -> Self {
        self.max_buffered_bytes = limit;
        self
    }
}
