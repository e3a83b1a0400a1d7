//! Parameter extraction from a top line or top route.

use crate::metadata::MessageMetadata;

const VERSION_SUFFIX: &str = " SIP";
const URI_SCHEME: &str = "sip:";

/// Rebuild `metadata`'s parameters from the `;`-separated `key=value`
/// segments of `header`.
///
/// A message has one parameter source, so previously extracted parameters
/// are discarded first. Any trailing protocol version is cut off, values
/// lose trailing `>`, a leading `sip:` scheme, and any `:port` suffix, and
/// empty values are dropped. The `opaque` parameter is stored as `ep`.
///
/// # Examples
///
/// ```
/// use sipframe::{MessageMetadata, decoder::get_param_from_header};
///
/// let mut metadata = MessageMetadata::default();
/// get_param_from_header("INVITE sip:u@host;opaque=abc123>", &mut metadata);
/// assert_eq!(metadata.param("ep"), Some("abc123"));
/// ```
pub fn get_param_from_header(header: &str, metadata: &mut MessageMetadata) {
    metadata.reset_params();

    let header = header
        .find(VERSION_SUFFIX)
        .map_or(header, |pos| &header[..pos]);

    for segment in header.split(';').filter(|segment| !segment.is_empty()) {
        let Some((name, value)) = segment.rsplit_once('=') else {
            continue;
        };
        let value = value.trim_end_matches('>');
        let value = value.strip_prefix(URI_SCHEME).unwrap_or(value);
        let value = value.split_once(':').map_or(value, |(value, _)| value);
        if name.is_empty() || value.is_empty() {
            continue;
        }

        let name = if name == "opaque" { "ep" } else { name };
        tracing::debug!(param = name, value, "sip: parameter in top line or top route");
        metadata.add_param(name, value);
    }
}
