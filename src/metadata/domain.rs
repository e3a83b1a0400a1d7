//! Domain extraction from URIs embedded in top lines and routing headers.

/// Parameter name that selects the URI host rather than a named parameter.
pub const HOST_PARAM: &str = "host";

const URI_SCHEME: &str = "sip:";
const TERMINATORS: &[char] = &[':', ';', '>', ' '];

/// Extract the routing domain from `header`.
///
/// When `domain_match_param_name` names a URI parameter other than
/// [`HOST_PARAM`], that parameter's value (minus any `sip:` scheme and port)
/// is preferred. Otherwise, or when the parameter is absent, the host of the
/// first `sip:` URI is used with any `user@` part removed.
///
/// # Examples
///
/// ```
/// use sipframe::metadata::get_domain;
///
/// let route = "Route: <sip:10.0.0.1;lr;x-suri=sip:pcsf.example.com:5060>";
/// assert_eq!(get_domain(route, "x-suri"), Some("pcsf.example.com"));
/// assert_eq!(get_domain(route, "host"), Some("10.0.0.1"));
/// assert_eq!(get_domain("INVITE sip:bob@example.com SIP/2.0", "host"), Some("example.com"));
/// ```
#[must_use]
pub fn get_domain<'a>(header: &'a str, domain_match_param_name: &str) -> Option<&'a str> {
    if domain_match_param_name != HOST_PARAM
        && let Some(domain) = param_domain(header, domain_match_param_name)
    {
        return Some(domain);
    }
    uri_host(header)
}

fn param_domain<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    let needle = format!("{name}=");
    let start = header.find(&needle)? + needle.len();
    let value = &header[start..];
    let value = value.strip_prefix(URI_SCHEME).unwrap_or(value);
    let end = value.find(TERMINATORS)?;
    non_empty(&value[..end])
}

fn uri_host(header: &str) -> Option<&str> {
    let start = header.find(URI_SCHEME)? + URI_SCHEME.len();
    let rest = &header[start..];
    let end = rest.find(TERMINATORS)?;
    let addr = &rest[..end];
    non_empty(addr.split_once('@').map_or(addr, |(_, host)| host))
}

fn non_empty(value: &str) -> Option<&str> { (!value.is_empty()).then_some(value) }

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::get_domain;

    #[rstest]
    #[case("Route: <sip:proxy.example.com;lr>", "host", Some("proxy.example.com"))]
    #[case("Contact: <sip:alice@10.0.0.1:5060;ob>", "host", Some("10.0.0.1"))]
    #[case("INVITE sip:bob@example.com SIP/2.0", "host", Some("example.com"))]
    #[case("INVITE sip:example.com SIP/2.0", "host", Some("example.com"))]
    #[case("Record-Route: <sip:a.b;lr;x-suri=sip:scscf.c.d:5060>", "x-suri", Some("scscf.c.d"))]
    #[case("Record-Route: <sip:a.b;lr;x-suri=scscf.c.d;lr>", "x-suri", Some("scscf.c.d"))]
    #[case("Record-Route: <sip:a.b;lr>", "x-suri", Some("a.b"))]
    #[case("Route: no uri here", "host", None)]
    #[case("Route: <sip:unterminated", "host", None)]
    #[case("Route: <sip:;lr>", "host", None)]
    fn extracts_domain(
        #[case] header: &str,
        #[case] param_name: &str,
        #[case] expected: Option<&str>,
    ) {
        assert_eq!(get_domain(header, param_name), expected);
    }
}
