//! Host normalizer.
//!
//! Reduces a URL or host string to its bare host by mechanical string
//! rules. It never fails and performs no URI validation: malformed input
//! yields whatever substring the rules leave.

use std::net::Ipv4Addr;

use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::HostParts;

/// Leading `scheme://` or bare `//`
static SCHEME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z0-9+\-.]+:)?//").expect("SCHEME_PATTERN: hardcoded regex is invalid")
});

/// Characters trimmed from both ends of the host
const HOST_TRIM: &[char] = &['.', ' ', '\n', '\t', '\r'];

#[inline]
fn is_host_terminator(c: char) -> bool {
    matches!(c, ':' | '/' | '?' | '&' | '#')
}

/// Remove a leading URL scheme, if any
pub fn strip_scheme(url: &str) -> &str {
    match SCHEME_PATTERN.find(url) {
        Some(m) => &url[m.end()..],
        None => url,
    }
}

/// Split a URL into its bare host, the text after it, and the port.
///
/// Steps: strip the scheme, drop userinfo up to the first `@`, then cut at
/// the first `:`, `/`, `?`, `&` or `#`.
pub fn split_host(url: &str) -> HostParts<'_> {
    let rest = strip_scheme(url).trim_matches(HOST_TRIM);

    let rest = match rest.find('@') {
        Some(at) => &rest[at + 1..],
        None => rest,
    };

    let (host, after_host) = match rest.find(is_host_terminator) {
        Some(cut) => rest.split_at(cut),
        None => (rest, ""),
    };

    HostParts {
        host: host.trim_matches(HOST_TRIM),
        after_host,
        port: parse_port(after_host),
    }
}

/// Bare host of a URL
pub fn extract_host(url: &str) -> &str {
    split_host(url).host
}

/// Parse the port from the text following the host.
///
/// Only applies when that text starts with `:`. The port runs up to the next
/// `/`, `?`, `&` or `#`; anything that is not an integer in `[0, 65535]` is
/// treated as absent.
pub fn parse_port(after_host: &str) -> Option<u16> {
    let rest = after_host.strip_prefix(':')?;
    let end = rest
        .find(|c: char| matches!(c, '/' | '?' | '&' | '#'))
        .unwrap_or(rest.len());
    rest[..end].parse::<u16>().ok()
}

/// Check if `host` is a literal IPv4 address
pub fn looks_like_ipv4(host: &str) -> bool {
    host.parse::<Ipv4Addr>().is_ok()
}

/// Convert a host to its lower-cased ASCII (Punycode) form.
///
/// Returns `None` when IDNA processing rejects the host.
pub fn to_punycode(host: &str) -> Option<String> {
    match idna::domain_to_ascii(&host.trim().to_lowercase()) {
        Ok(ascii) => Some(ascii),
        Err(e) => {
            warn!("cannot convert `{}` to punycode: {}", host, e);
            None
        }
    }
}
