//! Input classification: bare IPv4 address or hostname/URL.

use nexus_core::{NexusError, Result, Target};
use std::borrow::Cow;
use std::net::Ipv4Addr;
use url::{Host, Url};

/// Scheme assumed when the input carries none
const DEFAULT_SCHEME: &str = "http://";

/// Classify raw input into a [`Target`].
///
/// A bare dotted quad with every octet in `0..=255` and no leading zeros is an
/// IP target. Anything else is parsed as a URL, with `http://` prepended when
/// no scheme separator is present.
///
/// A URL whose host is an IPv4 address is used as-is only when the address is
/// written as a strict dotted quad; shorthand, octal or hex hosts that the URL
/// parser would rewrite (`127.1`, `010.1.1.1`, `0x7f.1`) are rejected.
pub fn classify(input: &str) -> Result<Target> {
    let raw = input.trim();
    if raw.is_empty() {
        return Err(NexusError::EmptyInput);
    }

    if let Some(addr) = parse_dotted_quad(raw) {
        return Ok(Target::ip(raw, addr));
    }

    let candidate = if raw.contains("://") {
        Cow::Borrowed(raw)
    } else {
        Cow::Owned(format!("{DEFAULT_SCHEME}{raw}"))
    };

    let url = Url::parse(&candidate).map_err(|e| NexusError::InvalidInput(format!("{raw}: {e}")))?;
    let host = url
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or_else(|| NexusError::InvalidInput(format!("{raw}: URL has no host")))?;

    let target = Target::domain(raw, host, url.as_str(), url.scheme());
    match url.host() {
        Some(Host::Ipv4(addr)) => match parse_dotted_quad(written_host(raw)) {
            Some(written) if written == addr => Ok(target.with_literal(addr)),
            _ => Err(NexusError::InvalidInput(format!(
                "{raw}: numeric host must be a dotted quad"
            ))),
        },
        _ => Ok(target),
    }
}

/// Host portion of the input exactly as typed, before URL normalization.
fn written_host(raw: &str) -> &str {
    let rest = raw.split_once("://").map_or(raw, |(_, rest)| rest);
    let authority = rest.split(['/', '\\', '?', '#']).next().unwrap_or(rest);
    let host_port = authority.rsplit_once('@').map_or(authority, |(_, host)| host);
    host_port.split_once(':').map_or(host_port, |(host, _)| host)
}

/// Strict dotted-quad parser: four groups of 1-3 digits, each in `0..=255`.
pub fn parse_dotted_quad(s: &str) -> Option<Ipv4Addr> {
    let mut octets = [0u8; 4];
    let mut parts = s.split('.');

    for slot in &mut octets {
        let part = parts.next()?;
        if part.is_empty() || part.len() > 3 || !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        // Leading zeros are ambiguous (octal in some parsers)
        if part.len() > 1 && part.starts_with('0') {
            return None;
        }
        *slot = part.parse().ok()?;
    }

    if parts.next().is_some() {
        return None;
    }

    Some(Ipv4Addr::from(octets))
}
