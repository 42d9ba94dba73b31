use crate::{error::ParseError, scheme};

type Result<T> = core::result::Result<T, ParseError>;

/// Returns immediately with an error.
macro_rules! err {
    ($index:expr, $kind:ident) => {
        return Err(crate::error::ParseError {
            index: $index,
            kind: crate::error::ParseErrorKind::$kind,
        })
    };
}

/// Bytes trimmed from both ends of the input.
const WHITESPACE: &[u8] = b" \t\n\x0C\r";

/// The raw components of an IRI reference, not yet normalized.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Parts<'a> {
    pub scheme: Option<&'a [u8]>,
    pub authority: Option<AuthorityParts<'a>>,
    pub path: &'a [u8],
    pub query: Option<&'a [u8]>,
    pub fragment: Option<&'a [u8]>,
}

#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct AuthorityParts<'a> {
    pub userinfo: Option<&'a [u8]>,
    pub host: &'a [u8],
    pub port: Option<&'a [u8]>,
}

pub(crate) fn trim(mut bytes: &[u8]) -> &[u8] {
    while let [first, rem @ ..] = bytes {
        if !WHITESPACE.contains(first) {
            break;
        }
        bytes = rem;
    }
    while let [rem @ .., last] = bytes {
        if !WHITESPACE.contains(last) {
            break;
        }
        bytes = rem;
    }
    bytes
}

/// Splits the input into components following the regular expression
/// in [Appendix B of RFC 3986][appendix-b].
///
/// A scheme candidate that is not a valid scheme name is
/// not treated as a scheme.
///
/// [appendix-b]: https://datatracker.ietf.org/doc/html/rfc3986#appendix-B
pub(crate) fn parse(bytes: &[u8]) -> Result<Parts<'_>> {
    let bytes = trim(bytes);
    let mut parts = Parts::default();

    let mut pos = 0;
    if let Some(i) = bytes.iter().position(|&x| matches!(x, b':' | b'/' | b'?' | b'#')) {
        if bytes[i] == b':' && scheme::is_valid(&bytes[..i]) {
            parts.scheme = Some(&bytes[..i]);
            pos = i + 1;
        }
    }

    let rem = &bytes[pos..];
    let (before_fragment, fragment) = split_once(rem, b'#');
    if let Some(fragment) = fragment {
        if let Some(i) = fragment.iter().position(|&x| matches!(x, b'\n' | b'\r')) {
            let start = pos + before_fragment.len() + 1;
            err!(start + i, LineBreakInFragment);
        }
        parts.fragment = Some(fragment);
    }

    let (mut hier, query) = split_once(before_fragment, b'?');
    parts.query = query;

    if let Some(rem) = hier.strip_prefix(b"//") {
        let end = rem.iter().position(|&x| x == b'/').unwrap_or(rem.len());
        parts.authority = Some(parse_authority(&rem[..end]));
        hier = &rem[end..];
    }
    parts.path = hier;

    Ok(parts)
}

/// Splits an authority into userinfo, host and port.
///
/// The userinfo ends at the last `@`. The port starts at
/// the first `:` following the closing bracket of an IP literal, if any.
/// An IP literal missing its closing bracket takes up the rest
/// of the authority.
pub(crate) fn parse_authority(bytes: &[u8]) -> AuthorityParts<'_> {
    let mut auth = AuthorityParts::default();

    let mut rem = bytes;
    if let Some(i) = rem.iter().rposition(|&x| x == b'@') {
        auth.userinfo = Some(&rem[..i]);
        rem = &rem[i + 1..];
    }

    let search_from = match rem.iter().position(|&x| x == b']') {
        Some(i) => i,
        None if rem.starts_with(b"[") => {
            auth.host = rem;
            return auth;
        }
        None => 0,
    };
    match rem[search_from..].iter().position(|&x| x == b':') {
        Some(i) => {
            let colon = search_from + i;
            auth.host = &rem[..colon];
            let port = &rem[colon + 1..];
            auth.port = if port.is_empty() { None } else { Some(port) };
        }
        None => auth.host = rem,
    }
    auth
}

fn split_once(bytes: &[u8], delim: u8) -> (&[u8], Option<&[u8]>) {
    match bytes.iter().position(|&x| x == delim) {
        Some(i) => (&bytes[..i], Some(&bytes[i + 1..])),
        None => (bytes, None),
    }
}

/// Parses a port made of decimal digits only.
pub(crate) fn parse_port(bytes: &[u8]) -> Option<u16> {
    if bytes.is_empty() || !bytes.iter().all(u8::is_ascii_digit) {
        return None;
    }
    core::str::from_utf8(bytes).ok()?.parse().ok()
}
