//! Scheme names and per-scheme defaults.

use crate::pct_enc::table;

/// Values implied by a scheme when the corresponding component is absent.
///
/// A component equal to its scheme's default is cleared on assignment,
/// and reading the cleared component yields the default again.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Defaults {
    /// The lowercase scheme name.
    pub scheme: &'static str,
    /// The well-known port.
    pub port: Option<u16>,
    /// The host implied by an absent host.
    pub host: Option<&'static str>,
    /// The path written out when the path is empty and the authority is not.
    pub path: Option<&'static str>,
}

const fn port(scheme: &'static str, port: u16) -> Defaults {
    Defaults {
        scheme,
        port: Some(port),
        host: None,
        path: None,
    }
}

const fn web(scheme: &'static str, port: u16) -> Defaults {
    Defaults {
        scheme,
        port: Some(port),
        host: None,
        path: Some("/"),
    }
}

/// The table of scheme defaults, sorted by scheme name.
pub const DEFAULTS: &[Defaults] = &[
    port("acap", 674),
    port("dict", 2628),
    Defaults {
        scheme: "file",
        port: None,
        host: Some("localhost"),
        path: None,
    },
    port("ftp", 21),
    web("http", 80),
    web("https", 443),
    web("ws", 80),
    web("wss", 443),
];

/// Returns the defaults of a lowercase scheme, if it has any.
///
/// # Examples
///
/// ```
/// use canon_iri::scheme;
///
/// assert_eq!(scheme::defaults("https").and_then(|d| d.port), Some(443));
/// assert_eq!(scheme::defaults("urn"), None);
/// ```
#[must_use]
pub fn defaults(scheme: &str) -> Option<&'static Defaults> {
    DEFAULTS
        .binary_search_by(|d| d.scheme.cmp(scheme))
        .ok()
        .map(|i| &DEFAULTS[i])
}

/// Returns the well-known port of a lowercase scheme.
#[must_use]
pub fn default_port(scheme: &str) -> Option<u16> {
    defaults(scheme).and_then(|d| d.port)
}

/// Checks whether the bytes form a scheme name according to
/// [Section 3.1 of RFC 3986][scheme].
///
/// [scheme]: https://datatracker.ietf.org/doc/html/rfc3986#section-3.1
pub(crate) fn is_valid(s: &[u8]) -> bool {
    matches!(s, [first, rem @ ..]
        if first.is_ascii_alphabetic() && rem.iter().all(|&x| table::SCHEME.allows_ascii(x)))
}
