use crate::{
    error::{ComponentError, ParseError, ResolveError},
    ip,
    parser::{self, AuthorityParts, Parts},
    pct_enc::{
        self,
        table::{self, Table},
    },
    resolve::{self, remove_dot_segments, Base},
    scheme::{self, Defaults},
};
use bitflags::bitflags;
use core::hash::{Hash, Hasher};
use std::net::{Ipv4Addr, Ipv6Addr};

bitflags! {
    /// Components whose last assignment was rejected.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub(crate) struct Rejected: u8 {
        const SCHEME = 1;
        const HOST = 1 << 1;
    }
}

/// A host as stored, after normalization.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Host {
    /// A registered name or an IPv4 address, lowercased.
    RegName(String),
    /// An IPv6 address in its canonical form, without brackets.
    Ipv6(String),
}

impl Host {
    pub(crate) fn as_str(&self) -> &str {
        match self {
            Host::RegName(s) | Host::Ipv6(s) => s,
        }
    }
}

/// The kind of a host together with its parsed value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HostKind<'a> {
    /// A registered name, which is also the fallback
    /// for anything that is not an IP address.
    RegName(&'a str),
    /// An IPv4 address in dotted decimal form.
    Ipv4(Ipv4Addr),
    /// An IPv6 address written as an IP literal.
    Ipv6(Ipv6Addr),
}

/// An IRI reference, held as a set of normalized components.
///
/// Every component is normalized when assigned, so that the string
/// form of an `Iri` is always canonical:
///
/// - The scheme and a registered-name host are lowercased.
/// - Percent-encoded octets that form unreserved characters are decoded,
///   and all other percent-encoded octets are uppercased.
/// - Characters not allowed in a component are percent-encoded.
/// - Dot segments are removed from the path of an IRI with a scheme.
/// - IPv6 addresses are written in the form recommended by RFC 5952.
/// - Components equal to the default of their scheme are elided.
///
/// Two `Iri`s are equal if and only if their string forms are equal.
///
/// An assignment that cannot be honored does not fail outright.
/// It is recorded instead and reported by [`is_valid`](Self::is_valid),
/// since IRIs are often assembled from parts that are invalid on their own.
///
/// # Examples
///
/// ```
/// use canon_iri::Iri;
///
/// let iri = Iri::parse("HTTP://Example.COM:80/a/./b/../%63?%61#%7b")?;
/// assert_eq!(iri.to_iri_string(), "http://example.com/a/c?a#%7B");
/// assert_eq!(iri.port(), Some(80));
/// assert!(iri.is_valid());
/// # Ok::<_, canon_iri::ParseError>(())
/// ```
#[derive(Clone, Default)]
pub struct Iri {
    pub(crate) scheme: Option<String>,
    pub(crate) userinfo: Option<String>,
    pub(crate) host: Option<Host>,
    pub(crate) port: Option<u16>,
    pub(crate) path: String,
    pub(crate) query: Option<String>,
    pub(crate) fragment: Option<String>,
    pub(crate) rejected: Rejected,
}

fn normalized(s: &[u8], table: Table) -> String {
    let mut buf = String::with_capacity(s.len());
    pct_enc::normalize(&mut buf, s, table);
    buf
}

fn normalized_reg_name(s: &[u8]) -> String {
    let mut buf = normalized(s, table::IREG_NAME);
    pct_enc::lowercase_outside_triplets(&mut buf);
    buf
}

impl Iri {
    /// Creates an empty IRI reference.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses an IRI reference from a string or bytes.
    ///
    /// Surrounding whitespace is trimmed. Input that breaks the syntax
    /// rules is normalized or recorded as invalid rather than rejected,
    /// so check [`is_valid`](Self::is_valid) before trusting the result.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the fragment contains a line break.
    pub fn parse<S: AsRef<[u8]> + ?Sized>(s: &S) -> Result<Self, ParseError> {
        let parts = parser::parse(s.as_ref())?;
        let mut iri = Self::new();
        iri.assign(parts);
        Ok(iri)
    }

    fn assign(&mut self, parts: Parts<'_>) {
        if let Some(scheme) = parts.scheme {
            self.scheme = Some(String::from_utf8_lossy(scheme).to_ascii_lowercase());
        }
        if let Some(auth) = parts.authority {
            if self.assign_authority(auth).is_err() {
                self.apply_scheme_defaults();
                return;
            }
        }
        self.path = self.normalized_path(parts.path);
        self.query = parts.query.map(|s| normalized(s, table::IQUERY));
        self.fragment = parts.fragment.map(|s| normalized(s, table::IFRAGMENT));
        self.apply_scheme_defaults();
    }

    fn assign_authority(&mut self, auth: AuthorityParts<'_>) -> Result<(), ComponentError> {
        self.userinfo = auth.userinfo.map(|s| normalized(s, table::IUSERINFO));
        self.port = None;
        self.assign_host(Some(auth.host))?;
        if let Some(port) = auth.port {
            self.port = parser::parse_port(port);
            if self.port.is_none() {
                tracing::debug!(port = %String::from_utf8_lossy(port), "discarding invalid port");
            }
        }
        Ok(())
    }

    fn assign_host(&mut self, host: Option<&[u8]>) -> Result<(), ComponentError> {
        self.rejected.remove(Rejected::HOST);
        self.host = match host {
            None => None,
            Some([b'[', rest @ ..]) => match rest.strip_suffix(b"]").and_then(ip::canonicalize_v6) {
                Some(addr) => Some(Host::Ipv6(addr)),
                None => {
                    self.host = None;
                    self.rejected.insert(Rejected::HOST);
                    tracing::warn!(
                        host = %String::from_utf8_lossy(rest),
                        "rejecting invalid IP literal"
                    );
                    return Err(ComponentError::InvalidIpLiteral);
                }
            },
            Some(s) => Some(match ip::canonicalize_v6(s) {
                Some(addr) => Host::Ipv6(addr),
                None => Host::RegName(normalized_reg_name(s)),
            }),
        };
        Ok(())
    }

    fn normalized_path(&self, s: &[u8]) -> String {
        let path = normalized(s, table::IPATH);
        if self.scheme.is_some() {
            remove_dot_segments(&path)
        } else {
            path
        }
    }

    /// Clears the components that equal the defaults of the scheme.
    pub(crate) fn apply_scheme_defaults(&mut self) {
        let Some(defaults) = self.defaults() else {
            return;
        };
        if self.port.is_some() && self.port == defaults.port {
            self.port = None;
        }
        let is_default_host = matches!(
            (&self.host, defaults.host),
            (Some(Host::RegName(host)), Some(default)) if host == default
        );
        if is_default_host {
            self.host = None;
        }
    }

    fn defaults(&self) -> Option<&'static Defaults> {
        self.scheme.as_deref().and_then(scheme::defaults)
    }

    pub(crate) fn has_authority(&self) -> bool {
        self.userinfo.is_some() || self.host.is_some() || self.port.is_some()
    }

    /// Returns the scheme, lowercased.
    #[must_use]
    pub fn scheme(&self) -> Option<&str> {
        self.scheme.as_deref()
    }

    /// Returns the userinfo subcomponent.
    #[must_use]
    pub fn userinfo(&self) -> Option<&str> {
        self.userinfo.as_deref()
    }

    /// Returns the host, or the default host of the scheme if absent.
    ///
    /// IPv6 addresses are returned without brackets.
    ///
    /// ```
    /// use canon_iri::Iri;
    ///
    /// let iri = Iri::parse("http://[0:0:0:0:0:0:0:1]")?;
    /// assert_eq!(iri.host(), Some("::1"));
    ///
    /// let iri = Iri::parse("file://localhost/etc/hosts")?;
    /// assert_eq!(iri.to_iri_string(), "file:/etc/hosts");
    /// assert_eq!(iri.host(), Some("localhost"));
    /// # Ok::<_, canon_iri::ParseError>(())
    /// ```
    #[must_use]
    pub fn host(&self) -> Option<&str> {
        match &self.host {
            Some(host) => Some(host.as_str()),
            None => self.defaults().and_then(|d| d.host),
        }
    }

    /// Returns the kind of the host along with its parsed value.
    #[must_use]
    pub fn host_kind(&self) -> Option<HostKind<'_>> {
        if let Some(Host::Ipv6(addr)) = &self.host {
            return ip::parse_v6(addr.as_bytes()).map(|v6| HostKind::Ipv6(v6.addr()));
        }
        let host = self.host()?;
        Some(match ip::parse_v4(host.as_bytes()) {
            Some(addr) => HostKind::Ipv4(addr),
            None => HostKind::RegName(host),
        })
    }

    /// Returns the port, or the default port of the scheme if absent.
    #[must_use]
    pub fn port(&self) -> Option<u16> {
        self.port.or_else(|| self.defaults().and_then(|d| d.port))
    }

    /// Returns the port only if it is written out in the IRI.
    #[must_use]
    pub fn explicit_port(&self) -> Option<u16> {
        self.port
    }

    /// Returns the path.
    ///
    /// An empty path following a non-empty authority reads as
    /// the default path of the scheme, if any.
    #[must_use]
    pub fn path(&self) -> &str {
        if self.path.is_empty() && self.has_nonempty_authority() {
            if let Some(path) = self.defaults().and_then(|d| d.path) {
                return path;
            }
        }
        &self.path
    }

    /// Returns the query.
    #[must_use]
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Returns the fragment.
    #[must_use]
    pub fn fragment(&self) -> Option<&str> {
        self.fragment.as_deref()
    }

    /// Returns the authority as written in the IRI, without the leading `//`.
    #[must_use]
    pub fn authority(&self) -> Option<String> {
        if !self.has_authority() {
            return None;
        }
        let mut buf = String::new();
        self.write_authority(&mut buf);
        Some(buf)
    }

    fn has_nonempty_authority(&self) -> bool {
        self.userinfo.is_some()
            || self.port.is_some()
            || self.host.as_ref().is_some_and(|h| !h.as_str().is_empty())
    }

    /// Sets the scheme.
    ///
    /// Components elided as defaults of the old scheme are not restored,
    /// and components equal to defaults of the new scheme are elided.
    /// So switching `http://a/` to `https` moves the effective port from
    /// 80 to 443. Set the port again afterwards to keep it.
    ///
    /// ```
    /// use canon_iri::Iri;
    ///
    /// let mut iri = Iri::parse("http://a/")?;
    /// iri.set_scheme(Some("https")).unwrap();
    /// assert_eq!(iri.port(), Some(443));
    ///
    /// let mut iri = Iri::parse("file:/x")?;
    /// assert_eq!(iri.host(), Some("localhost"));
    /// iri.set_scheme(Some("http")).unwrap();
    /// assert_eq!(iri.host(), None);
    /// # Ok::<_, canon_iri::ParseError>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `Err` and leaves the scheme absent if the scheme
    /// is not a valid scheme name.
    pub fn set_scheme(&mut self, scheme: Option<&str>) -> Result<(), ComponentError> {
        self.rejected.remove(Rejected::SCHEME);
        match scheme {
            None => self.scheme = None,
            Some(s) if scheme::is_valid(s.as_bytes()) => {
                self.scheme = Some(s.to_ascii_lowercase());
                self.apply_scheme_defaults();
            }
            Some(s) => {
                self.scheme = None;
                self.rejected.insert(Rejected::SCHEME);
                tracing::warn!(scheme = s, "rejecting invalid scheme");
                return Err(ComponentError::InvalidScheme);
            }
        }
        Ok(())
    }

    /// Sets the userinfo subcomponent.
    pub fn set_userinfo(&mut self, userinfo: Option<&str>) {
        self.userinfo = userinfo.map(|s| normalized(s.as_bytes(), table::IUSERINFO));
    }

    /// Sets the host.
    ///
    /// An IPv6 address is accepted with or without brackets.
    ///
    /// # Errors
    ///
    /// Returns `Err` and leaves the host absent if the host
    /// starts with `[` but is not a valid IPv6 address in brackets.
    pub fn set_host(&mut self, host: Option<&str>) -> Result<(), ComponentError> {
        let res = self.assign_host(host.map(str::as_bytes));
        self.apply_scheme_defaults();
        res
    }

    /// Sets the port.
    pub fn set_port(&mut self, port: Option<u16>) {
        self.port = port;
        self.apply_scheme_defaults();
    }

    /// Sets the whole authority, replacing the userinfo, host and port.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the host is not valid, in which case
    /// the port is left absent.
    pub fn set_authority(&mut self, authority: Option<&str>) -> Result<(), ComponentError> {
        let res = match authority {
            Some(s) => self.assign_authority(parser::parse_authority(s.as_bytes())),
            None => {
                self.userinfo = None;
                self.port = None;
                self.assign_host(None)
            }
        };
        self.apply_scheme_defaults();
        res
    }

    /// Sets the path.
    ///
    /// Dot segments are removed if the IRI has a scheme.
    pub fn set_path(&mut self, path: &str) {
        self.path = self.normalized_path(path.as_bytes());
    }

    /// Sets the query.
    pub fn set_query(&mut self, query: Option<&str>) {
        self.query = query.map(|s| normalized(s.as_bytes(), table::IQUERY));
    }

    /// Appends a parameter to the query, separated by `&`.
    ///
    /// ```
    /// use canon_iri::Iri;
    ///
    /// let mut iri = Iri::parse("http://example.com/")?;
    /// iri.append_query("a=b");
    /// iri.append_query("c=d e");
    /// assert_eq!(iri.to_iri_string(), "http://example.com/?a=b&c=d%20e");
    /// # Ok::<_, canon_iri::ParseError>(())
    /// ```
    pub fn append_query(&mut self, param: &str) {
        let param = normalized(param.as_bytes(), table::IQUERY);
        match &mut self.query {
            Some(query) if !query.is_empty() => {
                query.push('&');
                query.push_str(&param);
            }
            query => *query = Some(param),
        }
    }

    /// Sets the fragment.
    pub fn set_fragment(&mut self, fragment: Option<&str>) {
        self.fragment = fragment.map(|s| normalized(s.as_bytes(), table::IFRAGMENT));
    }

    /// Checks whether the IRI reference is valid.
    ///
    /// An IRI reference is invalid if an assignment was rejected,
    /// if its path could be mistaken for an authority or a scheme,
    /// or if a component contains a character not allowed in it.
    ///
    /// ```
    /// use canon_iri::Iri;
    ///
    /// let mut iri = Iri::new();
    /// iri.set_path("/test/:");
    /// assert!(iri.is_valid());
    /// iri.set_path("/test:/");
    /// assert!(!iri.is_valid());
    /// ```
    #[must_use]
    pub fn is_valid(&self) -> bool {
        if !self.rejected.is_empty() {
            return false;
        }

        let path = self.path.as_str();
        let has_authority = self.has_authority();
        if has_authority {
            if !path.is_empty() && !path.starts_with('/') {
                return false;
            }
        } else if path.starts_with("//") {
            return false;
        }

        if self.scheme.is_none() && !has_authority {
            if let Some(colon) = path.find(':') {
                let slash = path.bytes().skip(1).position(|x| x == b'/').map(|i| i + 1);
                if slash.map_or(true, |slash| colon < slash) {
                    return false;
                }
            }
        }

        self.scheme
            .as_ref()
            .map_or(true, |s| scheme::is_valid(s.as_bytes()))
            && self
                .userinfo
                .as_ref()
                .map_or(true, |s| table::IUSERINFO.validate(s))
            && match &self.host {
                Some(Host::RegName(s)) => table::IREG_NAME.validate(s),
                Some(Host::Ipv6(s)) => ip::parse_v6(s.as_bytes()).is_some(),
                None => true,
            }
            && table::IPATH.validate(path)
            && self.query.as_ref().map_or(true, |s| table::IQUERY.validate(s))
            && self
                .fragment
                .as_ref()
                .map_or(true, |s| table::IFRAGMENT.validate(s))
    }

    /// Resolves a reference against this IRI.
    ///
    /// # Errors
    ///
    /// See [`resolve`](crate::resolve::resolve).
    pub fn resolve<R: AsRef<[u8]> + ?Sized>(&self, reference: &R) -> Result<Iri, ResolveError> {
        resolve::resolve(Base::Iri(self), reference)
    }

    fn write_authority(&self, buf: &mut String) {
        if let Some(userinfo) = &self.userinfo {
            buf.push_str(userinfo);
            buf.push('@');
        }
        match &self.host {
            Some(Host::RegName(host)) => buf.push_str(host),
            Some(Host::Ipv6(addr)) => {
                buf.push('[');
                buf.push_str(addr);
                buf.push(']');
            }
            None => {}
        }
        if let Some(port) = self.port {
            buf.push(':');
            buf.push_str(&port.to_string());
        }
    }

    /// Returns the canonical string form, which keeps non-ASCII
    /// characters unencoded.
    #[must_use]
    pub fn to_iri_string(&self) -> String {
        let mut buf = String::new();
        if let Some(scheme) = &self.scheme {
            buf.push_str(scheme);
            buf.push(':');
        }
        if self.has_authority() {
            buf.push_str("//");
            self.write_authority(&mut buf);
        }
        buf.push_str(self.path());
        if let Some(query) = &self.query {
            buf.push('?');
            buf.push_str(query);
        }
        if let Some(fragment) = &self.fragment {
            buf.push('#');
            buf.push_str(fragment);
        }
        buf
    }

    /// Returns the canonical string form with every
    /// non-ASCII byte percent-encoded.
    ///
    /// ```
    /// use canon_iri::Iri;
    ///
    /// let iri = Iri::parse("http://example.com/école")?;
    /// assert_eq!(iri.to_uri_string(), "http://example.com/%C3%A9cole");
    /// # Ok::<_, canon_iri::ParseError>(())
    /// ```
    #[must_use]
    pub fn to_uri_string(&self) -> String {
        pct_enc::encode_non_ascii(&self.to_iri_string())
    }
}

impl PartialEq for Iri {
    fn eq(&self, other: &Self) -> bool {
        self.to_iri_string() == other.to_iri_string()
    }
}

impl Eq for Iri {}

impl Hash for Iri {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_iri_string().hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iri(s: &str) -> Iri {
        Iri::parse(s).unwrap()
    }

    #[test]
    fn authority_presence() {
        assert_eq!(iri("http://").to_iri_string(), "http://");
        assert_eq!(iri("http://").authority().as_deref(), Some(""));
        assert_eq!(iri("http:/a").authority(), None);
        assert_eq!(iri("///").to_iri_string(), "///");
        assert_eq!(iri("http://@a").authority().as_deref(), Some("@a"));
    }

    #[test]
    fn default_path() {
        let x = iri("http://a");
        assert_eq!(x.path(), "/");
        assert_eq!(x.to_iri_string(), "http://a/");
        assert_eq!(iri("example://a").path(), "");
        assert_eq!(iri("http:").path(), "");
    }

    #[test]
    fn invalid_ip_literal() {
        let x = iri("http://u@[invalid]:8080/a?b#c");
        assert_eq!(x.to_iri_string(), "http://u@/");
        assert!(!x.is_valid());
        assert_eq!(x.rejected, Rejected::HOST);
    }

    #[test]
    fn host_kinds() {
        assert_eq!(
            iri("http://127.0.0.1/").host_kind(),
            Some(HostKind::Ipv4(Ipv4Addr::LOCALHOST))
        );
        assert_eq!(
            iri("http://[::1]/").host_kind(),
            Some(HostKind::Ipv6(Ipv6Addr::LOCALHOST))
        );
        assert_eq!(
            iri("http://Example.com/").host_kind(),
            Some(HostKind::RegName("example.com"))
        );
        assert_eq!(iri("file:/a").host_kind(), Some(HostKind::RegName("localhost")));
        assert_eq!(iri("/a").host_kind(), None);
    }

    #[test]
    fn scheme_defaults_follow_scheme_changes() {
        let mut x = iri("example://a:443/");
        assert_eq!(x.explicit_port(), Some(443));
        x.set_scheme(Some("HTTPS")).unwrap();
        assert_eq!(x.explicit_port(), None);
        assert_eq!(x.port(), Some(443));
        assert_eq!(x.to_iri_string(), "https://a/");
    }

    #[test]
    fn unbracketed_ipv6_host() {
        let mut x = iri("http://a/");
        x.set_host(Some("0:0::1")).unwrap();
        assert_eq!(x.host(), Some("::1"));
        assert_eq!(x.to_iri_string(), "http://[::1]/");
    }

    #[test]
    fn elided_defaults_do_not_survive_scheme_changes() {
        let mut x = iri("http://a/");
        x.set_scheme(Some("https")).unwrap();
        assert_eq!(x.port(), Some(443));
        assert_eq!(x.to_iri_string(), "https://a/");

        let mut x = iri("http://a/");
        let port = x.port();
        x.set_scheme(Some("https")).unwrap();
        x.set_port(port);
        assert_eq!(x.to_iri_string(), "https://a:80/");

        let mut x = iri("file:/x");
        x.set_scheme(Some("http")).unwrap();
        assert_eq!(x.host(), None);
        assert_eq!(x.to_iri_string(), "http:/x");
    }

    #[test]
    fn unterminated_ip_literal() {
        let x = iri("http://[::1");
        assert!(!x.is_valid());
        assert_eq!(x.host(), None);
        assert_eq!(x.to_iri_string(), "http:");

        let x = iri("http://u@[::1:80/a");
        assert!(!x.is_valid());
        assert_eq!(x.to_iri_string(), "http://u@/");

        let mut x = iri("http://a/");
        assert_eq!(x.set_host(Some("[::1")), Err(ComponentError::InvalidIpLiteral));
        assert!(!x.is_valid());
        assert_eq!(x.set_host(Some("[::1]x")), Err(ComponentError::InvalidIpLiteral));
        x.set_host(Some("[::1]")).unwrap();
        assert!(x.is_valid());
    }

    #[test]
    fn rejected_scheme_is_cleared_by_valid_one() {
        let mut x = Iri::new();
        assert_eq!(x.set_scheme(Some("1http")), Err(ComponentError::InvalidScheme));
        assert!(!x.is_valid());
        assert_eq!(x.scheme(), None);
        x.set_scheme(Some("http")).unwrap();
        assert!(x.is_valid());
    }
}
