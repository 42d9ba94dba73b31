//! Module for reference resolution.

use crate::{error::ResolveError, Iri};
use std::borrow::Cow;

/// A base IRI, either already parsed or still a string.
#[derive(Clone, Copy, Debug)]
pub enum Base<'a> {
    /// A parsed IRI.
    Iri(&'a Iri),
    /// A string to be parsed with [`Iri::parse`].
    Str(&'a str),
}

impl<'a> From<&'a Iri> for Base<'a> {
    #[inline]
    fn from(iri: &'a Iri) -> Self {
        Base::Iri(iri)
    }
}

impl<'a> From<&'a str> for Base<'a> {
    #[inline]
    fn from(s: &'a str) -> Self {
        Base::Str(s)
    }
}

impl<'a> From<&'a String> for Base<'a> {
    #[inline]
    fn from(s: &'a String) -> Self {
        Base::Str(s)
    }
}

impl<'a> Base<'a> {
    fn into_iri(self) -> Result<Cow<'a, Iri>, ResolveError> {
        match self {
            Base::Iri(iri) => Ok(Cow::Borrowed(iri)),
            Base::Str(s) => Iri::parse(s)
                .map(Cow::Owned)
                .map_err(ResolveError::InvalidBase),
        }
    }
}

/// A reference resolver against a fixed base.
///
/// # Examples
///
/// ```
/// use canon_iri::{resolve::Resolver, Iri};
///
/// let base = Iri::parse("http://example.com/foo/bar")?;
/// let resolver = Resolver::with_base(base);
///
/// assert_eq!(resolver.resolve("baz").unwrap().to_iri_string(), "http://example.com/foo/baz");
/// assert_eq!(resolver.resolve("../baz").unwrap().to_iri_string(), "http://example.com/baz");
/// assert_eq!(resolver.resolve("?baz").unwrap().to_iri_string(), "http://example.com/foo/bar?baz");
/// # Ok::<_, canon_iri::ParseError>(())
/// ```
#[derive(Clone, Debug)]
#[must_use]
pub struct Resolver {
    base: Iri,
}

impl Resolver {
    /// Creates a new `Resolver` with the given base.
    pub fn with_base(base: Iri) -> Self {
        Self { base }
    }

    /// Returns the base of this resolver.
    #[must_use]
    pub fn base(&self) -> &Iri {
        &self.base
    }

    /// Resolves the given reference against the configured base.
    ///
    /// # Errors
    ///
    /// Returns `Err` on the same conditions as [`resolve`].
    pub fn resolve<R: AsRef<[u8]> + ?Sized>(&self, reference: &R) -> Result<Iri, ResolveError> {
        resolve(&self.base, reference)
    }
}

/// Resolves a reference against a base, following
/// [Section 5.2 of RFC 3986](https://datatracker.ietf.org/doc/html/rfc3986/#section-5.2).
///
/// The base may be given as a parsed [`Iri`] or as a string.
/// The fragment of the target always comes from the reference,
/// so resolving an empty reference clears the fragment of the base.
///
/// # Errors
///
/// Returns `Err` if the base fails to parse, has no scheme or is invalid,
/// or if the reference fails to parse or is invalid.
///
/// # Examples
///
/// ```
/// use canon_iri::resolve::resolve;
///
/// let target = resolve("http://a/b/c/d;p?q", "../../../g").unwrap();
/// assert_eq!(target.to_iri_string(), "http://a/g");
///
/// let target = resolve("http://example.com/#foo", "").unwrap();
/// assert_eq!(target.to_iri_string(), "http://example.com/");
/// ```
pub fn resolve<'a, R: AsRef<[u8]> + ?Sized>(
    base: impl Into<Base<'a>>,
    reference: &R,
) -> Result<Iri, ResolveError> {
    let base = base.into().into_iri()?;
    let r = Iri::parse(reference).map_err(ResolveError::InvalidReference)?;

    let res = resolve_parsed(&base, r);
    if let Err(e) = &res {
        tracing::debug!(base = %base, error = %e, "failed to resolve reference");
    }
    res
}

fn resolve_parsed(base: &Iri, r: Iri) -> Result<Iri, ResolveError> {
    if !r.is_valid() {
        return Err(ResolveError::InvalidReferenceIri);
    }
    if base.scheme.is_none() {
        return Err(ResolveError::BaseNotAbsolute);
    }
    if !base.is_valid() {
        return Err(ResolveError::InvalidBaseIri);
    }

    let mut t;
    if r.scheme.is_some() {
        t = r;
        t.path = remove_dot_segments(&t.path);
    } else if r.has_authority() {
        t = r;
        t.scheme.clone_from(&base.scheme);
        t.path = remove_dot_segments(&t.path);
    } else if r.to_iri_string().is_empty() {
        t = base.clone();
        t.fragment = None;
    } else {
        t = Iri {
            scheme: base.scheme.clone(),
            userinfo: base.userinfo.clone(),
            host: base.host.clone(),
            port: base.port,
            ..Iri::default()
        };
        if r.path.is_empty() {
            t.path.clone_from(&base.path);
            t.query = r.query.or_else(|| base.query.clone());
        } else {
            let merged = if r.path.starts_with('/') {
                Cow::Borrowed(r.path.as_str())
            } else if base.has_authority() && base.path.is_empty() {
                Cow::Owned(format!("/{}", r.path))
            } else {
                match base.path.rfind('/') {
                    Some(i) => Cow::Owned(format!("{}{}", &base.path[..=i], r.path)),
                    None => Cow::Borrowed(r.path.as_str()),
                }
            };
            t.path = remove_dot_segments(&merged);
            t.query = r.query;
        }
        t.fragment = r.fragment;
    }

    t.apply_scheme_defaults();
    Ok(t)
}

/// Removes the dot segments `.` and `..` from a path, following
/// [Section 5.2.4 of RFC 3986](https://datatracker.ietf.org/doc/html/rfc3986/#section-5.2.4).
///
/// A `..` segment that would climb above the root is dropped.
///
/// # Examples
///
/// ```
/// use canon_iri::resolve::remove_dot_segments;
///
/// assert_eq!(remove_dot_segments("/a/b/c/./../../g"), "/a/g");
/// assert_eq!(remove_dot_segments("mid/content=5/../6"), "mid/6");
/// assert_eq!(remove_dot_segments("/../../g"), "/g");
/// ```
#[must_use]
pub fn remove_dot_segments(path: &str) -> String {
    let mut input = path;
    let mut output = String::with_capacity(path.len());

    while !input.is_empty() {
        if let Some(rem) = input.strip_prefix("../") {
            input = rem;
        } else if let Some(rem) = input.strip_prefix("./") {
            input = rem;
        } else if input.starts_with("/./") {
            input = &input[2..];
        } else if input == "/." {
            input = "/";
        } else if input.starts_with("/../") {
            input = &input[3..];
            pop_last_segment(&mut output);
        } else if input == "/.." {
            input = "/";
            pop_last_segment(&mut output);
        } else if input == "." || input == ".." {
            input = "";
        } else {
            let start = usize::from(input.starts_with('/'));
            let end = input[start..].find('/').map_or(input.len(), |i| i + start);
            output.push_str(&input[..end]);
            input = &input[end..];
        }
    }
    output
}

fn pop_last_segment(output: &mut String) {
    let i = output.rfind('/').unwrap_or(0);
    output.truncate(i);
}
