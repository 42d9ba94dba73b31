//! Error types.

use core::fmt;
use thiserror::Error;

/// Detailed cause of a [`ParseError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParseErrorKind {
    /// Line break in the fragment.
    ///
    /// The error index points to the first `\n` or `\r` of the fragment,
    /// relative to the trimmed input.
    LineBreakInFragment,
}

/// An error occurred when parsing IRI references.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("{kind} at index {index}")]
pub struct ParseError {
    pub(crate) index: usize,
    pub(crate) kind: ParseErrorKind,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ParseErrorKind::LineBreakInFragment => "line break in fragment",
        })
    }
}

impl ParseError {
    /// Returns the index at which the error occurred.
    #[inline]
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the detailed cause of the error.
    #[inline]
    #[must_use]
    pub fn kind(&self) -> ParseErrorKind {
        self.kind
    }
}

/// An error occurred when resolving IRI references.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ResolveError {
    /// The base string could not be parsed.
    #[error("invalid base: {0}")]
    InvalidBase(ParseError),
    /// The base has no scheme.
    #[error("base IRI without scheme")]
    BaseNotAbsolute,
    /// The base was parsed but is not a valid IRI.
    #[error("base IRI is not valid")]
    InvalidBaseIri,
    /// The reference string could not be parsed.
    #[error("invalid reference: {0}")]
    InvalidReference(ParseError),
    /// The reference was parsed but is not a valid IRI reference.
    #[error("reference is not valid")]
    InvalidReferenceIri,
}

/// An error occurred when assigning a component of an [`Iri`].
///
/// The rejected assignment is also recorded on the IRI,
/// which reports it through [`Iri::is_valid`].
///
/// [`Iri`]: crate::Iri
/// [`Iri::is_valid`]: crate::Iri::is_valid
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ComponentError {
    /// The scheme does not match `ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )`.
    #[error("invalid scheme")]
    InvalidScheme,
    /// The bracketed host is not a valid IP literal.
    #[error("invalid IP literal")]
    InvalidIpLiteral,
    /// The property name is not recognized.
    #[error("unknown property `{0}`")]
    UnknownProperty(String),
    /// The property is computed and cannot be assigned.
    #[error("property `{0}` is read-only")]
    ReadOnly(&'static str),
}
