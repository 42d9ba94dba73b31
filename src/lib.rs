#![warn(missing_debug_implementations, missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

//! An IRI reference resolver and canonicalizer following
//! IETF [RFC 3986] and [RFC 3987].
//!
//! [RFC 3986]: https://datatracker.ietf.org/doc/html/rfc3986/
//! [RFC 3987]: https://datatracker.ietf.org/doc/html/rfc3987/
//!
//! See the documentation of [`Iri`] for the normalization applied to
//! every component, and [`resolve`](resolve::resolve) for reference resolution.
//!
//! # Examples
//!
//! ```
//! use canon_iri::{resolve::resolve, Iri};
//!
//! let target = resolve("http://example.com/feed/", "../posts/%7e1?a#top").unwrap();
//! assert_eq!(target.to_iri_string(), "http://example.com/posts/~1?a#top");
//!
//! assert_eq!(Iri::parse("http://É.com")?, Iri::parse("http://%C3%89.com")?);
//! assert_ne!(
//!     Iri::parse("http://example.com/foo/bar")?,
//!     Iri::parse("http://example.com/foo%2Fbar")?,
//! );
//! # Ok::<_, canon_iri::ParseError>(())
//! ```
//!
//! # Feature flags
//!
//! - `cache` (default): Enables the [`cache`] module, which computes
//!   cache expiry times from HTTP response headers.
//!
//! - `serde`: Enables `Serialize` and `Deserialize` implementations
//!   for [`Iri`], which go through its string form.

#[cfg(feature = "cache")]
pub mod cache;
pub mod resolve;
pub mod scheme;

mod error;
mod fmt;
mod ip;
mod iri;
mod parser;
mod pct_enc;
mod property;
mod utf8;

pub use error::{ComponentError, ParseError, ParseErrorKind, ResolveError};
pub use iri::{HostKind, Iri};
pub use property::{Property, Value};
