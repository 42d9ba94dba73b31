//! Access to components by name.

use crate::{error::ComponentError, parser, pct_enc, Iri};
use std::{borrow::Cow, fmt, str::FromStr};

/// A component or computed property of an [`Iri`], addressed by name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Property {
    /// `scheme` or `ischeme`.
    Scheme,
    /// `userinfo` or `iuserinfo`.
    Userinfo,
    /// `host` or `ihost`.
    Host,
    /// `port` or `iport`.
    Port,
    /// `path` or `ipath`.
    Path,
    /// `query` or `iquery`.
    Query,
    /// `fragment` or `ifragment`.
    Fragment,
    /// `authority`, with non-ASCII characters percent-encoded.
    Authority,
    /// `iauthority`.
    Iauthority,
    /// `uri`, the whole reference with non-ASCII characters percent-encoded.
    Uri,
    /// `iri`, the whole reference.
    Iri,
}

impl Property {
    /// Returns the canonical name of the property.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Property::Scheme => "scheme",
            Property::Userinfo => "userinfo",
            Property::Host => "host",
            Property::Port => "port",
            Property::Path => "path",
            Property::Query => "query",
            Property::Fragment => "fragment",
            Property::Authority => "authority",
            Property::Iauthority => "iauthority",
            Property::Uri => "uri",
            Property::Iri => "iri",
        }
    }
}

impl FromStr for Property {
    type Err = ComponentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "scheme" | "ischeme" => Property::Scheme,
            "userinfo" | "iuserinfo" => Property::Userinfo,
            "host" | "ihost" => Property::Host,
            "port" | "iport" => Property::Port,
            "path" | "ipath" => Property::Path,
            "query" | "iquery" => Property::Query,
            "fragment" | "ifragment" => Property::Fragment,
            "authority" => Property::Authority,
            "iauthority" => Property::Iauthority,
            "uri" => Property::Uri,
            "iri" => Property::Iri,
            _ => return Err(ComponentError::UnknownProperty(s.to_owned())),
        })
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The value of a property read by name.
///
/// `Undefined` and `Null` are distinct: the former means that no
/// such property exists, the latter that the component is absent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Value<'a> {
    /// No property has this name.
    Undefined,
    /// The component is absent.
    Null,
    /// A textual value.
    Str(Cow<'a, str>),
    /// A port number.
    Port(u16),
}

impl Value<'_> {
    /// Returns the textual value, if any.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(&**s),
            _ => None,
        }
    }
}

impl<'a> From<Option<&'a str>> for Value<'a> {
    fn from(s: Option<&'a str>) -> Self {
        s.map_or(Value::Null, |s| Value::Str(Cow::Borrowed(s)))
    }
}

impl Iri {
    /// Reads a property by name.
    ///
    /// Returns [`Value::Undefined`] and emits a warning
    /// if the name is not recognized.
    ///
    /// ```
    /// use canon_iri::{Iri, Value};
    ///
    /// let iri = Iri::parse("http://example.com/")?;
    /// assert_eq!(iri.get("ihost").as_str(), Some("example.com"));
    /// assert_eq!(iri.get("port"), Value::Port(80));
    /// assert_eq!(iri.get("fragment"), Value::Null);
    /// assert_eq!(iri.get("nonexistent_prop"), Value::Undefined);
    /// # Ok::<_, canon_iri::ParseError>(())
    /// ```
    #[must_use]
    pub fn get(&self, name: &str) -> Value<'_> {
        match name.parse() {
            Ok(prop) => self.get_property(prop),
            Err(_) => {
                tracing::warn!(property = name, "undefined property");
                Value::Undefined
            }
        }
    }

    /// Reads a property.
    #[must_use]
    pub fn get_property(&self, prop: Property) -> Value<'_> {
        match prop {
            Property::Scheme => self.scheme().into(),
            Property::Userinfo => self.userinfo().into(),
            Property::Host => self.host().into(),
            Property::Port => self.port().map_or(Value::Null, Value::Port),
            Property::Path => Some(self.path()).into(),
            Property::Query => self.query().into(),
            Property::Fragment => self.fragment().into(),
            Property::Iauthority => self.authority().map_or(Value::Null, |s| Value::Str(s.into())),
            Property::Authority => self.authority().map_or(Value::Null, |s| {
                Value::Str(pct_enc::encode_non_ascii(&s).into())
            }),
            Property::Iri => Value::Str(self.to_iri_string().into()),
            Property::Uri => Value::Str(self.to_uri_string().into()),
        }
    }

    /// Assigns a property by name, with `None` removing the component.
    ///
    /// A port that is not a decimal number clears the port
    /// without failing.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the name is not recognized, if the property
    /// is read-only, or if the assignment was rejected.
    ///
    /// ```
    /// use canon_iri::{ComponentError, Iri, Value};
    ///
    /// let mut iri = Iri::new();
    /// iri.set("ischeme", Some("http"))?;
    /// iri.set("ihost", Some("example.com"))?;
    /// assert_eq!(iri.to_iri_string(), "http://example.com/");
    ///
    /// iri.set("port", Some("8080"))?;
    /// assert_eq!(iri.get("port"), Value::Port(8080));
    /// iri.set("port", Some("example"))?;
    /// assert_eq!(iri.get("port"), Value::Port(80));
    /// # Ok::<_, ComponentError>(())
    /// ```
    pub fn set(&mut self, name: &str, value: Option<&str>) -> Result<(), ComponentError> {
        let prop = name.parse::<Property>().map_err(|e| {
            tracing::warn!(property = name, "cannot assign undefined property");
            e
        })?;
        self.set_property(prop, value)
    }

    /// Assigns a property, with `None` removing the component.
    ///
    /// # Errors
    ///
    /// See [`set`](Self::set).
    pub fn set_property(&mut self, prop: Property, value: Option<&str>) -> Result<(), ComponentError> {
        match prop {
            Property::Scheme => self.set_scheme(value)?,
            Property::Userinfo => self.set_userinfo(value),
            Property::Host => self.set_host(value)?,
            Property::Port => {
                let port = value.and_then(|s| parser::parse_port(s.as_bytes()));
                if let (None, Some(s)) = (port, value) {
                    tracing::debug!(port = s, "discarding invalid port");
                }
                self.set_port(port);
            }
            Property::Path => self.set_path(value.unwrap_or_default()),
            Property::Query => self.set_query(value),
            Property::Fragment => self.set_fragment(value),
            Property::Authority | Property::Iauthority => self.set_authority(value)?,
            Property::Iri | Property::Uri => return Err(ComponentError::ReadOnly(prop.name())),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases() {
        for (name, prop) in [
            ("ischeme", Property::Scheme),
            ("iuserinfo", Property::Userinfo),
            ("ihost", Property::Host),
            ("iport", Property::Port),
            ("ipath", Property::Path),
            ("iquery", Property::Query),
            ("ifragment", Property::Fragment),
        ] {
            assert_eq!(name.parse::<Property>(), Ok(prop));
            assert_eq!(prop.name().parse::<Property>(), Ok(prop));
        }
        assert!("Host".parse::<Property>().is_err());
    }

    #[test]
    fn computed() {
        let iri = Iri::parse("http://us\u{e9}r@example.com/\u{e9}").unwrap();
        assert_eq!(iri.get("iauthority").as_str(), Some("us\u{e9}r@example.com"));
        assert_eq!(iri.get("authority").as_str(), Some("us%C3%A9r@example.com"));
        assert_eq!(iri.get("uri").as_str(), Some("http://us%C3%A9r@example.com/%C3%A9"));
        assert_eq!(iri.get("iri").as_str(), Some("http://us\u{e9}r@example.com/\u{e9}"));
    }

    #[test]
    fn read_only() {
        let mut iri = Iri::new();
        assert_eq!(iri.set("iri", Some("http://a/")), Err(ComponentError::ReadOnly("iri")));
        assert_eq!(
            iri.set("nonexistent_prop", Some("a")),
            Err(ComponentError::UnknownProperty("nonexistent_prop".into()))
        );
    }

    #[test]
    fn port_without_scheme_default() {
        let mut iri = Iri::parse("example://a/").unwrap();
        assert_eq!(iri.get("port"), Value::Null);
        iri.set("port", Some("8080")).unwrap();
        assert_eq!(iri.get("port"), Value::Port(8080));
        iri.set("port", None).unwrap();
        assert_eq!(iri.get("port"), Value::Null);
    }

    #[test]
    fn invalid_port_clears_silently() {
        let mut iri = Iri::parse("example://a:81/").unwrap();
        assert_eq!(iri.set("port", Some("example")), Ok(()));
        assert_eq!(iri.get("port"), Value::Null);
        assert_eq!(iri.to_iri_string(), "example://a/");

        iri.set("iport", Some("81")).unwrap();
        assert_eq!(iri.set("iport", Some("65536")), Ok(()));
        assert_eq!(iri.explicit_port(), None);
        assert!(iri.is_valid());
    }
}
