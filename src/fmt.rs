use crate::{error::ParseError, Iri};
use core::{fmt, str::FromStr};

#[cfg(feature = "serde")]
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

impl fmt::Debug for Iri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iri")
            .field("scheme", &self.scheme())
            .field("userinfo", &self.userinfo())
            .field("host", &self.host.as_ref().map(|h| h.as_str()))
            .field("port", &self.explicit_port())
            .field("path", &self.path)
            .field("query", &self.query())
            .field("fragment", &self.fragment())
            .field("valid", &self.is_valid())
            .finish()
    }
}

impl fmt::Display for Iri {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_iri_string())
    }
}

impl FromStr for Iri {
    type Err = ParseError;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Iri::parse(s)
    }
}

#[cfg(feature = "serde")]
impl Serialize for Iri {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_iri_string())
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for Iri {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Iri::parse(&s)
            .map_err(|e| de::Error::custom(format_args!("failed to parse {s:?} as IRI: {e}")))
    }
}
