//! Byte pattern tables from RFC 3986 and RFC 3987.
//!
//! The table constants in this module are documented with
//! the ABNF notation of [RFC 5234].
//!
//! [RFC 5234]: https://datatracker.ietf.org/doc/html/rfc5234

use super::is_hexdig_pair;

const MASK_PCT_ENCODED: u64 = 1 << b'%';
const MASK_UCSCHAR: u64 = 1;
const MASK_IPRIVATE: u64 = 2;
const MASK_UNENCODED_ASCII: u64 = !(MASK_PCT_ENCODED | MASK_UCSCHAR | MASK_IPRIVATE);

const fn is_ucschar(x: u32) -> bool {
    matches!(x, 0xa0..=0xd7ff | 0xf900..=0xfdcf | 0xfdf0..=0xffef)
        || (x >= 0x10000 && x <= 0xdffff && (x & 0xffff) <= 0xfffd)
        || (x >= 0xe1000 && x <= 0xefffd)
}

const fn is_iprivate(x: u32) -> bool {
    (x >= 0xe000 && x <= 0xf8ff) || (x >= 0xf0000 && (x & 0xffff) <= 0xfffd)
}

/// A table specifying the byte patterns allowed in a component.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Table(u64, u64);

impl Table {
    /// Creates a table that only allows the given unencoded bytes.
    ///
    /// # Panics
    ///
    /// Panics if any of the bytes is not ASCII or equals `0`, `1`, or `b'%'`.
    pub(crate) const fn new(mut bytes: &[u8]) -> Self {
        let mut table = 0;
        while let [cur, rem @ ..] = bytes {
            assert!(
                !matches!(cur, 0 | 1 | b'%' | 128..),
                "cannot allow non-ASCII byte, 0, 1, or %"
            );
            table |= 1u128.wrapping_shl(*cur as u32);
            bytes = rem;
        }
        Self(table as u64, (table >> 64) as u64)
    }

    /// Returns a table that allows all the byte patterns allowed
    /// by `self` or by `other`.
    pub(crate) const fn or(self, other: Self) -> Self {
        Self(self.0 | other.0, self.1 | other.1)
    }

    pub(crate) const fn or_pct_encoded(self) -> Self {
        Self(self.0 | MASK_PCT_ENCODED, self.1)
    }

    /// Marks this table as allowing characters matching the [`ucschar`]
    /// ABNF rule from RFC 3987.
    ///
    /// [`ucschar`]: https://datatracker.ietf.org/doc/html/rfc3987#section-2.2
    pub(crate) const fn or_ucschar(self) -> Self {
        Self(self.0 | MASK_UCSCHAR, self.1)
    }

    /// Marks this table as allowing characters matching the [`iprivate`]
    /// ABNF rule from RFC 3987.
    ///
    /// [`iprivate`]: https://datatracker.ietf.org/doc/html/rfc3987#section-2.2
    pub(crate) const fn or_iprivate(self) -> Self {
        Self(self.0 | MASK_IPRIVATE, self.1)
    }

    #[inline]
    pub(crate) const fn allows_ascii(self, x: u8) -> bool {
        let table = if x < 64 {
            self.0 & MASK_UNENCODED_ASCII
        } else if x < 128 {
            self.1
        } else {
            0
        };
        table & 1u64.wrapping_shl(x as u32) != 0
    }

    #[inline]
    pub(crate) const fn allows_code_point(self, x: u32) -> bool {
        if x < 128 {
            return self.allows_ascii(x as u8);
        }
        if self.0 & MASK_UCSCHAR != 0 && is_ucschar(x) {
            return true;
        }
        if self.0 & MASK_IPRIVATE != 0 && is_iprivate(x) {
            return true;
        }
        false
    }

    #[inline]
    pub(crate) const fn allows_pct_encoded(self) -> bool {
        self.0 & MASK_PCT_ENCODED != 0
    }

    /// Checks that every character and percent-encoded octet
    /// of the string is allowed by the table.
    pub(crate) fn validate(self, s: &str) -> bool {
        let bytes = s.as_bytes();
        let mut chars = s.char_indices();
        while let Some((i, ch)) = chars.next() {
            if ch == '%' {
                if !self.allows_pct_encoded()
                    || i + 2 >= bytes.len()
                    || !is_hexdig_pair(bytes[i + 1], bytes[i + 2])
                {
                    return false;
                }
                chars.next();
                chars.next();
            } else if !self.allows_code_point(ch as u32) {
                return false;
            }
        }
        true
    }
}

const fn new(bytes: &[u8]) -> Table {
    Table::new(bytes)
}

// Rules from RFC 3986:

/// `ALPHA = %x41-5A / %x61-7A`
pub(crate) const ALPHA: Table = new(b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz");

/// `DIGIT = %x30-39`
pub(crate) const DIGIT: Table = new(b"0123456789");

/// `scheme = ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )`
pub(crate) const SCHEME: Table = ALPHA.or(DIGIT).or(new(b"+-."));

/// `unreserved = ALPHA / DIGIT / "-" / "." / "_" / "~"`
pub(crate) const UNRESERVED: Table = ALPHA.or(DIGIT).or(new(b"-._~"));

/// `sub-delims = "!" / "$" / "&" / "'" / "(" / ")"
///             / "*" / "+" / "," / ";" / "="`
pub(crate) const SUB_DELIMS: Table = new(b"!$&'()*+,;=");

// Rules from RFC 3987:

/// `iunreserved = ALPHA / DIGIT / "-" / "." / "_" / "~" / ucschar`
pub(crate) const IUNRESERVED: Table = UNRESERVED.or_ucschar();

/// `iuserinfo = *( iunreserved / pct-encoded / sub-delims / ":" )`
pub(crate) const IUSERINFO: Table = IUNRESERVED.or(SUB_DELIMS).or(new(b":")).or_pct_encoded();

/// `ireg-name = *( iunreserved / pct-encoded / sub-delims )`
pub(crate) const IREG_NAME: Table = IUNRESERVED.or(SUB_DELIMS).or_pct_encoded();

/// `ipath = *( ipchar / "/" )`
pub(crate) const IPATH: Table = IUNRESERVED
    .or(SUB_DELIMS)
    .or(new(b":@/"))
    .or_pct_encoded();

/// `ifragment = *( ipchar / "/" / "?" )`
pub(crate) const IFRAGMENT: Table = IPATH.or(new(b"?"));

/// `iquery = *( ipchar / iprivate / "/" / "?" )`
pub(crate) const IQUERY: Table = IFRAGMENT.or_iprivate();
