//! Percent-encoding normalization.

pub(crate) mod table;

use crate::utf8;
use core::str;
use table::{Table, IUNRESERVED};

const fn gen_octet_table(hi: bool) -> [u8; 256] {
    let mut out = [0xff; 256];
    let shift = if hi { 4 } else { 0 };

    let mut i = 0;
    while i < 10 {
        out[(i + b'0') as usize] = i << shift;
        i += 1;
    }
    while i < 16 {
        out[(i - 10 + b'A') as usize] = i << shift;
        out[(i - 10 + b'a') as usize] = i << shift;
        i += 1;
    }
    out
}

const OCTET_TABLE_HI: &[u8; 256] = &gen_octet_table(true);
pub(crate) const OCTET_TABLE_LO: &[u8; 256] = &gen_octet_table(false);

/// Checks whether two bytes form the hexadecimal digits of a percent-encoded octet.
#[inline]
pub(crate) const fn is_hexdig_pair(hi: u8, lo: u8) -> bool {
    OCTET_TABLE_LO[hi as usize] | OCTET_TABLE_LO[lo as usize] < 128
}

/// Decodes a percent-encoded octet, assuming that the bytes are hexadecimal.
#[inline]
fn decode_octet(hi: u8, lo: u8) -> u8 {
    debug_assert!(hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit());
    OCTET_TABLE_HI[hi as usize] | OCTET_TABLE_LO[lo as usize]
}

/// Percent-encodes a byte with uppercase hexadecimal digits.
pub(crate) fn encode_byte(x: u8) -> &'static str {
    const TABLE: &[u8; 256 * 3] = &{
        const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

        let mut i = 0;
        let mut table = [0; 256 * 3];
        while i < 256 {
            table[i * 3] = b'%';
            table[i * 3 + 1] = HEX_DIGITS[i >> 4];
            table[i * 3 + 2] = HEX_DIGITS[i & 0b1111];
            i += 1;
        }
        table
    };

    const TABLE_STR: &str = match str::from_utf8(TABLE) {
        Ok(s) => s,
        Err(_) => unreachable!(),
    };

    &TABLE_STR[x as usize * 3..x as usize * 3 + 3]
}

/// Normalizes the percent-encoding of a component and appends it to `buf`.
///
/// - Runs of percent-encoded octets are decoded as UTF-8. Every sequence that
///   forms an `iunreserved` character is written unencoded, and every other
///   octet is written as an uppercase triplet, so ill-formed sequences survive
///   byte for byte.
/// - A `%` that does not start a triplet is written as `%25`.
/// - Other characters are kept if allowed by `table` and encoded otherwise.
pub(crate) fn normalize(buf: &mut String, s: &[u8], table: Table) {
    let mut decoded = Vec::new();
    let mut i = 0;

    while i < s.len() {
        let x = s[i];
        if x == b'%' {
            if !is_triplet_at(s, i) {
                buf.push_str("%25");
                i += 1;
                continue;
            }
            decoded.clear();
            while i < s.len() && s[i] == b'%' && is_triplet_at(s, i) {
                decoded.push(decode_octet(s[i + 1], s[i + 2]));
                i += 3;
            }
            write_decoded(buf, &decoded);
        } else if x < 128 {
            if table.allows_ascii(x) {
                buf.push(x as char);
            } else {
                buf.push_str(encode_byte(x));
            }
            i += 1;
        } else {
            match utf8::decode_code_point(&s[i..]) {
                Some((ch, len)) if table.allows_code_point(ch) => {
                    // The sequence was just checked to be well-formed.
                    if let Ok(seq) = str::from_utf8(&s[i..i + len]) {
                        buf.push_str(seq);
                    }
                    i += len;
                }
                _ => {
                    buf.push_str(encode_byte(x));
                    i += 1;
                }
            }
        }
    }
}

#[inline]
fn is_triplet_at(s: &[u8], i: usize) -> bool {
    i + 2 < s.len() && is_hexdig_pair(s[i + 1], s[i + 2])
}

fn write_decoded(buf: &mut String, bytes: &[u8]) {
    let mut i = 0;
    while i < bytes.len() {
        match utf8::decode_code_point(&bytes[i..]) {
            Some((ch, len)) if IUNRESERVED.allows_code_point(ch) => {
                if let Ok(seq) = str::from_utf8(&bytes[i..i + len]) {
                    buf.push_str(seq);
                }
                i += len;
            }
            _ => {
                buf.push_str(encode_byte(bytes[i]));
                i += 1;
            }
        }
    }
}

/// Lowercases the ASCII letters of a normalized string,
/// leaving the hexadecimal digits of percent-encoded octets alone.
pub(crate) fn lowercase_outside_triplets(s: &mut String) {
    let mut out = String::with_capacity(s.len());
    let mut hex_left = 0;
    for ch in s.chars() {
        if hex_left > 0 {
            hex_left -= 1;
            out.push(ch);
        } else if ch == '%' {
            hex_left = 2;
            out.push(ch);
        } else {
            out.push(ch.to_ascii_lowercase());
        }
    }
    *s = out;
}

/// Percent-encodes every non-ASCII byte of the string.
pub(crate) fn encode_non_ascii(s: &str) -> String {
    let mut buf = String::with_capacity(s.len());
    for &x in s.as_bytes() {
        if x.is_ascii() {
            buf.push(x as char);
        } else {
            buf.push_str(encode_byte(x));
        }
    }
    buf
}

#[cfg(test)]
mod tests {
    use super::{table::*, *};

    fn norm(s: &[u8], table: Table) -> String {
        let mut buf = String::new();
        normalize(&mut buf, s, table);
        buf
    }

    #[test]
    fn unreserved_is_decoded() {
        assert_eq!(norm(b"%61%2D%7E", IPATH), "a-~");
        assert_eq!(norm(b"%7b%7D", IPATH), "%7B%7D");
        assert_eq!(norm(b"%2F", IPATH), "%2F");
    }

    #[test]
    fn stray_percent() {
        assert_eq!(norm(b"f%0o", IPATH), "f%250o");
        assert_eq!(norm(b"%", IPATH), "%25");
        assert_eq!(norm(b"%4", IPATH), "%254");
    }

    #[test]
    fn decoded_utf8() {
        assert_eq!(norm(b"%C3%A9cole", IPATH), "école");
        assert_eq!(norm(b"%C2", IPATH), "%C2");
        assert_eq!(norm(b"%c2a", IPATH), "%C2a");
        assert_eq!(norm(b"%C2%00", IPATH), "%C2%00");
        assert_eq!(norm(b"%C3%A9%00", IPATH), "é%00");
        assert_eq!(norm(b"%FF", IPATH), "%FF");
        // Private use is never decoded, not even in the query.
        assert_eq!(norm(b"%EE%80%80", IQUERY), "%EE%80%80");
    }

    #[test]
    fn raw_bytes() {
        assert_eq!(norm(b"c\nd", IPATH), "c%0Ad");
        assert_eq!(norm(b"\xc3\xa9", IPATH), "é");
        assert_eq!(norm(b"\xc2", IPATH), "%C2");
        assert_eq!(norm(b"\xc2a", IPATH), "%C2a");
        assert_eq!(norm(b"\xff%00", IPATH), "%FF%00");
        assert_eq!(norm(b"\xf3\xb0\x80\x80", IPATH), "%F3%B0%80%80");
        assert_eq!(norm(b"\xf3\xb0\x80\x80", IQUERY), "\u{f0000}");
        assert_eq!(norm(b"\xee\x80\x80a", IQUERY), "\u{e000}a");
        assert_eq!(norm(b"a b", IQUERY), "a%20b");
    }

    #[test]
    fn lowercase() {
        let mut s = String::from("%25AbC%C3%89");
        lowercase_outside_triplets(&mut s);
        assert_eq!(s, "%25abc%C3%89");
    }

    #[test]
    fn non_ascii() {
        assert_eq!(encode_non_ascii("/école"), "/%C3%A9cole");
        assert_eq!(encode_non_ascii("/a"), "/a");
    }
}
