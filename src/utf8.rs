//! UTF-8 utilities for byte input that is not known to be well-formed.

use core::str;

/// Returns the width of a UTF-8 sequence given its first byte,
/// or `0` if the byte can never start a well-formed sequence.
#[inline]
const fn utf8_char_width(x: u8) -> usize {
    match x {
        0x00..=0x7f => 1,
        0xc2..=0xdf => 2,
        0xe0..=0xef => 3,
        0xf0..=0xf4 => 4,
        _ => 0,
    }
}

/// Decodes the code point at the start of `bytes`.
///
/// Returns `None` if the bytes do not start with a well-formed sequence,
/// which covers truncated sequences, stray continuation bytes, overlong
/// encodings, encoded surrogates and code points above `U+10FFFF`.
pub(crate) fn decode_code_point(bytes: &[u8]) -> Option<(u32, usize)> {
    let width = utf8_char_width(*bytes.first()?);
    if width == 0 {
        return None;
    }
    let s = str::from_utf8(bytes.get(..width)?).ok()?;
    s.chars().next().map(|ch| (ch as u32, width))
}
