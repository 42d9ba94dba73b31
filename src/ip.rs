//! IP address parsing and IPv6 canonicalization.

use crate::pct_enc::OCTET_TABLE_LO as HEX_TABLE;
use core::fmt::Write;
use std::net::{Ipv4Addr, Ipv6Addr};

macro_rules! take_byte {
    ($s:ident) => {
        if $s.is_empty() {
            None
        } else {
            let byte = $s[0];
            $s = &$s[1..];
            Some(byte)
        }
    };
}

// dec-octet = DIGIT             ; 0-9
//           / %x31-39 DIGIT     ; 10-99
//           / "1" 2DIGIT        ; 100-199
//           / "2" %x30-34 DIGIT ; 200-249
//           / "25" %x30-35      ; 250-255
macro_rules! take_dec_octet {
    ($s:ident, $end:pat) => {
        match take_byte!($s) {
            Some(b'0') => match take_byte!($s) {
                $end => Some(0),
                _ => None,
            },
            Some(b'1') => match take_byte!($s) {
                $end => Some(1),
                Some(y @ b'0'..=b'9') => match take_byte!($s) {
                    $end => Some(10 + y - b'0'),
                    Some(z @ b'0'..=b'9') => match take_byte!($s) {
                        $end => Some(100 + (y - b'0') * 10 + z - b'0'),
                        _ => None,
                    },
                    _ => None,
                },
                _ => None,
            },
            Some(b'2') => match take_byte!($s) {
                $end => Some(2),
                Some(y @ b'0'..=b'4') => match take_byte!($s) {
                    $end => Some(20 + y - b'0'),
                    Some(z @ b'0'..=b'9') => match take_byte!($s) {
                        $end => Some(200 + (y - b'0') * 10 + z - b'0'),
                        _ => None,
                    },
                    _ => None,
                },
                Some(b'5') => match take_byte!($s) {
                    $end => Some(25),
                    Some(z @ b'0'..=b'5') => match take_byte!($s) {
                        $end => Some(250 + z - b'0'),
                        _ => None,
                    },
                    _ => None,
                },
                Some(y @ b'6'..=b'9') => match take_byte!($s) {
                    $end => Some(20 + y - b'0'),
                    _ => None,
                },
                _ => None,
            },
            Some(x @ b'3'..=b'9') => match take_byte!($s) {
                $end => Some(x - b'0'),
                Some(y @ b'0'..=b'9') => match take_byte!($s) {
                    $end => Some((x - b'0') * 10 + y - b'0'),
                    _ => None,
                },
                _ => None,
            },
            _ => None,
        }
    };
}

/// Parses an IPv4 address in dotted-decimal form.
pub(crate) fn parse_v4(s: &[u8]) -> Option<Ipv4Addr> {
    parse_v4_bytes(s).map(Ipv4Addr::from)
}

fn parse_v4_bytes(mut s: &[u8]) -> Option<[u8; 4]> {
    if s.len() < 7 {
        None
    } else {
        Some([
            take_dec_octet!(s, Some(b'.'))?,
            take_dec_octet!(s, Some(b'.'))?,
            take_dec_octet!(s, Some(b'.'))?,
            #[allow(unused_assignments)]
            take_dec_octet!(s, None)?,
        ])
    }
}

/// An IPv6 address as written in an IP literal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct V6 {
    segs: [u16; 8],
    /// Whether the last 32 bits were written in dotted-decimal form.
    v4_tail: bool,
}

impl V6 {
    pub(crate) fn addr(self) -> Ipv6Addr {
        self.segs.into()
    }

    /// Writes the address in the canonical text form of RFC 5952.
    ///
    /// The longest run of two or more zero groups is compressed to `::`,
    /// the first run winning a tie. A dotted IPv4 tail is kept as written.
    pub(crate) fn write_canonical(self, buf: &mut String) {
        let hex_len = if self.v4_tail { 6 } else { 8 };
        let segs = &self.segs[..hex_len];

        #[derive(Copy, Clone, Default)]
        struct Span {
            start: usize,
            len: usize,
        }

        let zeroes = {
            let mut longest = Span::default();
            let mut current = Span::default();

            for (i, &seg) in segs.iter().enumerate() {
                if seg == 0 {
                    if current.len == 0 {
                        current.start = i;
                    }
                    current.len += 1;
                    if current.len > longest.len {
                        longest = current;
                    }
                } else {
                    current = Span::default();
                }
            }
            longest
        };

        fn write_subslice(buf: &mut String, chunk: &[u16]) {
            if let Some((first, tail)) = chunk.split_first() {
                let _ = write!(buf, "{first:x}");
                for seg in tail {
                    let _ = write!(buf, ":{seg:x}");
                }
            }
        }

        let ends_with_ellipsis = if zeroes.len > 1 {
            write_subslice(buf, &segs[..zeroes.start]);
            buf.push_str("::");
            write_subslice(buf, &segs[zeroes.start + zeroes.len..]);
            zeroes.start + zeroes.len == hex_len
        } else {
            write_subslice(buf, segs);
            false
        };

        if self.v4_tail {
            if !ends_with_ellipsis {
                buf.push(':');
            }
            let [a, b] = self.segs[6].to_be_bytes();
            let [c, d] = self.segs[7].to_be_bytes();
            let _ = write!(buf, "{a}.{b}.{c}.{d}");
        }
    }
}

/// Parses the contents of an IPv6 literal (without brackets).
pub(crate) fn parse_v6(mut s: &[u8]) -> Option<V6> {
    if s.len() < 2 {
        return None;
    }
    // A single colon may neither start nor end the address.
    if (s[0] == b':' && s[1] != b':') || (s.ends_with(b":") && !s.ends_with(b"::")) {
        return None;
    }

    let mut segs = [0u16; 8];
    let mut ellipsis_i = 8;
    let mut v4_tail = false;

    let mut i = 0;
    while i < 8 {
        match take_segment(&mut s) {
            Some(Seg::Normal(seg)) => {
                if i == 7 {
                    // Trailing colon or too long
                    return None;
                }
                segs[i] = seg;
                i += 1;
            }
            Some(Seg::End(seg)) => {
                segs[i] = seg;
                i += 1;
                break;
            }
            Some(Seg::Colon { double }) => {
                // Multiple ellipses or too many colons in one ellipsis
                if ellipsis_i != 8 || (double && i != 0) {
                    return None;
                }
                ellipsis_i = i;
            }
            Some(Seg::MaybeV4) => {
                if i > 6 {
                    // Not enough space
                    return None;
                }
                let bytes = parse_v4_bytes(s)?;

                segs[i] = u16::from_be_bytes([bytes[0], bytes[1]]);
                segs[i + 1] = u16::from_be_bytes([bytes[2], bytes[3]]);
                v4_tail = true;

                i += 2;
                break;
            }
            Some(Seg::Invalid) => return None,
            None => break,
        }
    }

    if ellipsis_i == 8 {
        // No ellipsis
        if i != 8 {
            // Too short
            return None;
        }
    } else if i == 8 {
        // Eliding nothing
        return None;
    } else {
        // Shift the segments after the ellipsis to the right.
        for j in (ellipsis_i..i).rev() {
            segs[8 - (i - j)] = segs[j];
            segs[j] = 0;
        }
    }

    Some(V6 { segs, v4_tail })
}

fn take_segment(s: &mut &[u8]) -> Option<Seg> {
    if s.is_empty() {
        return None;
    }

    if s[0] == b':' {
        return Some(match s.get(1) {
            Some(b':') => {
                *s = &s[2..];
                Seg::Colon { double: true }
            }
            // `None` for cases such as "1::".
            _ => {
                *s = &s[1..];
                Seg::Colon { double: false }
            }
        });
    }

    let mut x = match HEX_TABLE[s[0] as usize] {
        n if n < 128 => n as u16,
        _ => return Some(Seg::Invalid),
    };
    let mut i = 1;

    while i < 5 {
        return Some(match s.get(i) {
            Some(b':') => {
                *s = &s[i + 1..];
                Seg::Normal(x)
            }
            Some(b'.') => Seg::MaybeV4,
            Some(&b) => match HEX_TABLE[b as usize] {
                n if n < 128 => {
                    x = (x << 4) | n as u16;
                    i += 1;
                    continue;
                }
                _ => Seg::Invalid,
            },
            None => Seg::End(x),
        });
    }
    // i == 5
    Some(Seg::Invalid)
}

enum Seg {
    // [0-9A-Fa-f]{1,4}:
    Normal(u16),
    // [0-9A-Fa-f]{1,4}$
    End(u16),
    // :{1,2}
    Colon { double: bool },
    // [0-9A-Fa-f]{1,4}\.
    MaybeV4,
    Invalid,
}

/// Parses and canonicalizes the contents of an IPv6 literal.
pub(crate) fn canonicalize_v6(s: &[u8]) -> Option<String> {
    let v6 = parse_v6(s)?;
    let mut buf = String::with_capacity(s.len());
    v6.write_canonical(&mut buf);
    Some(buf)
}
