//! Cache expiry negotiation from HTTP response headers.
//!
//! # Examples
//!
//! ```
//! use canon_iri::cache;
//! use std::collections::HashMap;
//!
//! let mut headers = HashMap::new();
//! headers.insert("cache-control".to_owned(), "max-age=3600".to_owned());
//! headers.insert("age".to_owned(), "600".to_owned());
//!
//! let now = 1_700_000_000;
//! assert_eq!(cache::expiry_at(now, 120, &headers), now + 3000 + 120 + 1);
//! ```

use chrono::{DateTime, NaiveDateTime, Utc};
use std::{
    collections::{BTreeMap, HashMap},
    hash::BuildHasher,
};

/// Read access to HTTP response headers.
///
/// Header names are matched case-insensitively by every implementation.
pub trait Headers {
    /// Returns the value of the header with the given lowercase name.
    fn header(&self, name: &str) -> Option<&str>;
}

fn find_ignore_case<'a, I>(entries: I, name: &str) -> Option<&'a str>
where
    I: IntoIterator<Item = (&'a String, &'a String)>,
{
    entries
        .into_iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

impl<S: BuildHasher> Headers for HashMap<String, String, S> {
    fn header(&self, name: &str) -> Option<&str> {
        match self.get(name) {
            Some(v) => Some(v.as_str()),
            None => find_ignore_case(self, name),
        }
    }
}

impl Headers for BTreeMap<String, String> {
    fn header(&self, name: &str) -> Option<&str> {
        match self.get(name) {
            Some(v) => Some(v.as_str()),
            None => find_ignore_case(self, name),
        }
    }
}

impl Headers for [(&str, &str)] {
    fn header(&self, name: &str) -> Option<&str> {
        self.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|&(_, v)| v)
    }
}

impl<const N: usize> Headers for [(&str, &str); N] {
    fn header(&self, name: &str) -> Option<&str> {
        self[..].header(name)
    }
}

impl<T: Headers + ?Sized> Headers for &T {
    fn header(&self, name: &str) -> Option<&str> {
        (**self).header(name)
    }
}

/// Returns the Unix timestamp until which a response stays fresh,
/// extended by `base_duration` seconds.
///
/// See [`expiry_at`] for the rules applied.
#[must_use]
pub fn expiry<H: Headers + ?Sized>(base_duration: i64, headers: &H) -> i64 {
    expiry_at(Utc::now().timestamp(), base_duration, headers)
}

/// Same as [`expiry`], with the current time given as a Unix timestamp.
///
/// The first matching rule wins:
///
/// 1. `Cache-Control: no-store` yields `0`.
/// 2. `Cache-Control: no-cache` yields `now + 1`.
/// 3. `Cache-Control: must-revalidate` forces `base_duration` to `0`.
/// 4. `Cache-Control: max-age=N` yields `now + N - Age + base_duration + 1`.
/// 5. A parsable `Expires` yields `expires + base_duration + 1`.
/// 6. Otherwise the result is `now + base_duration`.
///
/// A response is fresh as long as the current time is
/// no later than the returned timestamp. The arithmetic saturates
/// at the bounds of `i64`, and a `max-age` too large for `i64`
/// counts as `i64::MAX`.
#[must_use]
pub fn expiry_at<H: Headers + ?Sized>(now: i64, mut base_duration: i64, headers: &H) -> i64 {
    if let Some(cache_control) = headers.header("cache-control").filter(|s| !s.is_empty()) {
        let mut max_age = None;
        let (mut no_cache, mut must_revalidate) = (false, false);

        for directive in cache_control.split(',') {
            let (name, value) = match directive.split_once('=') {
                Some((name, value)) => (name.trim(), Some(value.trim().trim_matches('"'))),
                None => (directive.trim(), None),
            };
            if name.eq_ignore_ascii_case("no-store") {
                return 0;
            } else if name.eq_ignore_ascii_case("no-cache") {
                no_cache = true;
            } else if name.eq_ignore_ascii_case("must-revalidate") {
                must_revalidate = true;
            } else if name.eq_ignore_ascii_case("max-age") && max_age.is_none() {
                max_age = value.and_then(parse_delta_seconds);
            }
        }

        if no_cache {
            return now.saturating_add(1);
        }
        if must_revalidate {
            base_duration = 0;
        }
        if let Some(mut max_age) = max_age {
            if let Some(age) = headers.header("age").and_then(|s| s.trim().parse::<i64>().ok()) {
                max_age = max_age.saturating_sub(age);
            }
            return now
                .saturating_add(max_age)
                .saturating_add(base_duration)
                .saturating_add(1);
        }
    }

    if let Some(expires) = headers.header("expires").and_then(parse_http_date) {
        return expires.saturating_add(base_duration).saturating_add(1);
    }
    now.saturating_add(base_duration)
}

/// Parses delta-seconds, clamping values beyond `i64::MAX`.
fn parse_delta_seconds(s: &str) -> Option<i64> {
    if s.is_empty() || !s.bytes().all(|x| x.is_ascii_digit()) {
        return None;
    }
    Some(s.parse().unwrap_or(i64::MAX))
}

/// Parses a date in any of the formats allowed in HTTP headers,
/// or in RFC 3339.
fn parse_http_date(s: &str) -> Option<i64> {
    const RFC_850: &str = "%A, %d-%b-%y %H:%M:%S GMT";
    const ASCTIME: &str = "%a %b %e %H:%M:%S %Y";

    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(date) = DateTime::parse_from_rfc2822(s) {
        return Some(date.timestamp());
    }
    for fmt in [RFC_850, ASCTIME] {
        if let Ok(date) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(date.and_utc().timestamp());
        }
    }
    DateTime::parse_from_rfc3339(s).ok().map(|date| date.timestamp())
}
