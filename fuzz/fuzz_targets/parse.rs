#![no_main]
use canon_iri::Iri;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(iri) = Iri::parse(data) else {
        return;
    };
    let s = iri.to_iri_string();
    assert!(core::str::from_utf8(s.as_bytes()).is_ok());
    assert!(iri.to_uri_string().is_ascii());

    let mut buf = String::with_capacity(s.len());
    if let Some(scheme) = iri.scheme() {
        buf.push_str(scheme);
        buf.push(':');
    }
    if let Some(authority) = iri.authority() {
        buf.push_str("//");
        buf.push_str(&authority);
    }
    buf.push_str(iri.path());
    if let Some(q) = iri.query() {
        buf.push('?');
        buf.push_str(q);
    }
    if let Some(f) = iri.fragment() {
        buf.push('#');
        buf.push_str(f);
    }
    assert_eq!(s, buf);
});
