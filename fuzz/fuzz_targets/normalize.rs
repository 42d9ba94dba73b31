#![no_main]
use canon_iri::Iri;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(iri) = Iri::parse(data) else {
        return;
    };
    if !iri.is_valid() {
        return;
    }
    let s = iri.to_iri_string();
    let reparsed = Iri::parse(&s).unwrap();
    assert_eq!(reparsed.to_iri_string(), s, "input: {:?}", String::from_utf8_lossy(data));
    assert!(reparsed.is_valid());
    assert_eq!(reparsed, iri);
});
