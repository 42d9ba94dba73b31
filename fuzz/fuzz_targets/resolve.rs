#![no_main]
use canon_iri::{resolve::resolve, Iri};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: (&str, &str)| {
    let (base, reference) = data;
    let Ok(target) = resolve(base, reference) else {
        return;
    };
    assert!(target.scheme().is_some());
    if !target.is_valid() {
        return;
    }
    let s = target.to_iri_string();
    let reparsed = Iri::parse(&s).unwrap();
    assert_eq!(reparsed.to_iri_string(), s);

    // Resolving an absolute IRI against any base leaves it unchanged.
    let again = resolve(&target, &s).unwrap();
    assert_eq!(again, target);
});
