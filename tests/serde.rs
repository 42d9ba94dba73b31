#![cfg(feature = "serde")]

use canon_iri::Iri;

#[test]
fn serde_round_trip() {
    let iri = Iri::parse("HTTP://Example.com:80/a/../b?c#d").unwrap();
    let json = serde_json::to_string(&iri).unwrap();
    assert_eq!(json, r#""http://example.com/b?c#d""#);

    let back: Iri = serde_json::from_str(&json).unwrap();
    assert_eq!(back, iri);

    let err = serde_json::from_str::<Iri>(r#""http://a/#b\nc""#).unwrap_err();
    assert!(err.to_string().contains("line break in fragment"));
}
