#![no_main]
use canon_iri::{HostKind, Iri};
use libfuzzer_sys::fuzz_target;
use std::net::Ipv6Addr;

fuzz_target!(|data: &str| {
    if !data.bytes().all(|x| x.is_ascii_hexdigit() || x == b':' || x == b'.') {
        return;
    }
    let iri = Iri::parse(&format!("http://[{data}]/")).unwrap();
    let std_addr = data.parse::<Ipv6Addr>().ok();

    match (iri.host_kind(), std_addr) {
        (Some(HostKind::Ipv6(parsed)), Some(addr)) => {
            assert_eq!(parsed, addr);
            let canonical = iri.host().unwrap().parse::<Ipv6Addr>().unwrap();
            assert_eq!(canonical, addr);
        }
        (None, None) => assert!(!iri.is_valid()),
        (kind, addr) => panic!("{data:?}: {kind:?} vs {addr:?}"),
    }
});
