use canon_iri::{resolve::resolve, Iri};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

criterion_group!(
    benches,
    bench_parse,
    bench_parse_pct,
    bench_normalize_ipv6,
    bench_resolve,
    bench_to_uri,
    bench_expiry,
);
criterion_main!(benches);

const PARSE_CASE: &str = "https://user@example.com/search?q=%E6%B5%8B%E8%AF%95#fragment";

fn bench_parse(c: &mut Criterion) {
    c.bench_function("parse", |b| b.iter(|| Iri::parse(black_box(PARSE_CASE))));
}

const PCT_CASE: &str = "HTTP://Ex%61mple.COM/te%F0%9F%98%83a%20%E6%B5%8B1%60~!@%E8%AF%95%23$%25st%5E&+=/./a/../%7e?%41%zz";

fn bench_parse_pct(c: &mut Criterion) {
    c.bench_function("parse_pct", |b| b.iter(|| Iri::parse(black_box(PCT_CASE))));
}

const IPV6_CASE: &str = "http://[2001:0DB8:0000:0000:0000:FF00:0042:8329]:80/";

fn bench_normalize_ipv6(c: &mut Criterion) {
    c.bench_function("normalize_ipv6", |b| {
        b.iter(|| Iri::parse(black_box(IPV6_CASE)))
    });
}

const BASE: &str = "http://a/b/c/d;p?q";
const REFERENCES: [&str; 6] = ["g", "./g/", "../../g", "?y#s", "//g", "g;x=1/../y"];

fn bench_resolve(c: &mut Criterion) {
    let base = Iri::parse(BASE).unwrap();
    c.bench_function("resolve", |b| {
        b.iter(|| {
            for r in REFERENCES {
                let _ = resolve(black_box(&base), black_box(r));
            }
        })
    });
    c.bench_function("resolve_str_base", |b| {
        b.iter(|| resolve(black_box(BASE), black_box("../../g")))
    });
}

fn bench_to_uri(c: &mut Criterion) {
    let iri = Iri::parse("http://\u{e9}xample.com/\u{6d4b}\u{8bd5}?\u{e9}#\u{1f603}").unwrap();
    c.bench_function("to_uri_string", |b| b.iter(|| black_box(&iri).to_uri_string()));
}

#[cfg(feature = "cache")]
fn bench_expiry(c: &mut Criterion) {
    use canon_iri::cache::expiry_at;

    let max_age = [("cache-control", "public, max-age=3600"), ("age", "600")];
    let expires = [("expires", "Sun, 06 Nov 1994 08:49:37 GMT")];
    c.bench_function("expiry_max_age", |b| {
        b.iter(|| expiry_at(1_700_000_000, 120, black_box(&max_age)))
    });
    c.bench_function("expiry_expires", |b| {
        b.iter(|| expiry_at(1_700_000_000, 120, black_box(&expires)))
    });
}

#[cfg(not(feature = "cache"))]
fn bench_expiry(_: &mut Criterion) {}
