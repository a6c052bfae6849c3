use criterion::{criterion_group, criterion_main, Criterion};
use std::path::Path;

fn fixture(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    std::fs::read_to_string(path)
        .unwrap()
        .replace("{{base}}", "https://sun9-1.userapi.com")
}

fn bench_decode_cp1251(c: &mut Criterion) {
    let text = fixture("messages_ru.html");
    let (bytes, _, _) = encoding_rs::WINDOWS_1251.encode(&text);
    let bytes = bytes.into_owned();

    c.bench_function("resolve_cp1251_page", |b| {
        b.iter(|| vkrescue::parser::encoding::resolve(&bytes).text.len())
    });
}

fn bench_extract_attachments(c: &mut Criterion) {
    // A long conversation page: the fixture's messages repeated.
    let text = fixture("messages_en.html").repeat(50);

    c.bench_function("extract_attachments_long_page", |b| {
        b.iter(|| vkrescue::parser::page::extract_attachments(&text).len())
    });
}

fn bench_extract_album(c: &mut Criterion) {
    let text = fixture("album.html");

    c.bench_function("extract_album", |b| {
        b.iter(|| vkrescue::parser::page::extract_album(&text).images.len())
    });
}

criterion_group!(
    benches,
    bench_decode_cp1251,
    bench_extract_attachments,
    bench_extract_album
);
criterion_main!(benches);
