use criterion::criterion_main;

#[path = "benchmarks/check_texts.rs"]
mod check_texts;

criterion_main!(check_texts::checks);
