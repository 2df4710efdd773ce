use criterion::{criterion_group, Criterion, Throughput};
use gramcheck::{chunker::Chunker, core::Issue, languages::Tone, prompt};

const SMALL: &str = "Ik heb de boek gelezen en het was erg goed.";
const MEDIUM: &str = include_str!("fixtures/medium.txt");
const LARGE: &str = include_str!("fixtures/large.txt");

static FILES: [(&str, &str); 3] = [("small", SMALL), ("medium", MEDIUM), ("large", LARGE)];

fn sample_issue() -> Issue {
    Issue {
        offset: 8,
        length: 2,
        message: "use 'het' for neuter nouns".to_string(),
        rule_id: "DE_HET".to_string(),
        category: gramcheck::core::Category::Grammar,
        severity: gramcheck::core::Severity::Error,
        original_span: "de".to_string(),
        suggestions: vec!["het".to_string()],
        context: None,
    }
}

fn bench_chunking(c: &mut Criterion) {
    let mut group = c.benchmark_group("chunking");
    let chunker = Chunker::new(500);

    for (name, source) in FILES {
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(name, &source, |b, &s| b.iter(|| chunker.chunk_text(s)));
    }
}

fn bench_prompt_building(c: &mut Criterion) {
    let mut group = c.benchmark_group("prompt_building");
    let issues = vec![sample_issue()];

    for (name, source) in FILES {
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(name, &source, |b, &s| {
            b.iter(|| prompt::build_correction_prompt(s, &issues, "nl", Tone::Neutral, true));
        });
    }
}

criterion_group!(checks, bench_chunking, bench_prompt_building);
