use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use phishguard_core::{
    utils::{levenshtein, normalize_label},
    PatternEngine, Platform, SimilarityAnalyzer,
};

fn bench_levenshtein(c: &mut Criterion) {
    let mut group = c.benchmark_group("levenshtein");

    let pairs = vec![
        ("short", ("gogle", "google")),
        ("medium", ("bankofamerlca", "bankofamerica")),
        ("long", ("secure-login-verify-account-now", "wellsfargo")),
    ];

    for (name, (a, b)) in pairs {
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::from_parameter(name), &(a, b), |bench, (a, b)| {
            bench.iter(|| levenshtein(black_box(a), black_box(b)));
        });
    }
    group.finish();
}

fn bench_similarity(c: &mut Criterion) {
    let analyzer = SimilarityAnalyzer::default();
    let mut group = c.benchmark_group("similarity_analyze");

    for domain in ["gooogle.com", "paypa1.com", "arnazon-secure1.xyz", "rust-lang.org"] {
        group.bench_with_input(BenchmarkId::from_parameter(domain), &domain, |b, domain| {
            b.iter(|| analyzer.analyze(black_box(domain)));
        });
    }
    group.finish();

    c.bench_function("normalize_label", |b| {
        b.iter(|| normalize_label(black_box("vvellsfarg0-5ecure")));
    });
}

fn bench_pattern_scan(c: &mut Criterion) {
    let engine = PatternEngine::new();

    c.bench_function("scan_url", |b| {
        b.iter(|| engine.scan_url(black_box("https://arnazon-secure1.xyz/verify-account?id=42")));
    });

    let message = "Congratulations! Click here to claim your free gift. ".repeat(150);
    c.bench_function("scan_content_whatsapp", |b| {
        b.iter(|| engine.scan_content(black_box(&message), Platform::WhatsApp));
    });
}

criterion_group!(benches, bench_levenshtein, bench_similarity, bench_pattern_scan);
criterion_main!(benches);
