//! Latency benchmarks for filing classification
//!
//! Run with: cargo bench -p filingwatch-classifiers

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use filingwatch_classifiers::{FilingAnalyzer, RuleClassifier};

fn benchmark_rule_classifier(c: &mut Criterion) {
    let classifier = RuleClassifier::new();
    let filler = "The registrant is filing this current report on Form 8-K. ".repeat(200);

    let test_cases = vec![
        ("empty", String::new()),
        ("no_match", filler.clone()),
        (
            "redemption",
            format!("{filler} The Company will redeem all outstanding shares. The redemption date is March 1."),
        ),
        (
            "mixed",
            format!("{filler} rights offering, prospectus supplement, monthly distribution, redemption price"),
        ),
    ];

    let mut group = c.benchmark_group("Rule_Classifier");
    group.sample_size(100);

    for (name, text) in &test_cases {
        group.bench_with_input(BenchmarkId::new("classify", name), text, |b, text| {
            b.iter(|| classifier.classify_text(black_box(text)))
        });
    }

    group.finish();
}

fn benchmark_analyzer(c: &mut Criterion) {
    let analyzer = FilingAnalyzer::new();
    let text = format!(
        "{} NOTICE OF REDEMPTION. The Company will redeem all outstanding shares at the redemption price.",
        "Lorem ipsum dolor sit amet. ".repeat(500)
    );

    c.bench_function("analyze_redemption_notice", |b| {
        b.iter(|| analyzer.analyze(black_box(&text)))
    });
}

criterion_group!(benches, benchmark_rule_classifier, benchmark_analyzer);
criterion_main!(benches);
