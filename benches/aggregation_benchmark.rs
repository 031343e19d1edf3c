//! Performance benchmarks for journal parsing and window aggregation
//!
//! Run with: cargo bench

use chrono::{Duration, Utc};
use claude_usage_meter::aggregator::WindowAggregator;
use claude_usage_meter::parser::JournalParser;
use claude_usage_meter::rate_limit::RateLimitComposer;
use claude_usage_meter::budget::BudgetResolver;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::fs;
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

const MODELS: [&str; 3] = [
    "claude-sonnet-4-20250514",
    "claude-opus-4-20250514",
    "claude-3-5-haiku-20241022",
];

/// Generate journal content spread over the last six days
fn generate_journal(num_lines: usize, include_errors: bool) -> String {
    let now = Utc::now();
    let mut lines = Vec::with_capacity(num_lines);

    for i in 0..num_lines {
        if include_errors && i % 10 == 5 {
            lines.push("{broken json}".to_string());
        } else if i % 4 == 3 {
            lines.push(format!(
                r#"{{"type":"user","timestamp":"{}","message":{{"role":"user","content":"step {}"}}}}"#,
                (now - Duration::minutes(i as i64)).to_rfc3339(),
                i
            ));
        } else {
            lines.push(format!(
                r#"{{"type":"assistant","timestamp":"{}","message":{{"model":"{}","usage":{{"input_tokens":{},"output_tokens":{},"cache_read_input_tokens":{},"cache_creation_input_tokens":{}}}}}}}"#,
                (now - Duration::minutes((i * 7 % 8640) as i64)).to_rfc3339(),
                MODELS[i % MODELS.len()],
                100 + i,
                200 + i,
                i % 500,
                i % 50
            ));
        }
    }

    lines.join("\n")
}

fn create_temp_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn benchmark_parse_file(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_file");
    let since = Utc::now() - Duration::days(7);

    for size in [100, 1000, 10000].iter() {
        let temp_file = create_temp_file(&generate_journal(*size, true));

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| JournalParser::parse_file(black_box(temp_file.path()), since))
        });
    }

    group.finish();
}

fn benchmark_aggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate");
    let now = Utc::now();
    let temp_file = create_temp_file(&generate_journal(10000, false));
    let entries = JournalParser::parse_file(temp_file.path(), now - Duration::days(7));

    group.bench_function("weekly", |b| {
        b.iter(|| WindowAggregator::aggregate(black_box(&entries), now - Duration::days(7)))
    });
    group.bench_function("five_hour", |b| {
        b.iter(|| WindowAggregator::aggregate(black_box(&entries), now - Duration::hours(5)))
    });

    group.finish();
}

fn benchmark_compose(c: &mut Criterion) {
    let home = TempDir::new().unwrap();
    let projects = home.path().join("projects");
    for project in 0..10 {
        let dir = projects.join(format!("-home-user-project-{}", project));
        fs::create_dir_all(&dir).unwrap();
        for session in 0..5 {
            fs::write(
                dir.join(format!("session-{}.jsonl", session)),
                generate_journal(200, true),
            )
            .unwrap();
        }
    }

    let composer = RateLimitComposer::new(&projects);
    let budgets = BudgetResolver::tier_defaults("default_claude_pro");

    c.bench_function("compose_50_shards", |b| {
        b.iter(|| composer.compose(black_box("default_claude_pro"), &budgets, None))
    });
}

criterion_group!(
    benches,
    benchmark_parse_file,
    benchmark_aggregate,
    benchmark_compose
);
criterion_main!(benches);
