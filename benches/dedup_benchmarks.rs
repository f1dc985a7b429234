//! Criterion benchmarks for log_dedup

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use log_dedup::prelude::*;

fn layered(policy: DedupPolicy) -> DedupHandler {
    DedupHandler::new(MemoryAppender::new(), policy)
        .with_attrs(vec![
            Attr::string("service", "api"),
            Attr::string("request_id", "r-1"),
            Attr::string("msg", "shadow"),
        ])
        .with_group("http")
        .with_attrs(vec![Attr::string("method", "GET"), Attr::int("status", 200)])
}

fn call_site_attrs(n: usize) -> Vec<Attr> {
    (0..n)
        .map(|i| Attr::int(format!("k{}", i % 8), i as i64))
        .collect()
}

// ============================================================================
// Policy Benchmarks
// ============================================================================

fn bench_policies(c: &mut Criterion) {
    let mut group = c.benchmark_group("deduplicate");

    for policy in [
        DedupPolicy::Overwrite,
        DedupPolicy::Ignore,
        DedupPolicy::Increment,
        DedupPolicy::Append,
    ] {
        let handler = layered(policy);
        for n in [4usize, 32] {
            group.throughput(Throughput::Elements(n as u64));
            group.bench_with_input(BenchmarkId::new(policy.to_str(), n), &n, |b, &n| {
                b.iter(|| black_box(handler.deduplicate(call_site_attrs(n))));
            });
        }
    }

    group.finish();
}

// ============================================================================
// Derivation Benchmarks
// ============================================================================

fn bench_derive(c: &mut Criterion) {
    let mut group = c.benchmark_group("derive");
    let handler = layered(DedupPolicy::Increment);

    group.bench_function("with_attrs", |b| {
        b.iter(|| black_box(handler.with_attrs(vec![Attr::string("user", "alice")])));
    });

    group.bench_function("with_group", |b| {
        b.iter(|| black_box(handler.with_group("db")));
    });

    group.finish();
}

// ============================================================================
// End-to-End Benchmarks
// ============================================================================

fn bench_json_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("json_pipeline");
    group.throughput(Throughput::Elements(1));

    let config = DedupConfig {
        sinks: vec![SinkPreset::Stackdriver],
        ..Default::default()
    };
    let mut appender = JsonAppender::from_writer(std::io::sink());
    if let Some(replacer) = config.replace_attr() {
        appender = appender.with_replace_attr(replacer);
    }
    let handler = DedupHandler::from_config(appender, &config).expect("valid config");
    let logger = Logger::new(handler).with(vec![Attr::string("level", "custom")]);

    group.bench_function("stackdriver", |b| {
        b.iter(|| {
            logger
                .info("request finished", call_site_attrs(8))
                .expect("sink never fails");
        });
    });

    group.finish();
}

criterion_group!(benches, bench_policies, bench_derive, bench_json_pipeline);
criterion_main!(benches);
