//! Criterion benchmarks for fieldlog

use chrono::{TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use fieldlog::core::EntryPool;
use fieldlog::prelude::*;
use fieldlog::CallerLocation;
use std::io;

fn sample_record() -> LogRecord {
    LogRecord::new(LogLevel::Info, "request served")
        .with_timestamp(Utc.with_ymd_and_hms(2024, 1, 8, 10, 30, 45).unwrap())
        .with_caller(CallerLocation::new("handlers/orders/checkout.rs", 120))
        .with_field("method", "GET")
        .with_field("path", "/api/v1/orders")
        .with_field("status", 200)
        .with_field("latency_ms", 12.5)
        .with_field("user agent", "curl/8.4 (linux)")
}

fn silent_logger() -> Logger {
    Logger::builder()
        .access_appender(Box::new(WriterAppender::new(io::sink())))
        .error_appender(Box::new(WriterAppender::new(io::sink())))
        .build()
}

// ============================================================================
// Formatter Benchmarks
// ============================================================================

fn bench_formatters(c: &mut Criterion) {
    let mut group = c.benchmark_group("formatters");
    group.throughput(Throughput::Elements(1));

    let record = sample_record();
    let text = TextFormatter::new();

    let mut identity = Fields::new();
    identity.insert("app_id".into(), "svc".into());
    identity.insert("host".into(), "h1".into());
    identity.insert("instance_id".into(), "i1".into());
    let structured = StructuredFormatter::new(identity);

    group.bench_function("text", |b| {
        b.iter(|| black_box(text.render(black_box(&record))));
    });

    group.bench_function("text_unsorted", |b| {
        let unsorted = TextFormatter::new().with_disable_sorting(true);
        b.iter(|| black_box(unsorted.render(black_box(&record))));
    });

    group.bench_function("structured", |b| {
        b.iter(|| black_box(structured.render(black_box(&record))));
    });

    group.finish();
}

// ============================================================================
// Entry Pool Benchmarks
// ============================================================================

fn bench_entry_pool(c: &mut Criterion) {
    let mut group = c.benchmark_group("entry_pool");
    group.throughput(Throughput::Elements(1));

    let pool = EntryPool::new();

    group.bench_function("acquire_release", |b| {
        b.iter(|| {
            let mut fields = pool.acquire();
            fields.insert("k".to_string(), FieldValue::from(1));
            pool.release(black_box(fields));
        });
    });

    group.bench_function("fresh_allocation", |b| {
        b.iter(|| {
            let mut fields = Fields::with_capacity(5);
            fields.insert("k".to_string(), FieldValue::from(1));
            black_box(fields)
        });
    });

    group.finish();
}

// ============================================================================
// Logging Benchmarks
// ============================================================================

fn bench_logging(c: &mut Criterion) {
    let mut group = c.benchmark_group("logging");
    group.throughput(Throughput::Elements(1));

    let logger = silent_logger();

    group.bench_function("info_plain", |b| {
        b.iter(|| logger.info(black_box("Info message")));
    });

    group.bench_function("info_with_fields", |b| {
        b.iter(|| {
            logger
                .with_field("user", black_box("bob"))
                .with_field("count", black_box(3))
                .info("hello")
        });
    });

    group.bench_function("derived_from_base", |b| {
        let base = logger.with_fields([("service", "orders"), ("region", "eu-1")]);
        b.iter(|| base.with_field("attempt", black_box(1)).info("retry"));
    });

    group.finish();
}

fn bench_level_filtering(c: &mut Criterion) {
    let mut group = c.benchmark_group("level_filtering");
    group.throughput(Throughput::Elements(1));

    let logger = silent_logger();

    group.bench_function("discarded_debug", |b| {
        b.iter(|| logger.debug(black_box("Debug message")));
    });

    group.bench_function("discarded_debugf", |b| {
        b.iter(|| logger.debugf(format_args!("value {}", black_box(42))));
    });

    group.finish();
}

// ============================================================================
// Criterion Configuration
// ============================================================================

criterion_group!(
    benches,
    bench_formatters,
    bench_entry_pool,
    bench_logging,
    bench_level_filtering
);

criterion_main!(benches);
