//! Criterion benchmarks for rust_log_bridge

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use indexmap::IndexMap;
use rust_log_bridge::di::{filter_definitions, FilterSpec};
use rust_log_bridge::prelude::*;
use rust_log_bridge::{MessagePlaceholderProcessor, TagProcessor, UidProcessor};
use std::sync::Arc;

/// Sink that accepts everything and keeps nothing
struct NullHandler;

impl Handler for NullHandler {
    fn is_handling(&self, _record: &LogRecord) -> bool {
        true
    }

    fn handle(&self, record: &LogRecord) -> Result<bool> {
        black_box(record);
        Ok(true)
    }

    fn close(&self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "null"
    }
}

fn adapter(level: Level, bubble: bool, processors: Vec<Arc<dyn Processor>>) -> Arc<dyn Handler> {
    Arc::new(HandlerAdapter::new(Arc::new(NullHandler), level, bubble, processors))
}

// ============================================================================
// Channel Dispatch Benchmarks
// ============================================================================

fn bench_channel_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("channel_dispatch");
    group.throughput(Throughput::Elements(1));

    let single = Channel::new("single");
    single.push_handler(adapter(Level::Debug, true, Vec::new()));

    group.bench_function("single_adapter", |b| {
        b.iter(|| single.info(black_box("Info message")).unwrap());
    });

    let chain = Channel::new("chain");
    chain.set_handlers((0..5).map(|_| adapter(Level::Debug, true, Vec::new())).collect());

    group.bench_function("five_bubbling_adapters", |b| {
        b.iter(|| chain.info(black_box("Info message")).unwrap());
    });

    let stopping = Channel::new("stopping");
    stopping.set_handlers(vec![
        adapter(Level::Debug, false, Vec::new()),
        adapter(Level::Debug, true, Vec::new()),
    ]);

    group.bench_function("stop_at_first", |b| {
        b.iter(|| stopping.info(black_box("Info message")).unwrap());
    });

    group.finish();
}

// ============================================================================
// Level Filtering Benchmarks
// ============================================================================

fn bench_level_filtering(c: &mut Criterion) {
    let mut group = c.benchmark_group("level_filtering");
    group.throughput(Throughput::Elements(1));

    let channel = Channel::new("filtered");
    channel.push_handler(adapter(Level::Error, true, Vec::new()));
    channel.push_processor(Arc::new(UidProcessor::default()));

    group.bench_function("skipped_record", |b| {
        b.iter(|| channel.debug(black_box("Filtered message")).unwrap());
    });

    group.bench_function("accepted_record", |b| {
        b.iter(|| channel.error(black_box("Error message")).unwrap());
    });

    group.finish();
}

// ============================================================================
// Processor Benchmarks
// ============================================================================

fn bench_processors(c: &mut Criterion) {
    let mut group = c.benchmark_group("processors");
    group.throughput(Throughput::Elements(1));

    let processors: Vec<Arc<dyn Processor>> = vec![
        Arc::new(MessagePlaceholderProcessor::new()),
        Arc::new(UidProcessor::default()),
        Arc::new(TagProcessor::new(["bench", "processors"])),
    ];
    let channel = Channel::new("processed");
    channel.push_handler(adapter(Level::Debug, true, processors));

    group.bench_function("adapter_with_three_processors", |b| {
        b.iter(|| {
            channel
                .log(
                    Level::Info,
                    black_box("User {user} logged in"),
                    LogContext::new().with_field("user", "alice"),
                )
                .unwrap()
        });
    });

    group.finish();
}

// ============================================================================
// Filter Benchmarks
// ============================================================================

fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter");

    let definitions: IndexMap<String, String> = (0..32)
        .map(|i| (format!("handler{}", i), format!("app.handler{}", i)))
        .collect();
    let allowed = FilterSpec::allow((0..32).step_by(3).map(|i| format!("handler{}", i)));
    let forbidden = FilterSpec::forbid((0..32).step_by(3).map(|i| format!("handler{}", i)));

    group.bench_function("allowed", |b| {
        b.iter(|| filter_definitions(black_box(&definitions), &allowed, "log", "handlers").unwrap());
    });

    group.bench_function("forbidden", |b| {
        b.iter(|| filter_definitions(black_box(&definitions), &forbidden, "log", "handlers").unwrap());
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_channel_dispatch,
    bench_level_filtering,
    bench_processors,
    bench_filter
);

criterion_main!(benches);
