//! Compilation benchmarks.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use fidlgen_bench::library::synthetic_library;
use fidlgen_dart::dart::format_numeric;
use fidlgen_dart::{CompilerConfig, compile_with_config};
use fidlgen_ir::Root;
use std::hint::black_box;

fn benchmark_parse(c: &mut Criterion) {
    let json = synthetic_library(64);

    c.bench_function("parse_ir_64", |b| {
        b.iter(|| Root::from_json(black_box(&json)))
    });
}

fn benchmark_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile");

    for count in [16usize, 128, 1024] {
        let root = Root::from_json(&synthetic_library(count)).expect("Failed to parse IR");
        group.throughput(Throughput::Elements((count * 2) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &root, |b, root| {
            b.iter(|| compile_with_config(black_box(root), CompilerConfig::default()))
        });
    }

    group.finish();
}

fn benchmark_literals(c: &mut Criterion) {
    c.bench_function("format_decimal_u64_max", |b| {
        b.iter(|| format_numeric(black_box("18446744073709551615")))
    });

    c.bench_function("format_hex", |b| {
        b.iter(|| format_numeric(black_box("0xDEADBEEF")))
    });

    c.bench_function("format_float", |b| {
        b.iter(|| format_numeric(black_box("6.02214076e23")))
    });
}

criterion_group!(
    benches,
    benchmark_parse,
    benchmark_compile,
    benchmark_literals
);
criterion_main!(benches);
