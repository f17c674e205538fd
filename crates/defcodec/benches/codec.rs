// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::cast_precision_loss)] // Bench data generation
#![allow(clippy::cast_possible_truncation)] // Bench parameters

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use defcodec::builtin::ids;
use defcodec::{Catalog, Item, ItemMap, NamedMap, Value};

// ============================================================================
// Fixtures
// ============================================================================

fn catalog() -> Catalog {
    Catalog::builtin().expect("Builtin catalog should build")
}

/// One node of a scene tree: a few scalars, a string and a float array.
fn node(catalog: &Catalog, points: usize) -> NamedMap {
    let float = catalog.get(ids::FLOAT64).expect("Float64");
    let mut node = NamedMap::new();
    node.insert("x", float.clone(), 1.0f64);
    node.insert("y", float.clone(), 2.0f64);
    node.insert("z", float, 3.0f64);
    node.insert(
        "name",
        catalog.get(ids::STRING).expect("String"),
        "node",
    );
    node.insert(
        "points",
        catalog.get(ids::FLOAT64_ARRAY).expect("Float64Array"),
        (0..points).map(|i| i as f64).collect::<Vec<_>>(),
    );
    node
}

fn tree(catalog: &Catalog, width: usize) -> ItemMap {
    let named = catalog.get(ids::NAMED_MAP8).expect("NamedMap8");
    let toc = catalog.get(ids::TOC_MAP).expect("TocMap");
    let mut children = ItemMap::new();
    children.insert(named, node(catalog, 64));
    let mut root = ItemMap::new();
    root.insert(toc, children);
    root.insert(
        catalog.get(ids::INT32_ARRAY).expect("Int32Array"),
        (0..width as i32).collect::<Vec<_>>(),
    );
    root
}

// ============================================================================
// Benchmarks
// ============================================================================

/// Benchmark: scalar tag + value
fn bench_scalar(c: &mut Criterion) {
    let catalog = catalog();
    let int32 = catalog.get(ids::INT32).expect("Int32");
    let value = Value::from(42i32);
    let bytes = catalog.serialize(&int32, &value).expect("Serialize");

    c.bench_function("serialize_int32", |b| {
        b.iter(|| catalog.serialize(black_box(&int32), black_box(&value)))
    });
    c.bench_function("deserialize_int32", |b| {
        b.iter(|| catalog.deserialize(black_box(&bytes)))
    });
}

/// Benchmark: float arrays of increasing size
fn bench_arrays(c: &mut Criterion) {
    let catalog = catalog();
    let floats = catalog.get(ids::FLOAT64_ARRAY).expect("Float64Array");
    let mut group = c.benchmark_group("float64_array");
    for len in [16usize, 1024, 65536] {
        let value = Value::from((0..len).map(|i| i as f64 * 0.5).collect::<Vec<_>>());
        let bytes = catalog.serialize(&floats, &value).expect("Serialize");
        group.throughput(Throughput::Bytes(bytes.len() as u64));
        group.bench_with_input(BenchmarkId::new("serialize", len), &value, |b, value| {
            b.iter(|| catalog.serialize(&floats, black_box(value)))
        });
        group.bench_with_input(BenchmarkId::new("deserialize", len), &bytes, |b, bytes| {
            b.iter(|| catalog.deserialize(black_box(bytes)))
        });
    }
    group.finish();
}

/// Benchmark: map layouts over the same tree
fn bench_maps(c: &mut Criterion) {
    let catalog = catalog();
    let root = Value::from(tree(&catalog, 256));
    let mut group = c.benchmark_group("maps");
    for (name, id) in [
        ("dense", ids::MAP),
        ("aligned16", ids::MAP16),
        ("toc", ids::TOC_MAP),
    ] {
        let def = catalog.get(id).expect("Map def");
        let bytes = catalog.serialize(&def, &root).expect("Serialize");
        group.bench_function(BenchmarkId::new("serialize", name), |b| {
            b.iter(|| catalog.serialize(&def, black_box(&root)))
        });
        group.bench_function(BenchmarkId::new("deserialize", name), |b| {
            b.iter(|| catalog.deserialize(black_box(&bytes)))
        });
    }
    group.finish();
}

/// Benchmark: gzip envelope around a large array
fn bench_gzip(c: &mut Criterion) {
    let catalog = catalog();
    let gzip = catalog.get(ids::GZIP).expect("Gzip");
    let floats = catalog.get(ids::FLOAT64_ARRAY).expect("Float64Array");
    let inner = Item::new(
        floats,
        (0..10_000i32).map(|i| f64::from(i % 360)).collect::<Vec<_>>(),
    );
    let value = Value::from(inner);
    let bytes = catalog.serialize(&gzip, &value).expect("Serialize");

    c.bench_function("gzip_serialize_10k_f64", |b| {
        b.iter(|| catalog.serialize(&gzip, black_box(&value)))
    });
    c.bench_function("gzip_deserialize_10k_f64", |b| {
        b.iter(|| catalog.deserialize(black_box(&bytes)))
    });
}

criterion_group!(benches, bench_scalar, bench_arrays, bench_maps, bench_gzip);
criterion_main!(benches);
