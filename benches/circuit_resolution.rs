//! Benchmarks for circuit resolution against the bundled table
//!
//! One case per matching stage, plus a miss that walks every stage.
//!
//! Platform: Cross-platform (bundled data, CI-safe)

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use paddock::circuit::{CircuitResolver, CircuitTable, EventQuery};
use std::hint::black_box;

const EVENTS: &[(&str, EventQuery<'static>)] = &[
    ("alias", EventQuery { event_name: "São Paulo Grand Prix", location: "São Paulo", country: "Brazil" }),
    ("location_country", EventQuery { event_name: "Bahrain Grand Prix", location: "Sakhir", country: "Bahrain" }),
    ("name_containment", EventQuery { event_name: "Autodromo Nazionale di Monza", location: "Nowhere", country: "Nowhereland" }),
    ("location_only", EventQuery { event_name: "Spanish Grand Prix", location: "Montmeló", country: "España" }),
    ("unmatched", EventQuery { event_name: "Atlantis Grand Prix", location: "Atlantis", country: "Ocean" }),
];

fn bench_resolve(c: &mut Criterion) {
    let resolver = CircuitResolver::bundled();
    let mut group = c.benchmark_group("circuit_resolve");

    for (name, query) in EVENTS {
        group.bench_with_input(BenchmarkId::from_parameter(name), query, |b, query| {
            b.iter(|| black_box(resolver.resolve_with_stage(black_box(query))))
        });
    }

    group.finish();
}

fn bench_table(c: &mut Criterion) {
    c.bench_function("bundled_table_handle", |b| b.iter(|| black_box(CircuitTable::bundled())));

    let csv = include_str!("../data/circuits.csv");
    c.bench_function("parse_circuit_csv", |b| {
        b.iter(|| black_box(CircuitTable::from_reader(black_box(csv.as_bytes()))))
    });
}

criterion_group!(benches, bench_resolve, bench_table);
criterion_main!(benches);
