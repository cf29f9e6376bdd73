//! Benchmarks for the defensive copy analysis.
//!
//! Measures the analyzer over synthetic member bodies:
//! - A long block of calls on an `in` parameter (every node reports)
//! - The same block on a mutable local (every node is rejected by provenance)
//! - Deep field chains rooted at a read-only parameter

extern crate copyscope;

use copyscope::prelude::*;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;

struct Program {
    symbols: SymbolTable,
    run: Token,
    mutate: Token,
    link: Token,
    value: Token,
    local: Token,
}

/// `struct Node { Node next; void Mutate(); } static void Run(in Node value) { Node local; }`
fn program() -> Program {
    let mut symbols = SymbolTable::new();
    let core = CoreLibrary::install(&mut symbols, TargetRuntime::Net8).unwrap();
    let node = symbols
        .add_type(TypeSymbol::new("Node", "Bench", TypeKind::Struct).with_base(core.value_type))
        .unwrap();
    let mutate = symbols
        .add_method(MethodSymbol::new("Mutate", MethodKind::Ordinary).with_containing_type(node))
        .unwrap();
    let link = symbols
        .add_field(FieldSymbol::new("next", node).with_containing_type(node))
        .unwrap();
    let run = symbols
        .add_method(MethodSymbol::new("Run", MethodKind::Ordinary).with_flags(MethodFlags::STATIC))
        .unwrap();
    let value = symbols
        .add_parameter(run, ParameterSymbol::new("value", node).with_ref_kind(RefKind::In))
        .unwrap();
    let local = symbols.add_local(LocalSymbol::new("local", node)).unwrap();

    Program {
        symbols,
        run,
        mutate,
        link,
        value,
        local,
    }
}

/// A block of `count` calls `root.next.next...Mutate()` with `depth` field hops each.
fn calls(program: &Program, root: Token, count: usize, depth: usize) -> OperationTree {
    let mut builder = OperationTreeBuilder::new(&program.symbols, "Bench.cs");
    builder
        .member(program.run, |b| {
            let mut statements = Vec::with_capacity(count);
            for _ in 0..count {
                let mut receiver = if root.is(SymbolKind::Parameter) {
                    b.parameter(root)?
                } else {
                    b.local(root)?
                };
                for _ in 0..depth {
                    receiver = b.field(program.link, Some(receiver))?;
                }
                statements.push(b.call(program.mutate, Some(receiver), &[])?);
            }
            b.block(&statements)
        })
        .unwrap();
    builder.build()
}

fn bench_flat_calls(c: &mut Criterion) {
    let program = program();
    let analyzer = DefensiveCopyAnalyzer::default();
    let cancel = CancellationToken::new();

    let mut group = c.benchmark_group("flat_calls");
    for count in [100usize, 1_000, 10_000] {
        let reported = calls(&program, program.value, count, 0);
        let rejected = calls(&program, program.local, count, 0);
        group.throughput(Throughput::Elements(reported.len() as u64));

        group.bench_with_input(BenchmarkId::new("in_parameter", count), &reported, |b, tree| {
            b.iter(|| {
                let findings = analyzer
                    .collect(&program.symbols, black_box(tree), &cancel)
                    .unwrap();
                black_box(findings.count())
            });
        });
        group.bench_with_input(BenchmarkId::new("mutable_local", count), &rejected, |b, tree| {
            b.iter(|| {
                let findings = analyzer
                    .collect(&program.symbols, black_box(tree), &cancel)
                    .unwrap();
                black_box(findings.count())
            });
        });
    }
    group.finish();
}

fn bench_field_chains(c: &mut Criterion) {
    let program = program();
    let analyzer = DefensiveCopyAnalyzer::default();
    let cancel = CancellationToken::new();

    let mut group = c.benchmark_group("field_chains");
    for depth in [1usize, 8, 32] {
        let tree = calls(&program, program.value, 1_000, depth);
        group.throughput(Throughput::Elements(tree.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(depth), &tree, |b, tree| {
            b.iter(|| {
                let findings = analyzer
                    .collect(&program.symbols, black_box(tree), &cancel)
                    .unwrap();
                black_box(findings.count())
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_flat_calls, bench_field_chains);
criterion_main!(benches);
