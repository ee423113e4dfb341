//! Benchmarks for the analysis pipeline.
//!
//! Measures each stage on a synthetic function made of chained loops:
//! - Control flow graph construction
//! - Reaching definitions
//! - SSA construction and lowering
//! - Whole-program round trips through the pass scheduler

extern crate irflow;

use criterion::{criterion_group, criterion_main, Criterion};
use irflow::prelude::*;
use std::hint::black_box;

/// A function of `loops` self-looping blocks, each bumping a counter and branching back
/// to itself until the counter reaches `n`.
fn chained_loops(name: &str, loops: usize) -> Function {
    let mut instrs = vec![
        Instruction::constant("one", Type::Int, Literal::Int(1)),
        Instruction::constant("x", Type::Int, Literal::Int(0)),
    ];
    for idx in 0..loops {
        let head = format!("L{idx}");
        let next = format!("L{}", idx + 1);
        instrs.push(Instruction::label(head.as_str()));
        instrs.push(Instruction::value(ValueOp::Add, "x", Type::Int, ["x", "one"]));
        instrs.push(Instruction::value(
            ValueOp::Add,
            format!("t{idx}"),
            Type::Int,
            ["x", "n"],
        ));
        instrs.push(Instruction::value(ValueOp::Lt, "c", Type::Bool, ["x", "n"]));
        instrs.push(Instruction::br("c", head.as_str(), next.as_str()));
    }
    instrs.push(Instruction::label(format!("L{loops}")));
    instrs.push(Instruction::print(["x"]));
    instrs.push(Instruction::ret(Some("x")));

    Function::new(name, vec![Argument::new("n", Type::Int)], instrs)
}

fn bench_cfg_build(c: &mut Criterion) {
    let function = chained_loops("main", 200);

    c.bench_function("cfg_build_200_loops", |b| {
        b.iter(|| {
            let cfg = ControlFlowGraph::build(black_box(&function.instrs)).unwrap();
            black_box(cfg)
        });
    });
}

fn bench_reaching_definitions(c: &mut Criterion) {
    let function = chained_loops("main", 200);

    c.bench_function("reaching_definitions_200_loops", |b| {
        b.iter(|| {
            let report = reaching_definitions(black_box(&function)).unwrap();
            black_box(report)
        });
    });
}

fn bench_ssa_round_trip(c: &mut Criterion) {
    let function = chained_loops("main", 50);

    c.bench_function("to_ssa_50_loops", |b| {
        b.iter(|| {
            let ssa = to_ssa(black_box(&function)).unwrap();
            black_box(ssa)
        });
    });

    let ssa = to_ssa(&function).unwrap();
    c.bench_function("from_ssa_50_loops", |b| {
        b.iter(|| {
            let lowered = from_ssa(black_box(&ssa)).unwrap();
            black_box(lowered)
        });
    });
}

fn bench_scheduler(c: &mut Criterion) {
    let functions: Vec<Function> = (0..64)
        .map(|idx| chained_loops(&format!("f{idx}"), 20))
        .collect();
    let program = Program { functions };

    for parallel in [false, true] {
        let config = CompilerConfig {
            parallel,
            ..Default::default()
        };
        let scheduler = PassScheduler::round_trip(config);
        let id = if parallel {
            "scheduler_round_trip_parallel"
        } else {
            "scheduler_round_trip_sequential"
        };

        c.bench_function(id, |b| {
            b.iter(|| {
                let mut program = program.clone();
                let report = scheduler.run(black_box(&mut program));
                black_box(report)
            });
        });
    }
}

criterion_group!(
    benches,
    bench_cfg_build,
    bench_reaching_definitions,
    bench_ssa_round_trip,
    bench_scheduler,
);
criterion_main!(benches);
