//! Data flow integration tests: reaching definitions and liveness on fixture programs.

use irflow::{
    analysis::{
        reaching_definitions, reaching_definitions_with, ControlFlowGraph, DataFlowAnalysis,
        DataFlowSolver, LiveVariables, MeetSemiLattice, ReachingDefinitions, VariableIndex,
        WorklistOrder,
    },
    compiler::{CompilerConfig, PassScheduler},
    ir::{Argument, Function, Instruction, Program, Type, ValueOp},
    Error,
};

fn load(source: &str) -> Program {
    serde_json::from_str(source).expect("fixture parses")
}

fn sum() -> Function {
    load(include_str!("fixtures/loops.json"))
        .function("sum")
        .expect("sum exists")
        .clone()
}

fn params(function: &Function) -> Vec<String> {
    function.arg_names().map(str::to_string).collect()
}

#[test]
fn test_two_block_example() -> irflow::Result<()> {
    let program = load(include_str!("fixtures/reaching.json"));
    let report = reaching_definitions(&program.functions[0])?;

    assert_eq!(report.in_of("b1").unwrap(), ["a"]);
    assert_eq!(report.out_of("b1").unwrap(), ["a", "b", "one"]);
    assert_eq!(report.in_of("L").unwrap(), ["a", "b", "one"]);
    assert_eq!(report.out_of("L").unwrap(), ["a", "b", "c", "one"]);
    assert_eq!(
        report.to_string(),
        "b1:\n  in:  a\n  out: a, b, one\nL:\n  in:  a, b, one\n  out: a, b, c, one\n"
    );
    Ok(())
}

#[test]
fn test_example_without_constants() -> irflow::Result<()> {
    // b := a + a; jmp L; L: c := b + b; ret
    let function = Function::new(
        "main",
        vec![Argument::new("a", Type::Int)],
        vec![
            Instruction::value(ValueOp::Add, "b", Type::Int, ["a", "a"]),
            Instruction::jmp("L"),
            Instruction::label("L"),
            Instruction::value(ValueOp::Add, "c", Type::Int, ["b", "b"]),
            Instruction::ret(None),
        ],
    );
    let report = reaching_definitions(&function)?;

    assert_eq!(report.in_of("b1").unwrap(), ["a"]);
    assert_eq!(report.out_of("b1").unwrap(), ["a", "b"]);
    assert_eq!(report.in_of("L").unwrap(), ["a", "b"]);
    assert_eq!(report.out_of("L").unwrap(), ["a", "b", "c"]);
    Ok(())
}

#[test]
fn test_result_is_a_fixed_point() -> irflow::Result<()> {
    let function = sum();
    let params = params(&function);
    let cfg = ControlFlowGraph::build(&function.instrs)?;
    let variables = VariableIndex::new(&params, &cfg);

    let analysis = ReachingDefinitions::new(&cfg, &variables, &params);
    let results = DataFlowSolver::new(ReachingDefinitions::new(&cfg, &variables, &params))
        .solve(&cfg);

    for (idx, block) in cfg.blocks().iter().enumerate() {
        let input = results.in_state(idx).unwrap();
        let output = results.out_state(idx).unwrap();
        assert_eq!(&analysis.transfer(idx, block, input), output);

        if idx == 0 {
            assert_eq!(input, &analysis.boundary(&cfg));
            continue;
        }
        let merged = cfg
            .predecessors(idx)
            .iter()
            .map(|&p| results.out_state(p).unwrap().clone())
            .reduce(|acc, state| acc.meet(&state))
            .unwrap();
        assert_eq!(input, &merged);
    }
    Ok(())
}

#[test]
fn test_iteration_bound_and_order_independence() -> irflow::Result<()> {
    let function = sum();
    let params = params(&function);
    let cfg = ControlFlowGraph::build(&function.instrs)?;
    let variables = VariableIndex::new(&params, &cfg);
    let bound = cfg.block_count() * (variables.len() + 1) + cfg.edges().edges().len();

    for order in [WorklistOrder::SourceOrder, WorklistOrder::ReversePostorder] {
        let results = DataFlowSolver::new(ReachingDefinitions::new(&cfg, &variables, &params))
            .with_order(order)
            .solve(&cfg);
        assert!(results.iterations() >= cfg.block_count());
        assert!(results.iterations() <= bound);
    }

    assert_eq!(
        reaching_definitions_with(&function, WorklistOrder::SourceOrder)?,
        reaching_definitions_with(&function, WorklistOrder::ReversePostorder)?
    );
    Ok(())
}

#[test]
fn test_loop_reaching_definitions() -> irflow::Result<()> {
    let report = reaching_definitions(&sum())?;

    assert_eq!(report.in_of("b1").unwrap(), ["n"]);
    // `more` flows around the back edge
    assert_eq!(report.in_of("head").unwrap(), ["i", "more", "n", "one", "total"]);
    assert_eq!(report.out_of("head").unwrap(), ["i", "more", "n", "one", "total"]);
    assert_eq!(report.in_of("body").unwrap(), report.out_of("head").unwrap());
    assert_eq!(report.out_of("done").unwrap(), report.out_of("head").unwrap());
    Ok(())
}

#[test]
fn test_liveness_on_loop() -> irflow::Result<()> {
    let function = sum();
    let cfg = ControlFlowGraph::build(&function.instrs)?;
    let variables = VariableIndex::new(&params(&function), &cfg);
    let results = DataFlowSolver::new(LiveVariables::new(&cfg, &variables)).solve(&cfg);

    let live_in = |name: &str| variables.names_of(results.in_of(name).unwrap());
    let live_out = |name: &str| variables.names_of(results.out_of(name).unwrap());

    assert_eq!(live_in("b1"), vec!["n"]);
    assert_eq!(live_in("head"), vec!["i", "n", "one", "total"]);
    assert_eq!(live_in("body"), vec!["i", "n", "one", "total"]);
    assert_eq!(live_in("done"), vec!["total"]);
    assert!(live_out("done").is_empty());
    Ok(())
}

#[test]
fn test_report_serializes() -> irflow::Result<()> {
    let program = load(include_str!("fixtures/reaching.json"));
    let report = reaching_definitions(&program.functions[0])?;

    let json = serde_json::to_value(&report).expect("serializes");
    assert_eq!(
        json,
        serde_json::json!({
            "blocks": [
                { "name": "b1", "in": ["a"], "out": ["a", "b", "one"] },
                { "name": "L", "in": ["a", "b", "one"], "out": ["a", "b", "c", "one"] }
            ]
        })
    );
    Ok(())
}

#[test]
fn test_whole_program_analysis() {
    let program = load(include_str!("fixtures/loops.json"));
    for parallel in [true, false] {
        let scheduler = PassScheduler::new(CompilerConfig {
            parallel,
            worklist_order: WorklistOrder::ReversePostorder,
            ..Default::default()
        });
        let results = scheduler.reaching_definitions(&program);

        let names: Vec<&str> = results.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["sum", "spin", "straight", "broken"]);

        let spin = results[1].1.as_ref().expect("spin analyzes");
        assert_eq!(spin.in_of("entry").unwrap(), ["k"]);
        assert_eq!(spin.in_of("top").unwrap(), ["again", "k", "one", "zero"]);

        match &results[3].1 {
            Err(Error::FunctionFailed { function, source }) => {
                assert_eq!(function, "broken");
                assert!(matches!(**source, Error::MalformedControlFlow { .. }));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
