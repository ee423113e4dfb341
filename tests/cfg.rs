//! Control flow graph integration tests.
//!
//! Programs are loaded from the JSON fixtures the way an external front end would
//! hand them over, then run through block formation, graph construction and
//! reassembly using the public API only.

use irflow::{
    analysis::{form_blocks, BlockMap, CfgEdgeKind, ControlFlowGraph, Edges},
    ir::{Function, Instruction, Program},
    Error,
};

fn load(source: &str) -> Program {
    serde_json::from_str(source).expect("fixture parses")
}

fn loops() -> Program {
    load(include_str!("fixtures/loops.json"))
}

fn function(program: &Program, name: &str) -> Function {
    program.function(name).expect("function exists").clone()
}

#[test]
fn test_fixture_shape() {
    let program = loops();
    assert_eq!(program.functions.len(), 4);

    let sum = function(&program, "sum");
    assert_eq!(sum.arg_names().collect::<Vec<_>>(), vec!["n"]);
    assert_eq!(sum.instrs.len(), 13);
    assert_eq!(sum.instrs[3], Instruction::label("head"));
    assert_eq!(sum.instrs[5], Instruction::br("more", "body", "done"));
}

#[test]
fn test_blocks_partition_the_body() {
    let sum = function(&loops(), "sum");
    let blocks: Vec<&[Instruction]> = form_blocks(&sum.instrs).collect();

    assert_eq!(blocks.len(), 4);
    assert_eq!(blocks[1].first(), Some(&Instruction::label("head")));
    assert_eq!(blocks.concat(), sum.instrs);
}

#[test]
fn test_loop_graph() -> irflow::Result<()> {
    let sum = function(&loops(), "sum");
    let cfg = ControlFlowGraph::build(&sum.instrs)?;

    let names: Vec<&str> = cfg.blocks().names().collect();
    assert_eq!(names, vec!["b1", "head", "body", "done"]);

    assert_eq!(cfg.successor_names("b1"), vec!["head"]);
    assert_eq!(cfg.successor_names("head"), vec!["body", "done"]);
    assert_eq!(cfg.successor_names("body"), vec!["head"]);
    assert!(cfg.successor_names("done").is_empty());

    assert_eq!(cfg.predecessor_names("head"), vec!["b1", "body"]);
    assert!(cfg.predecessor_names("b1").is_empty());
    assert_eq!(cfg.exits(), vec![3]);

    let kinds: Vec<CfgEdgeKind> = cfg.edges().outgoing(1).map(|edge| edge.kind()).collect();
    assert_eq!(
        kinds,
        vec![CfgEdgeKind::ConditionalTrue, CfgEdgeKind::ConditionalFalse]
    );
    Ok(())
}

#[test]
fn test_entry_synthesized_for_loop_header() -> irflow::Result<()> {
    let spin = function(&loops(), "spin");
    let cfg = ControlFlowGraph::build(&spin.instrs)?;

    let names: Vec<&str> = cfg.blocks().names().collect();
    assert_eq!(names, vec!["entry", "top", "out"]);
    assert!(cfg.predecessors(0).is_empty());
    assert_eq!(cfg.predecessor_names("top"), vec!["entry", "top"]);

    let entry = cfg.entry_block().expect("entry");
    assert_eq!(entry.instructions(), &[Instruction::jmp("top")]);

    // Nothing jumps to the synthesized entry, so it stays unlabeled
    let flat = cfg.reassemble();
    assert_eq!(flat[0], Instruction::jmp("top"));
    assert_eq!(&flat[1..], spin.instrs.as_slice());
    Ok(())
}

#[test]
fn test_straight_line_function() -> irflow::Result<()> {
    let straight = function(&loops(), "straight");
    let cfg = ControlFlowGraph::build(&straight.instrs)?;

    assert_eq!(cfg.block_count(), 1);
    assert!(cfg.edges().edges().is_empty());
    assert_eq!(cfg.exits(), vec![0]);
    assert_eq!(cfg.reassemble(), straight.instrs);
    Ok(())
}

#[test]
fn test_unknown_target_is_reported() {
    let broken = function(&loops(), "broken");
    match ControlFlowGraph::build(&broken.instrs) {
        Err(Error::MalformedControlFlow { block, target }) => {
            assert_eq!(block, "b1");
            assert_eq!(target, "nowhere");
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn test_fallthrough_materialized_on_reassembly() -> irflow::Result<()> {
    let sum = function(&loops(), "sum");
    let flat = ControlFlowGraph::build(&sum.instrs)?.reassemble();

    let mut expected = sum.instrs.clone();
    expected.insert(3, Instruction::jmp("head"));
    assert_eq!(flat, expected);
    Ok(())
}

#[test]
fn test_step_by_step_construction() -> irflow::Result<()> {
    let spin = function(&loops(), "spin");

    let mut blocks = BlockMap::from_instructions(&spin.instrs)?;
    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks.add_terminators(), 0);
    assert!(blocks.add_entry());
    assert!(!blocks.add_entry());

    let edges = Edges::compute(&blocks)?;
    assert_eq!(edges.successors(0), &[1]);
    assert_eq!(edges.reverse_postorder(0), vec![0, 1, 2]);

    let cfg = ControlFlowGraph::from_block_map(blocks)?;
    assert_eq!(cfg.edges(), &edges);
    Ok(())
}

#[test]
fn test_dot_rendering() -> irflow::Result<()> {
    let sum = function(&loops(), "sum");
    let dot = ControlFlowGraph::build(&sum.instrs)?.to_dot(Some("sum"));

    assert!(dot.starts_with("digraph CFG {"));
    assert!(dot.contains("label=\"CFG: sum\""));
    assert!(dot.contains("B0 [label=\"b1 (entry)"));
    assert!(dot.contains("fillcolor=lightcoral"));
    assert!(dot.contains("B1 -> B2 [label=\"true\", color=green];"));
    assert!(dot.contains("B1 -> B3 [label=\"false\", color=red];"));
    assert!(dot.trim_end().ends_with('}'));
    Ok(())
}

#[test]
fn test_program_serialization_round_trip() {
    let program = loops();
    let json = serde_json::to_string(&program).expect("serializes");
    let reparsed: Program = serde_json::from_str(&json).expect("parses");
    assert_eq!(reparsed, program);
}
