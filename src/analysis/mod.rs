//! Program analysis infrastructure.
//!
//! # Architecture
//!
//! The analysis module is organized into focused sub-modules, each building on the
//! previous one:
//!
//! - [`cfg`] - Basic blocks, block maps, edges and the control flow graph
//! - [`dataflow`] - Worklist fixed-point solver with reaching definitions and liveness
//! - [`ssa`] - Naive get/set SSA construction and destruction
//!
//! Every analysis builds its own [`ControlFlowGraph`] from a function's instructions
//! and discards it when done; nothing is cached between passes.
//!
//! # Usage
//!
//! ```rust
//! use irflow::analysis::{from_ssa, reaching_definitions, to_ssa, ControlFlowGraph};
//! use irflow::ir::{Argument, Function, Instruction, Type, ValueOp};
//!
//! let function = Function::new(
//!     "main",
//!     vec![Argument::new("a", Type::Int)],
//!     vec![
//!         Instruction::value(ValueOp::Add, "b", Type::Int, ["a", "a"]),
//!         Instruction::jmp("L"),
//!         Instruction::label("L"),
//!         Instruction::value(ValueOp::Add, "c", Type::Int, ["b", "b"]),
//!         Instruction::ret(None),
//!     ],
//! );
//!
//! let cfg = ControlFlowGraph::build(&function.instrs)?;
//! assert_eq!(cfg.successor_names("b1"), vec!["L"]);
//!
//! let report = reaching_definitions(&function)?;
//! assert_eq!(report.out_of("L").unwrap(), ["a", "b", "c"]);
//!
//! let lowered = from_ssa(&to_ssa(&function)?)?;
//! assert!(!lowered.is_empty());
//! # Ok::<(), irflow::Error>(())
//! ```

pub mod cfg;
pub mod dataflow;
pub mod ssa;

// Re-export primary types at module level
pub use cfg::{
    form_blocks, BasicBlock, BlockMap, Blocks, CfgEdge, CfgEdgeKind, ControlFlowGraph, Edges,
};
pub use dataflow::{
    reaching_definitions, reaching_definitions_with, AnalysisResults, BlockFacts,
    DataFlowAnalysis, DataFlowSolver, Direction, LiveVariables, MeetSemiLattice,
    ReachingDefinitions, ReachingDefsResult, ReachingReport, VariableIndex, WorklistOrder,
};
pub use ssa::{from_ssa, to_ssa, SsaConfig, SsaConstructor, SsaDestructor, TypeTable};
