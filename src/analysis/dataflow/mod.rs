//! Data flow analysis framework.
//!
//! This module provides a generic framework for computing properties that propagate
//! along control flow edges. It supports both forward and backward analyses using a
//! worklist-based solver.
//!
//! # Architecture
//!
//! - **Lattice**: [`MeetSemiLattice`] defines how facts combine where paths merge
//! - **Analysis**: [`DataFlowAnalysis`] specifies the transfer function and boundary
//! - **Solver**: [`DataFlowSolver`] iterates to the fixed point
//!
//! Variables are numbered densely by a [`VariableIndex`] so that fact sets are
//! [`crate::utils::BitSet`]s.
//!
//! # Analyses Provided
//!
//! - [`ReachingDefinitions`]: Which variables may have been assigned on the way to a block
//! - [`LiveVariables`]: Which variables may still be read after a block
//!
//! # Example
//!
//! ```rust
//! use irflow::analysis::reaching_definitions;
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
//! let report = reaching_definitions(&function)?;
//! assert_eq!(report.in_of("L").unwrap(), ["a", "b"]);
//! print!("{report}");
//! # Ok::<(), irflow::Error>(())
//! ```

mod framework;
mod lattice;
mod liveness;
mod reaching;
mod solver;
mod variables;

pub use framework::{AnalysisResults, DataFlowAnalysis, Direction};
pub use lattice::MeetSemiLattice;
pub use liveness::LiveVariables;
pub use reaching::{
    reaching_definitions, reaching_definitions_with, BlockFacts, ReachingDefinitions,
    ReachingDefsResult, ReachingReport,
};
pub use solver::{DataFlowSolver, WorklistOrder};
pub use variables::VariableIndex;
