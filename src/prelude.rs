//! # irflow Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and traits
//! from the irflow library.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all irflow operations
pub use crate::Error;

/// The result type used throughout irflow
pub use crate::Result;

// ================================================================================================
// Intermediate Representation
// ================================================================================================

/// Instructions, opcodes, types and functions
pub use crate::ir::{
    Argument, ConstOp, EffectOp, Function, Instruction, Literal, Program, Type, ValueOp,
};

// ================================================================================================
// Control Flow
// ================================================================================================

/// Block formation and the control flow graph
pub use crate::analysis::{
    form_blocks, BasicBlock, BlockMap, CfgEdge, CfgEdgeKind, ControlFlowGraph, Edges,
};

// ================================================================================================
// Dataflow
// ================================================================================================

/// The dataflow framework and its built-in analyses
pub use crate::analysis::{
    reaching_definitions, AnalysisResults, DataFlowAnalysis, DataFlowSolver, Direction,
    LiveVariables, MeetSemiLattice, ReachingDefinitions, ReachingReport, VariableIndex,
    WorklistOrder,
};

// ================================================================================================
// SSA and Passes
// ================================================================================================

/// get/set SSA conversion
pub use crate::analysis::{from_ssa, to_ssa, SsaConfig, SsaConstructor, SsaDestructor};

/// Pass infrastructure
pub use crate::compiler::{CompilerConfig, FunctionPass, PassScheduler, SchedulerReport};
