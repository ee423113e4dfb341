// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]

//! # irflow
//!
//! Control flow graphs, iterative dataflow analysis and naive SSA construction for a
//! small register-based intermediate representation.
//!
//! A function is a flat list of [`ir::Instruction`]s. Every analysis in this crate
//! starts by splitting that list into basic blocks and building a
//! [`analysis::ControlFlowGraph`], runs over the graph, and hands back either per-block
//! facts or a new flat instruction list.
//!
//! ## Features
//!
//! - **Block formation and CFG construction** - fallthrough materialization, a
//!   synthesized entry block when the first block is a jump target, edge maps and
//!   reassembly back into a flat list
//! - **Dataflow framework** - a worklist solver generic over the lattice and the
//!   direction, with reaching definitions and live variables built on top
//! - **get/set SSA** - a construction without dominance frontiers that links blocks
//!   through `get`/`set` pseudo-operations, and the matching destruction
//! - **Pass scheduling** - apply passes to every function of a program, optionally in
//!   parallel, with failures isolated per function
//! - **Serde IR** - all IR types serialize to the conventional JSON shape
//!
//! ## Quick Start
//!
//! ```rust
//! use irflow::prelude::*;
//!
//! let function = Function::new(
//!     "main",
//!     vec![Argument::new("a", Type::Int)],
//!     vec![
//!         Instruction::constant("one", Type::Int, Literal::Int(1)),
//!         Instruction::value(ValueOp::Add, "b", Type::Int, ["a", "one"]),
//!         Instruction::jmp("L"),
//!         Instruction::label("L"),
//!         Instruction::value(ValueOp::Add, "c", Type::Int, ["b", "one"]),
//!         Instruction::ret(None),
//!     ],
//! );
//!
//! let report = reaching_definitions(&function)?;
//! print!("{report}");
//!
//! let ssa = to_ssa(&function)?;
//! let plain = from_ssa(&ssa)?;
//! assert!(plain.len() >= function.instrs.len());
//! # Ok::<(), irflow::Error>(())
//! ```
//!
//! ## Logging
//!
//! The crate logs through the [`log`] facade: milestones at `debug` level, recovered
//! conditions such as reads of never-defined variables at `warn` level. No logger is
//! installed by the library.

#[macro_use]
pub(crate) mod error;

/// Shared functionality which is used in unit tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust
/// use irflow::prelude::*;
///
/// let cfg = ControlFlowGraph::build(&[Instruction::ret(None)])?;
/// assert_eq!(cfg.block_count(), 1);
/// # Ok::<(), irflow::Error>(())
/// ```
pub mod prelude;

/// The intermediate representation: instructions, functions and programs.
pub mod ir;

/// Control flow graphs, dataflow analyses and SSA conversion.
pub mod analysis;

/// Passes and the pass scheduler.
pub mod compiler;

/// Helper data structures shared by the analyses.
pub mod utils;

/// `irflow` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// `irflow` Error type
///
/// The main error type for all operations in this crate.
///
/// # Examples
///
/// ```rust
/// use irflow::{analysis::to_ssa, ir::{Function, Instruction}, Error};
///
/// let function = Function::new("main", vec![], vec![Instruction::jmp("missing")]);
/// match to_ssa(&function) {
///     Err(Error::MalformedControlFlow { target, .. }) => assert_eq!(target, "missing"),
///     other => panic!("unexpected: {other:?}"),
/// }
/// ```
pub use error::Error;
