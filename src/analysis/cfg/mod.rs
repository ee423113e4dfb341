//! Control Flow Graph (CFG) construction.
//!
//! This module turns the flat instruction sequence of a function into named basic
//! blocks connected by explicit control flow edges, and back.
//!
//! # Key Components
//!
//! - [`form_blocks`] - Lazy partition of an instruction sequence into blocks
//! - [`BasicBlock`] - A named block with its instructions
//! - [`BlockMap`] - Blocks in source order, with the structural rewrites that make
//!   control flow explicit (fall-through jumps, a dedicated entry block)
//! - [`Edges`] - Predecessor and successor lists derived from terminators
//! - [`ControlFlowGraph`] - Block map and edges, built in the canonical order
//!
//! # Construction
//!
//! [`ControlFlowGraph::build`] runs the steps in this order:
//!
//! 1. Form blocks and name them ([`BlockMap::from_instructions`]). Leading labels
//!    become block names; other blocks are named `b1`, `b2`, ...
//! 2. Materialize fall-through as `jmp` ([`BlockMap::add_terminators`]). The last
//!    block keeps falling off the end.
//! 3. Insert an `entry` block if the first block is a jump target
//!    ([`BlockMap::add_entry`]).
//! 4. Compute edges ([`Edges::compute`]). A target that names no block is a
//!    [`crate::Error::MalformedControlFlow`].
//!
//! Transformations that rewrite instructions work on the [`BlockMap`] and flatten it
//! with [`BlockMap::reassemble`], which restores every source label and labels
//! synthesized blocks only when something jumps to them.
//!
//! # Examples
//!
//! ```rust
//! use irflow::analysis::ControlFlowGraph;
//! use irflow::ir::Instruction;
//!
//! let instrs = vec![
//!     Instruction::br("c", "then", "else"),
//!     Instruction::label("then"),
//!     Instruction::print(["c"]),
//!     Instruction::label("else"),
//!     Instruction::ret(None),
//! ];
//!
//! let cfg = ControlFlowGraph::build(&instrs)?;
//! assert_eq!(cfg.successor_names("b1"), vec!["then", "else"]);
//! assert_eq!(cfg.successor_names("then"), vec!["else"]);
//!
//! for idx in cfg.reverse_postorder() {
//!     println!("{}", cfg.block(idx).unwrap().name());
//! }
//! # Ok::<(), irflow::Error>(())
//! ```

mod block;
mod blocks;
mod edge;
mod graph;
mod map;

pub use block::BasicBlock;
pub use blocks::{form_blocks, Blocks};
pub use edge::{CfgEdge, CfgEdgeKind, Edges};
pub use graph::ControlFlowGraph;
pub use map::BlockMap;
