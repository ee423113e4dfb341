//! Static Single Assignment (SSA) form with `get`/`set` pseudo-operations.
//!
//! The construction is deliberately naive: there are no dominance frontiers and no
//! phi nodes. Every variable gets a block-local name in every non-entry block, read
//! through `get` at the top of the block and published through `set` at the bottom.
//! This costs code size but needs nothing beyond the control flow graph.
//!
//! # Components
//!
//! - [`SsaConstructor`] / [`to_ssa`] - Function to get/set SSA form
//! - [`SsaDestructor`] / [`from_ssa`] - Back to ordinary instructions
//! - [`TypeTable`] - Variable types used to annotate synthesized instructions
//! - [`SsaConfig`] - Naming of block-local variables
//!
//! # Round Trip
//!
//! `from_ssa(&to_ssa(f)?)` computes the same values and prints the same output as
//! `f`. The lowered program keeps the block-local copies, so it is larger but
//! otherwise ordinary.
//!
//! ```rust
//! use irflow::analysis::{from_ssa, to_ssa};
//! use irflow::ir::{Function, Instruction, Literal, Type, ValueOp};
//!
//! let function = Function::new(
//!     "main",
//!     vec![],
//!     vec![
//!         Instruction::constant("i", Type::Int, Literal::Int(0)),
//!         Instruction::label("loop"),
//!         Instruction::value(ValueOp::Add, "i", Type::Int, ["i", "i"]),
//!         Instruction::value(ValueOp::Lt, "c", Type::Bool, ["i", "i"]),
//!         Instruction::br("c", "loop", "done"),
//!         Instruction::label("done"),
//!         Instruction::print(["i"]),
//!     ],
//! );
//!
//! let ssa = to_ssa(&function)?;
//! let lowered = from_ssa(&ssa)?;
//! assert!(lowered.len() > function.instrs.len());
//! # Ok::<(), irflow::Error>(())
//! ```

mod config;
mod construct;
mod destruct;
mod types;

pub use config::SsaConfig;
pub use construct::{to_ssa, SsaConstructor};
pub use destruct::{from_ssa, SsaDestructor};
pub use types::TypeTable;
