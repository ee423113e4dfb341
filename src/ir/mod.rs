//! The register-based intermediate representation.
//!
//! A [`Program`] is a list of [`Function`]s; every function carries its formal
//! parameters and a flat sequence of [`Instruction`]s. All transformations in this crate
//! consume such a flat sequence and produce a replacement one, so the structures here are
//! the whole boundary between the core and its collaborators (serializers, command-line
//! wrappers, local optimizers).
//!
//! # Instruction Shape
//!
//! Instructions are a tagged union with four variants:
//!
//! - [`Instruction::Label`] - Names a position in the stream; not executable
//! - [`Instruction::Constant`] - Produces a literal into a destination
//! - [`Instruction::Value`] - Produces a destination from arguments
//! - [`Instruction::Effect`] - Control transfer or side effect, no destination
//!
//! Rewriting code matches on these variants, so adding a new kind of instruction is a
//! compile error everywhere it has to be handled.
//!
//! # Serialization
//!
//! Every type derives `serde` traits using the conventional JSON shape:
//!
//! ```json
//! { "label": "loop" }
//! { "op": "const", "dest": "x", "type": "int", "value": 1 }
//! { "op": "add", "dest": "y", "type": "int", "args": ["x", "x"] }
//! { "op": "br", "args": ["c"], "labels": ["then", "else"] }
//! ```

mod function;
mod instruction;
mod ops;
mod types;

pub use function::{Argument, Function, Program};
pub use instruction::Instruction;
pub use ops::{ConstOp, EffectOp, ValueOp};
pub use types::{Literal, Type};
