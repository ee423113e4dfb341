//! Pass infrastructure on top of the analyses.
//!
//! - [`crate::analysis`]: block formation, the CFG, dataflow and SSA conversion
//! - [`compiler`](self): passes wrapping those conversions and a scheduler running
//!   them over whole programs
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      Compiler Pipeline                       │
//! ├──────────────────────────────────────────────────────────────┤
//! │                                                              │
//! │  CompilerConfig            SSA naming, worklist order,       │
//! │                            parallelism                       │
//! │                                                              │
//! │  PassScheduler             Runs passes per function          │
//! │    ├─ rayon over functions (optional)                        │
//! │    ├─ error isolation      failing function is restored      │
//! │    └─ SchedulerReport      changed / failed per function     │
//! │                                                              │
//! │  FunctionPass trait        Interface for all passes          │
//! │    └─ run_on_function()    Per-function transformation       │
//! │                                                              │
//! │  Passes                                                      │
//! │    ├─ IntoSsaPass          get/set SSA construction          │
//! │    └─ FromSsaPass          get/set SSA destruction           │
//! │                                                              │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use irflow::compiler::{CompilerConfig, PassScheduler};
//! use irflow::ir::{Function, Instruction, Literal, Program, Type};
//!
//! let mut program = Program {
//!     functions: vec![Function::new(
//!         "main",
//!         vec![],
//!         vec![
//!             Instruction::constant("v", Type::Int, Literal::Int(4)),
//!             Instruction::jmp("done"),
//!             Instruction::label("done"),
//!             Instruction::print(["v"]),
//!         ],
//!     )],
//! };
//!
//! let report = PassScheduler::into_ssa(CompilerConfig::default()).run(&mut program);
//! assert!(report.is_success());
//! assert_eq!(report.changed().collect::<Vec<_>>(), vec!["main"]);
//! ```

mod config;
mod pass;
mod passes;
mod scheduler;

pub use config::CompilerConfig;
pub use pass::FunctionPass;
pub use passes::{FromSsaPass, IntoSsaPass};
pub use scheduler::{FunctionOutcome, PassScheduler, SchedulerReport};
