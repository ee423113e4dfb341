//! Test support: a reference interpreter and sample functions.

pub mod interp;

pub use interp::{run, run_instructions, Value};
pub use programs::{arb_function, loop_at_entry, nested, reaching_example};
