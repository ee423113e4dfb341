//! Built-in passes.

mod ssa;

pub use ssa::{FromSsaPass, IntoSsaPass};
