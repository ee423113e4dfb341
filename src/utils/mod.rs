//! Shared helpers used across the analysis and compiler layers.

mod bitset;
mod dot;
mod names;

pub use bitset::BitSet;
pub use dot::escape_dot;
pub use names::NameGenerator;
