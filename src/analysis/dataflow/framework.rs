//! Data flow analysis framework trait, direction and results.
//!
//! Any specific analysis implements [`DataFlowAnalysis`] to work with the
//! [`DataFlowSolver`](crate::analysis::DataFlowSolver).

use crate::analysis::{dataflow::lattice::MeetSemiLattice, BasicBlock, ControlFlowGraph};

/// Direction of data flow analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Information flows from the entry towards the exits.
    ///
    /// The input of a block is the meet of its predecessors' outputs.
    /// Examples: reaching definitions.
    Forward,

    /// Information flows from the exits towards the entry.
    ///
    /// The output of a block is the meet of its successors' inputs.
    /// Examples: live variables.
    Backward,
}

/// A data flow analysis over a [`ControlFlowGraph`].
///
/// Implementations provide the transfer function and boundary conditions; the solver
/// iterates to a fixed point.
///
/// For forward analyses: `out[B] = transfer(B, in[B])`
/// For backward analyses: `in[B] = transfer(B, out[B])`
///
/// # Example
///
/// ```rust
/// use irflow::analysis::{BasicBlock, ControlFlowGraph, DataFlowAnalysis, Direction};
/// use irflow::utils::BitSet;
///
/// /// Marks blocks reachable from the entry.
/// struct Reachable;
///
/// impl DataFlowAnalysis for Reachable {
///     type Lattice = BitSet;
///     const DIRECTION: Direction = Direction::Forward;
///
///     fn boundary(&self, _cfg: &ControlFlowGraph) -> BitSet {
///         let mut set = BitSet::new(1);
///         set.insert(0);
///         set
///     }
///
///     fn initial(&self, _cfg: &ControlFlowGraph) -> BitSet {
///         BitSet::new(1)
///     }
///
///     fn transfer(&self, _block_id: usize, _block: &BasicBlock, input: &BitSet) -> BitSet {
///         input.clone()
///     }
/// }
/// ```
pub trait DataFlowAnalysis {
    /// The lattice type for this analysis.
    type Lattice: MeetSemiLattice;

    /// The direction of this analysis.
    const DIRECTION: Direction;

    /// Returns the value at the boundary of the function.
    ///
    /// For forward analyses, this is the input of the entry block. For backward
    /// analyses, this is the output of every exit block.
    fn boundary(&self, cfg: &ControlFlowGraph) -> Self::Lattice;

    /// Returns the value every other block starts from.
    fn initial(&self, cfg: &ControlFlowGraph) -> Self::Lattice;

    /// Computes the effect of flowing through one block.
    ///
    /// # Arguments
    ///
    /// * `block_id` - The index of the block being processed
    /// * `block` - The block itself
    /// * `input` - The state flowing into (forward) or out of (backward) the block
    fn transfer(&self, block_id: usize, block: &BasicBlock, input: &Self::Lattice)
        -> Self::Lattice;
}

/// Results of a data flow analysis.
///
/// States are stored by block index and can also be looked up by block name.
#[derive(Debug, Clone)]
pub struct AnalysisResults<L> {
    /// Block names, by index.
    names: Vec<String>,
    /// Input state for each block.
    in_states: Vec<L>,
    /// Output state for each block.
    out_states: Vec<L>,
    /// Number of blocks the solver processed before reaching the fixed point.
    iterations: usize,
}

impl<L> AnalysisResults<L> {
    /// Creates new analysis results.
    #[must_use]
    pub fn new(names: Vec<String>, in_states: Vec<L>, out_states: Vec<L>, iterations: usize) -> Self {
        Self {
            names,
            in_states,
            out_states,
            iterations,
        }
    }

    /// Returns the input state for a block index.
    #[must_use]
    pub fn in_state(&self, block: usize) -> Option<&L> {
        self.in_states.get(block)
    }

    /// Returns the output state for a block index.
    #[must_use]
    pub fn out_state(&self, block: usize) -> Option<&L> {
        self.out_states.get(block)
    }

    /// Returns the input state of the block named `name`.
    #[must_use]
    pub fn in_of(&self, name: &str) -> Option<&L> {
        self.position(name).and_then(|idx| self.in_state(idx))
    }

    /// Returns the output state of the block named `name`.
    #[must_use]
    pub fn out_of(&self, name: &str) -> Option<&L> {
        self.position(name).and_then(|idx| self.out_state(idx))
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Returns the number of blocks.
    #[must_use]
    pub fn block_count(&self) -> usize {
        self.names.len()
    }

    /// Returns how many times a block was taken off the worklist.
    #[must_use]
    pub const fn iterations(&self) -> usize {
        self.iterations
    }

    /// Iterates `(name, in, out)` in block order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &L, &L)> {
        self.names
            .iter()
            .zip(self.in_states.iter().zip(&self.out_states))
            .map(|(name, (input, output))| (name.as_str(), input, output))
    }
}
