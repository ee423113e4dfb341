//! Worklist-based data flow solver.
//!
//! # Algorithm
//!
//! 1. Initialize all blocks with the initial value
//! 2. Set the boundary value at the entry (forward) or the exits (backward)
//! 3. Put every block on the worklist, in the configured [`WorklistOrder`]
//! 4. While the worklist is non-empty:
//!    a. Remove the block at the front
//!    b. Compute its input by meeting the values of its predecessors (successors)
//!    c. Apply the transfer function to get the output
//!    d. If the output changed, append every affected block not already queued
//!
//! The order only changes how many blocks are processed, never the fixed point. For
//! the set lattices used here each block output can grow at most once per variable,
//! so the solver processes at most `blocks * (variables + 1)` blocks plus the
//! number of edges.

use std::collections::VecDeque;

use log::debug;

use crate::analysis::{
    dataflow::{
        framework::{AnalysisResults, DataFlowAnalysis, Direction},
        lattice::MeetSemiLattice,
    },
    ControlFlowGraph,
};

/// The order in which blocks are first placed on the worklist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WorklistOrder {
    /// Blocks in source order (reverse source order for backward analyses).
    #[default]
    SourceOrder,
    /// Reverse postorder from the entry (postorder for backward analyses), followed
    /// by unreachable blocks in source order. Usually converges in fewer steps.
    ReversePostorder,
}

/// Worklist-based data flow solver.
///
/// # Usage
///
/// ```rust
/// use irflow::analysis::{
///     ControlFlowGraph, DataFlowSolver, ReachingDefinitions, VariableIndex,
/// };
/// use irflow::ir::{Instruction, Type, ValueOp};
///
/// let instrs = vec![
///     Instruction::value(ValueOp::Add, "b", Type::Int, ["a", "a"]),
///     Instruction::ret(Some("b")),
/// ];
/// let params = vec!["a".to_string()];
///
/// let cfg = ControlFlowGraph::build(&instrs)?;
/// let variables = VariableIndex::new(&params, &cfg);
/// let analysis = ReachingDefinitions::new(&cfg, &variables, &params);
/// let results = DataFlowSolver::new(analysis).solve(&cfg);
///
/// let out = results.out_of("b1").unwrap();
/// assert_eq!(out.count(), 2);
/// # Ok::<(), irflow::Error>(())
/// ```
pub struct DataFlowSolver<A: DataFlowAnalysis> {
    /// The analysis being solved.
    analysis: A,
    /// Initial worklist order.
    order: WorklistOrder,
    /// Input state for each block.
    in_states: Vec<A::Lattice>,
    /// Output state for each block.
    out_states: Vec<A::Lattice>,
    /// Worklist of blocks to process.
    worklist: VecDeque<usize>,
    /// Whether each block is currently in the worklist.
    in_worklist: Vec<bool>,
    /// Blocks whose boundary value is pinned.
    pinned: Vec<bool>,
    /// Number of blocks processed.
    iterations: usize,
}

impl<A: DataFlowAnalysis> DataFlowSolver<A> {
    /// Creates a new solver for the given analysis.
    #[must_use]
    pub fn new(analysis: A) -> Self {
        Self {
            analysis,
            order: WorklistOrder::default(),
            in_states: Vec::new(),
            out_states: Vec::new(),
            worklist: VecDeque::new(),
            in_worklist: Vec::new(),
            pinned: Vec::new(),
            iterations: 0,
        }
    }

    /// Sets the initial worklist order.
    #[must_use]
    pub fn with_order(mut self, order: WorklistOrder) -> Self {
        self.order = order;
        self
    }

    /// Solves the analysis to a fixed point.
    pub fn solve(mut self, cfg: &ControlFlowGraph) -> AnalysisResults<A::Lattice> {
        let names: Vec<String> = cfg.blocks().names().map(str::to_string).collect();
        if names.is_empty() {
            return AnalysisResults::new(names, Vec::new(), Vec::new(), 0);
        }

        self.initialize(cfg);
        self.iterate(cfg);

        debug!(
            "{:?} data flow converged after {} block visits over {} blocks",
            A::DIRECTION,
            self.iterations,
            names.len()
        );

        AnalysisResults::new(names, self.in_states, self.out_states, self.iterations)
    }

    fn initialize(&mut self, cfg: &ControlFlowGraph) {
        let num_blocks = cfg.block_count();
        let initial = self.analysis.initial(cfg);
        let boundary = self.analysis.boundary(cfg);

        self.in_states = vec![initial.clone(); num_blocks];
        self.out_states = vec![initial; num_blocks];
        self.in_worklist = vec![false; num_blocks];
        self.pinned = vec![false; num_blocks];

        match A::DIRECTION {
            Direction::Forward => {
                // The entry has no predecessors, so its input stays the boundary
                self.in_states[0] = boundary.clone();
                self.out_states[0] = boundary;
                self.pinned[0] = true;
            }
            Direction::Backward => {
                for exit in cfg.exits() {
                    self.out_states[exit] = boundary.clone();
                    self.in_states[exit] = boundary.clone();
                    self.pinned[exit] = true;
                }
            }
        }

        for idx in self.initial_order(cfg) {
            self.enqueue(idx);
        }
    }

    fn initial_order(&self, cfg: &ControlFlowGraph) -> Vec<usize> {
        let num_blocks = cfg.block_count();
        let mut order = match self.order {
            WorklistOrder::SourceOrder => (0..num_blocks).collect(),
            WorklistOrder::ReversePostorder => match A::DIRECTION {
                Direction::Forward => cfg.reverse_postorder(),
                Direction::Backward => {
                    let mut order = cfg.reverse_postorder();
                    order.reverse();
                    order
                }
            },
        };

        if self.order == WorklistOrder::SourceOrder && A::DIRECTION == Direction::Backward {
            order.reverse();
        }

        // Blocks unreachable from the entry still need a state
        let mut seen = vec![false; num_blocks];
        for &idx in &order {
            seen[idx] = true;
        }
        order.extend((0..num_blocks).filter(|&idx| !seen[idx]));
        order
    }

    fn enqueue(&mut self, idx: usize) {
        if idx < self.in_worklist.len() && !self.in_worklist[idx] {
            self.worklist.push_back(idx);
            self.in_worklist[idx] = true;
        }
    }

    fn iterate(&mut self, cfg: &ControlFlowGraph) {
        while let Some(block_idx) = self.worklist.pop_front() {
            self.in_worklist[block_idx] = false;
            self.iterations += 1;

            let changed = match A::DIRECTION {
                Direction::Forward => self.process_forward(block_idx, cfg),
                Direction::Backward => self.process_backward(block_idx, cfg),
            };

            if changed {
                let affected = match A::DIRECTION {
                    Direction::Forward => cfg.successors(block_idx),
                    Direction::Backward => cfg.predecessors(block_idx),
                };
                for &idx in affected {
                    self.enqueue(idx);
                }
            }
        }
    }

    /// Processes a block in forward direction.
    ///
    /// Returns `true` if the output state changed.
    fn process_forward(&mut self, block_idx: usize, cfg: &ControlFlowGraph) -> bool {
        if !self.pinned[block_idx] {
            if let Some(input) = meet_all(cfg.predecessors(block_idx), &self.out_states) {
                self.in_states[block_idx] = input;
            }
        }

        let Some(block) = cfg.block(block_idx) else {
            return false;
        };
        let output = self
            .analysis
            .transfer(block_idx, block, &self.in_states[block_idx]);

        let changed = output != self.out_states[block_idx];
        self.out_states[block_idx] = output;
        changed
    }

    /// Processes a block in backward direction.
    ///
    /// Returns `true` if the input state changed.
    fn process_backward(&mut self, block_idx: usize, cfg: &ControlFlowGraph) -> bool {
        if !self.pinned[block_idx] {
            if let Some(output) = meet_all(cfg.successors(block_idx), &self.in_states) {
                self.out_states[block_idx] = output;
            }
        }

        let Some(block) = cfg.block(block_idx) else {
            return false;
        };
        let input = self
            .analysis
            .transfer(block_idx, block, &self.out_states[block_idx]);

        let changed = input != self.in_states[block_idx];
        self.in_states[block_idx] = input;
        changed
    }
}

/// Meets the states of `neighbours`; `None` if there are none.
fn meet_all<L: MeetSemiLattice>(neighbours: &[usize], states: &[L]) -> Option<L> {
    neighbours
        .iter()
        .filter_map(|&idx| states.get(idx))
        .fold(None, |acc: Option<L>, state| {
            Some(match acc {
                None => state.clone(),
                Some(acc) => acc.meet(state),
            })
        })
}
