//! Live variable analysis.
//!
//! A variable is *live* at a program point if some path from that point reads it
//! before writing it.
//!
//! # Algorithm
//!
//! This is a backward data flow analysis:
//!
//! - `USE[B]` = variables read in B before any write in B
//! - `DEF[B]` = variables written in B
//! - `OUT[B]` = ∪{IN[S] | S is a successor of B}
//! - `IN[B]` = USE[B] ∪ (OUT[B] - DEF[B])
//!
//! Nothing is live after an exit block.

use crate::{
    analysis::{
        dataflow::{
            framework::{DataFlowAnalysis, Direction},
            variables::VariableIndex,
        },
        BasicBlock, ControlFlowGraph,
    },
    utils::BitSet,
};

/// Live variable analysis.
///
/// # Example
///
/// ```rust
/// use irflow::analysis::{ControlFlowGraph, DataFlowSolver, LiveVariables, VariableIndex};
/// use irflow::ir::Instruction;
///
/// let instrs = vec![
///     Instruction::id("x", None, "a"),
///     Instruction::print(["x"]),
/// ];
/// let cfg = ControlFlowGraph::build(&instrs)?;
/// let variables = VariableIndex::new(&[], &cfg);
///
/// let results = DataFlowSolver::new(LiveVariables::new(&cfg, &variables)).solve(&cfg);
/// let live_in = results.in_of("b1").unwrap();
/// assert_eq!(variables.names_of(live_in), vec!["a"]);
/// # Ok::<(), irflow::Error>(())
/// ```
pub struct LiveVariables {
    /// Number of variables in the function.
    num_vars: usize,
    /// USE sets for each block (variables used before definition).
    use_sets: Vec<BitSet>,
    /// DEF sets for each block (variables defined).
    def_sets: Vec<BitSet>,
}

impl LiveVariables {
    /// Creates the analysis for `cfg`.
    #[must_use]
    pub fn new(cfg: &ControlFlowGraph, variables: &VariableIndex) -> Self {
        let mut use_sets = Vec::with_capacity(cfg.block_count());
        let mut def_sets = Vec::with_capacity(cfg.block_count());

        for block in cfg.blocks() {
            let mut uses = variables.empty_set();
            let mut defs = variables.empty_set();

            for instr in block.instructions() {
                for idx in instr.args().iter().filter_map(|arg| variables.index_of(arg)) {
                    if !defs.contains(idx) {
                        uses.insert(idx);
                    }
                }
                if let Some(idx) = instr.dest().and_then(|dest| variables.index_of(dest)) {
                    defs.insert(idx);
                }
            }

            use_sets.push(uses);
            def_sets.push(defs);
        }

        Self {
            num_vars: variables.len(),
            use_sets,
            def_sets,
        }
    }
}

impl DataFlowAnalysis for LiveVariables {
    type Lattice = BitSet;
    const DIRECTION: Direction = Direction::Backward;

    fn boundary(&self, _cfg: &ControlFlowGraph) -> BitSet {
        BitSet::new(self.num_vars)
    }

    fn initial(&self, _cfg: &ControlFlowGraph) -> BitSet {
        BitSet::new(self.num_vars)
    }

    fn transfer(&self, block_id: usize, _block: &BasicBlock, output: &BitSet) -> BitSet {
        let mut live = output.clone();
        if let Some(defs) = self.def_sets.get(block_id) {
            live.difference_with(defs);
        }
        if let Some(uses) = self.use_sets.get(block_id) {
            live.union_with(uses);
        }
        live
    }
}
