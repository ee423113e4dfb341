//! Reaching definitions analysis.
//!
//! Computes, for each block, which variables may have been assigned along some path
//! reaching the start (IN) and the end (OUT) of the block.
//!
//! # Algorithm
//!
//! For each block B:
//! - `DEFS[B]` = variables assigned by some instruction in B
//! - `IN[B]` = ∪{OUT[P] | P is a predecessor of B}
//! - `OUT[B]` = DEFS[B] ∪ IN[B]
//!
//! Redefinitions do not kill: once a variable reaches a point it keeps reaching
//! everything downstream. The entry block starts with the function parameters.

use std::fmt;

use serde::Serialize;

use crate::{
    analysis::{
        dataflow::{
            framework::{AnalysisResults, DataFlowAnalysis, Direction},
            lattice::MeetSemiLattice,
            solver::{DataFlowSolver, WorklistOrder},
            variables::VariableIndex,
        },
        BasicBlock, ControlFlowGraph,
    },
    ir::Function,
    utils::BitSet,
    Result,
};

/// Reaching definitions analysis.
///
/// # Example
///
/// ```rust
/// use irflow::analysis::{ControlFlowGraph, DataFlowSolver, ReachingDefinitions, VariableIndex};
/// use irflow::ir::{Instruction, Type, ValueOp};
///
/// let instrs = vec![
///     Instruction::value(ValueOp::Add, "b", Type::Int, ["a", "a"]),
///     Instruction::ret(None),
/// ];
/// let params = vec!["a".to_string()];
/// let cfg = ControlFlowGraph::build(&instrs)?;
/// let variables = VariableIndex::new(&params, &cfg);
///
/// let results = DataFlowSolver::new(ReachingDefinitions::new(&cfg, &variables, &params))
///     .solve(&cfg);
///
/// let b = variables.index_of("b").unwrap();
/// assert!(!results.in_of("b1").unwrap().reaches(b));
/// assert!(results.out_of("b1").unwrap().reaches(b));
/// # Ok::<(), irflow::Error>(())
/// ```
pub struct ReachingDefinitions {
    /// Number of variables in the function.
    num_vars: usize,
    /// Parameters, reaching the entry.
    params: BitSet,
    /// Variables defined in each block.
    gen_sets: Vec<BitSet>,
}

impl ReachingDefinitions {
    /// Creates the analysis for `cfg`, with `params` reaching the entry.
    #[must_use]
    pub fn new(cfg: &ControlFlowGraph, variables: &VariableIndex, params: &[String]) -> Self {
        let gen_sets = cfg
            .blocks()
            .iter()
            .map(|block| variables.set_of(block.definitions()))
            .collect();

        Self {
            num_vars: variables.len(),
            params: variables.set_of(params.iter().map(String::as_str)),
            gen_sets,
        }
    }
}

impl DataFlowAnalysis for ReachingDefinitions {
    type Lattice = ReachingDefsResult;
    const DIRECTION: Direction = Direction::Forward;

    fn boundary(&self, _cfg: &ControlFlowGraph) -> Self::Lattice {
        ReachingDefsResult {
            defs: self.params.clone(),
        }
    }

    fn initial(&self, _cfg: &ControlFlowGraph) -> Self::Lattice {
        ReachingDefsResult::new(self.num_vars)
    }

    fn transfer(
        &self,
        block_id: usize,
        _block: &BasicBlock,
        input: &Self::Lattice,
    ) -> Self::Lattice {
        let mut defs = input.defs.clone();
        if let Some(gen) = self.gen_sets.get(block_id) {
            defs.union_with(gen);
        }
        ReachingDefsResult { defs }
    }
}

/// The set of variables reaching one program point.
#[derive(Debug, Clone, PartialEq)]
pub struct ReachingDefsResult {
    /// Bit vector of reaching variables, indexed by [`VariableIndex`].
    defs: BitSet,
}

impl ReachingDefsResult {
    /// Creates a new empty result.
    #[must_use]
    pub fn new(num_vars: usize) -> Self {
        Self {
            defs: BitSet::new(num_vars),
        }
    }

    /// Returns `true` if the variable with index `var` reaches this point.
    #[must_use]
    pub fn reaches(&self, var: usize) -> bool {
        self.defs.contains(var)
    }

    /// Returns the indices of all reaching variables.
    pub fn definitions(&self) -> impl Iterator<Item = usize> + '_ {
        self.defs.iter()
    }

    /// Returns the underlying set.
    #[must_use]
    pub fn as_bitset(&self) -> &BitSet {
        &self.defs
    }

    /// Returns the number of reaching variables.
    #[must_use]
    pub fn count(&self) -> usize {
        self.defs.count()
    }

    /// Returns `true` if nothing reaches this point.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// Adds a variable to the reaching set.
    pub fn add(&mut self, var: usize) {
        if var < self.defs.len() {
            self.defs.insert(var);
        }
    }

    /// Removes a variable from the reaching set.
    pub fn remove(&mut self, var: usize) {
        if var < self.defs.len() {
            self.defs.remove(var);
        }
    }
}

impl MeetSemiLattice for ReachingDefsResult {
    fn meet(&self, other: &Self) -> Self {
        Self {
            defs: self.defs.meet(&other.defs),
        }
    }

    fn is_bottom(&self) -> bool {
        self.defs.is_bottom()
    }
}

/// IN and OUT of one block, as sorted variable names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockFacts {
    /// Block name.
    pub name: String,
    /// Variables reaching the start of the block.
    #[serde(rename = "in")]
    pub input: Vec<String>,
    /// Variables reaching the end of the block.
    #[serde(rename = "out")]
    pub output: Vec<String>,
}

/// Reaching definitions of a whole function, by block name.
///
/// The [`Display`](fmt::Display) rendering lists each block with its `in:` and `out:`
/// sets and prints `∅` for an empty set:
///
/// ```text
/// b1:
///   in:  a
///   out: a, b
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReachingReport {
    blocks: Vec<BlockFacts>,
}

impl ReachingReport {
    /// Converts solver results into names.
    #[must_use]
    pub fn new(results: &AnalysisResults<ReachingDefsResult>, variables: &VariableIndex) -> Self {
        let names = |state: &ReachingDefsResult| -> Vec<String> {
            variables
                .names_of(state.as_bitset())
                .into_iter()
                .map(str::to_string)
                .collect()
        };

        let blocks = results
            .iter()
            .map(|(name, input, output)| BlockFacts {
                name: name.to_string(),
                input: names(input),
                output: names(output),
            })
            .collect();
        Self { blocks }
    }

    /// Returns the facts of every block, in block order.
    #[must_use]
    pub fn blocks(&self) -> &[BlockFacts] {
        &self.blocks
    }

    /// Returns the facts of the block named `name`.
    #[must_use]
    pub fn block(&self, name: &str) -> Option<&BlockFacts> {
        self.blocks.iter().find(|facts| facts.name == name)
    }

    /// Returns the variables reaching the start of block `name`.
    #[must_use]
    pub fn in_of(&self, name: &str) -> Option<&[String]> {
        self.block(name).map(|facts| facts.input.as_slice())
    }

    /// Returns the variables reaching the end of block `name`.
    #[must_use]
    pub fn out_of(&self, name: &str) -> Option<&[String]> {
        self.block(name).map(|facts| facts.output.as_slice())
    }
}

impl fmt::Display for ReachingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn list(names: &[String]) -> String {
            if names.is_empty() {
                "∅".to_string()
            } else {
                names.join(", ")
            }
        }

        for facts in &self.blocks {
            writeln!(f, "{}:", facts.name)?;
            writeln!(f, "  in:  {}", list(&facts.input))?;
            writeln!(f, "  out: {}", list(&facts.output))?;
        }
        Ok(())
    }
}

/// Runs reaching definitions on `function` in source worklist order.
///
/// # Errors
///
/// Fails if the control flow graph of the function cannot be built.
pub fn reaching_definitions(function: &Function) -> Result<ReachingReport> {
    reaching_definitions_with(function, WorklistOrder::default())
}

/// Runs reaching definitions on `function` with the given worklist order.
///
/// # Errors
///
/// Fails if the control flow graph of the function cannot be built.
pub fn reaching_definitions_with(function: &Function, order: WorklistOrder) -> Result<ReachingReport> {
    let cfg = ControlFlowGraph::build(&function.instrs)?;
    let params: Vec<String> = function.arg_names().map(str::to_string).collect();
    let variables = VariableIndex::new(&params, &cfg);

    let results = DataFlowSolver::new(ReachingDefinitions::new(&cfg, &variables, &params))
        .with_order(order)
        .solve(&cfg);
    Ok(ReachingReport::new(&results, &variables))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Argument, Instruction, Type, ValueOp};

    #[test]
    fn test_reaching_defs_result() {
        let mut result = ReachingDefsResult::new(10);
        assert!(result.is_empty());

        result.add(0);
        result.add(5);
        result.add(42);

        assert_eq!(result.count(), 2);
        assert!(result.reaches(5));
        assert!(!result.reaches(1));
        assert_eq!(result.definitions().collect::<Vec<_>>(), vec![0, 5]);

        result.remove(0);
        assert!(!result.reaches(0));
    }

    #[test]
    fn test_reaching_defs_meet() {
        let mut a = ReachingDefsResult::new(4);
        let mut b = ReachingDefsResult::new(4);
        a.add(0);
        a.add(1);
        b.add(1);
        b.add(2);

        let result = a.meet(&b);
        assert_eq!(result.definitions().collect::<Vec<_>>(), vec![0, 1, 2]);
    }

    #[test]
    fn test_redefinition_does_not_kill() {
        let function = Function::new(
            "main",
            vec![Argument::new("x", Type::Int)],
            vec![
                Instruction::value(ValueOp::Add, "x", Type::Int, ["x", "x"]),
                Instruction::jmp("next"),
                Instruction::label("next"),
                Instruction::value(ValueOp::Add, "x", Type::Int, ["x", "x"]),
                Instruction::ret(Some("x")),
            ],
        );
        let report = reaching_definitions(&function).unwrap();
        assert_eq!(report.in_of("next"), Some(["x".to_string()].as_slice()));
        assert_eq!(report.out_of("next"), Some(["x".to_string()].as_slice()));
    }

    #[test]
    fn test_display_marks_empty_sets() {
        let function = Function::new(
            "main",
            vec![],
            vec![Instruction::value(ValueOp::Add, "b", Type::Int, ["a", "a"])],
        );
        let report = reaching_definitions(&function).unwrap();
        assert_eq!(report.to_string(), "b1:\n  in:  ∅\n  out: b\n");
    }
}
