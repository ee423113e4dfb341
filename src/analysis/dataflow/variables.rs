//! Dense numbering of the variables of one function.

use std::collections::{BTreeSet, HashMap};

use crate::{analysis::ControlFlowGraph, utils::BitSet};

/// Maps variable names to dense indices for use in [`BitSet`]s.
///
/// The index covers parameters, every destination and every argument that appears in
/// the function. Names are numbered in sorted order, so iterating a set yields names
/// alphabetically.
#[derive(Debug, Clone, Default)]
pub struct VariableIndex {
    names: Vec<String>,
    positions: HashMap<String, usize>,
}

impl VariableIndex {
    /// Collects the variables of `params` and of every block of `cfg`.
    #[must_use]
    pub fn new(params: &[String], cfg: &ControlFlowGraph) -> Self {
        let mut all: BTreeSet<&str> = params.iter().map(String::as_str).collect();
        for block in cfg.blocks() {
            for instr in block.instructions() {
                all.extend(instr.dest());
                all.extend(instr.args().iter().map(String::as_str));
            }
        }

        let names: Vec<String> = all.into_iter().map(str::to_string).collect();
        let positions = names
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.clone(), idx))
            .collect();
        Self { names, positions }
    }

    /// Returns the number of variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns `true` if the function mentions no variables.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Returns the index of `name`.
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    /// Returns the name at `idx`.
    #[must_use]
    pub fn name(&self, idx: usize) -> Option<&str> {
        self.names.get(idx).map(String::as_str)
    }

    /// Returns an empty set sized for this index.
    #[must_use]
    pub fn empty_set(&self) -> BitSet {
        BitSet::new(self.names.len())
    }

    /// Builds the set of the given names. Unknown names are ignored.
    pub fn set_of<'a, I>(&self, names: I) -> BitSet
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut set = self.empty_set();
        for idx in names.into_iter().filter_map(|name| self.index_of(name)) {
            set.insert(idx);
        }
        set
    }

    /// Returns the names in `set`, sorted.
    #[must_use]
    pub fn names_of(&self, set: &BitSet) -> Vec<&str> {
        set.iter().filter_map(|idx| self.name(idx)).collect()
    }
}
