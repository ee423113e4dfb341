//! Control flow edges between named blocks.
//!
//! Edges are derived from the terminators of a [`BlockMap`]: a `jmp` contributes one
//! unconditional edge, a `br` a true and a false edge, and a `ret` (or a final block
//! without terminator) none. Predecessor and successor lists are kept as exact
//! transposes of each other.

use crate::{
    analysis::cfg::BlockMap,
    ir::{EffectOp, Instruction},
    Error, Result,
};

/// The kind of control flow represented by an edge.
///
/// # Examples
///
/// ```rust
/// use irflow::analysis::CfgEdgeKind;
///
/// assert!(CfgEdgeKind::ConditionalFalse.is_conditional());
/// assert!(!CfgEdgeKind::Unconditional.is_conditional());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CfgEdgeKind {
    /// `jmp`, including jumps materialized for fall-through.
    Unconditional,
    /// The first target of a `br`, taken when the condition is true.
    ConditionalTrue,
    /// The second target of a `br`.
    ConditionalFalse,
}

impl CfgEdgeKind {
    /// Returns `true` for the two edges of a `br`.
    #[must_use]
    pub const fn is_conditional(self) -> bool {
        matches!(self, Self::ConditionalTrue | Self::ConditionalFalse)
    }
}

/// An edge in the control flow graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CfgEdge {
    /// The source block index.
    source: usize,
    /// The target block index.
    target: usize,
    /// The kind of control flow this edge represents.
    kind: CfgEdgeKind,
}

impl CfgEdge {
    /// Creates a new CFG edge.
    #[must_use]
    pub const fn new(source: usize, target: usize, kind: CfgEdgeKind) -> Self {
        Self {
            source,
            target,
            kind,
        }
    }

    /// Returns the source block index of this edge.
    #[must_use]
    pub const fn source(&self) -> usize {
        self.source
    }

    /// Returns the target block index of this edge.
    #[must_use]
    pub const fn target(&self) -> usize {
        self.target
    }

    /// Returns the kind of control flow this edge represents.
    #[must_use]
    pub const fn kind(&self) -> CfgEdgeKind {
        self.kind
    }
}

/// Predecessor and successor lists for every block of a [`BlockMap`].
///
/// Blocks are referred to by their position in the map. A `br` whose two targets are
/// the same block yields a single successor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Edges {
    edges: Vec<CfgEdge>,
    predecessors: Vec<Vec<usize>>,
    successors: Vec<Vec<usize>>,
}

impl Edges {
    /// Computes the edges of `blocks` from their terminators.
    ///
    /// Only the last instruction of a block is consulted. Run
    /// [`BlockMap::add_terminators`] first if fall-through should produce edges.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedControlFlow`] if a terminator targets a name that is
    /// not a block of the map.
    pub fn compute(blocks: &BlockMap) -> Result<Self> {
        let mut edges = Self {
            edges: Vec::new(),
            predecessors: vec![Vec::new(); blocks.len()],
            successors: vec![Vec::new(); blocks.len()],
        };

        for (source, block) in blocks.iter().enumerate() {
            let Some(terminator) = block.terminator() else {
                continue;
            };

            for (slot, target_name) in terminator.labels().iter().enumerate() {
                let target =
                    blocks
                        .position(target_name)
                        .ok_or_else(|| Error::MalformedControlFlow {
                            block: block.name().to_string(),
                            target: target_name.clone(),
                        })?;
                edges.connect(source, target, edge_kind(terminator, slot));
            }
        }

        Ok(edges)
    }

    fn connect(&mut self, source: usize, target: usize, kind: CfgEdgeKind) {
        if self.successors[source].contains(&target) {
            return;
        }
        self.successors[source].push(target);
        self.predecessors[target].push(source);
        self.edges.push(CfgEdge::new(source, target, kind));
    }

    /// Returns the number of blocks covered.
    #[must_use]
    pub fn block_count(&self) -> usize {
        self.successors.len()
    }

    /// Returns all edges, grouped by source block in block order.
    #[must_use]
    pub fn edges(&self) -> &[CfgEdge] {
        &self.edges
    }

    /// Returns the edges leaving block `idx`.
    pub fn outgoing(&self, idx: usize) -> impl Iterator<Item = &CfgEdge> {
        self.edges.iter().filter(move |edge| edge.source == idx)
    }

    /// Returns the predecessors of block `idx`.
    #[must_use]
    pub fn predecessors(&self, idx: usize) -> &[usize] {
        self.predecessors.get(idx).map_or(&[], Vec::as_slice)
    }

    /// Returns the successors of block `idx`, in terminator order.
    #[must_use]
    pub fn successors(&self, idx: usize) -> &[usize] {
        self.successors.get(idx).map_or(&[], Vec::as_slice)
    }

    /// Returns the blocks without successors.
    #[must_use]
    pub fn exits(&self) -> Vec<usize> {
        (0..self.block_count())
            .filter(|&idx| self.successors[idx].is_empty())
            .collect()
    }

    /// Returns the blocks reachable from `entry` in postorder.
    #[must_use]
    pub fn postorder(&self, entry: usize) -> Vec<usize> {
        let count = self.block_count();
        if entry >= count {
            return Vec::new();
        }

        let mut visited = vec![false; count];
        let mut order = Vec::with_capacity(count);
        // (node, index of the next successor to explore)
        let mut stack = vec![(entry, 0usize)];
        visited[entry] = true;

        while let Some((node, next)) = stack.last_mut() {
            let node = *node;
            if let Some(&succ) = self.successors[node].get(*next) {
                *next += 1;
                if !visited[succ] {
                    visited[succ] = true;
                    stack.push((succ, 0));
                }
            } else {
                order.push(node);
                stack.pop();
            }
        }

        order
    }

    /// Returns the blocks reachable from `entry` in reverse postorder.
    #[must_use]
    pub fn reverse_postorder(&self, entry: usize) -> Vec<usize> {
        let mut order = self.postorder(entry);
        order.reverse();
        order
    }
}

fn edge_kind(terminator: &Instruction, slot: usize) -> CfgEdgeKind {
    match (terminator.is_effect(EffectOp::Br), slot) {
        (true, 0) => CfgEdgeKind::ConditionalTrue,
        (true, _) => CfgEdgeKind::ConditionalFalse,
        (false, _) => CfgEdgeKind::Unconditional,
    }
}
