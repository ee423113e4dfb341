//! The control flow graph of one function.

use std::fmt::Write;

use log::debug;

use crate::{
    analysis::cfg::{BasicBlock, BlockMap, CfgEdgeKind, Edges},
    ir::Instruction,
    utils::escape_dot,
    Result,
};

/// A block map together with its edges.
///
/// The graph is built in a fixed order: form and name blocks, materialize
/// fall-through jumps, insert a dedicated entry block if the first block is a jump
/// target, then compute edges. The entry is always block `0` and is never the target
/// of an edge.
///
/// # Examples
///
/// ```rust
/// use irflow::analysis::ControlFlowGraph;
/// use irflow::ir::Instruction;
///
/// let instrs = vec![
///     Instruction::label("top"),
///     Instruction::br("c", "top", "done"),
///     Instruction::label("done"),
///     Instruction::ret(None),
/// ];
///
/// let cfg = ControlFlowGraph::build(&instrs)?;
/// assert_eq!(cfg.block_count(), 3);
/// assert_eq!(cfg.entry_block().map(|b| b.name()), Some("entry"));
/// assert_eq!(cfg.predecessor_names("top"), vec!["entry", "top"]);
/// # Ok::<(), irflow::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct ControlFlowGraph {
    blocks: BlockMap,
    edges: Edges,
}

impl ControlFlowGraph {
    /// Builds the graph of an instruction sequence.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::MalformedControlFlow`] if a jump or branch targets an
    /// unknown label, and [`crate::Error::Malformed`] if a label is defined twice.
    pub fn build(instrs: &[Instruction]) -> Result<Self> {
        let mut blocks = BlockMap::from_instructions(instrs)?;
        let added = blocks.add_terminators();
        let entry_added = blocks.add_entry();
        let edges = Edges::compute(&blocks)?;

        debug!(
            "Built CFG: {} blocks, {} edges, {} fall-through jumps, synthesized entry: {}",
            blocks.len(),
            edges.edges().len(),
            added,
            entry_added
        );

        Ok(Self { blocks, edges })
    }

    /// Computes the edges of an already prepared block map.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::MalformedControlFlow`] if a terminator targets an
    /// unknown block.
    pub fn from_block_map(blocks: BlockMap) -> Result<Self> {
        let edges = Edges::compute(&blocks)?;
        Ok(Self { blocks, edges })
    }

    /// Returns the block map.
    #[must_use]
    pub fn blocks(&self) -> &BlockMap {
        &self.blocks
    }

    /// Returns the edges.
    #[must_use]
    pub fn edges(&self) -> &Edges {
        &self.edges
    }

    /// Splits the graph into its block map and edges.
    #[must_use]
    pub fn into_parts(self) -> (BlockMap, Edges) {
        (self.blocks, self.edges)
    }

    /// Returns the number of blocks.
    #[must_use]
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Returns the entry block index, or `None` for an empty function.
    #[must_use]
    pub fn entry(&self) -> Option<usize> {
        (!self.blocks.is_empty()).then_some(0)
    }

    /// Returns the entry block.
    #[must_use]
    pub fn entry_block(&self) -> Option<&BasicBlock> {
        self.blocks.entry()
    }

    /// Returns the block at `idx`.
    #[must_use]
    pub fn block(&self, idx: usize) -> Option<&BasicBlock> {
        self.blocks.block(idx)
    }

    /// Returns the predecessors of block `idx`.
    #[must_use]
    pub fn predecessors(&self, idx: usize) -> &[usize] {
        self.edges.predecessors(idx)
    }

    /// Returns the successors of block `idx`.
    #[must_use]
    pub fn successors(&self, idx: usize) -> &[usize] {
        self.edges.successors(idx)
    }

    /// Returns the names of the predecessors of the block named `name`.
    ///
    /// Unknown names have no predecessors.
    #[must_use]
    pub fn predecessor_names(&self, name: &str) -> Vec<&str> {
        self.neighbour_names(name, Edges::predecessors)
    }

    /// Returns the names of the successors of the block named `name`.
    #[must_use]
    pub fn successor_names(&self, name: &str) -> Vec<&str> {
        self.neighbour_names(name, Edges::successors)
    }

    fn neighbour_names<'a>(
        &'a self,
        name: &str,
        select: fn(&'a Edges, usize) -> &'a [usize],
    ) -> Vec<&'a str> {
        let Some(idx) = self.blocks.position(name) else {
            return Vec::new();
        };
        select(&self.edges, idx)
            .iter()
            .filter_map(|&n| self.blocks.block(n))
            .map(BasicBlock::name)
            .collect()
    }

    /// Returns the blocks without successors.
    #[must_use]
    pub fn exits(&self) -> Vec<usize> {
        self.edges.exits()
    }

    /// Returns the blocks reachable from the entry in reverse postorder.
    #[must_use]
    pub fn reverse_postorder(&self) -> Vec<usize> {
        self.entry()
            .map_or_else(Vec::new, |entry| self.edges.reverse_postorder(entry))
    }

    /// Flattens the graph back into an instruction sequence.
    #[must_use]
    pub fn reassemble(&self) -> Vec<Instruction> {
        self.blocks.reassemble()
    }

    /// Renders the graph in Graphviz DOT format.
    ///
    /// Each block becomes a box listing its instructions. The entry is filled green,
    /// exits red; branch edges are labeled `true`/`false`.
    #[must_use]
    pub fn to_dot(&self, title: Option<&str>) -> String {
        let mut dot = String::new();

        dot.push_str("digraph CFG {\n");
        if let Some(name) = title {
            let _ = writeln!(dot, "    label=\"CFG: {}\";", escape_dot(name));
        }
        dot.push_str("    labelloc=t;\n");
        dot.push_str("    node [shape=box, fontname=\"Courier\", fontsize=10];\n");
        dot.push_str("    edge [fontname=\"Courier\", fontsize=9];\n\n");

        let exits = self.exits();
        for (idx, block) in self.blocks.iter().enumerate() {
            let is_entry = idx == 0;
            let is_exit = exits.contains(&idx);

            let mut label = escape_dot(block.name());
            if is_entry {
                label.push_str(" (entry)");
            }
            if is_exit {
                label.push_str(" (exit)");
            }
            label.push_str("\\l");
            for instr in block.instructions() {
                label.push_str(&escape_dot(&instr.to_string()));
                label.push_str("\\l");
            }

            let style = if is_entry {
                ", style=filled, fillcolor=lightgreen"
            } else if is_exit {
                ", style=filled, fillcolor=lightcoral"
            } else {
                ""
            };
            let _ = writeln!(dot, "    B{idx} [label=\"{label}\"{style}];");
        }

        dot.push('\n');

        for edge in self.edges.edges() {
            let (edge_label, color) = match edge.kind() {
                CfgEdgeKind::Unconditional => ("", "black"),
                CfgEdgeKind::ConditionalTrue => ("true", "green"),
                CfgEdgeKind::ConditionalFalse => ("false", "red"),
            };
            let _ = writeln!(
                dot,
                "    B{} -> B{} [label=\"{edge_label}\", color={color}];",
                edge.source(),
                edge.target()
            );
        }

        dot.push_str("}\n");
        dot
    }
}
