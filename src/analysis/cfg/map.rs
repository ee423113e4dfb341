//! The insertion-ordered block map and its structural rewrites.

use std::collections::{HashMap, HashSet};

use log::debug;

use crate::{
    analysis::cfg::{form_blocks, BasicBlock},
    ir::Instruction,
    utils::NameGenerator,
    Result,
};

/// Prefix of synthesized names for unlabeled blocks.
const BLOCK_PREFIX: &str = "b";

/// Preferred name of a synthesized entry block.
const ENTRY_NAME: &str = "entry";

/// Basic blocks of one function, keyed by name, in source order.
///
/// The first block is the entry. Names are unique. A `BlockMap` is built fresh for
/// every transformation and consumed when the result is flattened back with
/// [`reassemble`](Self::reassemble).
#[derive(Debug, Clone, Default)]
pub struct BlockMap {
    blocks: Vec<BasicBlock>,
    index: HashMap<String, usize>,
}

impl BlockMap {
    /// Forms the blocks of `instrs` and names them.
    ///
    /// A block that opens with a label takes the label as its name and the label
    /// instruction is dropped from its body. Every other block is named `b1`, `b2`, ...
    /// in source order, skipping names that the function already uses as labels or
    /// jump targets.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Malformed`] if two blocks carry the same label.
    pub fn from_instructions(instrs: &[Instruction]) -> Result<Self> {
        let mut names = NameGenerator::new(referenced_names(instrs));
        let mut map = Self::default();

        for block in form_blocks(instrs) {
            let (name, labeled, body) = match block.split_first() {
                Some((first, rest)) if first.is_label() => {
                    let label = first.as_label().unwrap_or_default().to_string();
                    (label, true, rest)
                }
                _ => (names.fresh(BLOCK_PREFIX), false, block),
            };

            if map.index.contains_key(&name) {
                return Err(malformed_error!("Label '{}' is defined more than once", name));
            }
            map.index.insert(name.clone(), map.blocks.len());
            map.blocks.push(BasicBlock::new(name, labeled, body.to_vec()));
        }

        debug!("Formed {} blocks", map.blocks.len());
        Ok(map)
    }

    /// Returns the number of blocks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Returns `true` if the map holds no blocks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Returns the entry block.
    #[must_use]
    pub fn entry(&self) -> Option<&BasicBlock> {
        self.blocks.first()
    }

    /// Returns the block at `idx` in iteration order.
    #[must_use]
    pub fn block(&self, idx: usize) -> Option<&BasicBlock> {
        self.blocks.get(idx)
    }

    /// Returns the block at `idx` for modification.
    ///
    /// Only the instructions of a block can be changed this way; its name is fixed.
    pub fn block_mut(&mut self, idx: usize) -> Option<&mut BasicBlock> {
        self.blocks.get_mut(idx)
    }

    /// Returns the block named `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&BasicBlock> {
        self.position(name).and_then(|idx| self.blocks.get(idx))
    }

    /// Returns the position of the block named `name` in iteration order.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Returns `true` if a block named `name` exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Iterates the blocks in order.
    pub fn iter(&self) -> std::slice::Iter<'_, BasicBlock> {
        self.blocks.iter()
    }

    /// Iterates the blocks in order, mutably.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, BasicBlock> {
        self.blocks.iter_mut()
    }

    /// Iterates the block names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.blocks.iter().map(BasicBlock::name)
    }

    /// Makes fall-through explicit.
    ///
    /// Every block except the last that does not end in `jmp`, `br` or `ret` gets a
    /// `jmp` to the block that follows it. The last block is left alone. Returns the
    /// number of jumps inserted.
    pub fn add_terminators(&mut self) -> usize {
        let mut added = 0;
        for idx in 1..self.blocks.len() {
            let next = self.blocks[idx].name().to_string();
            let block = &mut self.blocks[idx - 1];
            if !block.has_terminator() {
                block.instructions_mut().push(Instruction::jmp(next));
                added += 1;
            }
        }
        added
    }

    /// Guarantees that the entry block is not a jump target.
    ///
    /// If any instruction targets the first block, a new empty block named `entry`
    /// (or `entry1`, ... if taken) that jumps to the old first block is put in front of
    /// it. Returns `true` if a block was inserted.
    pub fn add_entry(&mut self) -> bool {
        let Some(first) = self.blocks.first() else {
            return false;
        };

        let targeted = self
            .blocks
            .iter()
            .flat_map(|block| block.instructions().iter())
            .flat_map(|instr| instr.labels().iter())
            .any(|label| label == first.name());
        if !targeted {
            return false;
        }

        let mut taken: HashSet<String> = self.index.keys().cloned().collect();
        for block in &self.blocks {
            for instr in block.instructions() {
                taken.extend(instr.labels().iter().cloned());
            }
        }
        let name = NameGenerator::new(taken).fresh_exact(ENTRY_NAME);
        let entry = BasicBlock::new(
            name.clone(),
            false,
            vec![Instruction::jmp(first.name())],
        );
        debug!("Inserting entry block '{}' ahead of '{}'", name, first.name());

        self.blocks.insert(0, entry);
        self.reindex();
        true
    }

    /// Flattens the map back into one instruction sequence.
    ///
    /// A block whose name came from a source label always gets its label back. A block
    /// with a synthesized name gets a label only when some instruction targets it.
    #[must_use]
    pub fn reassemble(&self) -> Vec<Instruction> {
        let referenced: HashSet<&str> = self
            .blocks
            .iter()
            .flat_map(|block| block.instructions().iter())
            .flat_map(|instr| instr.labels().iter().map(String::as_str))
            .collect();

        let mut instrs = Vec::with_capacity(
            self.blocks.iter().map(|b| b.instructions().len() + 1).sum(),
        );
        for block in &self.blocks {
            if block.is_labeled() || referenced.contains(block.name()) {
                instrs.push(Instruction::label(block.name()));
            }
            instrs.extend(block.instructions().iter().cloned());
        }
        instrs
    }

    fn reindex(&mut self) {
        self.index = self
            .blocks
            .iter()
            .enumerate()
            .map(|(idx, block)| (block.name().to_string(), idx))
            .collect();
    }
}

impl<'a> IntoIterator for &'a BlockMap {
    type Item = &'a BasicBlock;
    type IntoIter = std::slice::Iter<'a, BasicBlock>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.iter()
    }
}

/// Every label defined or targeted anywhere in `instrs`.
fn referenced_names(instrs: &[Instruction]) -> HashSet<String> {
    let mut names = HashSet::new();
    for instr in instrs {
        if let Some(label) = instr.as_label() {
            names.insert(label.to_string());
        }
        names.extend(instr.labels().iter().cloned());
    }
    names
}
