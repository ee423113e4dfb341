//! Named basic blocks.

use std::fmt;

use crate::ir::Instruction;

/// A basic block identified by name.
///
/// The leading label of a source block is not stored as an instruction; it becomes the
/// block name and [`is_labeled`](Self::is_labeled) records that the name came from the
/// source. Blocks without a leading label get a synthesized name.
#[derive(Debug, Clone, PartialEq)]
pub struct BasicBlock {
    /// Block name (source label or synthesized).
    name: String,
    /// Whether the name was a label in the source.
    labeled: bool,
    /// Instructions, without the leading label.
    instructions: Vec<Instruction>,
}

impl BasicBlock {
    /// Creates a new block.
    #[must_use]
    pub fn new(name: impl Into<String>, labeled: bool, instructions: Vec<Instruction>) -> Self {
        Self {
            name: name.into(),
            labeled,
            instructions,
        }
    }

    /// Returns the block name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `true` if the block name is a label from the source program.
    #[must_use]
    pub const fn is_labeled(&self) -> bool {
        self.labeled
    }

    /// Returns the instructions of this block.
    #[must_use]
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Returns a mutable reference to the instructions.
    pub fn instructions_mut(&mut self) -> &mut Vec<Instruction> {
        &mut self.instructions
    }

    /// Returns the terminator, if the block ends with `jmp`, `br` or `ret`.
    #[must_use]
    pub fn terminator(&self) -> Option<&Instruction> {
        self.instructions.last().filter(|instr| instr.is_terminator())
    }

    /// Returns `true` if the block ends with a control transfer.
    #[must_use]
    pub fn has_terminator(&self) -> bool {
        self.terminator().is_some()
    }

    /// Returns the index at which code must be inserted to run last before the
    /// terminator (the block length if there is no terminator).
    #[must_use]
    pub fn end_position(&self) -> usize {
        if self.has_terminator() {
            self.instructions.len() - 1
        } else {
            self.instructions.len()
        }
    }

    /// Returns the names of the blocks the terminator may transfer control to.
    #[must_use]
    pub fn successor_names(&self) -> &[String] {
        self.terminator().map_or(&[], Instruction::labels)
    }

    /// Returns the destination of every instruction, in order.
    pub fn definitions(&self) -> impl Iterator<Item = &str> {
        self.instructions.iter().filter_map(Instruction::dest)
    }
}

impl fmt::Display for BasicBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, ".{}:", self.name)?;
        for instr in &self.instructions {
            writeln!(f, "  {instr}")?;
        }
        Ok(())
    }
}
