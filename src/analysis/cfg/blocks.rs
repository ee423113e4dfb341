//! Splitting a flat instruction stream into basic blocks.

use std::iter::FusedIterator;

use crate::ir::Instruction;

/// Lazy iterator over the basic blocks of an instruction sequence.
///
/// Each item borrows a contiguous slice of the input, so concatenating the items gives
/// back the original sequence. The iterator is [`Clone`]; cloning it (or calling
/// [`form_blocks`] again) restarts the partition at no cost.
#[derive(Debug, Clone)]
pub struct Blocks<'a> {
    remaining: &'a [Instruction],
}

impl<'a> Iterator for Blocks<'a> {
    type Item = &'a [Instruction];

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining.is_empty() {
            return None;
        }

        let mut end = self.remaining.len();
        for (idx, instr) in self.remaining.iter().enumerate() {
            // A label opens a new block unless it already opens this one
            if instr.is_label() && idx > 0 {
                end = idx;
                break;
            }
            if instr.is_terminator() {
                end = idx + 1;
                break;
            }
        }

        let (block, rest) = self.remaining.split_at(end);
        self.remaining = rest;
        Some(block)
    }
}

impl FusedIterator for Blocks<'_> {}

/// Partitions `instrs` into basic blocks.
///
/// A new block starts at every label, and every `jmp`, `br` or `ret` ends the block it
/// belongs to. A block consisting of nothing but a label is legal.
///
/// # Examples
///
/// ```rust
/// use irflow::analysis::form_blocks;
/// use irflow::ir::Instruction;
///
/// let instrs = vec![
///     Instruction::print(["a"]),
///     Instruction::jmp("L"),
///     Instruction::label("L"),
///     Instruction::ret(None),
/// ];
///
/// let blocks: Vec<_> = form_blocks(&instrs).collect();
/// assert_eq!(blocks.len(), 2);
/// assert_eq!(blocks[0].len(), 2);
/// assert_eq!(blocks.concat(), instrs);
/// ```
#[must_use]
pub fn form_blocks(instrs: &[Instruction]) -> Blocks<'_> {
    Blocks { remaining: instrs }
}
