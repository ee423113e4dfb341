//! Variable type lookup.
//!
//! The IR declares a type at every definition, not per variable. The SSA transforms
//! need a single type per variable to annotate the `get`, `id` and `undef` they
//! synthesize; a [`TypeTable`] provides it.

use std::collections::HashMap;

use crate::ir::{Argument, Instruction, Type};

/// Maps variable names to their declared type.
///
/// A parameter's type comes from its declaration. Any other variable takes the type
/// of its first typed definition.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypeTable {
    types: HashMap<String, Type>,
}

impl TypeTable {
    /// Builds the table for a function.
    #[must_use]
    pub fn new(params: &[Argument], instrs: &[Instruction]) -> Self {
        let mut table = Self::default();
        for param in params {
            table.declare(&param.name, &param.ty);
        }
        for instr in instrs {
            if let (Some(dest), Some(ty)) = (instr.dest(), instr.dest_type()) {
                table.declare(dest, ty);
            }
        }
        table
    }

    /// Builds the table from definitions alone.
    #[must_use]
    pub fn from_instructions(instrs: &[Instruction]) -> Self {
        Self::new(&[], instrs)
    }

    fn declare(&mut self, name: &str, ty: &Type) {
        if !self.types.contains_key(name) {
            self.types.insert(name.to_string(), ty.clone());
        }
    }

    /// Returns the type of `name`, if declared.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Type> {
        self.types.get(name)
    }

    /// Returns the number of typed variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns `true` if no variable has a known type.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
