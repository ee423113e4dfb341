//! Lowering get/set SSA form back to ordinary instructions.

use log::debug;

use crate::{
    analysis::ssa::types::TypeTable,
    ir::{EffectOp, Instruction, ValueOp},
    Result,
};

/// Removes `get`/`set` pseudo-operations.
///
/// Every `get` is dropped and every `set x y` becomes `x = id y`, typed with the
/// declared type of `x` when one is known. All other instructions, including labels
/// and terminators, pass through unchanged, so input without `get`/`set` comes back
/// identical.
///
/// # Example
///
/// ```rust
/// use irflow::analysis::from_ssa;
/// use irflow::ir::{Instruction, Literal, Type};
///
/// let ssa = vec![
///     Instruction::constant("x.b1", Type::Int, Literal::Int(4)),
///     Instruction::get("x", Some(Type::Int)),
///     Instruction::set("x", "x.b1"),
/// ];
///
/// let lowered = from_ssa(&ssa)?;
/// assert_eq!(lowered[1], Instruction::id("x", Some(Type::Int), "x.b1"));
/// # Ok::<(), irflow::Error>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SsaDestructor;

impl SsaDestructor {
    /// Creates a destructor.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Lowers `instrs` out of SSA form.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Malformed`] if a `set` does not have exactly two
    /// arguments.
    pub fn destruct(&self, instrs: &[Instruction]) -> Result<Vec<Instruction>> {
        let types = TypeTable::from_instructions(instrs);
        let mut lowered = Vec::with_capacity(instrs.len());
        let mut dropped = 0usize;
        let mut copies = 0usize;

        for instr in instrs {
            if instr.is_value(ValueOp::Get) {
                dropped += 1;
                continue;
            }

            if instr.is_effect(EffectOp::Set) {
                let [var, value] = instr.args() else {
                    return Err(malformed_error!(
                        "'set' takes a variable and a value, found {} arguments",
                        instr.args().len()
                    ));
                };
                lowered.push(Instruction::id(
                    var.as_str(),
                    types.get(var).cloned(),
                    value.as_str(),
                ));
                copies += 1;
                continue;
            }

            lowered.push(instr.clone());
        }

        debug!(
            "SSA destruction: dropped {} gets, lowered {} sets",
            dropped, copies
        );
        Ok(lowered)
    }
}

/// Lowers `instrs` out of SSA form.
///
/// # Errors
///
/// Returns [`crate::Error::Malformed`] for a `set` with the wrong number of arguments.
pub fn from_ssa(instrs: &[Instruction]) -> Result<Vec<Instruction>> {
    SsaDestructor::new().destruct(instrs)
}
