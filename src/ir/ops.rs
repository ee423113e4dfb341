//! Opcode enumerations.
//!
//! Opcodes are split by the instruction variant they may appear in. Their textual names
//! are lowercase both for `serde` and for `strum` conversions, so `ValueOp::PtrAdd`
//! round-trips as `"ptradd"`.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Opcodes of [`Instruction::Constant`](crate::ir::Instruction::Constant).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ConstOp {
    /// Materializes a literal.
    Const,
}

/// Opcodes of [`Instruction::Value`](crate::ir::Instruction::Value).
///
/// `Get` and `Undef` are pseudo-operations introduced by SSA construction. `Get` reads
/// the value a predecessor block published with [`EffectOp::Set`]; `Undef` produces a
/// placeholder for variables that have no definition on some path.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
#[allow(missing_docs)]
pub enum ValueOp {
    Add,
    Mul,
    Sub,
    Div,
    Eq,
    Lt,
    Gt,
    Le,
    Ge,
    Not,
    And,
    Or,
    Id,
    Call,
    Fadd,
    Fmul,
    Fsub,
    Fdiv,
    Feq,
    Flt,
    Fgt,
    Fle,
    Fge,
    Alloc,
    Load,
    PtrAdd,
    Get,
    Undef,
}

/// Opcodes of [`Instruction::Effect`](crate::ir::Instruction::Effect).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EffectOp {
    /// Unconditional jump to `labels[0]`.
    Jmp,
    /// Two-way branch on `args[0]` to `labels[0]` (true) or `labels[1]` (false).
    Br,
    /// Return from the function, optionally with `args[0]`.
    Ret,
    /// Call without using the result.
    Call,
    /// Print the arguments.
    Print,
    /// No operation.
    Nop,
    /// Store `args[1]` through pointer `args[0]`.
    Store,
    /// Free the allocation behind `args[0]`.
    Free,
    /// Publish `args[1]` as the current value of variable `args[0]`.
    Set,
}

impl EffectOp {
    /// Returns `true` for opcodes that end a basic block.
    #[must_use]
    pub const fn is_terminator(self) -> bool {
        matches!(self, EffectOp::Jmp | EffectOp::Br | EffectOp::Ret)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test_op_names() {
        assert_eq!(ValueOp::PtrAdd.to_string(), "ptradd");
        assert_eq!(ValueOp::from_str("undef").unwrap(), ValueOp::Undef);
        assert_eq!(EffectOp::Set.as_ref(), "set");
        assert!(EffectOp::from_str("phi").is_err());
    }

    #[test]
    fn test_terminators() {
        assert!(EffectOp::Jmp.is_terminator());
        assert!(EffectOp::Br.is_terminator());
        assert!(EffectOp::Ret.is_terminator());
        assert!(!EffectOp::Print.is_terminator());
        assert!(!EffectOp::Set.is_terminator());
        assert!(!EffectOp::Call.is_terminator());
    }
}
