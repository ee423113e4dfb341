//! The instruction tagged union.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ir::{ConstOp, EffectOp, Literal, Type, ValueOp};

/// A single entry of a function body.
///
/// Labels are markers, not executable instructions; they only name the position that
/// follows them. The three executable variants mirror the classic value/effect split:
/// constants and value operations write a destination register, effect operations do
/// not.
///
/// # Examples
///
/// ```rust
/// use irflow::ir::{Instruction, Type, ValueOp};
///
/// let add = Instruction::value(ValueOp::Add, "c", Type::Int, ["a", "b"]);
/// assert_eq!(add.dest(), Some("c"));
/// assert_eq!(add.args(), ["a", "b"]);
/// assert_eq!(add.to_string(), "c: int = add a b;");
///
/// let jump = Instruction::jmp("loop");
/// assert!(jump.is_terminator());
/// assert_eq!(jump.labels(), ["loop"]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Instruction {
    /// A position marker starting a basic block.
    Label {
        /// The label name.
        label: String,
    },

    /// A literal materialized into `dest`.
    Constant {
        /// Always [`ConstOp::Const`].
        op: ConstOp,
        /// Destination register.
        dest: String,
        /// Destination type.
        #[serde(rename = "type")]
        ty: Type,
        /// The literal.
        value: Literal,
    },

    /// An operation writing `dest`.
    Value {
        /// The operation.
        op: ValueOp,
        /// Destination register.
        dest: String,
        /// Destination type, when known.
        #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
        ty: Option<Type>,
        /// Argument registers.
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        args: Vec<String>,
        /// Callee names for `call`.
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        funcs: Vec<String>,
        /// Label operands.
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        labels: Vec<String>,
    },

    /// An operation executed for its effect.
    Effect {
        /// The operation.
        op: EffectOp,
        /// Argument registers.
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        args: Vec<String>,
        /// Callee names for `call`.
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        funcs: Vec<String>,
        /// Target labels of control transfers.
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        labels: Vec<String>,
    },
}

fn owned<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    items.into_iter().map(Into::into).collect()
}

impl Instruction {
    /// Creates a label marker.
    #[must_use]
    pub fn label(name: impl Into<String>) -> Self {
        Instruction::Label { label: name.into() }
    }

    /// Creates a `const` instruction.
    #[must_use]
    pub fn constant(dest: impl Into<String>, ty: Type, value: Literal) -> Self {
        Instruction::Constant {
            op: ConstOp::Const,
            dest: dest.into(),
            ty,
            value,
        }
    }

    /// Creates a value operation with a known destination type.
    #[must_use]
    pub fn value<I, S>(op: ValueOp, dest: impl Into<String>, ty: Type, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Instruction::Value {
            op,
            dest: dest.into(),
            ty: Some(ty),
            args: owned(args),
            funcs: Vec::new(),
            labels: Vec::new(),
        }
    }

    /// Creates an effect operation.
    #[must_use]
    pub fn effect<A, S, L, T>(op: EffectOp, args: A, labels: L) -> Self
    where
        A: IntoIterator<Item = S>,
        S: Into<String>,
        L: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Instruction::Effect {
            op,
            args: owned(args),
            funcs: Vec::new(),
            labels: owned(labels),
        }
    }

    /// Creates `jmp target`.
    #[must_use]
    pub fn jmp(target: impl Into<String>) -> Self {
        Instruction::Effect {
            op: EffectOp::Jmp,
            args: Vec::new(),
            funcs: Vec::new(),
            labels: vec![target.into()],
        }
    }

    /// Creates `br cond on_true on_false`.
    #[must_use]
    pub fn br(
        cond: impl Into<String>,
        on_true: impl Into<String>,
        on_false: impl Into<String>,
    ) -> Self {
        Instruction::Effect {
            op: EffectOp::Br,
            args: vec![cond.into()],
            funcs: Vec::new(),
            labels: vec![on_true.into(), on_false.into()],
        }
    }

    /// Creates `ret` with an optional return value.
    #[must_use]
    pub fn ret(value: Option<&str>) -> Self {
        Instruction::Effect {
            op: EffectOp::Ret,
            args: value.map(str::to_string).into_iter().collect(),
            funcs: Vec::new(),
            labels: Vec::new(),
        }
    }

    /// Creates `print args...`.
    #[must_use]
    pub fn print<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Instruction::effect(EffectOp::Print, args, std::iter::empty::<String>())
    }

    /// Creates `dest: ty = id src`.
    #[must_use]
    pub fn id(dest: impl Into<String>, ty: Option<Type>, src: impl Into<String>) -> Self {
        Instruction::Value {
            op: ValueOp::Id,
            dest: dest.into(),
            ty,
            args: vec![src.into()],
            funcs: Vec::new(),
            labels: Vec::new(),
        }
    }

    /// Creates `dest: ty = get`.
    #[must_use]
    pub fn get(dest: impl Into<String>, ty: Option<Type>) -> Self {
        Instruction::Value {
            op: ValueOp::Get,
            dest: dest.into(),
            ty,
            args: Vec::new(),
            funcs: Vec::new(),
            labels: Vec::new(),
        }
    }

    /// Creates `dest: ty = undef`.
    #[must_use]
    pub fn undef(dest: impl Into<String>, ty: Option<Type>) -> Self {
        Instruction::Value {
            op: ValueOp::Undef,
            dest: dest.into(),
            ty,
            args: Vec::new(),
            funcs: Vec::new(),
            labels: Vec::new(),
        }
    }

    /// Creates `set var value`.
    #[must_use]
    pub fn set(var: impl Into<String>, value: impl Into<String>) -> Self {
        Instruction::Effect {
            op: EffectOp::Set,
            args: vec![var.into(), value.into()],
            funcs: Vec::new(),
            labels: Vec::new(),
        }
    }

    /// Returns `true` if this is a label marker.
    #[must_use]
    pub const fn is_label(&self) -> bool {
        matches!(self, Instruction::Label { .. })
    }

    /// Returns the label name if this is a label marker.
    #[must_use]
    pub fn as_label(&self) -> Option<&str> {
        match self {
            Instruction::Label { label } => Some(label),
            _ => None,
        }
    }

    /// Returns `true` if this instruction ends a basic block (`jmp`, `br`, `ret`).
    #[must_use]
    pub fn is_terminator(&self) -> bool {
        matches!(self, Instruction::Effect { op, .. } if op.is_terminator())
    }

    /// Returns `true` if this is an effect operation with the given opcode.
    #[must_use]
    pub fn is_effect(&self, wanted: EffectOp) -> bool {
        matches!(self, Instruction::Effect { op, .. } if *op == wanted)
    }

    /// Returns `true` if this is a value operation with the given opcode.
    #[must_use]
    pub fn is_value(&self, wanted: ValueOp) -> bool {
        matches!(self, Instruction::Value { op, .. } if *op == wanted)
    }

    /// Returns the destination register, if the instruction writes one.
    #[must_use]
    pub fn dest(&self) -> Option<&str> {
        match self {
            Instruction::Constant { dest, .. } | Instruction::Value { dest, .. } => Some(dest),
            Instruction::Label { .. } | Instruction::Effect { .. } => None,
        }
    }

    /// Returns the declared type of the destination register, if known.
    #[must_use]
    pub fn dest_type(&self) -> Option<&Type> {
        match self {
            Instruction::Constant { ty, .. } => Some(ty),
            Instruction::Value { ty, .. } => ty.as_ref(),
            Instruction::Label { .. } | Instruction::Effect { .. } => None,
        }
    }

    /// Returns the argument registers.
    #[must_use]
    pub fn args(&self) -> &[String] {
        match self {
            Instruction::Value { args, .. } | Instruction::Effect { args, .. } => args,
            Instruction::Label { .. } | Instruction::Constant { .. } => &[],
        }
    }

    /// Returns the label operands (jump targets for `jmp`/`br`).
    #[must_use]
    pub fn labels(&self) -> &[String] {
        match self {
            Instruction::Value { labels, .. } | Instruction::Effect { labels, .. } => labels,
            Instruction::Label { .. } | Instruction::Constant { .. } => &[],
        }
    }

    /// Renames every argument reference and the destination from `from` to `to`.
    ///
    /// Labels and callee names are left untouched.
    pub fn rename(&mut self, from: &str, to: &str) {
        match self {
            Instruction::Label { .. } => {}
            Instruction::Constant { dest, .. } => {
                if dest == from {
                    *dest = to.to_string();
                }
            }
            Instruction::Value { dest, args, .. } => {
                if dest == from {
                    *dest = to.to_string();
                }
                rename_all(args, from, to);
            }
            Instruction::Effect { args, .. } => rename_all(args, from, to),
        }
    }
}

fn rename_all(args: &mut [String], from: &str, to: &str) {
    for arg in args.iter_mut().filter(|arg| *arg == from) {
        *arg = to.to_string();
    }
}

fn write_operands(
    f: &mut fmt::Formatter<'_>,
    funcs: &[String],
    args: &[String],
    labels: &[String],
) -> fmt::Result {
    for func in funcs {
        write!(f, " @{func}")?;
    }
    for arg in args {
        write!(f, " {arg}")?;
    }
    for label in labels {
        write!(f, " .{label}")?;
    }
    Ok(())
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Label { label } => write!(f, ".{label}:"),
            Instruction::Constant {
                op,
                dest,
                ty,
                value,
            } => write!(f, "{dest}: {ty} = {op} {value};"),
            Instruction::Value {
                op,
                dest,
                ty,
                args,
                funcs,
                labels,
            } => {
                match ty {
                    Some(ty) => write!(f, "{dest}: {ty} = {op}")?,
                    None => write!(f, "{dest} = {op}")?,
                }
                write_operands(f, funcs, args, labels)?;
                write!(f, ";")
            }
            Instruction::Effect {
                op,
                args,
                funcs,
                labels,
            } => {
                write!(f, "{op}")?;
                write_operands(f, funcs, args, labels)?;
                write!(f, ";")
            }
        }
    }
}
