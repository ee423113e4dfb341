//! Functions and programs.

use serde::{Deserialize, Serialize};

use crate::ir::{Instruction, Type};

/// A formal parameter of a function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argument {
    /// Parameter name.
    pub name: String,
    /// Parameter type.
    #[serde(rename = "type")]
    pub ty: Type,
}

impl Argument {
    /// Creates a new parameter.
    #[must_use]
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// A function: name, formal parameters and a flat instruction sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Function {
    /// Function name.
    pub name: String,
    /// Formal parameters in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<Argument>,
    /// Return type, if the function returns a value.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub return_type: Option<Type>,
    /// The body.
    #[serde(default)]
    pub instrs: Vec<Instruction>,
}

impl Function {
    /// Creates a function without a return type.
    #[must_use]
    pub fn new(name: impl Into<String>, args: Vec<Argument>, instrs: Vec<Instruction>) -> Self {
        Self {
            name: name.into(),
            args,
            return_type: None,
            instrs,
        }
    }

    /// Returns the parameter names in declaration order.
    pub fn arg_names(&self) -> impl Iterator<Item = &str> {
        self.args.iter().map(|arg| arg.name.as_str())
    }
}

/// A program: a set of independent functions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Program {
    /// The functions, in source order.
    pub functions: Vec<Function>,
}

impl Program {
    /// Returns the function with the given name.
    #[must_use]
    pub fn function(&self, name: &str) -> Option<&Function> {
        self.functions.iter().find(|func| func.name == name)
    }
}
