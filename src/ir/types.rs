//! Value types and literals.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The semantic type of a register.
///
/// Serialized as a lowercase string for primitive types and as `{"ptr": <type>}` for
/// pointers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Type {
    /// 64-bit signed integer.
    Int,
    /// Boolean.
    Bool,
    /// 64-bit float.
    Float,
    /// Unicode scalar.
    Char,
    /// Pointer to a value of the inner type.
    Ptr(Box<Type>),
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Int => write!(f, "int"),
            Type::Bool => write!(f, "bool"),
            Type::Float => write!(f, "float"),
            Type::Char => write!(f, "char"),
            Type::Ptr(inner) => write!(f, "ptr<{inner}>"),
        }
    }
}

/// A literal carried by a `const` instruction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    /// Boolean literal.
    Bool(bool),
    /// Integer literal.
    Int(i64),
    /// Floating point literal.
    Float(f64),
    /// Character literal, serialized as a one-character string.
    Char(char),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Bool(v) => write!(f, "{v}"),
            Literal::Int(v) => write!(f, "{v}"),
            Literal::Float(v) => write!(f, "{v}"),
            Literal::Char(v) => write!(f, "{v}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_display() {
        assert_eq!(Type::Int.to_string(), "int");
        assert_eq!(Type::Ptr(Box::new(Type::Bool)).to_string(), "ptr<bool>");
    }

    #[test]
    fn test_literal_display() {
        assert_eq!(Literal::Int(-3).to_string(), "-3");
        assert_eq!(Literal::Bool(true).to_string(), "true");
        assert_eq!(Literal::Char('a').to_string(), "a");
    }

    #[test]
    fn test_char_literal_serde() {
        let literal: Literal = serde_json::from_str("\"a\"").unwrap();
        assert_eq!(literal, Literal::Char('a'));
        assert_eq!(serde_json::to_string(&literal).unwrap(), "\"a\"");

        let int: Literal = serde_json::from_str("7").unwrap();
        assert_eq!(int, Literal::Int(7));
    }
}
