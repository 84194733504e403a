//! Runtime value representation for the FrameCode interpreter.
//!
//! Values are what live in variable bindings and on the data stack.

use crate::type_tag::TypeTag;
use std::fmt;

/// A scalar runtime value.
///
/// Values are immutable once produced by an operation; a variable's binding
/// to a value is what mutates. `Untyped` is the distinguished "no type"
/// value, distinct from every assignable value — it only shows up where an
/// operation is explicitly allowed to observe an unbound slot (WRITE, TYPE,
/// DPRINT).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Signed 64-bit integer.
    Int(i64),
    /// Boolean value.
    Bool(bool),
    /// Sequence of Unicode scalar values.
    Str(String),
    /// Absence of a type.
    Untyped,
}

impl Value {
    /// Returns the type tag for this value, or `None` for `Untyped`.
    pub fn type_tag(&self) -> Option<TypeTag> {
        match self {
            Value::Int(_) => Some(TypeTag::Int),
            Value::Bool(_) => Some(TypeTag::Bool),
            Value::Str(_) => Some(TypeTag::Str),
            Value::Untyped => None,
        }
    }

    /// Returns the symbolic type name: `int`, `bool`, `string`, or the
    /// empty string for `Untyped`.
    pub fn type_name(&self) -> &'static str {
        match self.type_tag() {
            Some(tag) => tag.name(),
            None => "",
        }
    }
}

/// The textual form used by WRITE: integers in decimal, booleans as their
/// literal spelling, strings verbatim, `Untyped` as the empty string.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{n}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Str(s) => write!(f, "{s}"),
            Value::Untyped => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_tags() {
        assert_eq!(Value::Int(42).type_tag(), Some(TypeTag::Int));
        assert_eq!(Value::Bool(true).type_tag(), Some(TypeTag::Bool));
        assert_eq!(Value::Str("x".into()).type_tag(), Some(TypeTag::Str));
        assert_eq!(Value::Untyped.type_tag(), None);
    }

    #[test]
    fn type_names() {
        assert_eq!(Value::Int(0).type_name(), "int");
        assert_eq!(Value::Bool(false).type_name(), "bool");
        assert_eq!(Value::Str(String::new()).type_name(), "string");
        assert_eq!(Value::Untyped.type_name(), "");
    }

    #[test]
    fn display_int() {
        assert_eq!(Value::Int(42).to_string(), "42");
        assert_eq!(Value::Int(-7).to_string(), "-7");
    }

    #[test]
    fn display_bool() {
        assert_eq!(Value::Bool(true).to_string(), "true");
        assert_eq!(Value::Bool(false).to_string(), "false");
    }

    #[test]
    fn display_string_verbatim() {
        assert_eq!(Value::Str("a b\tc".into()).to_string(), "a b\tc");
    }

    #[test]
    fn display_untyped_is_empty() {
        assert_eq!(Value::Untyped.to_string(), "");
    }

    #[test]
    fn equality_same_type_only() {
        assert_eq!(Value::Int(1), Value::Int(1));
        assert_ne!(Value::Int(1), Value::Bool(true));
        assert_ne!(Value::Str("1".into()), Value::Int(1));
    }
}
