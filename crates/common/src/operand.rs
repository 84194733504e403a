//! Instruction operands: variable references, literals, labels, type names.
//!
//! Every operand is a closed tagged variant. The front-end guarantees that
//! the operand list of each instruction matches the opcode's signature
//! (see [`crate::Opcode::signature`]), so the interpreter only has to
//! resolve, never re-validate shape.

use crate::type_tag::TypeTag;
use crate::value::Value;
use std::fmt;

/// Selects which frame a qualified variable name resolves into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameSelector {
    /// The one persistent global frame.
    Global,
    /// The current top of the local-frame stack.
    Local,
    /// The staged temporary frame.
    Temporary,
}

impl FrameSelector {
    /// Returns the source-level frame prefix (`GF`, `LF`, `TF`).
    pub fn prefix(&self) -> &'static str {
        match self {
            FrameSelector::Global => "GF",
            FrameSelector::Local => "LF",
            FrameSelector::Temporary => "TF",
        }
    }

    /// Parses a source-level frame prefix.
    pub fn from_prefix(prefix: &str) -> Option<FrameSelector> {
        match prefix {
            "GF" => Some(FrameSelector::Global),
            "LF" => Some(FrameSelector::Local),
            "TF" => Some(FrameSelector::Temporary),
            _ => None,
        }
    }
}

/// A frame-qualified variable reference, e.g. `GF@counter`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarRef {
    /// The frame the name resolves into.
    pub selector: FrameSelector,
    /// The bare variable name within that frame.
    pub name: String,
}

impl VarRef {
    /// Create a variable reference.
    pub fn new(selector: FrameSelector, name: impl Into<String>) -> Self {
        Self {
            selector,
            name: name.into(),
        }
    }
}

impl fmt::Display for VarRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.selector.prefix(), self.name)
    }
}

/// A single instruction operand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    /// A variable reference (readable and writable).
    Var(VarRef),
    /// A literal value.
    Literal(Value),
    /// A label name, used only by control-transfer instructions.
    Label(String),
    /// A type name, used only by READ.
    Type(TypeTag),
}

/// The operand kind an opcode position expects.
///
/// `Symbol` admits either a variable reference or a literal; the other
/// kinds are exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandKind {
    /// Must be a variable reference.
    Var,
    /// Variable reference or literal.
    Symbol,
    /// Must be a label name.
    Label,
    /// Must be a type name.
    Type,
}

impl Operand {
    /// Returns true if this operand is admissible for the given kind.
    pub fn matches(&self, kind: OperandKind) -> bool {
        match kind {
            OperandKind::Var => matches!(self, Operand::Var(_)),
            OperandKind::Symbol => matches!(self, Operand::Var(_) | Operand::Literal(_)),
            OperandKind::Label => matches!(self, Operand::Label(_)),
            OperandKind::Type => matches!(self, Operand::Type(_)),
        }
    }
}
