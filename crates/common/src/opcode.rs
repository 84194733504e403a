//! Opcode definitions for the FrameCode instruction set.
//!
//! Each opcode carries a fixed operand signature; the front-end checks the
//! signature once, and the interpreter dispatches with an exhaustive match.

use crate::operand::OperandKind;

use OperandKind::{Label as L, Symbol as S, Type as T, Var as V};

/// Identifies the operation an instruction performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    // Frames and variables
    /// Copy a resolved symbol into a variable.
    Move,
    /// Stage a fresh temporary frame, discarding any staged one.
    CreateFrame,
    /// Push the staged frame onto the local-frame stack.
    PushFrame,
    /// Pop the current local frame back into the staging slot.
    PopFrame,
    /// Declare an unbound variable in the selected frame.
    DefVar,

    // Call control
    /// Push the resume position and transfer to a label.
    Call,
    /// Pop the call stack and transfer there.
    Return,

    // Data stack
    /// Push a resolved symbol onto the data stack.
    PushS,
    /// Pop the data stack into a variable.
    PopS,

    // Arithmetic (Int only)
    /// Integer addition.
    Add,
    /// Integer subtraction.
    Sub,
    /// Integer multiplication.
    Mul,
    /// Integer division. Division by zero is a runtime error.
    IDiv,

    // Relational (operands must share a type)
    /// Less-than.
    Lt,
    /// Greater-than.
    Gt,
    /// Equality.
    Eq,

    // Logical (Bool only)
    /// Logical conjunction.
    And,
    /// Logical disjunction.
    Or,
    /// Logical negation.
    Not,

    // Conversions
    /// Integer code point to one-character string.
    IntToChar,
    /// Code point of a string character at an index.
    StrToInt,

    // Input/output
    /// Read one line from the input stream, parsed per a requested type.
    Read,
    /// Write the textual form of a symbol plus a newline.
    Write,

    // String operations
    /// String concatenation.
    Concat,
    /// String length.
    StrLen,
    /// One-character string at an index.
    GetChar,
    /// Replace one character of the destination string in place.
    SetChar,

    // Introspection
    /// Symbolic type name of a resolved symbol. Never fails.
    TypeOf,

    // Control transfer
    /// No-op marker; resolved entirely by the label table.
    Label,
    /// Unconditional transfer.
    Jump,
    /// Transfer if two symbols of the same type compare equal.
    JumpIfEq,
    /// Transfer if two symbols of the same type compare unequal.
    JumpIfNeq,

    // Diagnostics (side channel only, never fatal)
    /// Print a symbol to the diagnostic stream.
    DPrint,
    /// Dump frames and the data stack to the diagnostic stream.
    Break,
}

/// All opcodes, in definition order. Useful for exhaustive testing.
pub const ALL_OPCODES: [Opcode; 34] = [
    Opcode::Move,
    Opcode::CreateFrame,
    Opcode::PushFrame,
    Opcode::PopFrame,
    Opcode::DefVar,
    Opcode::Call,
    Opcode::Return,
    Opcode::PushS,
    Opcode::PopS,
    Opcode::Add,
    Opcode::Sub,
    Opcode::Mul,
    Opcode::IDiv,
    Opcode::Lt,
    Opcode::Gt,
    Opcode::Eq,
    Opcode::And,
    Opcode::Or,
    Opcode::Not,
    Opcode::IntToChar,
    Opcode::StrToInt,
    Opcode::Read,
    Opcode::Write,
    Opcode::Concat,
    Opcode::StrLen,
    Opcode::GetChar,
    Opcode::SetChar,
    Opcode::TypeOf,
    Opcode::Label,
    Opcode::Jump,
    Opcode::JumpIfEq,
    Opcode::JumpIfNeq,
    Opcode::DPrint,
    Opcode::Break,
];

impl Opcode {
    /// Returns the assembly mnemonic for this opcode.
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Opcode::Move => "MOVE",
            Opcode::CreateFrame => "CREATEFRAME",
            Opcode::PushFrame => "PUSHFRAME",
            Opcode::PopFrame => "POPFRAME",
            Opcode::DefVar => "DEFVAR",
            Opcode::Call => "CALL",
            Opcode::Return => "RETURN",
            Opcode::PushS => "PUSHS",
            Opcode::PopS => "POPS",
            Opcode::Add => "ADD",
            Opcode::Sub => "SUB",
            Opcode::Mul => "MUL",
            Opcode::IDiv => "IDIV",
            Opcode::Lt => "LT",
            Opcode::Gt => "GT",
            Opcode::Eq => "EQ",
            Opcode::And => "AND",
            Opcode::Or => "OR",
            Opcode::Not => "NOT",
            Opcode::IntToChar => "INT2CHAR",
            Opcode::StrToInt => "STRI2INT",
            Opcode::Read => "READ",
            Opcode::Write => "WRITE",
            Opcode::Concat => "CONCAT",
            Opcode::StrLen => "STRLEN",
            Opcode::GetChar => "GETCHAR",
            Opcode::SetChar => "SETCHAR",
            Opcode::TypeOf => "TYPE",
            Opcode::Label => "LABEL",
            Opcode::Jump => "JUMP",
            Opcode::JumpIfEq => "JUMPIFEQ",
            Opcode::JumpIfNeq => "JUMPIFNEQ",
            Opcode::DPrint => "DPRINT",
            Opcode::Break => "BREAK",
        }
    }

    /// Looks up an opcode by its (uppercase) mnemonic.
    pub fn from_mnemonic(mnemonic: &str) -> Option<Opcode> {
        ALL_OPCODES
            .iter()
            .find(|op| op.mnemonic() == mnemonic)
            .copied()
    }

    /// Returns the operand kinds this opcode expects, in position order.
    pub fn signature(&self) -> &'static [OperandKind] {
        match self {
            Opcode::CreateFrame
            | Opcode::PushFrame
            | Opcode::PopFrame
            | Opcode::Return
            | Opcode::Break => &[],
            Opcode::DefVar | Opcode::PopS => &[V],
            Opcode::PushS | Opcode::Write | Opcode::DPrint => &[S],
            Opcode::Call | Opcode::Label | Opcode::Jump => &[L],
            Opcode::Move
            | Opcode::Not
            | Opcode::IntToChar
            | Opcode::StrLen
            | Opcode::TypeOf => &[V, S],
            Opcode::Read => &[V, T],
            Opcode::Add
            | Opcode::Sub
            | Opcode::Mul
            | Opcode::IDiv
            | Opcode::Lt
            | Opcode::Gt
            | Opcode::Eq
            | Opcode::And
            | Opcode::Or
            | Opcode::StrToInt
            | Opcode::Concat
            | Opcode::GetChar
            | Opcode::SetChar => &[V, S, S],
            Opcode::JumpIfEq | Opcode::JumpIfNeq => &[L, S, S],
        }
    }
}
