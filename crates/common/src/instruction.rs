//! Instruction representation for FrameCode programs.

use crate::opcode::Opcode;
use crate::operand::Operand;
use std::fmt;

/// One instruction: an opcode plus its operand list.
///
/// The front-end guarantees that `operands` matches
/// [`Opcode::signature`] in count and kind before a program reaches the
/// interpreter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    /// The operation to perform.
    pub opcode: Opcode,
    /// Operands, in position order.
    pub operands: Vec<Operand>,
}

impl Instruction {
    /// Create a new instruction.
    pub fn new(opcode: Opcode, operands: Vec<Operand>) -> Self {
        Self { opcode, operands }
    }

    /// Returns true if the operand list matches the opcode's signature.
    pub fn conforms(&self) -> bool {
        let sig = self.opcode.signature();
        self.operands.len() == sig.len()
            && self
                .operands
                .iter()
                .zip(sig)
                .all(|(operand, &kind)| operand.matches(kind))
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.opcode.mnemonic())?;
        for operand in &self.operands {
            match operand {
                Operand::Var(var) => write!(f, " {var}")?,
                Operand::Literal(value) => write!(f, " {}@{value}", value.type_name())?,
                Operand::Label(name) => write!(f, " {name}")?,
                Operand::Type(tag) => write!(f, " {}", tag.name())?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operand::{FrameSelector, VarRef};
    use crate::type_tag::TypeTag;
    use crate::value::Value;

    fn var(name: &str) -> Operand {
        Operand::Var(VarRef::new(FrameSelector::Global, name))
    }

    #[test]
    fn conforming_instruction() {
        let instr = Instruction::new(
            Opcode::Move,
            vec![var("x"), Operand::Literal(Value::Int(5))],
        );
        assert!(instr.conforms());
    }

    #[test]
    fn wrong_arity_rejected() {
        let instr = Instruction::new(Opcode::Move, vec![var("x")]);
        assert!(!instr.conforms());
    }

    #[test]
    fn wrong_kind_rejected() {
        // MOVE's first operand must be a variable, not a literal.
        let instr = Instruction::new(
            Opcode::Move,
            vec![Operand::Literal(Value::Int(1)), var("x")],
        );
        assert!(!instr.conforms());
    }

    #[test]
    fn display_forms() {
        let instr = Instruction::new(
            Opcode::Move,
            vec![var("x"), Operand::Literal(Value::Int(5))],
        );
        assert_eq!(instr.to_string(), "MOVE GF@x int@5");

        let read = Instruction::new(Opcode::Read, vec![var("x"), Operand::Type(TypeTag::Str)]);
        assert_eq!(read.to_string(), "READ GF@x string");

        let jump = Instruction::new(Opcode::Jump, vec![Operand::Label("loop".into())]);
        assert_eq!(jump.to_string(), "JUMP loop");
    }
}
