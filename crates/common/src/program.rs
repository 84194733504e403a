//! Program and label table representation.
//!
//! A program is a dense, gap-free sequence of instructions. The label table
//! is built once before execution begins and is immutable afterwards.

use crate::error::ProgramError;
use crate::instruction::Instruction;
use crate::opcode::Opcode;
use crate::operand::Operand;
use std::collections::HashMap;

/// A FrameCode program: a dense sequence of instructions.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Program {
    /// The instruction stream, 0-indexed internally. Diagnostics report
    /// 1-based orders.
    pub instructions: Vec<Instruction>,
}

impl Program {
    /// Create a new program from a vector of instructions.
    pub fn new(instructions: Vec<Instruction>) -> Self {
        Self { instructions }
    }

    /// Number of instructions in the program.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Returns true if the program has no instructions.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}

/// Mapping from label name to the program position it denotes.
///
/// The stored position is the index *after* the `LABEL` marker, so control
/// transfer lands on the instruction following the label.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LabelTable {
    targets: HashMap<String, usize>,
}

impl LabelTable {
    /// Scan a program for `LABEL` markers and build the table.
    ///
    /// Validates uniqueness of every label declaration and resolvability of
    /// every label referenced by a control-transfer instruction. Both are
    /// pre-execution errors.
    pub fn build(program: &Program) -> Result<LabelTable, ProgramError> {
        let mut targets = HashMap::new();

        for (idx, instr) in program.instructions.iter().enumerate() {
            if instr.opcode != Opcode::Label {
                continue;
            }
            if let Some(Operand::Label(name)) = instr.operands.first() {
                if targets.insert(name.clone(), idx + 1).is_some() {
                    return Err(ProgramError::DuplicateLabel {
                        name: name.clone(),
                        order: idx + 1,
                    });
                }
            }
        }

        for (idx, instr) in program.instructions.iter().enumerate() {
            let uses_label = matches!(
                instr.opcode,
                Opcode::Call | Opcode::Jump | Opcode::JumpIfEq | Opcode::JumpIfNeq
            );
            if !uses_label {
                continue;
            }
            if let Some(Operand::Label(name)) = instr.operands.first() {
                if !targets.contains_key(name) {
                    return Err(ProgramError::UndefinedLabel {
                        name: name.clone(),
                        order: idx + 1,
                    });
                }
            }
        }

        Ok(LabelTable { targets })
    }

    /// Returns the transfer target for a label, if declared.
    pub fn target(&self, name: &str) -> Option<usize> {
        self.targets.get(name).copied()
    }

    /// Number of declared labels.
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Returns true if no labels are declared.
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}
