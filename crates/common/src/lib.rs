//! FrameCode common types.
//!
//! This crate provides the foundational data structures shared by the
//! front-end and the interpreter:
//!
//! - [`Value`] and [`TypeTag`] — the scalar value model
//! - [`Operand`], [`VarRef`], [`FrameSelector`] — instruction operands
//! - [`Opcode`] — the closed instruction set with operand signatures
//! - [`Instruction`] and [`Program`] — the validated instruction stream
//! - [`LabelTable`] — label name → program position, built once
//! - [`ProgramError`] — pre-execution label-resolution errors
//!
//! This crate uses `thiserror` and has no other dependencies.

pub mod error;
pub mod instruction;
pub mod opcode;
pub mod operand;
pub mod program;
pub mod type_tag;
pub mod value;

// Re-export commonly used types at the crate root.
pub use error::ProgramError;
pub use instruction::Instruction;
pub use opcode::Opcode;
pub use operand::{FrameSelector, Operand, OperandKind, VarRef};
pub use program::{LabelTable, Program};
pub use type_tag::TypeTag;
pub use value::Value;
