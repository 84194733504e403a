//! Error types for the FrameCode loader.

use framecode_common::ProgramError;
use thiserror::Error;

/// Errors produced while loading source text into a validated program.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// The first significant line is not the `.FRAMECODE` header.
    #[error("missing '.FRAMECODE' header")]
    MissingHeader,

    /// An unrecognized opcode mnemonic was encountered.
    #[error("line {line}: unknown opcode '{token}'")]
    UnknownOpcode { line: usize, token: String },

    /// An instruction had the wrong number of operands.
    #[error("line {line}: {mnemonic} expects {expected} operand(s), found {found}")]
    WrongOperandCount {
        line: usize,
        mnemonic: &'static str,
        expected: usize,
        found: usize,
    },

    /// An operand token did not match the kind the opcode requires.
    #[error("line {line}: bad operand '{token}'")]
    BadOperand { line: usize, token: String },

    /// A literal token has a valid shape but an unparseable payload.
    #[error("line {line}: bad literal '{token}'")]
    BadLiteral { line: usize, token: String },

    /// A label-consistency error found while building the label table.
    #[error(transparent)]
    Program(#[from] ProgramError),
}

impl LoadError {
    /// Process exit code for this error kind.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::MissingHeader => 31,
            Self::UnknownOpcode { .. } => 60,
            Self::WrongOperandCount { .. } | Self::BadOperand { .. } | Self::BadLiteral { .. } => {
                32
            }
            Self::Program(_) => 52,
        }
    }
}
