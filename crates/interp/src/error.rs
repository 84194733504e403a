//! Runtime errors for the FrameCode interpreter.
//!
//! Every runtime error is fatal: detection terminates execution immediately
//! and the process exits with the kind's fixed code. Kinds are never merged
//! or downgraded. Each variant carries the 1-based instruction order for
//! diagnostics.

use thiserror::Error;

/// Errors detected while executing a specific instruction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// Operand types do not satisfy the operation's requirements.
    #[error("operand type mismatch at order {order}")]
    OperandTypeMismatch { order: usize },

    /// A variable reference names a variable that was never declared.
    #[error("unknown variable '{name}' at order {order}")]
    UnknownVariable { name: String, order: usize },

    /// A local or temporary frame access with no such frame active.
    #[error("no {frame} frame at order {order}")]
    NoFrame { frame: &'static str, order: usize },

    /// A declared-but-unbound variable was read.
    #[error("read of uninitialized variable '{name}' at order {order}")]
    UninitializedValue { name: String, order: usize },

    /// POPS on an empty data stack.
    #[error("pop on empty data stack at order {order}")]
    DataStackEmpty { order: usize },

    /// RETURN with an empty call stack.
    #[error("return with empty call stack at order {order}")]
    CallStackEmpty { order: usize },

    /// IDIV with a zero divisor.
    #[error("division by zero at order {order}")]
    DivisionByZero { order: usize },

    /// String index outside `[0, length)`.
    #[error("index {index} out of range (length {length}) at order {order}")]
    IndexOutOfRange {
        index: i64,
        length: usize,
        order: usize,
    },

    /// SETCHAR with an empty replacement string.
    #[error("empty replacement string at order {order}")]
    EmptyReplacement { order: usize },

    /// INT2CHAR with an integer that is not a Unicode scalar value.
    #[error("code point {value} out of range at order {order}")]
    CodepointOutOfRange { value: i64, order: usize },

    /// DEFVAR of a name that already exists in the selected frame.
    #[error("variable '{name}' redefined at order {order}")]
    Redefinition { name: String, order: usize },

    /// Control transfer to a label missing from the label table. The
    /// front-end validates targets, so this signals a broken contract.
    #[error("undefined label '{name}' at order {order}")]
    UndefinedLabel { name: String, order: usize },

    /// Reading the input stream or writing the output stream failed.
    #[error("i/o failure at order {order}: {message}")]
    Io { message: String, order: usize },

    /// The operand list does not match the opcode signature. The front-end
    /// validates shapes, so this signals a broken contract.
    #[error("malformed operand list at order {order}")]
    MalformedOperands { order: usize },
}

impl RuntimeError {
    /// The process exit code for this error kind.
    ///
    /// Codes follow the language's fixed taxonomy: 53 operand types,
    /// 54 unknown variable, 55 missing frame, 56 missing value, 57 zero
    /// division, 58 string range, 59 redefinition. 52 is the pre-execution
    /// semantic code and only appears here for a broken front-end contract;
    /// 99 is internal failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            RuntimeError::OperandTypeMismatch { .. } => 53,
            RuntimeError::UnknownVariable { .. } => 54,
            RuntimeError::NoFrame { .. } => 55,
            RuntimeError::UninitializedValue { .. }
            | RuntimeError::DataStackEmpty { .. }
            | RuntimeError::CallStackEmpty { .. } => 56,
            RuntimeError::DivisionByZero { .. } => 57,
            RuntimeError::IndexOutOfRange { .. }
            | RuntimeError::EmptyReplacement { .. }
            | RuntimeError::CodepointOutOfRange { .. } => 58,
            RuntimeError::Redefinition { .. } => 59,
            RuntimeError::UndefinedLabel { .. } => 52,
            RuntimeError::Io { .. } | RuntimeError::MalformedOperands { .. } => 99,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats() {
        assert_eq!(
            RuntimeError::DivisionByZero { order: 5 }.to_string(),
            "division by zero at order 5"
        );
        assert_eq!(
            RuntimeError::NoFrame {
                frame: "local",
                order: 2
            }
            .to_string(),
            "no local frame at order 2"
        );
        assert_eq!(
            RuntimeError::IndexOutOfRange {
                index: 9,
                length: 3,
                order: 1
            }
            .to_string(),
            "index 9 out of range (length 3) at order 1"
        );
    }

    #[test]
    fn exit_codes_are_fixed() {
        assert_eq!(RuntimeError::OperandTypeMismatch { order: 1 }.exit_code(), 53);
        assert_eq!(
            RuntimeError::UnknownVariable {
                name: "x".into(),
                order: 1
            }
            .exit_code(),
            54
        );
        assert_eq!(
            RuntimeError::NoFrame {
                frame: "temporary",
                order: 1
            }
            .exit_code(),
            55
        );
        assert_eq!(RuntimeError::DataStackEmpty { order: 1 }.exit_code(), 56);
        assert_eq!(RuntimeError::CallStackEmpty { order: 1 }.exit_code(), 56);
        assert_eq!(RuntimeError::DivisionByZero { order: 1 }.exit_code(), 57);
        assert_eq!(RuntimeError::EmptyReplacement { order: 1 }.exit_code(), 58);
        assert_eq!(
            RuntimeError::Redefinition {
                name: "x".into(),
                order: 1
            }
            .exit_code(),
            59
        );
    }
}
