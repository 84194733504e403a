//! Label-resolution errors for FrameCode programs.
//!
//! These are pre-execution errors: a program that fails
//! [`crate::LabelTable::build`] never reaches the interpreter.

use thiserror::Error;

/// Errors detected while building the label table for a program.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProgramError {
    /// The same label name is declared at two program positions.
    #[error("label '{name}' redeclared at order {order}")]
    DuplicateLabel { name: String, order: usize },

    /// A control-transfer instruction targets a label that is never declared.
    #[error("undefined label '{name}' at order {order}")]
    UndefinedLabel { name: String, order: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_duplicate_label() {
        let e = ProgramError::DuplicateLabel {
            name: "loop".into(),
            order: 4,
        };
        assert_eq!(e.to_string(), "label 'loop' redeclared at order 4");
    }

    #[test]
    fn display_undefined_label() {
        let e = ProgramError::UndefinedLabel {
            name: "end".into(),
            order: 7,
        };
        assert_eq!(e.to_string(), "undefined label 'end' at order 7");
    }
}
