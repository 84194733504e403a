//! FrameCode loader — turns source text into a validated program.
//!
//! Loading is three passes over cheap structures: tokenize each line, parse
//! tokens into instructions, then build the label table (which catches
//! duplicate and unresolvable labels). The interpreter receives only
//! programs that passed all three.
//!
//! # Usage
//!
//! ```
//! use framecode_loader::load;
//!
//! let text = "\
//! .FRAMECODE
//! DEFVAR GF@x
//! MOVE GF@x int@42
//! WRITE GF@x
//! ";
//! let (program, labels) = load(text).unwrap();
//! assert_eq!(program.len(), 3);
//! assert!(labels.is_empty());
//! ```

pub mod error;

mod lexer;
mod parser;

pub use error::LoadError;

use framecode_common::{LabelTable, Program};
use lexer::tokenize_line;
use parser::parse_line;

const HEADER: &str = ".FRAMECODE";

/// Load source text into a validated program and its label table.
///
/// Returns the first error encountered. Fix one error at a time.
pub fn load(text: &str) -> Result<(Program, LabelTable), LoadError> {
    let mut instructions = Vec::new();
    let mut header_seen = false;

    for (idx, line) in text.lines().enumerate() {
        let line_num = idx + 1;
        let tokens = tokenize_line(line);
        if tokens.is_empty() {
            continue;
        }
        if !header_seen {
            if tokens.len() != 1 || !tokens[0].eq_ignore_ascii_case(HEADER) {
                return Err(LoadError::MissingHeader);
            }
            header_seen = true;
            continue;
        }
        if let Some(instr) = parse_line(&tokens, line_num)? {
            instructions.push(instr);
        }
    }

    if !header_seen {
        return Err(LoadError::MissingHeader);
    }

    let program = Program::new(instructions);
    let labels = LabelTable::build(&program)?;
    Ok((program, labels))
}

#[cfg(test)]
mod tests {
    use super::*;
    use framecode_common::{Opcode, ProgramError};

    #[test]
    fn load_minimal() {
        let (program, labels) = load(".FRAMECODE\nCREATEFRAME\n").unwrap();
        assert_eq!(program.len(), 1);
        assert_eq!(program.instructions[0].opcode, Opcode::CreateFrame);
        assert!(labels.is_empty());
    }

    #[test]
    fn header_is_case_insensitive() {
        assert!(load(".framecode\nBREAK\n").is_ok());
    }

    #[test]
    fn comments_and_blanks_before_header_are_fine() {
        let text = "\
# language header follows

.FRAMECODE
WRITE string@hi
";
        let (program, _) = load(text).unwrap();
        assert_eq!(program.len(), 1);
    }

    #[test]
    fn missing_header_fails() {
        assert_eq!(load("CREATEFRAME\n").unwrap_err(), LoadError::MissingHeader);
    }

    #[test]
    fn empty_input_fails() {
        assert_eq!(load("").unwrap_err(), LoadError::MissingHeader);
    }

    #[test]
    fn header_with_trailing_token_fails() {
        assert_eq!(
            load(".FRAMECODE v2\nBREAK\n").unwrap_err(),
            LoadError::MissingHeader
        );
    }

    #[test]
    fn header_only_program_is_empty() {
        let (program, labels) = load(".FRAMECODE\n").unwrap();
        assert!(program.is_empty());
        assert!(labels.is_empty());
    }

    #[test]
    fn error_reports_correct_line() {
        let err = load(".FRAMECODE\nBREAK\nFROB\n").unwrap_err();
        assert_eq!(
            err,
            LoadError::UnknownOpcode {
                line: 3,
                token: "FROB".to_string()
            }
        );
    }

    #[test]
    fn labels_are_collected() {
        let text = "\
.FRAMECODE
LABEL start
JUMP start
";
        let (_, labels) = load(text).unwrap();
        assert_eq!(labels.target("start"), Some(1));
    }

    #[test]
    fn duplicate_label_fails() {
        let err = load(".FRAMECODE\nLABEL a\nLABEL a\n").unwrap_err();
        assert_eq!(
            err,
            LoadError::Program(ProgramError::DuplicateLabel {
                name: "a".to_string(),
                order: 2,
            })
        );
        assert_eq!(err.exit_code(), 52);
    }

    #[test]
    fn undefined_jump_target_fails() {
        let err = load(".FRAMECODE\nJUMP nowhere\n").unwrap_err();
        assert_eq!(
            err,
            LoadError::Program(ProgramError::UndefinedLabel {
                name: "nowhere".to_string(),
                order: 1,
            })
        );
    }

    #[test]
    fn undefined_call_target_fails() {
        let err = load(".FRAMECODE\nCALL nowhere\n").unwrap_err();
        assert!(matches!(err, LoadError::Program(_)));
    }
}
