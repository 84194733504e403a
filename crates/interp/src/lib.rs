//! FrameCode interpreter — executes validated instruction streams.
//!
//! The interpreter is a frame/stack hybrid machine with:
//! - Named variables in a global frame, a local-frame stack, and a staged
//!   temporary frame
//! - A call stack of resume positions for CALL/RETURN
//! - A data stack for transient operand passing
//! - Label-based control transfer resolved through a prebuilt label table
//!
//! The front-end (see `framecode-loader`) hands over a validated
//! [`Program`] and [`LabelTable`]; nothing flows back to it.
//!
//! # Usage
//!
//! ```
//! use framecode_common::{
//!     FrameSelector, Instruction, LabelTable, Opcode, Operand, Program, Value, VarRef,
//! };
//! use framecode_interp::run_with_io;
//! use std::io::Cursor;
//!
//! let x = || Operand::Var(VarRef::new(FrameSelector::Global, "x"));
//! let program = Program::new(vec![
//!     Instruction::new(Opcode::DefVar, vec![x()]),
//!     Instruction::new(Opcode::Move, vec![x(), Operand::Literal(Value::Int(42))]),
//!     Instruction::new(Opcode::Write, vec![x()]),
//! ]);
//! let labels = LabelTable::build(&program).unwrap();
//!
//! let mut output = Vec::new();
//! run_with_io(&program, &labels, Cursor::new(""), &mut output, Vec::new()).unwrap();
//! assert_eq!(output, b"42\n");
//! ```

pub mod error;
pub mod execute;
pub mod frames;
pub mod machine;

pub use error::RuntimeError;
pub use machine::{Flow, Interpreter};

use framecode_common::{LabelTable, Program};
use std::io::{BufRead, Write};

/// Execute a program against the process streams: stdin for READ, stdout
/// for WRITE, stderr for diagnostics.
///
/// # Errors
///
/// Returns [`RuntimeError`] if an instruction fails; the caller is expected
/// to report it and terminate the process with
/// [`RuntimeError::exit_code`].
pub fn run(program: &Program, labels: &LabelTable) -> Result<(), RuntimeError> {
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let stderr = std::io::stderr();
    let mut interp = Interpreter::new(program, labels, stdin.lock(), stdout.lock(), stderr.lock());
    interp.execute()
}

/// Execute a program against caller-supplied streams. The test entry point.
pub fn run_with_io<R: BufRead, W: Write, D: Write>(
    program: &Program,
    labels: &LabelTable,
    input: R,
    output: W,
    diag: D,
) -> Result<(), RuntimeError> {
    let mut interp = Interpreter::new(program, labels, input, output, diag);
    interp.execute()
}
