//! Interpreter state: frames, stacks, program position, and I/O streams.
//!
//! All mutable interpreter state lives in one explicit [`Interpreter`] value
//! owned by the execution loop — there are no ambient globals. The streams
//! are generic so tests can drive execution with in-memory buffers.

use crate::error::RuntimeError;
use crate::frames::{FrameError, FrameManager};
use framecode_common::{
    Instruction, LabelTable, Operand, Program, TypeTag, Value, VarRef,
};
use std::io::{BufRead, Write};

/// Attach an instruction order to a storage-level error.
pub(crate) fn with_order(err: FrameError, order: usize) -> RuntimeError {
    match err {
        FrameError::NoFrame(frame) => RuntimeError::NoFrame { frame, order },
        FrameError::UnknownVariable(name) => RuntimeError::UnknownVariable { name, order },
        FrameError::Redefinition(name) => RuntimeError::Redefinition { name, order },
        FrameError::Uninitialized(name) => RuntimeError::UninitializedValue { name, order },
    }
}

/// Step result of one instruction: continue sequentially or transfer
/// control to a program position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Fall through to the next instruction.
    Continue,
    /// Transfer control to the given position.
    Jump(usize),
}

/// The FrameCode interpreter.
pub struct Interpreter<'p, R, W, D> {
    /// The validated program being executed.
    pub(crate) program: &'p Program,
    /// Label table, built before execution and immutable during it.
    pub(crate) labels: &'p LabelTable,
    /// Global frame, local-frame stack, and the staged temporary frame.
    pub(crate) frames: FrameManager,
    /// Saved resume positions for CALL/RETURN.
    pub(crate) call_stack: Vec<usize>,
    /// Operand stack for PUSHS/POPS. Values are copies, never aliases.
    pub(crate) data_stack: Vec<Value>,
    /// Program counter (0-based instruction index).
    pub(crate) pc: usize,
    /// Count of instructions processed, for BREAK.
    pub(crate) executed: u64,
    /// Input stream consumed line-by-line by READ.
    pub(crate) input: R,
    /// Standard output; WRITE results only.
    pub(crate) output: W,
    /// Diagnostic side channel for DPRINT and BREAK.
    pub(crate) diag: D,
}

impl<'p, R: BufRead, W: Write, D: Write> Interpreter<'p, R, W, D> {
    /// Create an interpreter over a validated program and its label table.
    pub fn new(program: &'p Program, labels: &'p LabelTable, input: R, output: W, diag: D) -> Self {
        Self {
            program,
            labels,
            frames: FrameManager::new(),
            call_stack: Vec::new(),
            data_stack: Vec::new(),
            pc: 0,
            executed: 0,
            input,
            output,
            diag,
        }
    }

    /// 1-based order of the instruction currently executing.
    pub(crate) fn order(&self) -> usize {
        self.pc + 1
    }

    /// Attach the current instruction order to a storage-level error.
    pub(crate) fn storage_err(&self, err: FrameError) -> RuntimeError {
        with_order(err, self.order())
    }

    pub(crate) fn io_err(&self, err: std::io::Error) -> RuntimeError {
        RuntimeError::Io {
            message: err.to_string(),
            order: self.order(),
        }
    }

    fn malformed(&self) -> RuntimeError {
        RuntimeError::MalformedOperands {
            order: self.order(),
        }
    }

    // ---- Operand accessors ----
    //
    // The front-end guarantees operand shape; a mismatch here is a broken
    // contract, not a program error.

    /// The variable reference at operand position `idx`.
    pub(crate) fn var_operand<'i>(
        &self,
        instr: &'i Instruction,
        idx: usize,
    ) -> Result<&'i VarRef, RuntimeError> {
        match instr.operands.get(idx) {
            Some(Operand::Var(var)) => Ok(var),
            _ => Err(self.malformed()),
        }
    }

    /// The symbol (variable or literal) at operand position `idx`.
    pub(crate) fn symbol_operand<'i>(
        &self,
        instr: &'i Instruction,
        idx: usize,
    ) -> Result<&'i Operand, RuntimeError> {
        match instr.operands.get(idx) {
            Some(operand @ (Operand::Var(_) | Operand::Literal(_))) => Ok(operand),
            _ => Err(self.malformed()),
        }
    }

    /// The label name at operand position `idx`.
    pub(crate) fn label_operand<'i>(
        &self,
        instr: &'i Instruction,
        idx: usize,
    ) -> Result<&'i str, RuntimeError> {
        match instr.operands.get(idx) {
            Some(Operand::Label(name)) => Ok(name),
            _ => Err(self.malformed()),
        }
    }

    /// The type name at operand position `idx`.
    pub(crate) fn type_operand(
        &self,
        instr: &Instruction,
        idx: usize,
    ) -> Result<TypeTag, RuntimeError> {
        match instr.operands.get(idx) {
            Some(Operand::Type(tag)) => Ok(*tag),
            _ => Err(self.malformed()),
        }
    }

    // ---- Symbol resolution ----

    /// Resolve a symbol for reading. A literal yields its value; a variable
    /// reference yields a copy of its binding, failing on a missing frame,
    /// a missing name, or an unbound slot.
    pub(crate) fn resolve(&self, operand: &Operand) -> Result<Value, RuntimeError> {
        match operand {
            Operand::Literal(value) => Ok(value.clone()),
            Operand::Var(var) => self
                .frames
                .read(var)
                .map(Value::clone)
                .map_err(|e| self.storage_err(e)),
            Operand::Label(_) | Operand::Type(_) => Err(self.malformed()),
        }
    }

    /// Resolve a symbol, yielding `Untyped` for a declared-but-unbound
    /// variable instead of failing. Used by WRITE, TYPE, and DPRINT.
    pub(crate) fn resolve_relaxed(&self, operand: &Operand) -> Result<Value, RuntimeError> {
        match operand {
            Operand::Literal(value) => Ok(value.clone()),
            Operand::Var(var) => {
                let slot = self.frames.lookup(var).map_err(|e| self.storage_err(e))?;
                Ok(slot.binding().cloned().unwrap_or(Value::Untyped))
            }
            Operand::Label(_) | Operand::Type(_) => Err(self.malformed()),
        }
    }

    /// Resolve the symbol at operand position `idx` for reading.
    pub(crate) fn resolve_at(
        &self,
        instr: &Instruction,
        idx: usize,
    ) -> Result<Value, RuntimeError> {
        let operand = self.symbol_operand(instr, idx)?;
        self.resolve(operand)
    }

    /// Rebind a variable. Requires the variable to be declared; never
    /// requires an existing binding.
    pub(crate) fn assign(&mut self, var: &VarRef, value: Value) -> Result<(), RuntimeError> {
        let order = self.order();
        let slot = self
            .frames
            .lookup_mut(var)
            .map_err(|e| with_order(e, order))?;
        slot.bind(value);
        Ok(())
    }

    // ---- Stacks and control ----

    /// Pop the data stack, failing if it is empty.
    pub(crate) fn pop_data(&mut self) -> Result<Value, RuntimeError> {
        self.data_stack.pop().ok_or(RuntimeError::DataStackEmpty {
            order: self.order(),
        })
    }

    /// Transfer target for a label. The front-end validates every target,
    /// so a miss signals a broken contract rather than a program fault.
    pub(crate) fn jump_target(&self, name: &str) -> Result<usize, RuntimeError> {
        self.labels
            .target(name)
            .ok_or_else(|| RuntimeError::UndefinedLabel {
                name: name.to_string(),
                order: self.order(),
            })
    }

    // ---- Input ----

    /// Read one input line, without its line terminator. `None` on
    /// end-of-stream (exhaustion is not an error).
    pub(crate) fn read_line(&mut self) -> Result<Option<String>, RuntimeError> {
        let mut line = String::new();
        let read = match self.input.read_line(&mut line) {
            Ok(n) => n,
            Err(e) => return Err(self.io_err(e)),
        };
        if read == 0 {
            return Ok(None);
        }
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(Some(line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use framecode_common::{FrameSelector, Opcode};
    use std::io::Cursor;

    fn empty_program() -> (Program, LabelTable) {
        let program = Program::new(vec![]);
        let labels = LabelTable::build(&program).unwrap();
        (program, labels)
    }

    fn interp<'p>(
        program: &'p Program,
        labels: &'p LabelTable,
    ) -> Interpreter<'p, Cursor<Vec<u8>>, Vec<u8>, Vec<u8>> {
        Interpreter::new(program, labels, Cursor::new(Vec::new()), Vec::new(), Vec::new())
    }

    #[test]
    fn resolve_literal_copies_value() {
        let (program, labels) = empty_program();
        let machine = interp(&program, &labels);
        let operand = Operand::Literal(Value::Int(7));
        assert_eq!(machine.resolve(&operand), Ok(Value::Int(7)));
    }

    #[test]
    fn resolve_unbound_variable_fails_strictly() {
        let (program, labels) = empty_program();
        let mut machine = interp(&program, &labels);
        let var = VarRef::new(FrameSelector::Global, "x");
        machine.frames.declare(&var).unwrap();

        let operand = Operand::Var(var);
        assert_eq!(
            machine.resolve(&operand),
            Err(RuntimeError::UninitializedValue {
                name: "GF@x".into(),
                order: 1
            })
        );
        assert_eq!(machine.resolve_relaxed(&operand), Ok(Value::Untyped));
    }

    #[test]
    fn pop_empty_data_stack_fails() {
        let (program, labels) = empty_program();
        let mut machine = interp(&program, &labels);
        assert_eq!(
            machine.pop_data(),
            Err(RuntimeError::DataStackEmpty { order: 1 })
        );
    }

    #[test]
    fn operand_accessor_rejects_wrong_kind() {
        let (program, labels) = empty_program();
        let machine = interp(&program, &labels);
        let instr = Instruction::new(Opcode::Write, vec![Operand::Label("oops".into())]);
        assert_eq!(
            machine.symbol_operand(&instr, 0),
            Err(RuntimeError::MalformedOperands { order: 1 })
        );
    }

    #[test]
    fn read_line_strips_terminators_and_signals_eof() {
        let (program, labels) = empty_program();
        let mut machine = Interpreter::new(
            &program,
            &labels,
            Cursor::new(b"one\r\ntwo\n".to_vec()),
            Vec::new(),
            Vec::new(),
        );
        assert_eq!(machine.read_line(), Ok(Some("one".into())));
        assert_eq!(machine.read_line(), Ok(Some("two".into())));
        assert_eq!(machine.read_line(), Ok(None));
    }
}
