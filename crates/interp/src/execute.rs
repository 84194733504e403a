//! Main execution loop and opcode dispatch for the FrameCode interpreter.

use crate::error::RuntimeError;
use crate::frames::Frame;
use crate::machine::{Flow, Interpreter};
use framecode_common::{Instruction, Opcode, TypeTag, Value};
use std::cmp::Ordering;
use std::io::{BufRead, Write};

impl<'p, R: BufRead, W: Write, D: Write> Interpreter<'p, R, W, D> {
    /// Drive the fetch-execute cycle until the program position exceeds the
    /// program length or an instruction fails.
    ///
    /// Failure is fatal: no instruction after the failing one runs, and no
    /// partial rollback of already-applied mutations is attempted.
    pub fn execute(&mut self) -> Result<(), RuntimeError> {
        let program = self.program;
        while let Some(instr) = program.instructions.get(self.pc) {
            self.executed += 1;
            match self.step(instr)? {
                Flow::Continue => self.pc += 1,
                Flow::Jump(target) => self.pc = target,
            }
        }
        Ok(())
    }

    /// Execute one instruction.
    fn step(&mut self, instr: &Instruction) -> Result<Flow, RuntimeError> {
        match instr.opcode {
            // Frames and variables
            Opcode::Move => self.exec_move(instr),
            Opcode::CreateFrame => {
                self.frames.create_temporary();
                Ok(Flow::Continue)
            }
            Opcode::PushFrame => {
                self.frames
                    .push_temporary()
                    .map_err(|e| self.storage_err(e))?;
                Ok(Flow::Continue)
            }
            Opcode::PopFrame => {
                self.frames.pop_local().map_err(|e| self.storage_err(e))?;
                Ok(Flow::Continue)
            }
            Opcode::DefVar => self.exec_defvar(instr),

            // Call control
            Opcode::Call => self.exec_call(instr),
            Opcode::Return => self.exec_return(),

            // Data stack
            Opcode::PushS => self.exec_pushs(instr),
            Opcode::PopS => self.exec_pops(instr),

            // Arithmetic
            Opcode::Add => self.exec_arith(instr, i64::wrapping_add),
            Opcode::Sub => self.exec_arith(instr, i64::wrapping_sub),
            Opcode::Mul => self.exec_arith(instr, i64::wrapping_mul),
            Opcode::IDiv => self.exec_idiv(instr),

            // Relational
            Opcode::Lt => self.exec_compare(instr, Ordering::is_lt),
            Opcode::Gt => self.exec_compare(instr, Ordering::is_gt),
            Opcode::Eq => self.exec_compare(instr, Ordering::is_eq),

            // Logical
            Opcode::And => self.exec_logic(instr, |a, b| a && b),
            Opcode::Or => self.exec_logic(instr, |a, b| a || b),
            Opcode::Not => self.exec_not(instr),

            // Conversions
            Opcode::IntToChar => self.exec_int_to_char(instr),
            Opcode::StrToInt => self.exec_str_to_int(instr),

            // Input/output
            Opcode::Read => self.exec_read(instr),
            Opcode::Write => self.exec_write(instr),

            // Strings
            Opcode::Concat => self.exec_concat(instr),
            Opcode::StrLen => self.exec_strlen(instr),
            Opcode::GetChar => self.exec_getchar(instr),
            Opcode::SetChar => self.exec_setchar(instr),

            // Introspection
            Opcode::TypeOf => self.exec_typeof(instr),

            // Control transfer
            Opcode::Label => Ok(Flow::Continue),
            Opcode::Jump => {
                let name = self.label_operand(instr, 0)?;
                Ok(Flow::Jump(self.jump_target(name)?))
            }
            Opcode::JumpIfEq => self.exec_jump_if(instr, true),
            Opcode::JumpIfNeq => self.exec_jump_if(instr, false),

            // Diagnostics
            Opcode::DPrint => self.exec_dprint(instr),
            Opcode::Break => self.exec_break(),
        }
    }

    // ---- Frames and variables ----

    fn exec_move(&mut self, instr: &Instruction) -> Result<Flow, RuntimeError> {
        let dst = self.var_operand(instr, 0)?;
        let value = self.resolve_at(instr, 1)?;
        self.assign(dst, value)?;
        Ok(Flow::Continue)
    }

    fn exec_defvar(&mut self, instr: &Instruction) -> Result<Flow, RuntimeError> {
        let var = self.var_operand(instr, 0)?;
        let order = self.order();
        self.frames
            .declare(var)
            .map_err(|e| crate::machine::with_order(e, order))?;
        Ok(Flow::Continue)
    }

    // ---- Call control ----

    fn exec_call(&mut self, instr: &Instruction) -> Result<Flow, RuntimeError> {
        let name = self.label_operand(instr, 0)?;
        let target = self.jump_target(name)?;
        self.call_stack.push(self.pc + 1);
        Ok(Flow::Jump(target))
    }

    fn exec_return(&mut self) -> Result<Flow, RuntimeError> {
        // An unbalanced RETURN is an error, not a fall-through.
        let resume = self.call_stack.pop().ok_or(RuntimeError::CallStackEmpty {
            order: self.order(),
        })?;
        Ok(Flow::Jump(resume))
    }

    // ---- Data stack ----

    fn exec_pushs(&mut self, instr: &Instruction) -> Result<Flow, RuntimeError> {
        let value = self.resolve_at(instr, 0)?;
        self.data_stack.push(value);
        Ok(Flow::Continue)
    }

    fn exec_pops(&mut self, instr: &Instruction) -> Result<Flow, RuntimeError> {
        let dst = self.var_operand(instr, 0)?;
        let value = self.pop_data()?;
        self.assign(dst, value)?;
        Ok(Flow::Continue)
    }

    // ---- Arithmetic ----

    fn exec_arith(
        &mut self,
        instr: &Instruction,
        op: fn(i64, i64) -> i64,
    ) -> Result<Flow, RuntimeError> {
        let dst = self.var_operand(instr, 0)?;
        let (a, b) = self.int_pair(instr)?;
        self.assign(dst, Value::Int(op(a, b)))?;
        Ok(Flow::Continue)
    }

    fn exec_idiv(&mut self, instr: &Instruction) -> Result<Flow, RuntimeError> {
        let dst = self.var_operand(instr, 0)?;
        let (a, b) = self.int_pair(instr)?;
        if b == 0 {
            return Err(RuntimeError::DivisionByZero {
                order: self.order(),
            });
        }
        // wrapping_div: i64::MIN / -1 wraps instead of trapping.
        self.assign(dst, Value::Int(a.wrapping_div(b)))?;
        Ok(Flow::Continue)
    }

    /// Resolve operands 1 and 2, requiring both to be integers.
    fn int_pair(&self, instr: &Instruction) -> Result<(i64, i64), RuntimeError> {
        let a = self.resolve_at(instr, 1)?;
        let b = self.resolve_at(instr, 2)?;
        match (a, b) {
            (Value::Int(a), Value::Int(b)) => Ok((a, b)),
            _ => Err(self.type_mismatch()),
        }
    }

    fn type_mismatch(&self) -> RuntimeError {
        RuntimeError::OperandTypeMismatch {
            order: self.order(),
        }
    }

    // ---- Relational ----

    fn exec_compare(
        &mut self,
        instr: &Instruction,
        pred: fn(Ordering) -> bool,
    ) -> Result<Flow, RuntimeError> {
        let dst = self.var_operand(instr, 0)?;
        let a = self.resolve_at(instr, 1)?;
        let b = self.resolve_at(instr, 2)?;
        let ordering = same_type_ordering(&a, &b).ok_or_else(|| self.type_mismatch())?;
        self.assign(dst, Value::Bool(pred(ordering)))?;
        Ok(Flow::Continue)
    }

    // ---- Logical ----

    fn exec_logic(
        &mut self,
        instr: &Instruction,
        op: fn(bool, bool) -> bool,
    ) -> Result<Flow, RuntimeError> {
        let dst = self.var_operand(instr, 0)?;
        let a = self.resolve_at(instr, 1)?;
        let b = self.resolve_at(instr, 2)?;
        match (a, b) {
            (Value::Bool(a), Value::Bool(b)) => {
                self.assign(dst, Value::Bool(op(a, b)))?;
                Ok(Flow::Continue)
            }
            _ => Err(self.type_mismatch()),
        }
    }

    fn exec_not(&mut self, instr: &Instruction) -> Result<Flow, RuntimeError> {
        let dst = self.var_operand(instr, 0)?;
        match self.resolve_at(instr, 1)? {
            Value::Bool(b) => {
                self.assign(dst, Value::Bool(!b))?;
                Ok(Flow::Continue)
            }
            _ => Err(self.type_mismatch()),
        }
    }

    // ---- Conversions ----

    fn exec_int_to_char(&mut self, instr: &Instruction) -> Result<Flow, RuntimeError> {
        let dst = self.var_operand(instr, 0)?;
        let value = match self.resolve_at(instr, 1)? {
            Value::Int(n) => n,
            _ => return Err(self.type_mismatch()),
        };
        let ch = u32::try_from(value)
            .ok()
            .and_then(char::from_u32)
            .ok_or(RuntimeError::CodepointOutOfRange {
                value,
                order: self.order(),
            })?;
        self.assign(dst, Value::Str(ch.to_string()))?;
        Ok(Flow::Continue)
    }

    fn exec_str_to_int(&mut self, instr: &Instruction) -> Result<Flow, RuntimeError> {
        let dst = self.var_operand(instr, 0)?;
        let ch = self.char_at(instr)?;
        self.assign(dst, Value::Int(ch as i64))?;
        Ok(Flow::Continue)
    }

    // ---- Input/output ----

    fn exec_read(&mut self, instr: &Instruction) -> Result<Flow, RuntimeError> {
        let dst = self.var_operand(instr, 0)?;
        let requested = self.type_operand(instr, 1)?;
        let line = self.read_line()?;
        // Exhausted input degrades to a default; it is not an error.
        let value = match requested {
            TypeTag::Int => Value::Int(
                line.and_then(|l| l.trim().parse::<i64>().ok())
                    .unwrap_or(0),
            ),
            TypeTag::Bool => Value::Bool(
                line.map(|l| l.trim().eq_ignore_ascii_case("true"))
                    .unwrap_or(false),
            ),
            TypeTag::Str => Value::Str(line.unwrap_or_default()),
        };
        self.assign(dst, value)?;
        Ok(Flow::Continue)
    }

    fn exec_write(&mut self, instr: &Instruction) -> Result<Flow, RuntimeError> {
        let operand = self.symbol_operand(instr, 0)?;
        // An unbound variable prints as the empty string.
        let value = self.resolve_relaxed(operand)?;
        writeln!(self.output, "{value}").map_err(|e| self.io_err(e))?;
        Ok(Flow::Continue)
    }

    // ---- Strings ----

    fn exec_concat(&mut self, instr: &Instruction) -> Result<Flow, RuntimeError> {
        let dst = self.var_operand(instr, 0)?;
        let a = self.resolve_at(instr, 1)?;
        let b = self.resolve_at(instr, 2)?;
        match (a, b) {
            (Value::Str(mut a), Value::Str(b)) => {
                a.push_str(&b);
                self.assign(dst, Value::Str(a))?;
                Ok(Flow::Continue)
            }
            _ => Err(self.type_mismatch()),
        }
    }

    fn exec_strlen(&mut self, instr: &Instruction) -> Result<Flow, RuntimeError> {
        let dst = self.var_operand(instr, 0)?;
        match self.resolve_at(instr, 1)? {
            Value::Str(s) => {
                self.assign(dst, Value::Int(s.chars().count() as i64))?;
                Ok(Flow::Continue)
            }
            _ => Err(self.type_mismatch()),
        }
    }

    fn exec_getchar(&mut self, instr: &Instruction) -> Result<Flow, RuntimeError> {
        let dst = self.var_operand(instr, 0)?;
        let ch = self.char_at(instr)?;
        self.assign(dst, Value::Str(ch.to_string()))?;
        Ok(Flow::Continue)
    }

    /// Shared by GETCHAR and STRI2INT: operand 1 is a string, operand 2 an
    /// index into it, checked against `[0, length)` in code points.
    fn char_at(&self, instr: &Instruction) -> Result<char, RuntimeError> {
        let s = match self.resolve_at(instr, 1)? {
            Value::Str(s) => s,
            _ => return Err(self.type_mismatch()),
        };
        let index = match self.resolve_at(instr, 2)? {
            Value::Int(i) => i,
            _ => return Err(self.type_mismatch()),
        };
        usize::try_from(index)
            .ok()
            .and_then(|i| s.chars().nth(i))
            .ok_or(RuntimeError::IndexOutOfRange {
                index,
                length: s.chars().count(),
                order: self.order(),
            })
    }

    fn exec_setchar(&mut self, instr: &Instruction) -> Result<Flow, RuntimeError> {
        let dst = self.var_operand(instr, 0)?;
        let current = self
            .frames
            .lookup(dst)
            .map_err(|e| self.storage_err(e))?
            .binding()
            .cloned();
        // The destination must already hold a string; an unbound slot has
        // no type and fails the same check.
        let current = match current {
            Some(Value::Str(s)) => s,
            _ => return Err(self.type_mismatch()),
        };
        let index = match self.resolve_at(instr, 1)? {
            Value::Int(i) => i,
            _ => return Err(self.type_mismatch()),
        };
        let replacement = match self.resolve_at(instr, 2)? {
            Value::Str(s) => s,
            _ => return Err(self.type_mismatch()),
        };
        let Some(replacement_char) = replacement.chars().next() else {
            return Err(RuntimeError::EmptyReplacement {
                order: self.order(),
            });
        };
        let length = current.chars().count();
        let position = usize::try_from(index)
            .ok()
            .filter(|&i| i < length)
            .ok_or(RuntimeError::IndexOutOfRange {
                index,
                length,
                order: self.order(),
            })?;
        let rebound: String = current
            .chars()
            .enumerate()
            .map(|(i, ch)| if i == position { replacement_char } else { ch })
            .collect();
        self.assign(dst, Value::Str(rebound))?;
        Ok(Flow::Continue)
    }

    // ---- Introspection ----

    fn exec_typeof(&mut self, instr: &Instruction) -> Result<Flow, RuntimeError> {
        let dst = self.var_operand(instr, 0)?;
        let operand = self.symbol_operand(instr, 1)?;
        let value = self.resolve_relaxed(operand)?;
        self.assign(dst, Value::Str(value.type_name().to_string()))?;
        Ok(Flow::Continue)
    }

    // ---- Control transfer ----

    fn exec_jump_if(&mut self, instr: &Instruction, on_equal: bool) -> Result<Flow, RuntimeError> {
        let name = self.label_operand(instr, 0)?;
        let target = self.jump_target(name)?;
        let a = self.resolve_at(instr, 1)?;
        let b = self.resolve_at(instr, 2)?;
        if a.type_tag() != b.type_tag() {
            return Err(self.type_mismatch());
        }
        if (a == b) == on_equal {
            Ok(Flow::Jump(target))
        } else {
            Ok(Flow::Continue)
        }
    }

    // ---- Diagnostics ----
    //
    // DPRINT and BREAK write to the side channel only and never alter
    // control flow or fail the program; write failures are ignored.

    fn exec_dprint(&mut self, instr: &Instruction) -> Result<Flow, RuntimeError> {
        let operand = self.symbol_operand(instr, 0)?;
        match self.resolve_relaxed(operand) {
            Ok(value) => {
                let _ = writeln!(self.diag, "{value}");
            }
            Err(err) => {
                let _ = writeln!(self.diag, "{err}");
            }
        }
        Ok(Flow::Continue)
    }

    fn exec_break(&mut self) -> Result<Flow, RuntimeError> {
        let order = self.order();
        let executed = self.executed;
        let diag = &mut self.diag;
        let _ = writeln!(diag, "BREAK at order {order}, {executed} instructions processed");
        dump_frame(diag, "GF", Some(self.frames.global()));
        dump_frame(diag, "LF", self.frames.local());
        dump_frame(diag, "TF", self.frames.temporary());
        let _ = writeln!(diag, "data stack (top last):");
        for value in &self.data_stack {
            let _ = writeln!(diag, "  ({}) {value}", value.type_name());
        }
        Ok(Flow::Continue)
    }
}

/// Ordering of two values of the same type: numeric for integers,
/// `false < true` for booleans, code-point lexicographic for strings.
fn same_type_ordering(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

fn dump_frame<D: Write>(diag: &mut D, name: &str, frame: Option<&Frame>) {
    match frame {
        Some(frame) => {
            let _ = writeln!(diag, "{name}:");
            for var in frame.iter() {
                match var.binding() {
                    Some(value) => {
                        let _ = writeln!(diag, "  {} ({}) {value}", var.name(), value.type_name());
                    }
                    None => {
                        let _ = writeln!(diag, "  {} unbound", var.name());
                    }
                }
            }
        }
        None => {
            let _ = writeln!(diag, "{name}: (none)");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_requires_matching_types() {
        assert_eq!(
            same_type_ordering(&Value::Int(1), &Value::Int(2)),
            Some(Ordering::Less)
        );
        assert_eq!(
            same_type_ordering(&Value::Bool(false), &Value::Bool(true)),
            Some(Ordering::Less)
        );
        assert_eq!(
            same_type_ordering(&Value::Str("a".into()), &Value::Str("b".into())),
            Some(Ordering::Less)
        );
        assert_eq!(same_type_ordering(&Value::Int(1), &Value::Bool(true)), None);
    }

    #[test]
    fn string_ordering_is_by_code_point() {
        assert_eq!(
            same_type_ordering(&Value::Str("abc".into()), &Value::Str("abd".into())),
            Some(Ordering::Less)
        );
        // 'é' (U+00E9) sorts after every ASCII letter.
        assert_eq!(
            same_type_ordering(&Value::Str("z".into()), &Value::Str("é".into())),
            Some(Ordering::Less)
        );
    }
}
