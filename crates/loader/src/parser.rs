//! Parser for FrameCode source tokens → instructions.
//!
//! Dispatches on the opcode's operand signature; each operand token is
//! checked against the kind the signature demands.

use crate::error::LoadError;
use framecode_common::{
    FrameSelector, Instruction, Opcode, Operand, OperandKind, TypeTag, Value, VarRef,
};

/// Parse one line's tokens into an instruction.
///
/// Returns `Ok(None)` for blank and comment-only lines (empty token list).
pub(crate) fn parse_line(
    tokens: &[&str],
    line_num: usize,
) -> Result<Option<Instruction>, LoadError> {
    let Some((&head, rest)) = tokens.split_first() else {
        return Ok(None);
    };

    let mnemonic = head.to_ascii_uppercase();
    let opcode = Opcode::from_mnemonic(&mnemonic).ok_or_else(|| LoadError::UnknownOpcode {
        line: line_num,
        token: head.to_string(),
    })?;

    let signature = opcode.signature();
    if rest.len() != signature.len() {
        return Err(LoadError::WrongOperandCount {
            line: line_num,
            mnemonic: opcode.mnemonic(),
            expected: signature.len(),
            found: rest.len(),
        });
    }

    let operands = signature
        .iter()
        .zip(rest)
        .map(|(kind, token)| parse_operand(*kind, token, line_num))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Some(Instruction::new(opcode, operands)))
}

fn parse_operand(kind: OperandKind, token: &str, line: usize) -> Result<Operand, LoadError> {
    match kind {
        OperandKind::Var => parse_var(token, line).map(Operand::Var),
        OperandKind::Symbol => parse_symbol(token, line),
        OperandKind::Label => parse_label(token, line),
        OperandKind::Type => match TypeTag::from_name(token) {
            Some(tag) => Ok(Operand::Type(tag)),
            None => Err(bad_operand(token, line)),
        },
    }
}

/// A symbol is a variable reference or a typed literal, told apart by the
/// text before the `@`.
fn parse_symbol(token: &str, line: usize) -> Result<Operand, LoadError> {
    let Some((prefix, payload)) = token.split_once('@') else {
        return Err(bad_operand(token, line));
    };
    if FrameSelector::from_prefix(prefix).is_some() {
        return parse_var(token, line).map(Operand::Var);
    }
    let value = match prefix {
        "int" => Value::Int(payload.parse().map_err(|_| bad_literal(token, line))?),
        "bool" => match payload {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            _ => return Err(bad_literal(token, line)),
        },
        "string" => Value::Str(decode_string(payload, token, line)?),
        _ => return Err(bad_operand(token, line)),
    };
    Ok(Operand::Literal(value))
}

fn parse_var(token: &str, line: usize) -> Result<VarRef, LoadError> {
    let Some((prefix, name)) = token.split_once('@') else {
        return Err(bad_operand(token, line));
    };
    let selector = FrameSelector::from_prefix(prefix).ok_or_else(|| bad_operand(token, line))?;
    if !is_identifier(name) {
        return Err(bad_operand(token, line));
    }
    Ok(VarRef::new(selector, name))
}

fn parse_label(token: &str, line: usize) -> Result<Operand, LoadError> {
    if !is_identifier(token) {
        return Err(bad_operand(token, line));
    }
    Ok(Operand::Label(token.to_string()))
}

/// Variable and label names: a letter or one of `_ - $ & % *` first, then
/// those plus digits.
fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    is_name_char(first) && !first.is_ascii_digit() && chars.all(is_name_char)
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '$' | '&' | '%' | '*')
}

/// Decode a string literal payload. `\` introduces exactly three decimal
/// digits naming a code point; everything else is taken verbatim.
fn decode_string(payload: &str, token: &str, line: usize) -> Result<String, LoadError> {
    let mut out = String::with_capacity(payload.len());
    let mut chars = payload.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let mut code = 0u32;
        for _ in 0..3 {
            let digit = chars
                .next()
                .and_then(|d| d.to_digit(10))
                .ok_or_else(|| bad_literal(token, line))?;
            code = code * 10 + digit;
        }
        out.push(char::from_u32(code).ok_or_else(|| bad_literal(token, line))?);
    }
    Ok(out)
}

fn bad_operand(token: &str, line: usize) -> LoadError {
    LoadError::BadOperand {
        line,
        token: token.to_string(),
    }
}

fn bad_literal(token: &str, line: usize) -> LoadError {
    LoadError::BadLiteral {
        line,
        token: token.to_string(),
    }
}
