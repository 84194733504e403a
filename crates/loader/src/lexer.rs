//! Line tokenizer for FrameCode source text.

/// Split one source line into whitespace-separated tokens.
///
/// Returns an empty Vec for blank lines and comment-only lines. Comments
/// start with `#` and extend to end of line; a literal `#` inside a string
/// must be written as the `\035` escape, so the cut never splits a token.
pub(crate) fn tokenize_line(line: &str) -> Vec<&str> {
    let line = match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    };
    line.split_whitespace().collect()
}
