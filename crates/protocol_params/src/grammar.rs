//! Lexical rules shared by both protocol dialects
//!
//! Both grammars are line oriented. A [`LineCursor`] walks the lines of a
//! text, skipping blank and `#` comment lines and remembering 1-based line
//! numbers for error reporting. Right-hand sides of assignments go through
//! [`classify`], which decides between string, integer, float and sequence.

use crate::error::{ParseError, Result};
use crate::types::ParameterValue;
use once_cell::sync::Lazy;
use regex::Regex;

/// First non-blank character of a comment line
pub const COMMENT_MARKER: char = '#';

static NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_]+(\[\d+\])*(\.[A-Za-z0-9_]+(\[\d+\])*)*$").expect("valid name regex")
});

static INT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[+-]?\d+$").expect("valid int regex"));

static FLOAT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?$").expect("valid float regex")
});

/// A non-ignorable line: its 1-based number and trimmed content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    pub number: usize,
    pub text: &'a str,
}

/// Explicit position into the lines of a text.
///
/// Parsers pass the cursor down through recursive calls instead of keeping
/// global state, so each parse is self-contained.
#[derive(Debug)]
pub struct LineCursor<'a> {
    lines: Vec<&'a str>,
    pos: usize,
}

impl<'a> LineCursor<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines().collect(),
            pos: 0,
        }
    }

    /// Next line that is neither blank nor a comment
    pub fn next_line(&mut self) -> Option<Line<'a>> {
        while self.pos < self.lines.len() {
            let number = self.pos + 1;
            let text = self.lines[self.pos].trim();
            self.pos += 1;
            if !is_ignorable(text) {
                return Some(Line { number, text });
            }
        }
        None
    }

    /// Number of the last line in the text, for end-of-input errors
    pub fn last_line_number(&self) -> usize {
        self.lines.len()
    }
}

pub fn is_ignorable(line: &str) -> bool {
    let line = line.trim();
    line.is_empty() || line.starts_with(COMMENT_MARKER)
}

/// Whether `name` is a canonical parameter name such as `TR` or `SLAB[1].THICK`
pub fn is_valid_name(name: &str) -> bool {
    NAME_RE.is_match(name)
}

/// Split `NAME VALUE` or `NAME = VALUE` into its two halves.
///
/// Returns `None` when there is no separator or the value is empty.
pub fn split_assignment(text: &str) -> Option<(&str, &str)> {
    let text = text.trim();
    let split_at = text.find(|c: char| c.is_whitespace() || c == '=')?;
    let (name, rest) = text.split_at(split_at);
    let rest = rest.trim_start();
    let rest = rest.strip_prefix('=').unwrap_or(rest).trim();
    if name.is_empty() || rest.is_empty() {
        return None;
    }
    Some((name, rest))
}

/// Classify the right-hand side of an assignment.
///
/// - `"..."` is a string, even when the contents look numeric; text after
///   the closing quote is ignored
/// - `[a, b, c]` is a sequence of classified items
/// - a bare integer or float token is numeric, unless it overflows to infinity
/// - anything else is a string
pub fn classify(raw: &str, line: usize) -> Result<ParameterValue> {
    let raw = raw.trim();
    if raw.starts_with('[') {
        let inner = raw
            .strip_suffix(']')
            .map(|s| &s[1..])
            .ok_or_else(|| ParseError::syntax(line, "unterminated '[' list"))?;
        return classify_list(inner, line);
    }
    classify_scalar(raw, line)
}

fn classify_list(inner: &str, line: usize) -> Result<ParameterValue> {
    if inner.trim().is_empty() {
        return Ok(ParameterValue::Seq(Vec::new()));
    }
    let items = split_list_items(inner, line)?
        .into_iter()
        .map(|item| {
            if item.is_empty() {
                Err(ParseError::syntax(line, "empty item in list"))
            } else {
                classify_scalar(item, line)
            }
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(ParameterValue::Seq(items))
}

/// Split on commas that are not inside double quotes
fn split_list_items(inner: &str, line: usize) -> Result<Vec<&str>> {
    let mut items = Vec::new();
    let mut in_quotes = false;
    let mut start = 0;
    for (i, c) in inner.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                items.push(inner[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    if in_quotes {
        return Err(ParseError::syntax(line, "unterminated string in list"));
    }
    items.push(inner[start..].trim());
    Ok(items)
}

fn classify_scalar(raw: &str, line: usize) -> Result<ParameterValue> {
    if let Some(rest) = raw.strip_prefix('"') {
        let end = rest
            .find('"')
            .ok_or_else(|| ParseError::syntax(line, format!("unterminated string: {}", raw)))?;
        return Ok(ParameterValue::Str(rest[..end].to_string()));
    }
    if INT_RE.is_match(raw) {
        // Out of i64 range still reads as a number
        if let Ok(i) = raw.parse::<i64>() {
            return Ok(ParameterValue::Int(i));
        }
        return float_or_text(raw, line);
    }
    if FLOAT_RE.is_match(raw) {
        return float_or_text(raw, line);
    }
    Ok(ParameterValue::Str(raw.to_string()))
}

/// `Float` for finite values; a token that overflows keeps its text
fn float_or_text(raw: &str, line: usize) -> Result<ParameterValue> {
    let value = raw
        .parse::<f64>()
        .map_err(|e| ParseError::syntax(line, format!("bad number '{}': {}", raw, e)))?;
    if value.is_finite() {
        Ok(ParameterValue::Float(value))
    } else {
        Ok(ParameterValue::Str(raw.to_string()))
    }
}

/// Join a group prefix and a member name into a dotted path
pub fn join_name(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}
