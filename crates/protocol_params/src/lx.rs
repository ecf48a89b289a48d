//! LxProtocol grammar
//!
//! LxProtocol files carry one `set NAME VALUE` statement per line, usually
//! indented. Grouped parameters are already spelled as flat canonical names
//! (`set SLAB[0].THICK 5`), so no nesting is tracked here.

use crate::error::{ParseError, Result};
use crate::grammar::{classify, is_valid_name, LineCursor};
use crate::types::ParameterTable;
use once_cell::sync::Lazy;
use regex::Regex;

static SET_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^set\s+(\S+)\s+(.+)$").expect("valid set regex"));

pub(crate) fn parse_lx(text: &str) -> Result<ParameterTable> {
    if !text.lines().any(|line| SET_RE.is_match(line.trim())) {
        return Err(ParseError::unsupported(
            "no 'set NAME VALUE' statements found in LxProtocol text",
        ));
    }

    let mut cursor = LineCursor::new(text);
    let mut table = ParameterTable::new();

    while let Some(line) = cursor.next_line() {
        let caps = SET_RE.captures(line.text).ok_or_else(|| {
            ParseError::syntax(
                line.number,
                format!("expected 'set NAME VALUE', found '{}'", line.text),
            )
        })?;
        let name = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
        let raw = caps.get(2).map(|m| m.as_str()).unwrap_or_default();

        if !is_valid_name(name) {
            return Err(ParseError::syntax(
                line.number,
                format!("invalid parameter name '{}'", name),
            ));
        }

        let value = classify(raw, line.number)?;
        if table.insert(name, value).is_some() {
            tracing::debug!(
                "Parameter {} redefined at line {}; keeping the later value",
                name,
                line.number
            );
        }
    }

    Ok(table)
}
