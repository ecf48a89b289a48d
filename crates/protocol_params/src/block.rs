//! Grammar of the text inflated from the GE protocol data block
//!
//! ```text
//! # comment
//! PSEQ "FSE"
//! TR 2000
//! PREP {
//!     MODE "auto"
//! }
//! SLAB[2] {
//!     {
//!         THICK 5
//!     }
//!     {
//!         THICK 3.5
//!     }
//! }
//! ```
//!
//! flattens to `PSEQ`, `TR`, `PREP.MODE`, `SLAB[0].THICK`, `SLAB[1].THICK`.

use crate::error::{ParseError, Result};
use crate::grammar::{classify, is_valid_name, join_name, split_assignment, Line, LineCursor};
use crate::types::ParameterTable;
use once_cell::sync::Lazy;
use regex::Regex;

/// Maximum nesting of groups
const MAX_DEPTH: usize = 64;

static GROUP_OPEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z0-9_]+)(?:\[(\d+)\])?\s*\{$").expect("valid group regex")
});

#[derive(Debug, PartialEq)]
enum BlockLine<'a> {
    GroupOpen { name: &'a str, count: Option<usize> },
    ItemOpen,
    Close,
    Assign { name: &'a str, value: &'a str },
}

fn classify_line(line: Line<'_>) -> Result<BlockLine<'_>> {
    match line.text {
        "{" => return Ok(BlockLine::ItemOpen),
        "}" => return Ok(BlockLine::Close),
        _ => {}
    }

    if let Some(caps) = GROUP_OPEN_RE.captures(line.text) {
        let name = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
        let count = match caps.get(2) {
            Some(m) => Some(m.as_str().parse::<usize>().map_err(|e| {
                ParseError::syntax(line.number, format!("bad repeat count: {}", e))
            })?),
            None => None,
        };
        return Ok(BlockLine::GroupOpen { name, count });
    }

    let (name, value) = split_assignment(line.text).ok_or_else(|| {
        ParseError::syntax(line.number, format!("expected NAME VALUE, found '{}'", line.text))
    })?;
    if !is_valid_name(name) {
        return Err(ParseError::syntax(
            line.number,
            format!("invalid parameter name '{}'", name),
        ));
    }
    Ok(BlockLine::Assign { name, value })
}

pub(crate) fn parse_block(text: &str) -> Result<ParameterTable> {
    let mut cursor = LineCursor::new(text);
    let mut table = ParameterTable::new();
    parse_members(&mut cursor, "", None, 0, &mut table)?;
    Ok(table)
}

/// Parse assignments and groups until the closing `}` of the current group,
/// or end of input at top level.
fn parse_members(
    cursor: &mut LineCursor<'_>,
    prefix: &str,
    opened_at: Option<usize>,
    depth: usize,
    table: &mut ParameterTable,
) -> Result<()> {
    loop {
        let Some(line) = cursor.next_line() else {
            return match opened_at {
                None => Ok(()),
                Some(open) => Err(unclosed(cursor, prefix, open)),
            };
        };

        match classify_line(line)? {
            BlockLine::Close => {
                return match opened_at {
                    Some(_) => Ok(()),
                    None => Err(ParseError::syntax(line.number, "unbalanced '}'")),
                };
            }
            BlockLine::ItemOpen => {
                return Err(ParseError::syntax(
                    line.number,
                    "item block '{' outside a repeated group",
                ));
            }
            BlockLine::GroupOpen { name, count } => {
                if depth + 1 > MAX_DEPTH {
                    return Err(ParseError::syntax(line.number, "groups nested too deeply"));
                }
                let path = join_name(prefix, name);
                match count {
                    None => parse_members(cursor, &path, Some(line.number), depth + 1, table)?,
                    Some(count) => {
                        parse_repeated(cursor, &path, count, line.number, depth + 1, table)?
                    }
                }
            }
            BlockLine::Assign { name, value } => {
                let value = classify(value, line.number)?;
                let path = join_name(prefix, name);
                if table.insert(path.as_str(), value).is_some() {
                    tracing::debug!(
                        "Parameter {} redefined at line {}; keeping the later value",
                        path,
                        line.number
                    );
                }
            }
        }
    }
}

/// Parse the `{ .. }` items of `NAME[COUNT] { .. }` up to its closing `}`
fn parse_repeated(
    cursor: &mut LineCursor<'_>,
    base: &str,
    count: usize,
    opened_at: usize,
    depth: usize,
    table: &mut ParameterTable,
) -> Result<()> {
    let mut index = 0;
    loop {
        let Some(line) = cursor.next_line() else {
            return Err(unclosed(cursor, base, opened_at));
        };

        match classify_line(line)? {
            BlockLine::ItemOpen => {
                if index >= count {
                    return Err(ParseError::syntax(
                        line.number,
                        format!("{} declares {} items but has more", base, count),
                    ));
                }
                let item = format!("{}[{}]", base, index);
                parse_members(cursor, &item, Some(line.number), depth, table)?;
                index += 1;
            }
            BlockLine::Close => {
                if index != count {
                    return Err(ParseError::syntax(
                        line.number,
                        format!("{} declares {} items but has {}", base, count, index),
                    ));
                }
                return Ok(());
            }
            _ => {
                return Err(ParseError::syntax(
                    line.number,
                    format!("expected '{{' or '}}' inside repeated group {}", base),
                ));
            }
        }
    }
}

fn unclosed(cursor: &LineCursor<'_>, name: &str, opened_at: usize) -> ParseError {
    ParseError::syntax(
        cursor.last_line_number(),
        format!(
            "unexpected end of input: group '{}' opened at line {} is not closed",
            name, opened_at
        ),
    )
}
