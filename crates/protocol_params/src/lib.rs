//! Scanner-protocol parameter tables
//!
//! This crate turns the decompressed text of a GE protocol data block, or the
//! contents of an LxProtocol file, into a [`ParameterTable`]: an ordered map of
//! canonical flattened parameter names to typed values.
//!
//! # Dialects
//! - [`Dialect::CompressedBlock`]: `NAME VALUE` lines with nested `NAME { }`
//!   groups and `NAME[COUNT] { {..} {..} }` repeated groups
//! - [`Dialect::LxProtocol`]: `set NAME VALUE` statements with flat
//!   `GROUP.field` names
//!
//! Both produce the same canonical names (`SLAB[1].THICK`), so tables from
//! either source can be compared directly.

pub mod error;
pub mod grammar;
pub mod types;

mod block;
mod lx;

pub use error::{ParseError, Result};
pub use types::{ParameterTable, ParameterValue};

/// Source grammar of a protocol text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// Text inflated from the DICOM private element (0025,101b)
    CompressedBlock,
    /// Plain-text LxProtocol file
    LxProtocol,
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dialect::CompressedBlock => write!(f, "compressed-block"),
            Dialect::LxProtocol => write!(f, "lxprotocol"),
        }
    }
}

/// Parse protocol text in the given dialect.
///
/// Parsing is all-or-nothing: the first syntax error aborts and no partial
/// table is returned. A name assigned twice keeps its first position and its
/// last value.
pub fn parse(text: &str, dialect: Dialect) -> Result<ParameterTable> {
    let table = match dialect {
        Dialect::CompressedBlock => block::parse_block(text)?,
        Dialect::LxProtocol => lx::parse_lx(text)?,
    };
    tracing::debug!("Parsed {} parameters from {} text", table.len(), dialect);
    Ok(table)
}

/// Render a table as a pretty-printed JSON object, keys in table order.
pub fn to_json_pretty(table: &ParameterTable) -> serde_json::Result<String> {
    serde_json::to_string_pretty(table)
}
