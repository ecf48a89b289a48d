//! Text rendering of diff records.
//!
//! ```text
//! < TR 2000
//! > TR 2500
//! ---
//! < FlipAngle 90
//! >
//! ---
//! <
//! > EchoTime 30
//! ---
//! ```

use crate::DiffRecord;
use std::fmt;
use std::io::{self, Write};

const SEPARATOR: &str = "---";

/// Displays records in order, each followed by a separator line
pub struct DiffText<'a>(pub &'a [DiffRecord]);

impl fmt::Display for DiffText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for record in self.0 {
            match record {
                DiffRecord::Changed {
                    name,
                    ref_value,
                    test_value,
                } => {
                    writeln!(f, "< {} {}", name, ref_value)?;
                    writeln!(f, "> {} {}", name, test_value)?;
                }
                DiffRecord::RefOnly { name, ref_value } => {
                    writeln!(f, "< {} {}", name, ref_value)?;
                    writeln!(f, ">")?;
                }
                DiffRecord::TestOnly { name, test_value } => {
                    writeln!(f, "<")?;
                    writeln!(f, "> {} {}", name, test_value)?;
                }
            }
            writeln!(f, "{}", SEPARATOR)?;
        }
        Ok(())
    }
}

pub fn write_diff<W: Write>(out: &mut W, records: &[DiffRecord]) -> io::Result<()> {
    write!(out, "{}", DiffText(records))
}

pub fn render_diff(records: &[DiffRecord]) -> String {
    DiffText(records).to_string()
}
