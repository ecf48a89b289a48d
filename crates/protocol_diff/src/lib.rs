use protocol_params::{ParameterTable, ParameterValue};
use serde::Deserialize;
use std::collections::HashSet;
use thiserror::Error;

pub mod format;

pub use format::{render_diff, write_diff, DiffText};

#[derive(Debug, Error)]
pub enum DiffError {
    #[error("float tolerance must be a finite, non-negative number (got {0})")]
    InvalidTolerance(f64),
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct DiffOptions {
    /// Absolute tolerance for numeric comparisons; exact match when unset
    #[serde(default)]
    pub float_tolerance: Option<f64>,
}

impl DiffOptions {
    pub fn exact() -> Self {
        Self::default()
    }

    pub fn with_tolerance(tolerance: f64) -> Result<Self, DiffError> {
        let options = Self {
            float_tolerance: Some(tolerance),
        };
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<(), DiffError> {
        match self.float_tolerance {
            Some(t) if !t.is_finite() || t < 0.0 => Err(DiffError::InvalidTolerance(t)),
            _ => Ok(()),
        }
    }
}

/// One difference between a reference and a test table
#[derive(Debug, Clone, PartialEq)]
pub enum DiffRecord {
    Changed {
        name: String,
        ref_value: ParameterValue,
        test_value: ParameterValue,
    },
    RefOnly {
        name: String,
        ref_value: ParameterValue,
    },
    TestOnly {
        name: String,
        test_value: ParameterValue,
    },
}

impl DiffRecord {
    pub fn name(&self) -> &str {
        match self {
            DiffRecord::Changed { name, .. }
            | DiffRecord::RefOnly { name, .. }
            | DiffRecord::TestOnly { name, .. } => name,
        }
    }
}

/// Compare two tables and list their differences.
///
/// Names are visited in reference order, then test-only names in test order.
/// Parameters with equal values produce no record.
pub fn diff(
    reference: &ParameterTable,
    test: &ParameterTable,
    options: &DiffOptions,
) -> Vec<DiffRecord> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(reference.len() + test.len());
    let union: Vec<&str> = reference
        .names()
        .chain(test.names())
        .filter(|name| seen.insert(*name))
        .collect();

    let mut records = Vec::new();
    for name in union {
        match (reference.get(name), test.get(name)) {
            (Some(r), Some(t)) => {
                if !values_equal(r, t, options) {
                    records.push(DiffRecord::Changed {
                        name: name.to_string(),
                        ref_value: r.clone(),
                        test_value: t.clone(),
                    });
                }
            }
            (Some(r), None) => records.push(DiffRecord::RefOnly {
                name: name.to_string(),
                ref_value: r.clone(),
            }),
            (None, Some(t)) => records.push(DiffRecord::TestOnly {
                name: name.to_string(),
                test_value: t.clone(),
            }),
            (None, None) => {}
        }
    }

    tracing::debug!(
        "Compared {} reference and {} test parameters: {} differences",
        reference.len(),
        test.len(),
        records.len()
    );
    records
}

/// [`diff`] with exact numeric comparison
pub fn diff_exact(reference: &ParameterTable, test: &ParameterTable) -> Vec<DiffRecord> {
    diff(reference, test, &DiffOptions::exact())
}

/// Type-aware value equality.
///
/// Integers and floats compare numerically with each other, strings
/// byte-for-byte, sequences element-wise. Values of different kinds (a quoted
/// `"2000"` against a bare `2000`) are never equal.
pub fn values_equal(a: &ParameterValue, b: &ParameterValue, options: &DiffOptions) -> bool {
    match (a, b) {
        (ParameterValue::Str(x), ParameterValue::Str(y)) => x == y,
        (ParameterValue::Int(x), ParameterValue::Int(y)) => match options.float_tolerance {
            // Integer distance stays exact past 2^53
            Some(tolerance) => x.abs_diff(*y) as f64 <= tolerance,
            None => x == y,
        },
        (ParameterValue::Seq(xs), ParameterValue::Seq(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .zip(ys.iter())
                    .all(|(x, y)| values_equal(x, y, options))
        }
        _ => match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => match options.float_tolerance {
                Some(tolerance) => (x - y).abs() <= tolerance,
                None => x == y,
            },
            _ => false,
        },
    }
}
