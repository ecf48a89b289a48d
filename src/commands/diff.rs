use crate::config::Config;
use crate::error::{Error, Result};
use crate::source::{dicom_table, reference_table};
use protocol_diff::{diff, render_diff};
use std::io::Write;
use std::path::Path;

/// Compare `reference` against `test` and write the differences to `out`.
///
/// `reference` may be DICOM or LxProtocol text; `test` is always DICOM.
/// Both inputs are loaded and compared before anything is written.
pub fn run<W: Write>(reference: &Path, test: &Path, config: &Config, out: &mut W) -> Result<()> {
    let limit = config.decoder.max_decompressed_bytes;
    let ref_table = reference_table(reference, limit)?;
    let test_table = dicom_table(test, limit)?;

    let records = diff(&ref_table, &test_table, &config.diff);
    tracing::info!("{} differing parameters", records.len());

    let text = render_diff(&records);
    out.write_all(text.as_bytes()).map_err(Error::Output)?;
    out.flush().map_err(Error::Output)
}
