use crate::config::Config;
use crate::error::{Error, Result};
use crate::source::dicom_table;
use std::path::Path;

/// Extract the protocol from `dicom` and write it to `json` as a JSON object
pub fn run(dicom: &Path, json: &Path, config: &Config) -> Result<()> {
    let table = dicom_table(dicom, config.decoder.max_decompressed_bytes)?;

    let mut text = protocol_params::to_json_pretty(&table)?;
    text.push('\n');

    std::fs::write(json, text).map_err(|e| Error::write(json, e))?;
    tracing::info!("Wrote {} parameters to {}", table.len(), json.display());
    Ok(())
}
