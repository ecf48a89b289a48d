//! Turning input files into parameter tables.
//!
//! DICOM inputs go straight to the locator, so a damaged file reports the
//! DICOM problem. Only the diff reference is sniffed: a file with the `DICM`
//! magic (after the preamble or at offset 0) is DICOM, readable text is
//! LxProtocol, and binary content falls back to DICOM.

use crate::error::{Error, Result};
use protocol_block::{inflate, is_dicom, locate, locate_file};
use protocol_params::{parse, Dialect, ParameterTable};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Dicom,
    LxProtocol,
}

pub fn sniff(bytes: &[u8]) -> SourceKind {
    if is_dicom(bytes) {
        return SourceKind::Dicom;
    }
    match std::str::from_utf8(bytes) {
        Ok(text) if !text.contains('\0') => SourceKind::LxProtocol,
        _ => SourceKind::Dicom,
    }
}

pub fn read_file(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| Error::read(path, e))
}

/// Parameters of the protocol block stored in the DICOM file at `path`
pub fn dicom_table(path: &Path, limit: usize) -> Result<ParameterTable> {
    let payload = locate_file(path)?;
    block_table(payload.as_bytes(), limit)
}

/// Parameters of the protocol block in an in-memory DICOM stream
pub fn table_from_dicom(bytes: &[u8], limit: usize) -> Result<ParameterTable> {
    let payload = locate(bytes)?;
    block_table(payload.as_bytes(), limit)
}

fn block_table(payload: &[u8], limit: usize) -> Result<ParameterTable> {
    let text = inflate(payload, limit)?;
    Ok(parse(&text, Dialect::CompressedBlock)?)
}

pub fn table_from_lx(text: &str) -> Result<ParameterTable> {
    Ok(parse(text, Dialect::LxProtocol)?)
}

/// Load a diff reference, which may be DICOM or LxProtocol text
pub fn reference_table(path: &Path, limit: usize) -> Result<ParameterTable> {
    let bytes = read_file(path)?;
    let kind = sniff(&bytes);
    tracing::info!("Reading {} as {:?}", path.display(), kind);

    match (kind, std::str::from_utf8(&bytes)) {
        (SourceKind::LxProtocol, Ok(text)) => table_from_lx(text),
        _ => table_from_dicom(&bytes, limit),
    }
}
