//! GE protocol data block extraction
//!
//! GE MRI scanners store the acquisition protocol as gzip-compressed text in
//! the private element `(0025,101b)`. This crate finds that element in a DICOM
//! byte stream ([`locate`]) and inflates it into text ([`inflate`]) with a
//! bound on the decompressed size.

use dicom_core::Tag;
use dicom_dictionary_std::tags;
use dicom_object::OpenFileOptions;
use flate2::read::GzDecoder;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Private element holding the compressed protocol block
pub const PROTOCOL_BLOCK_TAG: Tag = Tag(0x0025, 0x101B);

/// Default ceiling on inflated protocol text
pub const DEFAULT_MAX_DECOMPRESSED_BYTES: usize = 16 * 1024 * 1024;

const PREAMBLE_LEN: usize = 128;
const DICM_MAGIC: &[u8] = b"DICM";
const GZIP_MAGIC: &[u8] = &[0x1f, 0x8b];
/// GE writes a 4-byte little-endian length ahead of the gzip member
const VENDOR_PREFIX_LEN: usize = 4;

#[derive(Debug, Error)]
pub enum BlockError {
    #[error("DICOM file does not contain private element (0025,101b)")]
    ElementNotFound,

    /// `offset` is where reading stopped being possible: the end of a stream
    /// too short for the magic, the expected magic position, or the start of
    /// the Part 10 stream (0 or 128) when the data set itself fails to decode.
    /// dicom-object does not report the failing byte position.
    #[error("malformed DICOM at byte {offset}: {reason}")]
    MalformedDicom { offset: usize, reason: String },

    #[error("protocol block decompression failed: {0}")]
    DecompressionError(String),

    #[error("decompressed protocol block exceeds {limit} bytes")]
    PayloadTooLarge { limit: usize },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl BlockError {
    pub fn malformed(offset: usize, reason: impl Into<String>) -> Self {
        Self::MalformedDicom {
            offset,
            reason: reason.into(),
        }
    }

    /// Stable name of the error kind, used by the CLI on stderr
    pub fn kind(&self) -> &'static str {
        match self {
            BlockError::ElementNotFound => "ElementNotFound",
            BlockError::MalformedDicom { .. } => "MalformedDicom",
            BlockError::DecompressionError(_) => "DecompressionError",
            BlockError::PayloadTooLarge { .. } => "PayloadTooLarge",
            BlockError::Io { .. } => "Io",
        }
    }
}

pub type Result<T> = std::result::Result<T, BlockError>;

/// Raw bytes of element (0025,101b), exactly as stored in the file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPayload {
    bytes: Vec<u8>,
}

impl RawPayload {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Whether `bytes` look like a DICOM Part 10 stream (with or without preamble)
pub fn is_dicom(bytes: &[u8]) -> bool {
    dicom_stream_start(bytes).is_ok()
}

/// Offset of the `DICM` magic: 128 after a preamble, or 0 for a bare stream
fn dicom_stream_start(bytes: &[u8]) -> Result<usize> {
    if bytes.len() >= PREAMBLE_LEN + DICM_MAGIC.len()
        && &bytes[PREAMBLE_LEN..PREAMBLE_LEN + DICM_MAGIC.len()] == DICM_MAGIC
    {
        return Ok(PREAMBLE_LEN);
    }
    if bytes.starts_with(DICM_MAGIC) {
        return Ok(0);
    }
    if bytes.len() < PREAMBLE_LEN + DICM_MAGIC.len() {
        return Err(BlockError::malformed(
            bytes.len(),
            "stream too short for a DICOM preamble and magic",
        ));
    }
    Err(BlockError::malformed(PREAMBLE_LEN, "missing DICM magic"))
}

/// Find element (0025,101b) in a DICOM byte stream and return its bytes.
///
/// The transfer syntax declared in the file meta group decides how the data
/// set is read; explicit and implicit VR in either byte order are supported.
pub fn locate(dicom_bytes: &[u8]) -> Result<RawPayload> {
    let start = dicom_stream_start(dicom_bytes)?;

    let obj = OpenFileOptions::new()
        .read_until(tags::PIXEL_DATA)
        .from_reader(&dicom_bytes[start..])
        .map_err(|e| BlockError::malformed(start, e.to_string()))?;

    tracing::debug!(
        "Read DICOM data set with transfer syntax {}",
        obj.meta().transfer_syntax.trim_end_matches('\0')
    );

    let element = obj
        .element(PROTOCOL_BLOCK_TAG)
        .map_err(|_| BlockError::ElementNotFound)?;
    let bytes = element.to_bytes().map_err(|e| {
        BlockError::malformed(start, format!("element (0025,101b) is not a byte value: {}", e))
    })?;

    if bytes.is_empty() {
        return Err(BlockError::ElementNotFound);
    }

    tracing::debug!("Found protocol block of {} bytes", bytes.len());
    Ok(RawPayload::new(bytes.into_owned()))
}

/// Read a DICOM file from disk and [`locate`] its protocol block.
pub fn locate_file(path: &Path) -> Result<RawPayload> {
    let bytes = std::fs::read(path).map_err(|source| BlockError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    locate(&bytes)
}

/// Slice of `payload` starting at the gzip magic
fn gzip_member(payload: &[u8]) -> Result<&[u8]> {
    if payload.starts_with(GZIP_MAGIC) {
        return Ok(payload);
    }
    if payload.len() > VENDOR_PREFIX_LEN && payload[VENDOR_PREFIX_LEN..].starts_with(GZIP_MAGIC) {
        let mut prefix = [0u8; VENDOR_PREFIX_LEN];
        prefix.copy_from_slice(&payload[..VENDOR_PREFIX_LEN]);
        tracing::debug!(
            "Skipping {}-byte vendor prefix (declared length {})",
            VENDOR_PREFIX_LEN,
            u32::from_le_bytes(prefix)
        );
        return Ok(&payload[VENDOR_PREFIX_LEN..]);
    }
    Err(BlockError::DecompressionError(
        "missing gzip magic bytes 1f 8b".to_string(),
    ))
}

/// Inflate a protocol block payload into text.
///
/// The payload may start with the gzip magic directly or carry GE's 4-byte
/// prefix first. Decompression streams through a reader capped at `limit + 1`
/// bytes, so an oversized block fails with [`BlockError::PayloadTooLarge`]
/// without being fully inflated.
pub fn inflate(payload: &[u8], limit: usize) -> Result<String> {
    let member = gzip_member(payload)?;

    let mut reader = GzDecoder::new(member).take((limit as u64).saturating_add(1));
    let mut out = Vec::new();
    reader
        .read_to_end(&mut out)
        .map_err(|e| BlockError::DecompressionError(e.to_string()))?;

    if out.len() > limit {
        return Err(BlockError::PayloadTooLarge { limit });
    }

    tracing::debug!("Inflated {} bytes into {} bytes", member.len(), out.len());
    String::from_utf8(out).map_err(|e| {
        BlockError::DecompressionError(format!("protocol text is not UTF-8: {}", e))
    })
}

/// [`locate`] then [`inflate`]
pub fn extract_protocol_text(dicom_bytes: &[u8], limit: usize) -> Result<String> {
    let payload = locate(dicom_bytes)?;
    inflate(payload.as_bytes(), limit)
}
