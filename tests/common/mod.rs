#![allow(dead_code)]

use dicom_core::header::{DataElement, Tag};
use dicom_core::value::PrimitiveValue;
use dicom_core::VR;
use dicom_dictionary_std::uids;
use dicom_object::meta::FileMetaTableBuilder;
use dicom_object::InMemDicomObject;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::Write;
use std::path::{Path, PathBuf};

/// 4-byte header GE puts ahead of the gzip member
pub const GE_HEADER: &[u8] = b"Q\x03\x00\x00";

pub fn ge_payload(text: &str) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(text.as_bytes()).expect("gzip write");
    let mut payload = GE_HEADER.to_vec();
    payload.extend(encoder.finish().expect("gzip finish"));
    payload
}

/// Write an explicit VR little endian MR file to `dir/name`, carrying `block`
/// in (0025,101b) when given.
pub fn write_dicom(dir: &Path, name: &str, block: Option<&str>) -> PathBuf {
    let mut obj = InMemDicomObject::new_empty();
    let put = |o: &mut InMemDicomObject, tag: Tag, vr: VR, val: PrimitiveValue| {
        o.put(DataElement::new(tag, vr, val));
    };

    put(&mut obj, Tag(0x0008, 0x0016), VR::UI, PrimitiveValue::from(uids::MR_IMAGE_STORAGE));
    put(&mut obj, Tag(0x0008, 0x0018), VR::UI, PrimitiveValue::from("1.2.3.4"));
    put(&mut obj, Tag(0x0008, 0x0020), VR::DA, PrimitiveValue::from("20220101"));
    put(&mut obj, Tag(0x0010, 0x0010), VR::PN, PrimitiveValue::from("SURNAME^Firstname"));
    put(&mut obj, Tag(0x0010, 0x0020), VR::LO, PrimitiveValue::from("ABC12345678"));
    put(&mut obj, Tag(0x0010, 0x0030), VR::DA, PrimitiveValue::from("19800101"));

    if let Some(block) = block {
        let mut bytes = ge_payload(block);
        if bytes.len() % 2 == 1 {
            bytes.push(0);
        }
        put(&mut obj, Tag(0x0025, 0x101B), VR::OB, PrimitiveValue::U8(bytes.into()));
    }

    let file_obj = obj
        .with_meta(
            FileMetaTableBuilder::new()
                .transfer_syntax(uids::EXPLICIT_VR_LITTLE_ENDIAN)
                .media_storage_sop_class_uid(uids::MR_IMAGE_STORAGE)
                .media_storage_sop_instance_uid("1.2.3.4"),
        )
        .expect("build file meta");

    let path = dir.join(name);
    file_obj.write_to_file(&path).expect("write dicom");
    path
}

pub fn write_text(dir: &Path, name: &str, text: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, text).expect("write text fixture");
    path
}

/// Overwrite the `DICM` magic after the preamble
pub fn damage_magic(path: &Path) {
    let mut bytes = std::fs::read(path).expect("read dicom fixture");
    bytes[128..132].copy_from_slice(b"XXXX");
    std::fs::write(path, bytes).expect("rewrite dicom fixture");
}
