#[path = "../common/mod.rs"]
mod common;

use assert_cmd::Command;
use common::write_dicom;
use predicates::prelude::*;
use serde_json::{json, Value};
use tempfile::TempDir;

fn cli() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_geprotocol"));
    cmd.env_remove("GEPROTOCOL_CONFIG").env_remove("RUST_LOG");
    cmd
}

fn read_json(path: &std::path::Path) -> Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn test_json_writes_parameters() {
    let dir = TempDir::new().unwrap();
    let dicom = write_dicom(dir.path(), "test.dcm", Some("ABC \"123\"\nDEF \"456\""));
    let out = dir.path().join("protocol_dump.json");

    cli()
        .args(["json", "-d"])
        .arg(&dicom)
        .arg("-j")
        .arg(&out)
        .assert()
        .success()
        .stdout("");

    assert_eq!(read_json(&out), json!({"ABC": "123", "DEF": "456"}));
}

#[test]
fn test_json_quoted_values_with_spaces() {
    let dir = TempDir::new().unwrap();
    let dicom = write_dicom(
        dir.path(),
        "test.dcm",
        Some("ABC_DEF \"123 456\"\nDEF \"456 aef\""),
    );
    let out = dir.path().join("protocol_dump.json");

    cli()
        .args(["json", "-d"])
        .arg(&dicom)
        .arg("-j")
        .arg(&out)
        .assert()
        .success();

    assert_eq!(read_json(&out), json!({"ABC_DEF": "123 456", "DEF": "456 aef"}));
}

#[test]
fn test_json_keeps_types_and_order() {
    let dir = TempDir::new().unwrap();
    let block = "PSEQ \"FSE\"\nTR 2000\nTE 30.5\nPREP {\n  MODE \"auto\"\n}\nSLICES [1, 2, 3]\n";
    let dicom = write_dicom(dir.path(), "test.dcm", Some(block));
    let out = dir.path().join("protocol_dump.json");

    cli()
        .args(["json", "-d"])
        .arg(&dicom)
        .arg("-j")
        .arg(&out)
        .assert()
        .success();

    let text = std::fs::read_to_string(&out).unwrap();
    let keys: Vec<usize> = ["\"PSEQ\"", "\"TR\"", "\"TE\"", "\"PREP.MODE\"", "\"SLICES\""]
        .iter()
        .map(|k| text.find(k).expect("key present"))
        .collect();
    assert!(keys.windows(2).all(|w| w[0] < w[1]), "keys out of order:\n{}", text);

    assert_eq!(
        read_json(&out),
        json!({
            "PSEQ": "FSE",
            "TR": 2000,
            "TE": 30.5,
            "PREP.MODE": "auto",
            "SLICES": [1, 2, 3]
        })
    );
}

#[test]
fn test_json_missing_element() {
    let dir = TempDir::new().unwrap();
    let dicom = write_dicom(dir.path(), "test.dcm", None);
    let out = dir.path().join("protocol_dump.json");

    cli()
        .args(["json", "-d"])
        .arg(&dicom)
        .arg("-j")
        .arg(&out)
        .assert()
        .failure()
        .code(1)
        .stdout("")
        .stderr(predicate::str::starts_with(
            "error: ElementNotFound: DICOM file does not contain private element (0025,101b)",
        ));

    assert!(!out.exists());
}

#[test]
fn test_json_size_limit_from_flag() {
    let dir = TempDir::new().unwrap();
    let block = "TR 2000\n".repeat(1000);
    let dicom = write_dicom(dir.path(), "test.dcm", Some(&block));
    let out = dir.path().join("protocol_dump.json");

    cli()
        .args(["json", "--max-size", "100", "-d"])
        .arg(&dicom)
        .arg("-j")
        .arg(&out)
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("error: PayloadTooLarge:"));
}

#[test]
fn test_json_rejects_non_dicom_input() {
    let dir = TempDir::new().unwrap();
    let text = common::write_text(dir.path(), "LxProtocol", "    set ABC \"123\"\n");
    let out = dir.path().join("protocol_dump.json");

    cli()
        .args(["json", "-d"])
        .arg(&text)
        .arg("-j")
        .arg(&out)
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("error: MalformedDicom:"));
}
