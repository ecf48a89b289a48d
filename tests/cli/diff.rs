#[path = "../common/mod.rs"]
mod common;

use assert_cmd::assert::Assert;
use assert_cmd::Command;
use common::{damage_magic, write_dicom, write_text};
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

fn cli() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_geprotocol"));
    cmd.env_remove("GEPROTOCOL_CONFIG").env_remove("RUST_LOG");
    cmd
}

fn diff_paths(reference: &Path, test: &Path) -> Assert {
    cli()
        .arg("diff")
        .arg("-r")
        .arg(reference)
        .arg("-t")
        .arg(test)
        .assert()
}

#[test]
fn test_identical_dicom_files() {
    let dir = TempDir::new().unwrap();
    let block = "ABC \"123\"\nDEF \"456\"";
    let r = write_dicom(dir.path(), "ref.dcm", Some(block));
    let t = write_dicom(dir.path(), "test.dcm", Some(block));

    diff_paths(&r, &t).success().stdout("");
}

#[test]
fn test_dicom_differences() {
    let dir = TempDir::new().unwrap();
    let r = write_dicom(
        dir.path(),
        "ref.dcm",
        Some("ABC \"123\"\nDEF \"457\"\nGHI \"89\""),
    );
    let t = write_dicom(
        dir.path(),
        "test.dcm",
        Some("ABC \"123\"\nDEF \"456\"\nXYZ \"101\""),
    );

    diff_paths(&r, &t)
        .success()
        .stdout("< DEF 457\n> DEF 456\n---\n< GHI 89\n>\n---\n<\n> XYZ 101\n---\n");
}

#[test]
fn test_lx_reference_identical() {
    let dir = TempDir::new().unwrap();
    let r = write_text(dir.path(), "LxProtocol", "    set ABC \"123\"\n    set DEF \"456\"");
    let t = write_dicom(dir.path(), "test.dcm", Some("ABC \"123\"\nDEF \"456\""));

    diff_paths(&r, &t).success().stdout("");
}

#[test]
fn test_lx_reference_differences() {
    let dir = TempDir::new().unwrap();
    let r = write_text(
        dir.path(),
        "LxProtocol",
        "    set ABC \"123\"\n    set DEF \"457\"\n    set GHI \"89\"",
    );
    let t = write_dicom(
        dir.path(),
        "test.dcm",
        Some("ABC \"123\"\nDEF \"456\"\nXYZ \"101\""),
    );

    diff_paths(&r, &t)
        .success()
        .stdout("< DEF 457\n> DEF 456\n---\n< GHI 89\n>\n---\n<\n> XYZ 101\n---\n");
}

#[test]
fn test_tolerance_flag() {
    let dir = TempDir::new().unwrap();
    let r = write_dicom(dir.path(), "ref.dcm", Some("TE 30.0\nTR 2000"));
    let t = write_dicom(dir.path(), "test.dcm", Some("TE 30.04\nTR 2000"));

    diff_paths(&r, &t)
        .success()
        .stdout("< TE 30.0\n> TE 30.04\n---\n");

    cli()
        .args(["diff", "--tolerance", "0.1", "-r"])
        .arg(&r)
        .arg("-t")
        .arg(&t)
        .assert()
        .success()
        .stdout("");
}

#[test]
fn test_tolerance_from_config_file() {
    let dir = TempDir::new().unwrap();
    let r = write_dicom(dir.path(), "ref.dcm", Some("TE 30.0"));
    let t = write_dicom(dir.path(), "test.dcm", Some("TE 30.04"));
    let config = write_text(dir.path(), "geprotocol.toml", "[diff]\nfloat_tolerance = 0.1\n");

    cli()
        .arg("diff")
        .arg("-c")
        .arg(&config)
        .arg("-r")
        .arg(&r)
        .arg("-t")
        .arg(&t)
        .assert()
        .success()
        .stdout("");

    cli()
        .env("GEPROTOCOL_CONFIG", &config)
        .arg("diff")
        .arg("-r")
        .arg(&r)
        .arg("-t")
        .arg(&t)
        .assert()
        .success()
        .stdout("");
}

#[test]
fn test_syntax_error_reports_line() {
    let dir = TempDir::new().unwrap();
    let r = write_text(dir.path(), "LxProtocol", "set TR 2000\nset TE 30\nbogus line\n");
    let t = write_dicom(dir.path(), "test.dcm", Some("TR 2000\nTE 30"));

    diff_paths(&r, &t)
        .failure()
        .stdout("")
        .stderr(predicate::str::starts_with(
            "error: SyntaxError: syntax error at line 3",
        ));
}

#[test]
fn test_unrecognized_text_is_unsupported() {
    let dir = TempDir::new().unwrap();
    let r = write_text(dir.path(), "notes.txt", "this is not a protocol\n");
    let t = write_dicom(dir.path(), "test.dcm", Some("TR 2000"));

    diff_paths(&r, &t)
        .failure()
        .stderr(predicate::str::starts_with("error: UnsupportedDialect:"));
}

#[test]
fn test_missing_element_in_test_file() {
    let dir = TempDir::new().unwrap();
    let r = write_dicom(dir.path(), "ref.dcm", Some("TR 2000"));
    let t = write_dicom(dir.path(), "test.dcm", None);

    diff_paths(&r, &t)
        .failure()
        .code(1)
        .stdout("")
        .stderr(predicate::str::contains("ElementNotFound"));
}

#[test]
fn test_damaged_test_file() {
    let dir = TempDir::new().unwrap();
    let r = write_dicom(dir.path(), "ref.dcm", Some("TR 2000"));
    let t = write_dicom(dir.path(), "test.dcm", Some("TR 2000"));
    damage_magic(&t);

    diff_paths(&r, &t)
        .failure()
        .code(1)
        .stdout("")
        .stderr(predicate::str::starts_with("error: MalformedDicom:"));
}

#[test]
fn test_missing_input_file() {
    let dir = TempDir::new().unwrap();
    let r = write_dicom(dir.path(), "ref.dcm", Some("TR 2000"));

    diff_paths(&r, &dir.path().join("absent.dcm"))
        .failure()
        .stderr(
            predicate::str::starts_with("error: Io:")
                .and(predicate::str::contains("absent.dcm")),
        );
}

#[test]
fn test_invalid_config_file() {
    let dir = TempDir::new().unwrap();
    let r = write_dicom(dir.path(), "ref.dcm", Some("TR 2000"));
    let config = write_text(dir.path(), "bad.toml", "[decoder]\nmax_decompressed_bytes = 0\n");

    cli()
        .arg("diff")
        .arg("-c")
        .arg(&config)
        .arg("-r")
        .arg(&r)
        .arg("-t")
        .arg(&r)
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("error: ConfigError:"));
}
