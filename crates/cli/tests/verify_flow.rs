use std::fs;
use std::path::Path;

use predicates::prelude::*;
use tempfile::tempdir;

use flashcarve::commands::verify_command;

fn synthetic_dump() -> Vec<u8> {
    let mut image = vec![0u8; 0x9000];
    image[..4].copy_from_slice(b"NMIS");
    image[4..8].copy_from_slice(&[0x01, 0x00, 0x00, 0x00]);
    image[8..12].copy_from_slice(&[0xAA, 0xBB, 0xCC, 0xDD]);
    for byte in &mut image[12..0x100] {
        *byte = 0xFF;
    }
    image[0x4000..0x4004].copy_from_slice(b"NMIS");
    image[0x4004..0x4008].copy_from_slice(&[0x02, 0x00, 0x00, 0x00]);
    image[0x4008..0x400C].copy_from_slice(&[0x10, 0x20, 0x30, 0x40]);
    for byte in &mut image[0x400C..0x6000] {
        *byte = 0xFF;
    }
    image[0x6000..0x6004].copy_from_slice(b"NMID");
    image[0x6004] = 0x07;
    image[0x6005..0x6008].copy_from_slice(&[0x5A, 0x5B, 0x5C]);
    for byte in &mut image[0x6008..0x7000] {
        *byte = 0xFF;
    }
    image
}

/// Write a reference tree matching the synthetic dump's canonical payloads,
/// in the source-parts convention (schema-1 parts keep their own 4-byte
/// header).
fn write_reference(dir: &Path) {
    fs::create_dir_all(dir.join("firmware")).expect("firmware dir");

    let mut boot = vec![1, 2, 3, 4];
    boot.extend_from_slice(&[0xAA, 0xBB, 0xCC, 0xDD]);
    fs::write(dir.join("firmware/boot_firmware.bin"), boot).expect("boot reference");

    let mut downloader = vec![5, 6, 7, 8];
    downloader.extend_from_slice(&[0x10, 0x20, 0x30, 0x40]);
    fs::write(dir.join("firmware/downloader_firmware.bin"), downloader)
        .expect("downloader reference");

    // Schema 2 compares exactly against the canonical payload.
    fs::write(dir.join("firmware/wifi_firmware.bin"), [0x03, 0x5A, 0x5B, 0x5C])
        .expect("wifi reference");
}

#[test]
fn verify_succeeds_against_matching_references() {
    let dir = tempdir().expect("tempdir");
    let dump_path = dir.path().join("dump.bin");
    fs::write(&dump_path, synthetic_dump()).expect("write dump");
    let reference = dir.path().join("reference");
    write_reference(&reference);

    verify_command(&dump_path, &reference).expect("verify");
}

#[test]
fn verify_fails_on_any_mismatch() {
    let dir = tempdir().expect("tempdir");
    let dump_path = dir.path().join("dump.bin");
    fs::write(&dump_path, synthetic_dump()).expect("write dump");
    let reference = dir.path().join("reference");
    write_reference(&reference);
    // Corrupt one reference byte.
    fs::write(dir.path().join("reference/firmware/wifi_firmware.bin"), [0x03, 0x5A, 0x5B, 0x5D])
        .expect("corrupt reference");

    let err = verify_command(&dump_path, &reference).unwrap_err();
    assert!(err.to_string().contains("failed verification"), "error was: {err}");
}

#[test]
fn verify_binary_reports_per_region_status() {
    let dir = tempdir().expect("tempdir");
    let dump_path = dir.path().join("dump.bin");
    fs::write(&dump_path, synthetic_dump()).expect("write dump");
    let reference = dir.path().join("reference");
    write_reference(&reference);

    assert_cmd::cargo::cargo_bin_cmd!("flashcarve")
        .arg("verify")
        .arg("--dump")
        .arg(&dump_path)
        .arg("--reference")
        .arg(&reference)
        .assert()
        .success()
        .stdout(predicate::str::contains("boot firmware: verified"))
        .stdout(predicate::str::contains("wifi firmware: verified"))
        // Fixed sectors have no reference files.
        .stdout(predicate::str::contains("control sector: skipped (no reference file)"))
        .stdout(predicate::str::contains("3 verified, 0 mismatched"));
}

#[test]
fn verify_binary_exits_nonzero_on_mismatch() {
    let dir = tempdir().expect("tempdir");
    let dump_path = dir.path().join("dump.bin");
    fs::write(&dump_path, synthetic_dump()).expect("write dump");
    let reference = dir.path().join("reference");
    write_reference(&reference);
    fs::write(dir.path().join("reference/firmware/boot_firmware.bin"), [1, 2, 3, 4, 0xAA, 0xFF])
        .expect("corrupt reference");

    assert_cmd::cargo::cargo_bin_cmd!("flashcarve")
        .arg("verify")
        .arg("--dump")
        .arg(&dump_path)
        .arg("--reference")
        .arg(&reference)
        .assert()
        .failure()
        .stdout(predicate::str::contains("MISMATCH"));
}
