//! Integration tests for the block size operand through the public entry point.

use std::ffi::OsString;
use std::fs;

use test_support::InputFixture;

fn run_signature(fixture: &InputFixture, block: &str) -> (i32, String, String) {
    let output = fixture.path("out.sig");
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let code = cli::run(
        [
            OsString::from("file-signature"),
            fixture.input().as_os_str().to_owned(),
            output.into_os_string(),
            OsString::from(block),
        ],
        &mut stdout,
        &mut stderr,
    );
    (
        code,
        String::from_utf8(stdout).expect("utf-8 stdout"),
        String::from_utf8(stderr).expect("utf-8 stderr"),
    )
}

#[test]
fn default_block_size_is_one_mebibyte() {
    let fixture = InputFixture::patterned((1 << 20) + 1).expect("fixture");
    let output = fixture.path("default.sig");
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let code = cli::run(
        [
            OsString::from("file-signature"),
            fixture.input().as_os_str().to_owned(),
            output.clone().into_os_string(),
        ],
        &mut stdout,
        &mut stderr,
    );

    assert_eq!(code, 0);
    assert_eq!(
        fs::read_to_string(&output).expect("read output"),
        fixture.expected_signature(1 << 20)
    );
}

#[test]
fn block_larger_than_file_gives_one_line() {
    let fixture = InputFixture::patterned(100).expect("fixture");
    let (code, stdout, _) = run_signature(&fixture, "4096");

    assert_eq!(code, 0);
    assert_eq!(stdout.trim_end(), cli::SUCCESS_MESSAGE);
    let written = fs::read_to_string(fixture.path("out.sig")).expect("read output");
    assert_eq!(written.lines().count(), 1);
}

#[test]
fn signed_block_size_is_not_an_integer() {
    let fixture = InputFixture::patterned(100).expect("fixture");
    let (code, stdout, stderr) = run_signature(&fixture, "-1");

    assert_eq!(code, 1);
    assert!(stdout.is_empty());
    assert_eq!(stderr.trim_end(), "Parameter <block size> should be integer");
    assert!(!fixture.path("out.sig").exists());
}

#[test]
fn absurd_block_size_fails_allocation_probe() {
    let fixture = InputFixture::patterned(100).expect("fixture");
    let (code, _, stderr) = run_signature(&fixture, &u64::MAX.to_string());

    assert_eq!(code, 1);
    assert_eq!(
        stderr.trim_end(),
        "Cannot allocate memory. Maybe the block size is too big."
    );
    assert!(!fixture.path("out.sig").exists());
}
