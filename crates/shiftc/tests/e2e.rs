//! Black-box tests for the `shiftc` binary: write a source file to a temp
//! directory, invoke the built binary against it, and assert on its exit
//! code and printed diagnostics.

use std::path::PathBuf;
use std::process::Command;

fn find_shiftc() -> PathBuf {
    let mut path = std::env::current_exe()
        .expect("cannot find current exe")
        .parent()
        .expect("cannot find parent dir")
        .to_path_buf();
    if path.file_name().map_or(false, |n| n == "deps") {
        path = path.parent().unwrap().to_path_buf();
    }
    let shiftc = path.join("shiftc");
    assert!(shiftc.exists(), "shiftc binary not found at {}. Run `cargo build -p shiftc` first.", shiftc.display());
    shiftc
}

fn write_source(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).expect("failed to write source file");
    path
}

#[test]
fn valid_program_exits_clean() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let main = write_source(&dir, "main.sh", "module m; class X {} class Y { X field; }");

    let output = Command::new(find_shiftc()).arg(&main).output().expect("failed to invoke shiftc");

    assert!(output.status.success(), "stdout: {}\nstderr: {}", String::from_utf8_lossy(&output.stdout), String::from_utf8_lossy(&output.stderr));
    assert!(String::from_utf8_lossy(&output.stdout).is_empty());
}

#[test]
fn unresolved_type_exits_nonzero_with_caret_diagnostic() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let main = write_source(&dir, "main.sh", "module m; class Y { Missing field; }");

    let output = Command::new(find_shiftc()).arg(&main).output().expect("failed to invoke shiftc");

    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("unable to resolve class 'Missing'"), "{stdout}");
    assert!(stdout.lines().any(|l| l.trim_start().starts_with('^')), "expected a caret line in:\n{stdout}");
}

#[test]
fn warnings_hidden_unless_requested() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let main = write_source(&dir, "main.sh", "module m; use m; class C {}");

    let quiet = Command::new(find_shiftc()).arg(&main).output().expect("failed to invoke shiftc");
    assert!(quiet.status.success());
    assert!(String::from_utf8_lossy(&quiet.stdout).is_empty());

    let loud = Command::new(find_shiftc()).arg("--warnings").arg(&main).output().expect("failed to invoke shiftc");
    assert!(loud.status.success());
    assert!(String::from_utf8_lossy(&loud.stdout).contains("redundant 'use' statement"));
}

#[test]
fn warnings_as_errors_fails_the_build() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let main = write_source(&dir, "main.sh", "module m; use m; class C {}");

    let output = Command::new(find_shiftc())
        .arg("--warnings")
        .arg("--warnings-as-errors")
        .arg(&main)
        .output()
        .expect("failed to invoke shiftc");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("error:"));
}

#[test]
fn multiple_source_files_resolve_across_each_other() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let base = write_source(&dir, "base.sh", "module a; class Base {}");
    let derived = write_source(&dir, "derived.sh", "module b; use a; class Derived : Base {}");

    let output = Command::new(find_shiftc()).arg(&base).arg(&derived).output().expect("failed to invoke shiftc");

    assert!(output.status.success(), "stdout: {}\nstderr: {}", String::from_utf8_lossy(&output.stdout), String::from_utf8_lossy(&output.stderr));
}

#[test]
fn missing_input_file_is_an_io_error() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let missing = dir.path().join("nope.sh");

    let output = Command::new(find_shiftc()).arg(&missing).output().expect("failed to invoke shiftc");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("failed to read"));
}

#[test]
fn no_input_files_is_an_error() {
    let output = Command::new(find_shiftc()).output().expect("failed to invoke shiftc");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("no input files"));
}
