// End-to-end runs of the `lifeline` binary: batch mode and exit codes.
// None of these reach interactive mode, so no TTY is needed.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

fn lifeline() -> Command {
    Command::new(env!("CARGO_BIN_EXE_lifeline"))
}

fn run(args: &[&str]) -> Output {
    lifeline().args(args).output().expect("run lifeline")
}

fn path_str(path: &Path) -> &str {
    path.to_str().expect("utf-8 temp path")
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

// ---------------------------------------------------------------------------
// Batch mode
// ---------------------------------------------------------------------------

#[test]
fn batch_run_writes_final_generation() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("blinker.txt");
    let output = dir.path().join("out.txt");
    fs::write(&input, "5 5\n.....\n..O..\n..O..\n..O..\n.....\n").unwrap();

    let result = run(&[
        "--input",
        path_str(&input),
        "--steps",
        "3",
        "--output",
        path_str(&output),
    ]);

    assert_eq!(result.status.code(), Some(0), "stderr: {}", stderr(&result));
    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "5 5\n.....\n.....\n.OOO.\n.....\n.....\n"
    );
}

#[test]
fn batch_run_from_pattern_on_new_grid() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("glider.txt");

    let result = run(&[
        "--width",
        "8",
        "--height",
        "8",
        "--pattern",
        "glider",
        "--steps",
        "4",
        "--output",
        path_str(&output),
    ]);

    assert_eq!(result.status.code(), Some(0), "stderr: {}", stderr(&result));
    let grid = lifeline::format::load_from_file(&output).unwrap();
    assert_eq!(grid.dimensions(), (8, 8));
    // A glider keeps five cells as it travels.
    assert_eq!(grid.alive_count(), 5);
}

// ---------------------------------------------------------------------------
// Runtime failures exit 1
// ---------------------------------------------------------------------------

#[test]
fn missing_input_file_exits_1() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.txt");
    let output = dir.path().join("out.txt");

    let result = run(&[
        "--input",
        path_str(&missing),
        "--steps",
        "1",
        "--output",
        path_str(&output),
    ]);

    assert_eq!(result.status.code(), Some(1));
    assert!(stderr(&result).contains("cannot load"), "stderr: {}", stderr(&result));
    assert!(!output.exists());
}

#[test]
fn malformed_input_file_exits_1() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("short.txt");
    fs::write(&input, "5 3\n.....\nOO...\n").unwrap();
    let output = dir.path().join("out.txt");

    let result = run(&[
        "--input",
        path_str(&input),
        "--steps",
        "1",
        "--output",
        path_str(&output),
    ]);

    assert_eq!(result.status.code(), Some(1));
    assert!(stderr(&result).contains("premature end of file"));
}

#[test]
fn unwritable_output_exits_1() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("missing").join("out.txt");

    let result = run(&["--width", "4", "--height", "4", "--steps", "1", "--output", path_str(&output)]);

    assert_eq!(result.status.code(), Some(1));
    assert!(stderr(&result).contains("cannot save"));
}

// ---------------------------------------------------------------------------
// Usage errors exit 2
// ---------------------------------------------------------------------------

#[test]
fn zero_width_exits_2() {
    let result = run(&["--width", "0", "--steps", "1", "--output", "unused.txt"]);
    assert_eq!(result.status.code(), Some(2));
}

#[test]
fn unknown_timeline_exits_2() {
    let result = run(&["--timeline", "tree"]);
    assert_eq!(result.status.code(), Some(2));
}

#[test]
fn unknown_pattern_exits_2_with_hint() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.txt");

    let result = run(&["--pattern", "spaceship", "--steps", "1", "--output", path_str(&output)]);

    assert_eq!(result.status.code(), Some(2));
    let err = stderr(&result);
    assert!(err.contains("unknown pattern 'spaceship'"), "stderr: {err}");
    assert!(err.contains("available:") && err.contains("Glider"), "stderr: {err}");
    assert!(!output.exists());
}
