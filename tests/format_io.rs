//! Loading and saving grids through real files.

use lifeline::{format, rule, FormatError, Grid};
use std::fs;
use tempfile::TempDir;

fn write_file(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn save_then_load_reproduces_the_grid() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("grid.txt");

    let mut grid = Grid::new(7, 4).unwrap();
    lifeline::patterns::fill_random(&mut grid, 42);
    format::save_to_file(&path, &grid).unwrap();

    let loaded = format::load_from_file(&path).unwrap();
    assert_eq!(loaded, grid);
}

#[test]
fn saved_file_is_readable_text() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("glider.txt");

    let mut grid = Grid::new(4, 3).unwrap();
    let glider = lifeline::patterns::find("glider").unwrap();
    lifeline::patterns::stamp(&mut grid, glider, 0, 0);
    format::save_to_file(&path, &grid).unwrap();

    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "4 3\n.O..\n..O.\nOOO.\n"
    );
}

#[test]
fn premature_eof_leaves_previous_grid_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(&dir, "short.txt", "5 3\n.....\nOO...\n");

    let mut grid = Grid::new(2, 2).unwrap();
    grid.set(1, 1, 1);
    let before = grid.clone();

    let err = format::load_into(&path, &mut grid).unwrap_err();
    assert!(matches!(err, FormatError::PrematureEof { row: 2 }), "{err}");
    assert_eq!(grid, before);
}

#[test]
fn load_into_replaces_on_success() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(&dir, "ok.txt", "3 1\nO.O\n");

    let mut grid = Grid::new(10, 10).unwrap();
    format::load_into(&path, &mut grid).unwrap();
    assert_eq!(grid.dimensions(), (3, 1));
    assert_eq!(grid.cells(), &[1, 0, 1]);
}

#[test]
fn windows_line_endings_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(&dir, "crlf.txt", "3 2\r\n.O.\r\n.O.\r\n");
    let grid = format::load_from_file(&path).unwrap();
    assert_eq!(grid.alive_count(), 2);
}

#[test]
fn missing_file_is_an_open_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = format::load_from_file(dir.path().join("nope.txt")).unwrap_err();
    assert!(matches!(err, FormatError::Open(_)));
    assert!(err.to_string().starts_with("cannot open file"));
}

#[test]
fn malformed_files_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let cases = [
        ("empty.txt", ""),
        ("header.txt", "3\n...\n"),
        ("zero.txt", "0 3\n"),
        ("short_line.txt", "3 2\n..\n...\n"),
        ("bad_char.txt", "3 1\n.#.\n"),
        ("garbage.txt", "2 1\n.. x\n"),
    ];
    for (name, contents) in cases {
        let path = write_file(&dir, name, contents);
        assert!(format::load_from_file(&path).is_err(), "{name} should fail");
    }
}

#[test]
fn saving_into_a_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("out.txt");
    let grid = Grid::new(2, 2).unwrap();
    assert!(matches!(
        format::save_to_file(&path, &grid),
        Err(FormatError::Open(_))
    ));
}

#[test]
fn batch_run_matches_stepping_by_hand() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_file(&dir, "in.txt", "5 5\n.....\n..O..\n..O..\n..O..\n.....\n");
    let output = dir.path().join("out.txt");

    let seed = format::load_from_file(&input).unwrap();
    let last = rule::advance(&seed, 3).unwrap();
    format::save_to_file(&output, &last).unwrap();

    // A blinker after an odd number of steps is horizontal.
    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "5 5\n.....\n.....\n.OOO.\n.....\n.....\n"
    );
}
