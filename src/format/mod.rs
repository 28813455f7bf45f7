//! Grid text format: Load and save grids as plain text.
//!
//! ```text
//! 5 3
//! .O...
//! ..O..
//! OOO..
//! ```
//!
//! The header holds exactly two positive integers, `width height`. It is
//! followed by `height` lines of `width` cells, `.` for dead and `O` for
//! alive. Spaces and tabs may appear anywhere on a cell line and carriage
//! returns are ignored. Anything after the last row is ignored.
//!
//! Loading never panics and never touches a caller's grid unless the whole
//! file parsed successfully.

use crate::grid::{Grid, GridError};
use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Errors produced while loading or saving a grid.
#[derive(Debug)]
pub enum FormatError {
    /// The file could not be opened.
    Open(io::Error),
    /// Reading or writing failed mid-way.
    Io(io::Error),
    /// No header line.
    Empty,
    /// The header is not two positive integers.
    Header(String),
    /// The grid described by the header could not be allocated.
    Allocation(GridError),
    /// The file ended before row `row` was complete.
    PrematureEof {
        /// Zero-based row being read.
        row: usize,
    },
    /// Row `row` has fewer than `width` cells.
    ShortLine {
        /// Zero-based row being read.
        row: usize,
    },
    /// A character other than `.`, `O`, space, or tab.
    InvalidChar {
        /// Zero-based row being read.
        row: usize,
        /// The offending character.
        found: char,
    },
    /// Non-blank characters after the last cell of row `row`.
    TrailingGarbage {
        /// Zero-based row being read.
        row: usize,
    },
    /// Attempted to save an unallocated grid.
    Unallocated,
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open(e) => write!(f, "cannot open file: {e}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Empty => write!(f, "file is empty or unreadable"),
            Self::Header(line) => {
                write!(f, "invalid header '{line}' (expected: width height)")
            }
            Self::Allocation(e) => write!(f, "grid allocation failed: {e}"),
            Self::PrematureEof { row } => {
                write!(f, "premature end of file while reading row {}", row + 1)
            }
            Self::ShortLine { row } => write!(f, "row {} is too short", row + 1),
            Self::InvalidChar { row, found } => write!(
                f,
                "invalid character {found:?} in row {} (expected '.' or 'O')",
                row + 1
            ),
            Self::TrailingGarbage { row } => {
                write!(f, "unexpected characters after the end of row {}", row + 1)
            }
            Self::Unallocated => write!(f, "cannot save an unallocated grid"),
        }
    }
}

impl std::error::Error for FormatError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Open(e) | Self::Io(e) => Some(e),
            Self::Allocation(e) => Some(e),
            _ => None,
        }
    }
}

impl From<GridError> for FormatError {
    fn from(e: GridError) -> Self {
        Self::Allocation(e)
    }
}

/// Maximum header length shown in an error message.
const HEADER_PREVIEW: usize = 64;

fn parse_header(line: &str) -> Result<(usize, usize), FormatError> {
    let trimmed = line.trim();
    let bad = || {
        let preview: String = trimmed.chars().take(HEADER_PREVIEW).collect();
        FormatError::Header(preview)
    };

    let mut fields = trimmed.split_whitespace();
    let (Some(w), Some(h), None) = (fields.next(), fields.next(), fields.next()) else {
        return Err(bad());
    };
    let width: usize = w.parse().map_err(|_| bad())?;
    let height: usize = h.parse().map_err(|_| bad())?;
    if width == 0 || height == 0 {
        return Err(bad());
    }
    Ok((width, height))
}

/// Parse a grid from a reader.
///
/// # Errors
///
/// Returns a [`FormatError`] describing the first problem found.
pub fn parse<R: BufRead>(mut reader: R) -> Result<Grid, FormatError> {
    let mut header = String::new();
    if reader.read_line(&mut header).map_err(FormatError::Io)? == 0 {
        return Err(FormatError::Empty);
    }
    let (width, height) = parse_header(&header)?;

    let mut body = Vec::new();
    reader.read_to_end(&mut body).map_err(FormatError::Io)?;
    let mut bytes = body.iter().copied();

    // Cells grow with the input actually read, so a huge header on a short
    // file fails with PrematureEof before anything of header size exists.
    let mut cells = Vec::new();

    for y in 0..height {
        let mut x = 0;
        while x < width {
            match bytes.next() {
                None => return Err(FormatError::PrematureEof { row: y }),
                Some(b'\r' | b' ' | b'\t') => {}
                Some(b'\n') => return Err(FormatError::ShortLine { row: y }),
                Some(c @ (b'.' | b'O')) => {
                    cells.push(u8::from(c == b'O'));
                    x += 1;
                }
                Some(c) => {
                    return Err(FormatError::InvalidChar {
                        row: y,
                        found: char::from(c),
                    })
                }
            }
        }

        // Rest of the line: blanks only, then newline or end of file.
        loop {
            match bytes.next() {
                None | Some(b'\n') => break,
                Some(b'\r' | b' ' | b'\t') => {}
                Some(_) => return Err(FormatError::TrailingGarbage { row: y }),
            }
        }
    }

    Ok(Grid::from_cells(width, height, cells)?)
}

/// Write a grid in text format.
///
/// # Errors
///
/// Returns [`FormatError::Unallocated`] for an unallocated grid and
/// [`FormatError::Io`] if writing fails.
pub fn write<W: Write>(mut writer: W, grid: &Grid) -> Result<(), FormatError> {
    if !grid.is_allocated() {
        return Err(FormatError::Unallocated);
    }
    writeln!(writer, "{} {}", grid.width(), grid.height()).map_err(FormatError::Io)?;

    let mut line = Vec::with_capacity(grid.width() + 1);
    for row in grid.rows() {
        line.clear();
        line.extend(row.iter().map(|&c| if c != 0 { b'O' } else { b'.' }));
        line.push(b'\n');
        writer.write_all(&line).map_err(FormatError::Io)?;
    }
    writer.flush().map_err(FormatError::Io)
}

/// Load a grid from a file.
///
/// # Errors
///
/// Returns [`FormatError::Open`] if the file cannot be opened, otherwise
/// whatever [`parse`] reports.
pub fn load_from_file(path: impl AsRef<Path>) -> Result<Grid, FormatError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(FormatError::Open)?;
    let grid = parse(BufReader::new(file))?;
    log::info!(
        "loaded {}x{} grid from {}",
        grid.width(),
        grid.height(),
        path.display()
    );
    Ok(grid)
}

/// Load a grid from a file into `out`.
///
/// The new grid is fully built before it replaces `*out`; on error `*out`
/// is left exactly as it was.
///
/// # Errors
///
/// See [`load_from_file`].
pub fn load_into(path: impl AsRef<Path>, out: &mut Grid) -> Result<(), FormatError> {
    *out = load_from_file(path)?;
    Ok(())
}

/// Save a grid to a file, creating or truncating it.
///
/// # Errors
///
/// Returns [`FormatError::Open`] if the file cannot be created, otherwise
/// whatever [`write`] reports.
pub fn save_to_file(path: impl AsRef<Path>, grid: &Grid) -> Result<(), FormatError> {
    let path = path.as_ref();
    if !grid.is_allocated() {
        return Err(FormatError::Unallocated);
    }
    let file = File::create(path).map_err(FormatError::Open)?;
    write(BufWriter::new(file), grid)?;
    log::info!(
        "saved {}x{} grid to {}",
        grid.width(),
        grid.height(),
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_str(text: &str) -> Result<Grid, FormatError> {
        parse(text.as_bytes())
    }

    #[test]
    fn test_parse_basic() {
        let grid = parse_str("3 2\n.O.\nO.O\n").unwrap();
        assert_eq!(grid.dimensions(), (3, 2));
        assert_eq!(grid.cells(), &[0, 1, 0, 1, 0, 1]);
    }

    #[test]
    fn test_parse_tolerates_blanks_and_crlf() {
        let grid = parse_str("3 2\r\n. O .\t\r\nO\t.O  \r\n").unwrap();
        assert_eq!(grid.cells(), &[0, 1, 0, 1, 0, 1]);
    }

    #[test]
    fn test_parse_last_line_without_newline() {
        let grid = parse_str("2 1\nOO").unwrap();
        assert_eq!(grid.alive_count(), 2);
    }

    #[test]
    fn test_parse_ignores_content_after_last_row() {
        let grid = parse_str("1 1\nO\nwhatever\n").unwrap();
        assert_eq!(grid.alive_count(), 1);
    }

    #[test]
    fn test_parse_header_errors() {
        for header in ["5\n", "5 3 1\n", "a b\n", "0 3\n", "3 -1\n", "\n"] {
            assert!(
                matches!(parse_str(header), Err(FormatError::Header(_))),
                "header {header:?} should be rejected"
            );
        }
        assert!(matches!(parse_str(""), Err(FormatError::Empty)));
    }

    #[test]
    fn test_parse_premature_eof() {
        let err = parse_str("5 3\n.....\nOOOOO\n").unwrap_err();
        assert!(matches!(err, FormatError::PrematureEof { row: 2 }));
    }

    #[test]
    fn test_parse_huge_header_on_short_body() {
        // Nothing of header size is allocated before the rows are read.
        let err = parse_str("100000 100000\n").unwrap_err();
        assert!(matches!(err, FormatError::PrematureEof { row: 0 }));

        let err = parse_str("100000 100000\n.O.O").unwrap_err();
        assert!(matches!(err, FormatError::PrematureEof { row: 0 }));

        let err = parse_str(&format!("{} 2\n..", usize::MAX)).unwrap_err();
        assert!(matches!(err, FormatError::PrematureEof { row: 0 }));
    }

    #[test]
    fn test_parse_short_line() {
        let err = parse_str("3 2\n.O\nOOO\n").unwrap_err();
        assert!(matches!(err, FormatError::ShortLine { row: 0 }));
    }

    #[test]
    fn test_parse_invalid_char() {
        let err = parse_str("3 1\n.X.\n").unwrap_err();
        assert!(matches!(err, FormatError::InvalidChar { row: 0, found: 'X' }));
    }

    #[test]
    fn test_parse_trailing_garbage() {
        let err = parse_str("2 2\n..\n.. #\n").unwrap_err();
        assert!(matches!(err, FormatError::TrailingGarbage { row: 1 }));
    }

    #[test]
    fn test_write_format() {
        let mut grid = Grid::new(3, 2).unwrap();
        grid.set(1, 0, 1);
        grid.set(2, 1, 1);
        let mut out = Vec::new();
        write(&mut out, &grid).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "3 2\n.O.\n..O\n");
    }

    #[test]
    fn test_write_unallocated() {
        let mut out = Vec::new();
        assert!(matches!(
            write(&mut out, &Grid::default()),
            Err(FormatError::Unallocated)
        ));
        assert!(out.is_empty());
    }

    #[test]
    fn test_error_messages_are_readable() {
        let err = parse_str("5 3\n.....\n").unwrap_err();
        assert_eq!(err.to_string(), "premature end of file while reading row 2");
    }
}
