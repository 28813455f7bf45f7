//! Lifeline CLI - interactive Game of Life with an undo/redo timeline,
//! or headless batch runs with --steps and --output.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use lifeline::{format, patterns, rule, Grid, Session, SessionConfig, Strategy};

/// Success.
const EXIT_SUCCESS: u8 = 0;
/// Runtime failure: load, allocation, save, or terminal setup.
const EXIT_ERROR: u8 = 1;
/// Usage error. clap uses the same code for argument parsing failures.
const EXIT_USAGE: u8 = 2;

#[derive(Parser, Debug)]
#[command(name = "lifeline")]
#[command(about = "Game of Life with a bounded undo/redo timeline")]
#[command(version)]
#[command(after_help = "\
Keys:
  space  play/pause     n  step        b/Left   back
  f/Right  forward      s  save        r  resize      q/Esc  quit

Examples:
  lifeline --pattern glider --width 20 --height 20
  lifeline --input seed.txt --timeline ring --history-cap 64
  lifeline --input seed.txt --steps 100 --output gen100.txt")]
struct Cli {
    /// Grid file to start from
    #[arg(long, short = 'i')]
    input: Option<PathBuf>,

    /// File to save to (batch result, or the save prompt's default)
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// Generations to compute in batch mode (requires --output)
    #[arg(long, short = 'n', default_value_t = 0)]
    steps: usize,

    /// Width of a new grid
    #[arg(long, alias = "w", default_value_t = 50, value_parser = positive)]
    width: usize,

    /// Height of a new grid
    #[arg(long, alias = "h", default_value_t = 30, value_parser = positive)]
    height: usize,

    /// Generations kept in history (0 = unbounded)
    #[arg(long = "history-cap", default_value_t = 512)]
    history_cap: usize,

    /// History storage: chain or ring
    #[arg(long, default_value = "chain")]
    timeline: Strategy,

    /// Milliseconds between generations while playing
    #[arg(long = "interval-ms", default_value_t = 120, value_parser = clap::value_parser!(u64).range(1..))]
    interval_ms: u64,

    /// Stamp a built-in pattern in the middle of the grid
    #[arg(long, value_name = "NAME")]
    pattern: Option<String>,

    /// Fill the grid randomly from this seed
    #[arg(long, value_name = "SEED")]
    random: Option<u32>,

    /// Draw in the main screen instead of the alternate screen
    #[arg(long)]
    no_alt_screen: bool,
}

fn positive(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(format!("'{s}' is not a positive integer")),
    }
}

#[derive(Debug)]
struct CliError {
    code: u8,
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn runtime(msg: impl Into<String>) -> Self {
        Self {
            code: EXIT_ERROR,
            message: msg.into(),
            hint: None,
        }
    }

    fn usage(msg: impl Into<String>) -> Self {
        Self {
            code: EXIT_USAGE,
            message: msg.into(),
            hint: None,
        }
    }

    fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match run(cli) {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError {
            code,
            message,
            hint,
        }) => {
            eprintln!("error: {message}");
            if let Some(hint) = hint {
                eprintln!("hint:  {hint}");
            }
            ExitCode::from(code)
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let seed = initial_grid(&cli)?;

    if let (Some(output), true) = (&cli.output, cli.steps > 0) {
        return run_batch(&seed, cli.steps, output);
    }

    let config = SessionConfig {
        history_capacity: cli.history_cap,
        strategy: cli.timeline,
        step_interval: Duration::from_millis(cli.interval_ms),
        save_path: cli.output.unwrap_or_else(|| PathBuf::from("output.txt")),
        start_playing: cli.input.is_some(),
        alternate_screen: !cli.no_alt_screen,
        ..SessionConfig::default()
    };

    let mut session = Session::new(&seed, config)
        .map_err(|e| CliError::runtime(format!("cannot start history: {e}")))?;
    session
        .run()
        .map_err(|e| CliError::runtime(format!("terminal error: {e}")))
}

/// The grid the session or batch run starts from.
fn initial_grid(cli: &Cli) -> Result<Grid, CliError> {
    let mut grid = match &cli.input {
        Some(path) => format::load_from_file(path).map_err(|e| {
            CliError::runtime(format!("cannot load '{}': {e}", path.display()))
        })?,
        None => Grid::new(cli.width, cli.height).map_err(|e| {
            CliError::runtime(format!(
                "cannot create a {}x{} grid: {e}",
                cli.width, cli.height
            ))
        })?,
    };

    if let Some(seed) = cli.random {
        patterns::fill_random(&mut grid, seed);
    }

    if let Some(name) = &cli.pattern {
        let Some(pattern) = patterns::find(name) else {
            let known: Vec<_> = patterns::PATTERNS.iter().map(|p| p.name).collect();
            return Err(CliError::usage(format!("unknown pattern '{name}'"))
                .with_hint(format!("available: {}", known.join(", "))));
        };
        let (x, y) = centered_origin(&grid, pattern);
        patterns::stamp(&mut grid, pattern, x, y);
    }

    Ok(grid)
}

/// Origin that puts the pattern's bounding box in the middle of the grid.
#[allow(clippy::cast_possible_wrap)]
fn centered_origin(grid: &Grid, pattern: &patterns::Pattern) -> (isize, isize) {
    let span_x = pattern.cells.iter().map(|&(x, _)| x).max().unwrap_or(0) + 1;
    let span_y = pattern.cells.iter().map(|&(_, y)| y).max().unwrap_or(0) + 1;
    (
        (grid.width() as isize - span_x) / 2,
        (grid.height() as isize - span_y) / 2,
    )
}

/// Compute `steps` generations without a timeline and save the result.
fn run_batch(seed: &Grid, steps: usize, output: &Path) -> Result<(), CliError> {
    let last = rule::advance(seed, steps)
        .map_err(|e| CliError::runtime(format!("batch run failed: {e}")))?;
    format::save_to_file(output, &last).map_err(|e| {
        CliError::runtime(format!("cannot save '{}': {e}", output.display()))
    })?;
    log::info!(
        "batch: {steps} generations, {} live cells, written to {}",
        last.alive_count(),
        output.display()
    );
    Ok(())
}
