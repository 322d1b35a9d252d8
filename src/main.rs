// gridbeaver: busy-beaver search over a two-dimensional grid automaton

use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, Level};

use gridbeaver::grid::parse::read_grid;
use gridbeaver::grid::space_size;
use gridbeaver::interpreter::constants::{DEFAULT_MAX_STEPS, DEFAULT_TRACE_DELAY_MS};
use gridbeaver::interpreter::engine::{Interpreter, RunConfig};
use gridbeaver::search::{Policy, Search, SearchConfig};
use gridbeaver::snapshot::SnapshotManager;
use gridbeaver::ui::App;

/// Snapshot memory limit of the viewer (256 MB)
const TRACE_MEMORY_LIMIT: usize = 256 * 1024 * 1024;

/// Busy-beaver search over a two-dimensional grid automaton.
#[derive(Parser)]
#[command(name = "gridbeaver", version, about)]
struct Cli {
    /// Increase log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Enumerate every SIZE×SIZE grid and report the longest halting one
    Search {
        /// Side length of the grid
        size: usize,

        /// Step budget of each run
        #[arg(long, default_value_t = DEFAULT_MAX_STEPS)]
        max_steps: u64,

        /// Which cells an advance may change
        #[arg(long, value_enum, default_value_t = PolicyArg::Visited)]
        policy: PolicyArg,

        /// Base-3 index of the first candidate
        #[arg(long)]
        start: Option<u128>,

        /// Stop after this many candidates
        #[arg(long)]
        limit: Option<u64>,

        /// Log progress every N candidates (0 disables)
        #[arg(long, default_value_t = 100_000)]
        progress_every: u64,
    },
    /// Execute one grid file and print its verdict
    Run {
        file: PathBuf,

        #[arg(long, default_value_t = DEFAULT_MAX_STEPS)]
        max_steps: u64,

        /// Pause between traced steps, in milliseconds
        #[arg(long, default_value_t = DEFAULT_TRACE_DELAY_MS)]
        delay: u64,
    },
    /// Record a run of one grid file and step through it in the terminal
    View {
        file: PathBuf,

        #[arg(long, default_value_t = DEFAULT_MAX_STEPS)]
        max_steps: u64,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum PolicyArg {
    Full,
    Visited,
    Prefix,
}

impl From<PolicyArg> for Policy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Full => Policy::Full,
            PolicyArg::Visited => Policy::Visited,
            PolicyArg::Prefix => Policy::Prefix,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    match cli.command {
        Command::Search {
            size,
            max_steps,
            policy,
            start,
            limit,
            progress_every,
        } => run_search(SearchConfig {
            size,
            max_steps,
            policy: policy.into(),
            start,
            limit,
            progress_every,
            run: RunConfig::default(),
        }),
        Command::Run {
            file,
            max_steps,
            delay,
        } => run_file(&file, max_steps, cli.verbose, delay),
        Command::View { file, max_steps } => view_file(&file, max_steps),
    }
}

fn run_search(config: SearchConfig) -> Result<()> {
    anyhow::ensure!(config.size > 0, "grid size must be positive");
    let total = space_size(config.size);
    if let (Some(start), Some(total)) = (config.start, total) {
        anyhow::ensure!(start < total, "start index {} is past the last grid {}", start, total - 1);
    }

    let started = Instant::now();
    let report = Search::new(config).run_with(|best| {
        info!(steps = best.steps, candidate = best.candidate, "new best");
    });
    let elapsed = started.elapsed();

    match &report.best {
        Some(best) => {
            println!("Best: {} steps", best.steps);
            println!("{}", best.grid);
            if let Some(index) = best.grid.index() {
                println!("Index: {}", index);
            }
        }
        None => println!("No halting grid found"),
    }
    let stats = &report.stats;
    println!(
        "Candidates: {} (finite {}, infinite {}, overflow {}, budget exhausted {})",
        stats.candidates, stats.finite, stats.infinite, stats.overflow, stats.exhausted
    );
    match total {
        Some(total) => println!(
            "Coverage: {} of {} grids ({:.4}%)",
            stats.covered,
            total,
            report.coverage(config.size) * 100.0
        ),
        None => println!("Coverage: {} grids", stats.covered),
    }
    if !report.completed {
        println!("Search stopped before the enumeration wrapped around");
    }
    println!("Time: {:.3}s", elapsed.as_secs_f64());
    Ok(())
}

fn run_file(file: &Path, max_steps: u64, verbosity: u8, delay: u64) -> Result<()> {
    let grid = read_grid(file).with_context(|| format!("failed to load {}", file.display()))?;
    let config = RunConfig {
        verbosity,
        trace_delay: Duration::from_millis(delay),
        ..RunConfig::default()
    };

    let mut interpreter = Interpreter::new(grid.size(), config);
    interpreter.reset(&grid);
    let outcome = interpreter.execute(max_steps);

    println!("{}", grid);
    println!("Outcome: {}", outcome);
    let visited: Vec<String> = interpreter
        .visited_addresses()
        .iter()
        .map(|a| a.to_string())
        .collect();
    println!("Visited: [{}]", visited.join(", "));
    Ok(())
}

fn view_file(file: &Path, max_steps: u64) -> Result<()> {
    let grid = read_grid(file).with_context(|| format!("failed to load {}", file.display()))?;

    let mut interpreter = Interpreter::new(grid.size(), RunConfig::default());
    interpreter.reset(&grid);
    let mut trace = SnapshotManager::new(TRACE_MEMORY_LIMIT);
    let outcome = interpreter.execute_recorded(max_steps, &mut trace);
    info!(%outcome, snapshots = trace.len(), "run recorded");

    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to build terminal backend")?;

    let mut app = App::new(trace, Duration::from_millis(DEFAULT_TRACE_DELAY_MS));
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res.context("viewer failed")
}
