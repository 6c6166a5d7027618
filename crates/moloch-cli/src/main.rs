//! Moloch CLI - headless runner for Moloch matches.
//!
//! Logs go to stderr (filter with `RUST_LOG`), results go to stdout as JSON.

#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

/// Moloch - a deterministic turn-based tile combat engine
#[derive(Parser, Debug)]
#[command(name = "moloch")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Play one match and print the recording
    Play {
        /// Scenario file (JSON)
        #[arg(required = true)]
        scenario: PathBuf,

        /// Let the autopilot pick the player's intents
        #[arg(short, long)]
        autopilot: bool,

        /// Override the scenario seed
        #[arg(short, long)]
        seed: Option<u64>,

        /// Include resolution events in the output
        #[arg(short, long)]
        events: bool,

        /// Also write the recording to a file
        #[arg(long)]
        save: Option<PathBuf>,
    },

    /// Replay a recording and check its move history
    Verify {
        /// Scenario file the recording was played on
        #[arg(required = true)]
        scenario: PathBuf,

        /// Recording produced by `play`
        #[arg(required = true)]
        recording: PathBuf,
    },

    /// Run many autopilot matches in parallel and summarize outcomes
    Batch {
        /// Scenario file (JSON)
        #[arg(required = true)]
        scenario: PathBuf,

        /// Number of matches (default: 100)
        #[arg(short, long, default_value = "100")]
        games: u64,

        /// First seed; match `i` uses `seed + i` (default: scenario seed)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Parallel threads (default: CPU count)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// Print every match result, not just the summary
        #[arg(short, long)]
        verbose: bool,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let result = match args.command {
        Commands::Play {
            scenario,
            autopilot,
            seed,
            events,
            save,
        } => cli::play::execute(&scenario, autopilot, seed, events, save.as_deref()),

        Commands::Verify {
            scenario,
            recording,
        } => cli::verify::execute(&scenario, &recording),

        Commands::Batch {
            scenario,
            games,
            seed,
            threads,
            verbose,
        } => cli::batch::execute(&scenario, games, seed, threads, verbose),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
