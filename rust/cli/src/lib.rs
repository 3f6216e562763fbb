//! # evohold CLI Library
//!
//! Command-line front end for the evohold pipeline: spawn and breed
//! genomes, import untrusted submissions, benchmark stored solutions and
//! compare them head to head.
//!
//! ## Main Entry Point
//!
//! [`run`] parses the arguments, dispatches to a subcommand and returns the
//! process exit code.
//!
//! ## Example Usage
//!
//! ```no_run
//! use std::io;
//! let args = vec!["evohold", "spawn", "--count", "4", "--seed", "7"];
//! let code = evohold_cli::run(args, &mut io::stdout(), &mut io::stderr());
//! assert_eq!(code, 0);
//! ```
//!
//! ## Available Subcommands
//!
//! - `cfg`: Display the resolved configuration
//! - `spawn`: Capture random genomes
//! - `breed`: Breed an offspring from stored parents
//! - `evaluate`: Benchmark stored solutions
//! - `compare`: Head-to-head round robin
//! - `leaderboard`: Ranked summary
//! - `import`: Sanitize and capture an external genome
//! - `validate`: Strictly check an external genome

use clap::Parser;
use std::io::Write;

#[macro_use]
mod macros;

pub mod cli;
mod commands;
pub mod config;
mod error;
pub mod exit_code;
pub mod formatters;
pub mod io_utils;
pub mod ui;

use cli::{Commands, EvoholdCli};
use commands::{
    handle_breed_command, handle_cfg_command, handle_compare_command, handle_evaluate_command,
    handle_import_command, handle_leaderboard_command, handle_spawn_command,
    handle_validate_command, BreedArgs, EvaluateArgs,
};

pub use error::CliError;

const COMMANDS: &[&str] = &[
    "cfg",
    "spawn",
    "breed",
    "evaluate",
    "compare",
    "leaderboard",
    "import",
    "validate",
];

/// Main entry point for the CLI application.
///
/// # Returns
///
/// `0` on success, `2` for any error (bad arguments, missing seed, invalid
/// input, storage failures, validation issues).
///
/// # Example
///
/// ```
/// use std::io;
/// let code = evohold_cli::run(vec!["evohold", "--help"], &mut io::sink(), &mut io::sink());
/// assert_eq!(code, 0);
/// ```
pub fn run<I, S>(args: I, out: &mut dyn Write, err: &mut dyn Write) -> i32
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let argv: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();

    let cli = match EvoholdCli::try_parse_from(&argv) {
        Ok(cli) => cli,
        Err(e) => {
            use clap::error::ErrorKind;

            // Help and version go to stdout and exit 0
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                    if write!(out, "{}", e).is_err() {
                        return exit_code::ERROR;
                    }
                    exit_code::SUCCESS
                }
                _ => {
                    write_or_exit!(err, "{}", e);
                    write_or_exit!(err, "Usage: evohold <command> [options]\n");
                    write_or_exit!(err, "Commands:");
                    for c in COMMANDS {
                        write_or_exit!(err, "  {}", c);
                    }
                    write_or_exit!(err, "\nFor full help, run: evohold --help");
                    exit_code::ERROR
                }
            };
        }
    };

    let command = cli.cmd.name();
    let result = match cli.cmd {
        Commands::Cfg => handle_cfg_command(out),
        Commands::Spawn {
            count,
            seed,
            store,
            author,
        } => handle_spawn_command(count, seed, store, &author, out, err),
        Commands::Breed {
            store,
            parent_a,
            parent_b,
            seed,
            symmetric,
            stress,
            author,
        } => handle_breed_command(
            BreedArgs {
                store,
                parent_a,
                parent_b,
                seed,
                symmetric,
                stress,
                author,
            },
            out,
            err,
        ),
        Commands::Evaluate {
            store,
            id,
            hands,
            sets,
            workers,
            sequential,
        } => handle_evaluate_command(
            EvaluateArgs {
                store,
                id,
                hands,
                sets,
                workers,
                sequential,
            },
            out,
            err,
        ),
        Commands::Compare { store, hands } => handle_compare_command(store, hands, out),
        Commands::Leaderboard { store, json } => handle_leaderboard_command(store, json, out),
        Commands::Import {
            input,
            store,
            seed,
            author,
        } => handle_import_command(&input, store, seed, author, out, err),
        Commands::Validate { input } => handle_validate_command(&input, out),
    };

    match result {
        Ok(()) => exit_code::SUCCESS,
        Err(e) => {
            tracing::debug!(command, error = %e, "command failed");
            let _ = ui::write_error(err, &e.to_string());
            exit_code::ERROR
        }
    }
}
