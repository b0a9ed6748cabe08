//! Set-Cover Calculator
//!
//! Loads a problem file (an image size, an optional required cover and a list
//! of pictures) and selects a small set of pictures covering the image with
//! the greedy, exact or exhaustive strategy.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::error;
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};

use setcover::{persistence, Calculator, Cover};

/// Finds minimal sets of pictures covering an image.
#[derive(Parser)]
#[command(name = "setcover")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Problem file to solve.
    problem: PathBuf,

    /// Also write the result to this file.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Log search details.
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors.
    #[arg(short, long)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Pick pictures by largest marginal cover.
    Greedy,
    /// Branch-and-bound search for a smallest cover.
    Exact {
        /// Maximum number of pictures to consider.
        #[arg(long)]
        size_limit: Option<usize>,
    },
    /// Enumerate picture combinations in index order.
    Exhaustive {
        /// Accept any selection covering this fraction (strictly between 0 and 1).
        #[arg(long)]
        cover_limit: Option<f64>,
        /// Maximum number of pictures to consider.
        #[arg(long)]
        size_limit: Option<usize>,
    },
    /// Score the given pictures against the uncompacted problem.
    Evaluate {
        /// Picture indices.
        #[arg(required = true)]
        pictures: Vec<usize>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else if cli.quiet {
        LevelFilter::Warn
    } else {
        LevelFilter::Info
    };
    if let Err(e) = TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    ) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    match run(&cli) {
        Ok(cover) => {
            println!("{}", cover);
            if let Some(path) = &cli.output {
                if let Err(e) = persistence::save_cover(path, &cover) {
                    error!("Failed to save result to {}: {}", path.display(), e);
                    return ExitCode::FAILURE;
                }
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

/// Loads the problem and runs the selected command.
fn run(cli: &Cli) -> setcover::Result<Cover> {
    let mut calculator: Calculator = persistence::load(&cli.problem)?;

    match cli.command {
        Command::Greedy => calculator.greedy(),
        Command::Exact { size_limit } => calculator.exact(size_limit),
        Command::Exhaustive {
            cover_limit,
            size_limit,
        } => calculator.exhaustive(cover_limit, size_limit),
        Command::Evaluate { ref pictures } => calculator.evaluate(pictures),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_exhaustive_limits() {
        let cli = Cli::parse_from([
            "setcover",
            "problem.txt",
            "exhaustive",
            "--cover-limit",
            "0.9",
            "--size-limit",
            "4",
        ]);
        match cli.command {
            Command::Exhaustive {
                cover_limit,
                size_limit,
            } => {
                assert_eq!(cover_limit, Some(0.9));
                assert_eq!(size_limit, Some(4));
            }
            _ => panic!("expected exhaustive command"),
        }
    }

    #[test]
    fn test_cli_rejects_verbose_and_quiet() {
        let result = Cli::try_parse_from(["setcover", "-v", "-q", "problem.txt", "greedy"]);
        assert!(result.is_err());
    }
}
