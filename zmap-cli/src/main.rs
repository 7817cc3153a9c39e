use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use zmap_core::{BumpMode, CompressionScope, Span};

mod commands;
mod config;
mod error;
mod input;

use commands::simulate::SimulationParams;
use config::Config;
use error::CliError;

#[derive(Parser)]
#[command(name = "zmap")]
#[command(about = "ZMap - feature column bumping engine")]
#[command(version)]
#[command(long_about = "
Lays out the features of one ZMap column into lanes the way the ZMap
display bumps them, and reports the resulting geometry.

Examples:
  zmap bump --input genes.json --mode overlap
  zmap bump --input est.json --mode featureset_name --scope mark:100000-250000 --output layout.json
  zmap simulate --features 100000 --seed 7 --mode overlap
  zmap config --example > zmap.toml
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Bump a column dumped as JSON and write its layout
    Bump {
        /// Column file (JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Bump mode (overlap, all, alternating, featureset_name, unbump, ...)
        #[arg(short, long, value_parser = parse_mode)]
        mode: Option<BumpMode>,

        /// Region taking part: whole, mark:START-END or visible:START-END
        /// (defaults to the configured scope)
        #[arg(long, value_parser = parse_scope)]
        scope: Option<CompressionScope>,

        /// Gap between lanes
        #[arg(long)]
        spacing: Option<f64>,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Bump a random column and report packing statistics
    Simulate {
        /// Number of features to generate
        #[arg(long, default_value = "10000")]
        features: usize,

        /// Random seed
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Bump mode
        #[arg(short, long, value_parser = parse_mode)]
        mode: Option<BumpMode>,

        /// Length of the simulated sequence
        #[arg(long, default_value = "1000000")]
        region: u64,

        /// Longest simulated feature
        #[arg(long, default_value = "5000")]
        max_len: u64,

        /// Percentage of composite features
        #[arg(long, default_value = "10")]
        composites: u32,
    },

    /// Show configuration
    Config {
        /// Print an example zmap.toml
        #[arg(long)]
        example: bool,
    },
}

fn parse_mode(s: &str) -> Result<BumpMode, String> {
    s.parse::<BumpMode>().map_err(|e| e.to_string())
}

fn parse_span(s: &str) -> Result<Span, String> {
    let (start, end) = s
        .split_once('-')
        .ok_or_else(|| format!("expected START-END, got '{}'", s))?;
    let start = start.trim().parse().map_err(|_| format!("invalid start '{}'", start))?;
    let end = end.trim().parse().map_err(|_| format!("invalid end '{}'", end))?;
    Span::new(start, end).map_err(|e| e.to_string())
}

fn parse_scope(s: &str) -> Result<CompressionScope, String> {
    match s.split_once(':') {
        None if s == "whole" => Ok(CompressionScope::WholeSequence),
        Some(("mark", span)) => Ok(CompressionScope::MarkedRegion(parse_span(span)?)),
        Some(("visible", span)) => Ok(CompressionScope::VisibleWindow(parse_span(span)?)),
        _ => Err(format!("expected whole, mark:START-END or visible:START-END, got '{}'", s)),
    }
}

fn setup_logging(verbose: u8, quiet: bool, default_level: &str) {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => default_level,
            1 => "debug",
            _ => "trace",
        }
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;
    setup_logging(cli.verbose, cli.quiet, &config.general.log_level);

    match cli.command {
        Commands::Bump {
            input,
            mode,
            scope,
            spacing,
            output,
        } => {
            commands::bump::execute(&config, input, mode, scope, spacing, output)?;
        }

        Commands::Simulate {
            features,
            seed,
            mode,
            region,
            max_len,
            composites,
        } => {
            let params = SimulationParams {
                features,
                seed,
                region,
                max_len,
                composite_percent: composites.min(100),
            };
            commands::simulate::execute(&config, params, mode)?;
        }

        Commands::Config { example } => {
            if example {
                print!("{}", Config::example_toml()?);
            } else {
                print!("{}", toml::to_string_pretty(&config).map_err(CliError::from)?);
            }
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        match err.downcast_ref::<CliError>() {
            Some(cli_err) => error::print_error_and_exit(cli_err),
            None => {
                eprintln!("Error: {:#}", err);
                std::process::exit(1);
            }
        }
    }
}
