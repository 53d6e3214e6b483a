//! nether-tweak - Nethercore line-numeral tweak tool
//!
//! Rewrites the first numeral on each line of a text asset and streams the
//! result to stdout (or a file). The input file is never modified.

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use nether_tweak::{CoordinateOffset, NumeralRule, ScaleByConstant, open_input, transform_stream};

#[derive(Parser)]
#[command(name = "nether-tweak")]
#[command(about = "Nethercore line-numeral tweak tool")]
#[command(version)]
struct Cli {
    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Nudge integer sprite coordinates (x/y +0.01, width/height -0.02)
    Offset {
        /// Input text file
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Multiply the first decimal numeral on each line
    Scale {
        /// Input text file
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Multiplier
        #[arg(short, long, default_value_t = nether_tweak::rules::DEFAULT_SCALE_FACTOR)]
        factor: f64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging (stderr; stdout carries the transformed text)
    let default_level = if cli.quiet { "warn" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    match cli.command {
        Commands::Offset { input, output } => run(&CoordinateOffset, &input, output.as_deref()),
        Commands::Scale {
            input,
            output,
            factor,
        } => {
            if !factor.is_finite() {
                bail!("Scale factor must be finite, got {}", factor);
            }
            run(&ScaleByConstant::new(factor), &input, output.as_deref())
        }
    }
}

fn run(rule: &dyn NumeralRule, input: &Path, output: Option<&Path>) -> Result<()> {
    tracing::info!("Applying {} to {:?}", rule.name(), input);

    // Input is opened before any output file is created
    let reader = open_input(input)?;

    let stats = match output {
        Some(path) => {
            if is_same_file(input, path) {
                bail!("Output {:?} is the input file; refusing to overwrite it", path);
            }
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file {:?}", path))?;
            let mut writer = BufWriter::new(file);
            transform_stream(rule, reader, &mut writer)
                .map_err(|err| err.with_input_path(input))?
        }
        None => {
            let mut writer = BufWriter::new(io::stdout().lock());
            transform_stream(rule, reader, &mut writer)
                .map_err(|err| err.with_input_path(input))?
        }
    };

    tracing::info!(
        "Done! {} lines, {} substitutions",
        stats.lines,
        stats.substitutions
    );
    Ok(())
}

/// Same path or a symlink to it; hard links are not detected
fn is_same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
