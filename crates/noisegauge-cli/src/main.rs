//! CLI for noisegauge: batch min-entropy assessment of noise-source samples.

mod commands;
mod unit_log;

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use noisegauge_core::AssessmentMode;

#[derive(Parser)]
#[command(name = "noisegauge")]
#[command(about = "noisegauge: SP 800-90B non-IID min-entropy assessment")]
#[command(version = noisegauge_core::VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Assess raw sample files, one analysis unit per file
    Assess {
        /// Raw sample files; each byte holds one sample in its low bits
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Bits per symbol, 1-8; 0 infers the width from the data
        #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=8))]
        bits: u8,

        /// Conditioned sequential dataset estimate instead of the initial
        /// entropy estimate
        #[arg(short = 'c', long)]
        conditioned: bool,

        /// Truncate the bitstring battery to 1,000,000 bits
        #[arg(short = 't', long)]
        truncate: bool,

        /// More output; repeat for per-estimator detail
        #[arg(short, long, action = ArgAction::Count)]
        verbose: u8,

        /// Assess only the given slice of each file: <index>,<samples>
        #[arg(short = 'l', long, value_name = "INDEX,SAMPLES")]
        subset: Option<String>,

        /// Write one `<stem>.log` of estimates per unit into this directory
        #[arg(long, value_name = "DIR")]
        output_dir: Option<PathBuf>,

        /// Write all unit reports as one JSON document
        #[arg(long, value_name = "PATH")]
        output: Option<PathBuf>,

        /// Worker threads (default: available parallelism)
        #[arg(long)]
        workers: Option<usize>,
    },

    /// Print the alpha = 0.001 chi-square critical value for a given df
    Cutoff {
        /// Degrees of freedom
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        df: u64,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Assess {
            files,
            bits,
            conditioned,
            truncate,
            verbose,
            subset,
            output_dir,
            output,
            workers,
        } => commands::assess::run(commands::assess::AssessCommandConfig {
            files: &files,
            bits,
            mode: if conditioned {
                AssessmentMode::Conditioned
            } else {
                AssessmentMode::InitialEntropy
            },
            all_bits: !truncate,
            verbose,
            subset: subset.as_deref(),
            output_dir: output_dir.as_deref(),
            output_path: output.as_deref(),
            workers,
        }),
        Commands::Cutoff { df } => commands::cutoff::run(df as usize),
    }
}
