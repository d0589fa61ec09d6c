//! featab - Sliding-window acoustic feature extraction
//!
//! Runs openSMILE over a recording (or a directory of recordings) three
//! ways: functionals per sliding window, functionals over the whole
//! recording, and frame-level low-level descriptors. Results land as CSV
//! files named after the recording.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use featab::features::SmileExtractor;
use featab::pipeline;

/// Command-line arguments for featab
#[derive(Parser, Debug)]
#[command(name = "featab")]
#[command(about = "Sliding-window acoustic feature extraction via openSMILE")]
#[command(version)]
struct Args {
    /// Recording to process, or a directory of recordings
    input: PathBuf,

    /// Directory to write the CSV tables into
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Sliding window duration in seconds
    #[arg(long, default_value = "1.0")]
    window_size: f64,

    /// Sliding window stride in seconds
    #[arg(long, default_value = "1.0")]
    stride: f64,

    /// openSMILE feature set name, or a path to a .conf file
    #[arg(long, default_value = "eGeMAPSv02")]
    feature_set: String,

    /// Path to the SMILExtract executable
    #[arg(long, default_value = "SMILExtract", env = "FEATAB_SMILEXTRACT")]
    smilextract: PathBuf,

    /// openSMILE config directory that feature set names resolve against
    #[arg(long, default_value = "config", env = "FEATAB_CONFIG_DIR")]
    config_dir: PathBuf,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let extractor = SmileExtractor::new(args.smilextract, &args.feature_set, &args.config_dir)
        .context("failed to configure the feature extractor")?;

    let config = pipeline::RunConfig {
        input: args.input,
        output_dir: args.output_dir,
        window_duration: args.window_size,
        stride: args.stride,
    };

    let outputs = pipeline::run(&config, &extractor)
        .with_context(|| format!("feature extraction failed for {}", config.input.display()))?;

    info!(
        "wrote {} table sets to {}",
        outputs.len(),
        config.output_dir.display()
    );
    Ok(())
}
