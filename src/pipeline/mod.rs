// Feature extraction pipeline
// Drives a recording (or a directory of them) through windowing, segment
// materialization, feature extraction, and CSV output

pub mod assemble;

pub use assemble::{assemble_windowed_table, parse_identifier, AssembleError};

use log::{info, warn};
use std::fs;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::audio::{CodecError, Recording};
use crate::features::{ExtractorError, FeatureExtractor, FeatureTable};
use crate::output::{self, TableKind};
use crate::segment::{materialize_segments, plan_windows, Window, WindowError, Workspace};

/// Directory entries that are never treated as recordings.
const SKIPPED_ENTRIES: &[&str] = &[".DS_Store", "Thumbs.db", "desktop.ini"];

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("input {0:?} is neither a file nor a directory")]
    InputNotFound(PathBuf),

    #[error(transparent)]
    Window(#[from] WindowError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Extractor(#[from] ExtractorError),

    #[error(transparent)]
    Assemble(#[from] AssembleError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// One extraction run over a single input path.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Recording to process, or a directory of recordings.
    pub input: PathBuf,

    /// Directory the CSV tables are written into.
    pub output_dir: PathBuf,

    /// Sliding window duration in seconds.
    pub window_duration: f64,

    /// Sliding window stride in seconds.
    pub stride: f64,
}

/// Paths of the tables one recording produced.
#[derive(Debug, Clone)]
pub struct RunOutputs {
    pub functionals: PathBuf,
    pub llds: PathBuf,

    /// Absent when the recording is shorter than one window.
    pub sliding_window: Option<PathBuf>,
}

/// Process the configured input, dispatching on whether it is a single
/// recording or a directory of them.
pub fn run(
    config: &RunConfig,
    extractor: &dyn FeatureExtractor,
) -> Result<Vec<RunOutputs>, PipelineError> {
    if config.input.is_dir() {
        run_directory(config, extractor)
    } else if config.input.is_file() {
        Ok(vec![run_recording(config, extractor)?])
    } else {
        Err(PipelineError::InputNotFound(config.input.clone()))
    }
}

/// Extract all three tables for one recording: windowed functionals over the
/// sliding window plan, then whole-recording functionals, then low-level
/// descriptors.
pub fn run_recording(
    config: &RunConfig,
    extractor: &dyn FeatureExtractor,
) -> Result<RunOutputs, PipelineError> {
    let recording = Recording::load(&config.input)?;
    let basename = config
        .input
        .file_stem()
        .unwrap_or_else(|| config.input.as_os_str())
        .to_string_lossy()
        .into_owned();

    // Segments live in a per-run workspace that is removed when this block
    // ends, before the whole-recording passes below.
    let sliding_window = {
        let windows: Vec<Window> = plan_windows(
            config.window_duration,
            config.stride,
            recording.duration_seconds(),
        )?
        .collect();

        if windows.is_empty() {
            warn!(
                "{} is shorter than one {}s window, skipping windowed table",
                config.input.display(),
                config.window_duration
            );
            None
        } else {
            let workspace = Workspace::create()?;
            let segments = materialize_segments(&recording, windows, &workspace)?;
            let mut records = Vec::with_capacity(segments.len());
            for segment in &segments {
                records.push(extractor.functionals(&segment.path)?);
            }
            let table = assemble_windowed_table(&segments, records)?;
            let path = output::write_table(
                &config.output_dir,
                &basename,
                TableKind::SlidingWindowFunctionals,
                &table,
            )?;
            info!("created {}", path.display());
            Some(path)
        }
    };

    let table = FeatureTable::from_record(extractor.functionals(&config.input)?);
    let functionals =
        output::write_table(&config.output_dir, &basename, TableKind::Functionals, &table)?;
    info!("created {}", functionals.display());

    let table = extractor.descriptors(&config.input)?;
    let llds = output::write_table(
        &config.output_dir,
        &basename,
        TableKind::LowLevelDescriptors,
        &table,
    )?;
    info!("created {}", llds.display());

    Ok(RunOutputs {
        functionals,
        llds,
        sliding_window,
    })
}

/// Process every recording in a directory in name order. Junk entries are
/// ignored and subdirectories are skipped; the first failing recording
/// aborts the batch.
fn run_directory(
    config: &RunConfig,
    extractor: &dyn FeatureExtractor,
) -> Result<Vec<RunOutputs>, PipelineError> {
    let mut entries: Vec<PathBuf> = fs::read_dir(&config.input)?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .map(|entry| entry.path())
        .collect();
    entries.sort();

    let mut outputs = Vec::new();
    for entry in entries {
        let name = entry
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        if SKIPPED_ENTRIES.contains(&name.as_str()) {
            continue;
        }
        if entry.is_dir() {
            warn!("skipping directory {}", entry.display());
            continue;
        }

        let run = RunConfig {
            input: entry,
            ..config.clone()
        };
        outputs.push(run_recording(&run, extractor)?);
    }

    Ok(outputs)
}
