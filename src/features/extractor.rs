// Feature extractor seam
// Trait boundary between the pipeline and the external feature computation

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::features::table::{FeatureRecord, FeatureTable};

#[derive(Debug, Error)]
pub enum ExtractorError {
    #[error("unknown feature set {0:?}")]
    UnknownFeatureSet(String),

    #[error("feature set config file not found: {}", .0.display())]
    MissingConfig(PathBuf),

    #[error("failed to launch {command}: {source}")]
    Launch {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("feature extractor failed ({status}): {stderr}")]
    Failed {
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error("malformed extractor output: {0}")]
    BadOutput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// External acoustic feature extractor, configured with a feature set ahead
/// of time. Both calls are independent and blocking: no caching, no
/// batching, no timeout.
pub trait FeatureExtractor {
    /// One aggregate row of features over the whole audio unit.
    fn functionals(&self, audio: &Path) -> Result<FeatureRecord, ExtractorError>;

    /// One row of features per analysis frame of the audio unit.
    fn descriptors(&self, audio: &Path) -> Result<FeatureTable, ExtractorError>;
}
