// WAV codec
// Loads recordings, slices time ranges out of them, and exports slices

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Native file extension of this codec. Segment identifiers carry it as
/// their suffix.
pub const FILE_EXTENSION: &str = "wav";

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("failed to read or write WAV data: {0}")]
    Wav(#[from] hound::Error),

    #[error("unsupported audio format: {0}")]
    UnsupportedFormat(String),
}

/// Sample data in the source file's native representation. Slices keep the
/// representation, so exported segments are bit-faithful to the original.
#[derive(Debug, Clone)]
enum Samples {
    Int(Vec<i32>),
    Float(Vec<f32>),
}

impl Samples {
    fn slice(&self, lo: usize, hi: usize) -> Samples {
        match self {
            Samples::Int(samples) => Samples::Int(samples[lo..hi].to_vec()),
            Samples::Float(samples) => Samples::Float(samples[lo..hi].to_vec()),
        }
    }

    fn len(&self) -> usize {
        match self {
            Samples::Int(samples) => samples.len(),
            Samples::Float(samples) => samples.len(),
        }
    }
}

/// Immutable handle to one decoded recording. Owns the sample data for the
/// duration of a pipeline run.
#[derive(Debug, Clone)]
pub struct Recording {
    path: PathBuf,
    spec: WavSpec,
    samples: Samples,
    frame_count: usize,
}

impl Recording {
    /// Load a WAV file into memory.
    pub fn load(path: impl Into<PathBuf>) -> Result<Recording, CodecError> {
        let path = path.into();
        let mut reader = WavReader::open(&path)?;
        let spec = reader.spec();

        // hound admits a fmt chunk declaring a zero sample rate (its
        // byte-rate consistency check still holds); every duration
        // computation downstream divides by the rate.
        if spec.sample_rate == 0 {
            return Err(CodecError::UnsupportedFormat(
                "zero sample rate".to_string(),
            ));
        }

        let samples = match (spec.sample_format, spec.bits_per_sample) {
            (SampleFormat::Int, _) => {
                Samples::Int(reader.samples::<i32>().collect::<Result<Vec<_>, _>>()?)
            }
            (SampleFormat::Float, 32) => {
                Samples::Float(reader.samples::<f32>().collect::<Result<Vec<_>, _>>()?)
            }
            (format, bits) => {
                return Err(CodecError::UnsupportedFormat(format!(
                    "{:?} {}-bit audio",
                    format, bits
                )));
            }
        };

        let frame_count = samples.len() / spec.channels as usize;

        Ok(Recording {
            path,
            spec,
            samples,
            frame_count,
        })
    }

    /// Duration of the recording in seconds.
    pub fn duration_seconds(&self) -> f64 {
        self.frame_count as f64 / self.spec.sample_rate as f64
    }

    /// Path the recording was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Slice the time range `[start, end)` seconds out of the recording as
    /// an independent audio unit. Bounds are clamped to the available audio,
    /// so a window whose nominal end runs past the recording yields a
    /// shorter unit rather than an error.
    pub fn slice(&self, start: f64, end: f64) -> AudioUnit {
        let rate = self.spec.sample_rate as f64;
        // Saturating float-to-int casts also floor negative starts to 0.
        let start_frame = ((start * rate).round() as usize).min(self.frame_count);
        let end_frame = ((end * rate).round() as usize)
            .min(self.frame_count)
            .max(start_frame);

        let channels = self.spec.channels as usize;
        AudioUnit {
            spec: self.spec,
            samples: self
                .samples
                .slice(start_frame * channels, end_frame * channels),
        }
    }
}

/// One sliced piece of a recording, ready to be exported.
#[derive(Debug, Clone)]
pub struct AudioUnit {
    spec: WavSpec,
    samples: Samples,
}

impl AudioUnit {
    /// Number of frames (samples per channel) in the unit.
    pub fn frame_count(&self) -> usize {
        self.samples.len() / self.spec.channels as usize
    }

    /// Write the unit to `path` as a WAV file with the source spec.
    pub fn export(&self, path: &Path) -> Result<(), CodecError> {
        let mut writer = WavWriter::create(path, self.spec)?;
        match &self.samples {
            Samples::Int(samples) => {
                for &sample in samples {
                    writer.write_sample(sample)?;
                }
            }
            Samples::Float(samples) => {
                for &sample in samples {
                    writer.write_sample(sample)?;
                }
            }
        }
        writer.finalize()?;
        Ok(())
    }
}
