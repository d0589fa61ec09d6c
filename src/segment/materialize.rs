// Segment materialization
// Slices a recording per window and persists each slice under a boundary-encoding name

use log::debug;
use std::path::PathBuf;

use crate::audio::{CodecError, Recording, FILE_EXTENSION};
use crate::segment::window::Window;
use crate::segment::workspace::Workspace;

/// One materialized window: the window itself, the boundary-encoding file
/// name the slice was persisted under, and the slice's location inside the
/// run's workspace.
///
/// The file name is the channel by which result assembly recovers the
/// window's time bounds, so its format is a load-bearing contract, not a
/// cosmetic choice.
#[derive(Debug, Clone)]
pub struct Segment {
    pub window: Window,
    pub file_name: String,
    pub path: PathBuf,
}

/// Boundary-encoding file name for one window: `<start>_<end>` plus the
/// codec's native extension, with both bounds in `f64` display form.
pub fn segment_file_name(window: Window) -> String {
    format!("{}_{}.{}", window.start, window.end, FILE_EXTENSION)
}

/// Slice `recording` once per window and persist each slice inside
/// `workspace`. Returns the segments in window order.
///
/// The first slice or write failure propagates immediately; segments already
/// written stay behind for the workspace cleanup to remove. Nothing is
/// retried.
pub fn materialize_segments(
    recording: &Recording,
    windows: impl IntoIterator<Item = Window>,
    workspace: &Workspace,
) -> Result<Vec<Segment>, CodecError> {
    let mut segments = Vec::new();

    for window in windows {
        let file_name = segment_file_name(window);
        let path = workspace.segment_path(&file_name);

        let unit = recording.slice(window.start, window.end);
        unit.export(&path)?;

        segments.push(Segment {
            window,
            file_name,
            path,
        });
    }

    debug!(
        "materialized {} segments from {}",
        segments.len(),
        recording.path().display()
    );
    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::window::plan_windows;
    use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
    use std::path::Path;
    use tempfile::TempDir;

    fn write_silence_wav(path: &Path, seconds: f64) {
        let spec = WavSpec {
            channels: 1,
            sample_rate: 8000,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(path, spec).unwrap();
        for _ in 0..(seconds * 8000.0) as usize {
            writer.write_sample(0i16).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn test_segments_named_and_ordered_by_window() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("clip.wav");
        write_silence_wav(&input, 3.5);

        let recording = Recording::load(&input).unwrap();
        let workspace = Workspace::create().unwrap();
        let windows = plan_windows(1.0, 1.0, recording.duration_seconds()).unwrap();

        let segments = materialize_segments(&recording, windows, &workspace).unwrap();

        let names: Vec<&str> = segments.iter().map(|s| s.file_name.as_str()).collect();
        assert_eq!(names, vec!["0_1.wav", "1_2.wav", "2_3.wav"]);
        for segment in &segments {
            assert!(segment.path.is_file());
            assert_eq!(segment.path, workspace.segment_path(&segment.file_name));
        }
    }

    #[test]
    fn test_segment_audio_is_window_sized() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("clip.wav");
        write_silence_wav(&input, 2.0);

        let recording = Recording::load(&input).unwrap();
        let workspace = Workspace::create().unwrap();
        let windows = plan_windows(0.5, 0.5, recording.duration_seconds()).unwrap();

        let segments = materialize_segments(&recording, windows, &workspace).unwrap();
        assert_eq!(segments.len(), 4);

        for segment in &segments {
            let reader = WavReader::open(&segment.path).unwrap();
            assert_eq!(reader.duration(), 4000);
        }
    }

    #[test]
    fn test_final_segment_clamped_to_available_audio() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("clip.wav");
        write_silence_wav(&input, 4.0);

        let recording = Recording::load(&input).unwrap();
        let workspace = Workspace::create().unwrap();
        // stride > duration admits a final window ending at 5.0 s.
        let windows = plan_windows(2.0, 3.0, recording.duration_seconds()).unwrap();

        let segments = materialize_segments(&recording, windows, &workspace).unwrap();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[1].file_name, "3_5.wav");

        let reader = WavReader::open(&segments[1].path).unwrap();
        // Only one second of audio exists past 3.0 s.
        assert_eq!(reader.duration(), 8000);
    }

    #[test]
    fn test_empty_plan_materializes_nothing() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("clip.wav");
        write_silence_wav(&input, 0.5);

        let recording = Recording::load(&input).unwrap();
        let workspace = Workspace::create().unwrap();
        let windows = plan_windows(1.0, 1.0, recording.duration_seconds()).unwrap();

        let segments = materialize_segments(&recording, windows, &workspace).unwrap();
        assert!(segments.is_empty());
        assert_eq!(std::fs::read_dir(workspace.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_file_name_encodes_fractional_bounds() {
        let window = Window {
            start: 0.5,
            end: 1.25,
        };
        assert_eq!(segment_file_name(window), "0.5_1.25.wav");
    }
}
