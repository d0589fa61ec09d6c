// Sliding-window planning
// Pure computation of window boundaries from duration, stride, and recording length

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WindowError {
    #[error("window duration must be positive, got {0}")]
    NonPositiveDuration(f64),

    #[error("window stride must be positive, got {0}")]
    NonPositiveStride(f64),
}

/// One time span over a recording, in seconds. Half-open by convention:
/// audio at `end` belongs to the next window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Window {
    /// Start offset in seconds from the beginning of the recording
    pub start: f64,

    /// End offset in seconds; `start <= end`
    pub end: f64,
}

impl Window {
    /// Window length in seconds.
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Lazy, finite, ordered sequence of windows over one recording.
///
/// Window `i` spans `[i * stride, i * stride + duration)` and is emitted
/// while its end stays within `total_length - duration + stride`. The stride
/// term extends the admitted range past the last fully covered start, so the
/// final window's nominal end may exceed the recording by up to one stride;
/// callers clamp when slicing. Consecutive windows overlap whenever
/// `stride < duration` and tile exactly when `stride == duration`.
#[derive(Debug, Clone)]
pub struct WindowPlan {
    duration: f64,
    stride: f64,
    span_end: f64,
    index: u64,
}

impl Iterator for WindowPlan {
    type Item = Window;

    fn next(&mut self) -> Option<Window> {
        let start = self.index as f64 * self.stride;
        let end = start + self.duration;
        if end <= self.span_end {
            self.index += 1;
            Some(Window { start, end })
        } else {
            None
        }
    }
}

/// Plan sliding windows for a recording of `total_length` seconds.
///
/// A recording shorter than one window yields an empty plan, as does a
/// non-finite `total_length`. Those are valid terminal states for the
/// caller to detect, not errors; only non-positive `duration` or `stride`
/// fails.
pub fn plan_windows(
    duration: f64,
    stride: f64,
    total_length: f64,
) -> Result<WindowPlan, WindowError> {
    if !(duration > 0.0) {
        return Err(WindowError::NonPositiveDuration(duration));
    }
    if !(stride > 0.0) {
        return Err(WindowError::NonPositiveStride(stride));
    }

    // The length guard matters even where the span term would admit a
    // window: with stride > duration it alone could admit one the recording
    // cannot fill at all. A span that is not finite (infinite length, or
    // arithmetic that overflows) collapses to an empty plan, so the emitted
    // sequence is finite for any input.
    let span_end = total_length - duration + stride;
    let span_end = if total_length < duration || !span_end.is_finite() {
        f64::NEG_INFINITY
    } else {
        span_end
    };

    Ok(WindowPlan {
        duration,
        stride,
        span_end,
        index: 0,
    })
}
