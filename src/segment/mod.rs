// Segmentation module
// Sliding window planning and segment materialization in a per-run workspace

pub mod materialize;
pub mod window;
pub mod workspace;

pub use materialize::{materialize_segments, segment_file_name, Segment};
pub use window::{plan_windows, Window, WindowError, WindowPlan};
pub use workspace::Workspace;
