// Featab - Sliding-window acoustic feature extraction
// Module declarations

pub mod audio;
pub mod features;
pub mod output;
pub mod pipeline;
pub mod segment;
