// Feature extraction module
// Extractor abstraction, the openSMILE adapter, and feature tables

pub mod extractor;
pub mod smile;
pub mod table;

pub use extractor::{ExtractorError, FeatureExtractor};
pub use smile::SmileExtractor;
pub use table::{FeatureRecord, FeatureTable, TableError};
