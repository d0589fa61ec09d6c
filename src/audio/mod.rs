// Audio module
// WAV decoding, frame-accurate slicing, and slice export

pub mod codec;

pub use codec::{AudioUnit, CodecError, Recording, FILE_EXTENSION};
