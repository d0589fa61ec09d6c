// Windowed result assembly
// Joins per-segment feature records back to the window boundaries their
// file names encode

use thiserror::Error;

use crate::audio::FILE_EXTENSION;
use crate::features::{FeatureRecord, FeatureTable, TableError};
use crate::segment::Segment;

#[derive(Debug, Error)]
pub enum AssembleError {
    #[error("segment identifier {identifier:?} does not encode window boundaries")]
    MalformedIdentifier { identifier: String },

    #[error("got {records} feature records for {segments} segments")]
    RecordCountMismatch { segments: usize, records: usize },

    #[error(transparent)]
    Table(#[from] TableError),
}

/// Recover the window boundaries encoded in a segment file name such as
/// `1.5_2.5.wav`. The name is the only carrier of the boundaries here;
/// anything that does not parse as `<start>_<end>.wav` is rejected.
pub fn parse_identifier(file_name: &str) -> Result<(f64, f64), AssembleError> {
    let malformed = || AssembleError::MalformedIdentifier {
        identifier: file_name.to_string(),
    };

    let mut tokens = file_name.split('_');
    let (start, rest) = match (tokens.next(), tokens.next(), tokens.next()) {
        (Some(start), Some(rest), None) => (start, rest),
        _ => return Err(malformed()),
    };
    let end = rest
        .strip_suffix(FILE_EXTENSION)
        .and_then(|rest| rest.strip_suffix('.'))
        .ok_or_else(malformed)?;

    let start = start.parse().map_err(|_| malformed())?;
    let end = end.parse().map_err(|_| malformed())?;
    Ok((start, end))
}

/// Join each segment's functionals record with the boundaries its file name
/// encodes, one table row per segment in segment order. Every record gains
/// trailing `start_time` and `end_time` columns; the first record fixes the
/// table schema.
pub fn assemble_windowed_table(
    segments: &[Segment],
    records: Vec<FeatureRecord>,
) -> Result<FeatureTable, AssembleError> {
    if segments.len() != records.len() {
        return Err(AssembleError::RecordCountMismatch {
            segments: segments.len(),
            records: records.len(),
        });
    }

    let mut table: Option<FeatureTable> = None;
    for (segment, mut record) in segments.iter().zip(records) {
        let (start, end) = parse_identifier(&segment.file_name)?;
        record.push_field("start_time", start);
        record.push_field("end_time", end);
        let table = table.get_or_insert_with(|| FeatureTable::new(record.columns().to_vec()));
        table.push_record(record)?;
    }

    Ok(table.unwrap_or_else(|| FeatureTable::new(Vec::new())))
}
