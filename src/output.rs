// CSV output
// Writes assembled feature tables as comma-separated files named after the
// recording they describe

use log::debug;
use std::borrow::Cow;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::features::FeatureTable;

/// Which of the result tables a file holds. The variant picks the
/// file-name suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Functionals,
    LowLevelDescriptors,
    SlidingWindowFunctionals,
}

impl TableKind {
    fn suffix(self) -> &'static str {
        match self {
            TableKind::Functionals => "functionals",
            TableKind::LowLevelDescriptors => "llds",
            TableKind::SlidingWindowFunctionals => "sliding_window_functionals",
        }
    }
}

/// Write one table as `<output_dir>/<basename>_<suffix>.csv`, creating the
/// output directory if needed. Returns the path written.
pub fn write_table(
    output_dir: &Path,
    basename: &str,
    kind: TableKind,
    table: &FeatureTable,
) -> io::Result<PathBuf> {
    fs::create_dir_all(output_dir)?;
    let path = output_dir.join(format!("{}_{}.csv", basename, kind.suffix()));
    let mut writer = BufWriter::new(File::create(&path)?);

    let header = table
        .columns()
        .iter()
        .map(|column| escape_field(column))
        .collect::<Vec<_>>()
        .join(",");
    writeln!(writer, "{header}")?;

    for row in table.rows() {
        let line = row
            .iter()
            .map(|value| value.to_string())
            .collect::<Vec<_>>()
            .join(",");
        writeln!(writer, "{line}")?;
    }

    writer.flush()?;
    debug!("wrote {} rows to {}", table.row_count(), path.display());
    Ok(path)
}

/// Quote a field when it contains a delimiter, quote, or line break.
fn escape_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}
