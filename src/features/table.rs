// Feature records and tables
// Ordered rows of named numeric feature values under one column schema

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("row has {values} values for {columns} columns")]
    ColumnCountMismatch { columns: usize, values: usize },

    #[error("row schema differs from table schema at column {index} ({found:?}, expected {expected:?})")]
    SchemaMismatch {
        index: usize,
        expected: String,
        found: String,
    },
}

/// One row of named numeric feature values, as produced by the extractor
/// for a single audio unit (or a single analysis frame of one).
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRecord {
    columns: Vec<String>,
    values: Vec<f64>,
}

impl FeatureRecord {
    /// Create a record; `columns` and `values` must have the same length.
    pub fn new(columns: Vec<String>, values: Vec<f64>) -> Result<Self, TableError> {
        if columns.len() != values.len() {
            return Err(TableError::ColumnCountMismatch {
                columns: columns.len(),
                values: values.len(),
            });
        }
        Ok(FeatureRecord { columns, values })
    }

    /// Append a named field to the end of the record.
    pub fn push_field(&mut self, column: impl Into<String>, value: f64) {
        self.columns.push(column.into());
        self.values.push(value);
    }

    /// Look up a value by column name.
    pub fn value(&self, column: &str) -> Option<f64> {
        let index = self.columns.iter().position(|c| c == column)?;
        Some(self.values[index])
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

/// Ordered rows under one column schema. The schema is fixed by the first
/// row (extractor-defined); appending a row with a different schema is an
/// error, never a silent coercion.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureTable {
    columns: Vec<String>,
    rows: Vec<Vec<f64>>,
}

impl FeatureTable {
    /// Create an empty table with the given column schema.
    pub fn new(columns: Vec<String>) -> Self {
        FeatureTable {
            columns,
            rows: Vec::new(),
        }
    }

    /// Create a single-row table from one record.
    pub fn from_record(record: FeatureRecord) -> Self {
        FeatureTable {
            columns: record.columns,
            rows: vec![record.values],
        }
    }

    /// Append a bare row; it must match the column count.
    pub fn push_row(&mut self, values: Vec<f64>) -> Result<(), TableError> {
        if values.len() != self.columns.len() {
            return Err(TableError::ColumnCountMismatch {
                columns: self.columns.len(),
                values: values.len(),
            });
        }
        self.rows.push(values);
        Ok(())
    }

    /// Append a record; its schema must equal the table's schema exactly
    /// (same names, same order).
    pub fn push_record(&mut self, record: FeatureRecord) -> Result<(), TableError> {
        if record.columns.len() != self.columns.len() {
            return Err(TableError::ColumnCountMismatch {
                columns: self.columns.len(),
                values: record.columns.len(),
            });
        }
        for (index, (expected, found)) in
            self.columns.iter().zip(record.columns.iter()).enumerate()
        {
            if expected != found {
                return Err(TableError::SchemaMismatch {
                    index,
                    expected: expected.clone(),
                    found: found.clone(),
                });
            }
        }
        self.rows.push(record.values);
        Ok(())
    }

    /// Copy one row out as a self-describing record.
    pub fn record(&self, index: usize) -> Option<FeatureRecord> {
        let values = self.rows.get(index)?;
        Some(FeatureRecord {
            columns: self.columns.clone(),
            values: values.clone(),
        })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.rows.iter().map(|row| row.as_slice())
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
