//! Parquet file reader
//!
//! Thin layer over [`parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder`]
//! for whole-file, per-row-group, and whole-directory reads.

use std::fs::File;
use std::path::Path;

use arrow::datatypes::SchemaRef;
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use crate::error::{Error, Result};

/// An in-memory table read from one or more Parquet files
#[derive(Debug, Clone)]
pub struct ParquetTable {
    schema: SchemaRef,
    batches: Vec<RecordBatch>,
}

impl ParquetTable {
    /// Arrow schema shared by all batches
    pub fn schema(&self) -> &SchemaRef {
        &self.schema
    }

    /// The record batches, in file/row-group order
    pub fn batches(&self) -> &[RecordBatch] {
        &self.batches
    }

    /// Consume the table, yielding its batches
    pub fn into_batches(self) -> Vec<RecordBatch> {
        self.batches
    }

    /// Total row count
    pub fn num_rows(&self) -> usize {
        self.batches.iter().map(RecordBatch::num_rows).sum()
    }

    /// Column names in schema order
    pub fn column_names(&self) -> Vec<&str> {
        self.schema
            .fields()
            .iter()
            .map(|f| f.name().as_str())
            .collect()
    }
}

fn open_builder(path: &Path) -> Result<ParquetRecordBatchReaderBuilder<File>> {
    let file = File::open(path)?;
    ParquetRecordBatchReaderBuilder::try_new(file)
        .map_err(|e| Error::format(path.display().to_string(), e.to_string()))
}

/// Number of row groups in a Parquet file
pub fn row_group_count(path: &Path) -> Result<usize> {
    Ok(open_builder(path)?.metadata().num_row_groups())
}

/// Read the batches of a single row group
pub fn read_row_group(path: &Path, index: usize) -> Result<Vec<RecordBatch>> {
    let reader = open_builder(path)?
        .with_row_groups(vec![index])
        .build()
        .map_err(|e| Error::format(path.display().to_string(), e.to_string()))?;

    reader
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::format(path.display().to_string(), e.to_string()))
}

/// Read a whole Parquet file into a table
pub fn read_file(path: &Path) -> Result<ParquetTable> {
    let builder = open_builder(path)?;
    let schema = builder.schema().clone();
    let reader = builder
        .build()
        .map_err(|e| Error::format(path.display().to_string(), e.to_string()))?;

    let batches = reader
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::format(path.display().to_string(), e.to_string()))?;

    Ok(ParquetTable { schema, batches })
}

/// Read every `*.parquet` file in a directory into one logical table
///
/// Files are read in name order and must share a schema.
pub fn read_dir(dir: &Path) -> Result<ParquetTable> {
    let mut paths: Vec<_> = std::fs::read_dir(dir)?
        .collect::<std::io::Result<Vec<_>>>()?
        .into_iter()
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "parquet"))
        .collect();
    paths.sort();

    let mut iter = paths.iter();
    let first = iter.next().ok_or_else(|| {
        Error::format(dir.display().to_string(), "no .parquet files to read")
    })?;

    let mut merged = read_file(first)?;
    for path in iter {
        let table = read_file(path)?;
        if merged.schema != table.schema {
            return Err(Error::format(
                path.display().to_string(),
                "schema does not match the other files in the directory",
            ));
        }
        merged.batches.extend(table.batches);
    }

    Ok(merged)
}
