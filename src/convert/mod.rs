//! Parquet to JSON conversion
//!
//! # Overview
//!
//! This module provides:
//! - Reading downloaded Parquet files into Arrow record batches (`reader`)
//! - Coercing Arrow values into JSON values (`json`)
//! - Writing one JSON document per row group (`writer`)
//!
//! The JSON convention: each row group of each source file becomes one
//! document named `{file_stem}-{row_group:05}.json`, containing an array of
//! records, each record a map from column name to JSON value.

mod json;
mod reader;
mod writer;

pub use json::batch_to_records;
pub use reader::{read_dir, read_file, read_row_group, row_group_count, ParquetTable};
pub use writer::{partition_file_name, write_partition};

use std::path::Path;

use tracing::{debug, info};

use crate::error::{Error, Result};

/// JSON serialization knobs
#[derive(Debug, Clone, Copy, Default)]
pub struct ConvertOptions {
    fill_nulls: bool,
    pretty: bool,
}

impl ConvertOptions {
    /// Create options with default settings (compact output, nulls kept)
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace null leaf values with an empty string
    #[must_use]
    pub fn with_fill_nulls(mut self, enabled: bool) -> Self {
        self.fill_nulls = enabled;
        self
    }

    /// Pretty-print the output documents
    #[must_use]
    pub fn with_pretty(mut self, enabled: bool) -> Self {
        self.pretty = enabled;
        self
    }

    /// Whether null leaves are replaced with empty strings
    #[must_use]
    pub fn fill_nulls(&self) -> bool {
        self.fill_nulls
    }

    /// Whether output is pretty-printed
    #[must_use]
    pub fn pretty(&self) -> bool {
        self.pretty
    }
}

/// What a conversion produced
#[derive(Debug, Clone, Copy, Default)]
pub struct ConvertSummary {
    /// Parquet files converted
    pub parquet_files: usize,
    /// JSON documents written
    pub documents: usize,
    /// Total records across all documents
    pub rows: usize,
}

/// Convert one Parquet file into per-row-group JSON documents
pub fn convert_file(
    path: &Path,
    json_dir: &Path,
    options: &ConvertOptions,
) -> Result<ConvertSummary> {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .ok_or_else(|| Error::format(path.display().to_string(), "file has no name"))?;

    let row_groups = row_group_count(path)?;
    let mut summary = ConvertSummary {
        parquet_files: 1,
        ..Default::default()
    };

    for index in 0..row_groups {
        let batches = read_row_group(path, index)?;
        let mut records = Vec::new();
        for batch in &batches {
            records.extend(batch_to_records(batch, options)?);
        }

        write_partition(json_dir, &stem, index, &records, options)?;
        summary.documents += 1;
        summary.rows += records.len();
    }

    debug!(
        "Converted '{}': {} row group(s), {} row(s)",
        path.display(),
        row_groups,
        summary.rows
    );
    Ok(summary)
}

/// Convert every `*.parquet` file in a directory
///
/// Files are processed in name order; non-Parquet files (and anything the
/// download placed alongside them) are ignored.
pub fn convert_directory(
    parquet_dir: &Path,
    json_dir: &Path,
    options: &ConvertOptions,
) -> Result<ConvertSummary> {
    let mut paths: Vec<_> = std::fs::read_dir(parquet_dir)?
        .collect::<std::io::Result<Vec<_>>>()?
        .into_iter()
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "parquet"))
        .collect();
    paths.sort();

    let mut summary = ConvertSummary::default();
    for path in &paths {
        let file_summary = convert_file(path, json_dir, options)?;
        summary.parquet_files += file_summary.parquet_files;
        summary.documents += file_summary.documents;
        summary.rows += file_summary.rows;
    }

    info!(
        "Converted {} file(s) into {} JSON document(s) ({} rows)",
        summary.parquet_files, summary.documents, summary.rows
    );
    Ok(summary)
}

#[cfg(test)]
mod tests;
