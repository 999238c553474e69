//! JSON document writer
//!
//! Writes one document per row group, each an array of records.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::convert::ConvertOptions;
use crate::error::Result;

/// File name for one partition's document
///
/// `{stem}-{index:05}.json`, e.g. `2025-06-14-00000.json`.
pub fn partition_file_name(stem: &str, index: usize) -> String {
    format!("{stem}-{index:05}.json")
}

/// Write one partition's records as a JSON document
///
/// Returns the path written.
pub fn write_partition(
    json_dir: &Path,
    stem: &str,
    index: usize,
    records: &[Value],
    options: &ConvertOptions,
) -> Result<PathBuf> {
    let path = json_dir.join(partition_file_name(stem, index));

    let data = if options.pretty() {
        serde_json::to_vec_pretty(records)?
    } else {
        serde_json::to_vec(records)?
    };
    std::fs::write(&path, data)?;

    debug!(
        "Wrote {} record(s) to '{}'",
        records.len(),
        path.display()
    );
    Ok(path)
}
