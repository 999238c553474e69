//! Local directory layout
//!
//! A conversion job owns a small directory tree:
//!
//! ```text
//! <destination_dir>/
//!   parquet/        # raw downloaded object(s)
//!   json/           # one .json file per row group
//! ```
//!
//! Paths are computed once at construction and exposed read-only; the
//! directories themselves are created lazily by the download/convert calls.

use std::path::{Path, PathBuf};

use chrono::Local;

use crate::error::Result;

/// Derived output paths for one conversion job
#[derive(Debug, Clone)]
pub struct LocalLayout {
    parent: PathBuf,
    parquet_dir: PathBuf,
    json_dir: PathBuf,
}

impl LocalLayout {
    /// Compute the layout under an explicit parent directory
    pub fn new(parent: impl Into<PathBuf>) -> Self {
        let parent = parent.into();
        let parquet_dir = parent.join("parquet");
        let json_dir = parent.join("json");
        Self {
            parent,
            parquet_dir,
            json_dir,
        }
    }

    /// Compute the layout under a timestamp-named directory in the system temp dir
    pub fn in_temp_dir() -> Self {
        let stamp = Local::now().format("%m-%d-%Y_%H-%M-%S");
        Self::new(std::env::temp_dir().join(format!("parqjson_{stamp}")))
    }

    /// Parent destination directory
    pub fn parent(&self) -> &Path {
        &self.parent
    }

    /// Directory holding the raw downloaded object(s)
    pub fn parquet_dir(&self) -> &Path {
        &self.parquet_dir
    }

    /// Directory holding the converted JSON output
    pub fn json_dir(&self) -> &Path {
        &self.json_dir
    }

    /// Create the parquet directory (and parents) if missing
    pub fn ensure_parquet_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.parquet_dir)?;
        Ok(())
    }

    /// Create the json directory (and parents) if missing
    pub fn ensure_json_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.json_dir)?;
        Ok(())
    }
}
