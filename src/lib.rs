//! # parqjson
//!
//! Fetch Parquet object(s) from an S3-compatible bucket and convert them to
//! JSON files on local disk.
//!
//! ## Features
//!
//! - **S3 and S3-compatible input**: AWS, MinIO, R2 via a custom endpoint
//! - **Environment fallback**: credentials and bucket from `S3_ACCESS`,
//!   `S3_SECRET`, `S3_BUCKET` when not passed explicitly
//! - **Prefix downloads**: a uri naming a prefix fetches every object
//!   beneath it, skipping Spark metadata (`_SUCCESS`, `_spark_metadata`)
//! - **Row-group partitioned output**: one JSON document per row group,
//!   mirroring the source file layout
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use parqjson::Connection;
//!
//! #[tokio::main]
//! async fn main() -> parqjson::Result<()> {
//!     let conn = Connection::builder("agg_files/historical/DocObject7.parquet")
//!         .destination_dir("/tmp/doc7")
//!         .build()?;
//!
//!     if conn.test_connection().await? {
//!         let summary = conn.download_and_convert_to_json().await?;
//!         println!("{} rows in {}", summary.rows, conn.json_destination().display());
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline
//!
//! ```text
//! Connection::download_and_convert_to_json
//!        │
//!        ├─ resolve config        explicit option > env var > error
//!        ├─ discover objects      key hit, or prefix listing minus _* files
//!        ├─ fetch                 <destination_dir>/parquet/<basename>
//!        ├─ read row groups       parquet -> Arrow record batches
//!        └─ write JSON            <destination_dir>/json/<stem>-<rg:05>.json
//! ```
//!
//! Errors surface at the step that failed; output already on disk stays.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the crate
pub mod error;

/// Connection options and environment resolution
pub mod config;

/// Local directory layout
pub mod layout;

/// Object store access
pub mod store;

/// Parquet reading and JSON conversion
pub mod convert;

/// The orchestrating Connection entity
pub mod connection;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::ConnectionOptions;
pub use connection::{Connection, ConnectionBuilder};
pub use convert::{ConvertOptions, ConvertSummary, ParquetTable};
pub use error::{Error, Result};
pub use layout::LocalLayout;
pub use store::ObjectSource;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
