//! The conversion job
//!
//! A [`Connection`] represents one fetch-and-convert job: an object key or
//! prefix in a bucket, plus the local directory tree the results land in.
//! Construction is cheap and touches neither network nor filesystem; the
//! store handle is acquired per operation, and configuration gaps surface as
//! errors on first use.
//!
//! Two connections sharing a destination directory race on the same files
//! (last writer wins); callers own that coordination.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::{ConnectionOptions, ResolvedConfig};
use crate::convert::{
    convert_directory, read_dir, ConvertOptions, ConvertSummary, ParquetTable,
};
use crate::error::{Error, Result};
use crate::layout::LocalLayout;
use crate::store::ObjectSource;

/// One conversion job: fetch Parquet object(s), write JSON files
#[derive(Debug, Clone)]
pub struct Connection {
    uri: String,
    options: ConnectionOptions,
    layout: LocalLayout,
    source: Option<ObjectSource>,
    convert: ConvertOptions,
}

impl Connection {
    /// Create a connection with default options
    ///
    /// Bucket and credentials come from the environment; output goes to a
    /// timestamp-named temp directory.
    pub fn new(uri: impl Into<String>) -> Result<Self> {
        Self::builder(uri).build()
    }

    /// Start building a connection for an object key or prefix
    pub fn builder(uri: impl Into<String>) -> ConnectionBuilder {
        ConnectionBuilder {
            uri: uri.into(),
            options: ConnectionOptions::default(),
            source: None,
            convert: ConvertOptions::new(),
        }
    }

    /// Object key or prefix within the bucket
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Parent destination directory
    pub fn parent_destination_path(&self) -> &Path {
        self.layout.parent()
    }

    /// Directory the raw object(s) are downloaded into
    pub fn parquet_destination(&self) -> &Path {
        self.layout.parquet_dir()
    }

    /// Directory the JSON documents are written into
    pub fn json_destination(&self) -> &Path {
        self.layout.json_dir()
    }

    /// Acquire the store handle for one operation
    ///
    /// Resolves configuration on every call, so a misconfigured connection
    /// constructs fine and fails here, before any network traffic.
    fn source(&self) -> Result<ObjectSource> {
        if let Some(source) = &self.source {
            return Ok(source.clone());
        }
        let config = ResolvedConfig::resolve(&self.options)?;
        ObjectSource::s3(&config)
    }

    /// Check whether anything exists at the configured uri
    ///
    /// Absence is a `false`, not an error; credential rejection and an
    /// unreachable store still fail.
    pub async fn test_connection(&self) -> Result<bool> {
        let source = self.source()?;
        Ok(!source.discover(&self.uri).await?.is_empty())
    }

    /// Download the object(s) at the uri into the parquet directory
    ///
    /// Returns the local paths written, in key order.
    pub async fn download(&self) -> Result<Vec<PathBuf>> {
        let source = self.source()?;

        let objects = source.discover(&self.uri).await?;
        if objects.is_empty() {
            return Err(Error::not_found(&self.uri));
        }

        self.layout.ensure_parquet_dir()?;

        let mut paths = Vec::with_capacity(objects.len());
        for object in &objects {
            let name = object.key.rsplit('/').next().unwrap_or(&object.key);
            let dest = self.layout.parquet_dir().join(name);
            source.fetch(&object.key, &dest).await?;
            paths.push(dest);
        }

        info!(
            "Downloaded {} object(s) from '{}' to '{}'",
            paths.len(),
            self.uri,
            self.layout.parquet_dir().display()
        );
        Ok(paths)
    }

    /// Download the object(s) and convert them to JSON documents
    ///
    /// Each row group of each downloaded Parquet file becomes one document
    /// under the json directory. Output already written stays on disk if a
    /// later step fails; there is no rollback.
    pub async fn download_and_convert_to_json(&self) -> Result<ConvertSummary> {
        self.download().await?;
        self.layout.ensure_json_dir()?;
        convert_directory(
            self.layout.parquet_dir(),
            self.layout.json_dir(),
            &self.convert,
        )
    }

    /// Download the object(s) and read them into one in-memory table
    pub async fn download_and_read(&self) -> Result<ParquetTable> {
        self.download().await?;
        read_dir(self.layout.parquet_dir())
    }
}

/// Builder for [`Connection`]
#[derive(Debug, Clone)]
pub struct ConnectionBuilder {
    uri: String,
    options: ConnectionOptions,
    source: Option<ObjectSource>,
    convert: ConvertOptions,
}

impl ConnectionBuilder {
    /// Bucket to read from (default: `S3_BUCKET`)
    #[must_use]
    pub fn bucket(mut self, bucket: impl Into<String>) -> Self {
        self.options.bucket = Some(bucket.into());
        self
    }

    /// Access key (default: `S3_ACCESS`)
    #[must_use]
    pub fn access_key(mut self, access_key: impl Into<String>) -> Self {
        self.options.access_key = Some(access_key.into());
        self
    }

    /// Secret key (default: `S3_SECRET`)
    #[must_use]
    pub fn secret_key(mut self, secret_key: impl Into<String>) -> Self {
        self.options.secret_key = Some(secret_key.into());
        self
    }

    /// Custom S3-compatible endpoint (default: `S3_ENDPOINT`, if set)
    #[must_use]
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.options.endpoint = Some(endpoint.into());
        self
    }

    /// Region (default: `S3_REGION`, then us-east-1)
    #[must_use]
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.options.region = Some(region.into());
        self
    }

    /// Directory to write output under (default: timestamp-named temp dir)
    #[must_use]
    pub fn destination_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.options.destination_dir = Some(dir.into());
        self
    }

    /// Use an explicit store instead of building an S3 client
    ///
    /// Lets tests and offline runs point the pipeline at a
    /// [`ObjectSource::local`] tree.
    #[must_use]
    pub fn source(mut self, source: ObjectSource) -> Self {
        self.source = Some(source);
        self
    }

    /// Replace null leaf values with empty strings in the JSON output
    #[must_use]
    pub fn fill_nulls(mut self, enabled: bool) -> Self {
        self.convert = self.convert.with_fill_nulls(enabled);
        self
    }

    /// Pretty-print the JSON output
    #[must_use]
    pub fn pretty(mut self, enabled: bool) -> Self {
        self.convert = self.convert.with_pretty(enabled);
        self
    }

    /// Finish building
    ///
    /// Fails on an empty uri; everything else is validated on first use.
    pub fn build(self) -> Result<Connection> {
        if self.uri.trim().is_empty() {
            return Err(Error::config("uri must not be empty"));
        }

        let layout = match &self.options.destination_dir {
            Some(dir) => LocalLayout::new(dir.clone()),
            None => LocalLayout::in_temp_dir(),
        };

        Ok(Connection {
            uri: self.uri,
            options: self.options,
            layout,
            source: self.source,
            convert: self.convert,
        })
    }
}
