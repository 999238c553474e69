//! Object store access
//!
//! Wraps an [`object_store::ObjectStore`] behind the three operations the
//! pipeline needs: existence check, prefix discovery, and fetch-to-disk.
//! The S3 constructor covers AWS and S3-compatible stores (custom endpoint);
//! the local constructor backs tests and offline use with a filesystem tree.

use std::path::Path;
use std::sync::Arc;

use futures::TryStreamExt;
use object_store::aws::AmazonS3Builder;
use object_store::local::LocalFileSystem;
use object_store::path::Path as ObjectPath;
use object_store::ObjectStore;
use tracing::{debug, info};

use crate::config::ResolvedConfig;
use crate::error::{Error, Result};

/// An object discovered in the store
#[derive(Debug, Clone)]
pub struct RemoteObject {
    /// Object key
    pub key: String,
    /// Object size in bytes
    pub size: usize,
}

/// Handle to an object store holding the source data
#[derive(Debug, Clone)]
pub struct ObjectSource {
    store: Arc<dyn ObjectStore>,
    /// Scheme tag for logging (s3, file)
    scheme: String,
}

impl ObjectSource {
    /// Connect to an S3 or S3-compatible bucket
    pub fn s3(config: &ResolvedConfig) -> Result<Self> {
        let mut builder = AmazonS3Builder::new()
            .with_bucket_name(&config.bucket)
            .with_region(&config.region)
            .with_access_key_id(&config.access_key)
            .with_secret_access_key(&config.secret_key);

        if let Some(endpoint) = &config.endpoint {
            // object_store requires absolute endpoint URLs
            let endpoint_url = if endpoint.starts_with("http://") || endpoint.starts_with("https://")
            {
                endpoint.clone()
            } else {
                format!("https://{endpoint}")
            };
            builder = builder
                .with_allow_http(endpoint_url.starts_with("http://"))
                .with_endpoint(endpoint_url);
        }

        let store = builder
            .build()
            .map_err(|e| Error::config(format!("Failed to create S3 client: {e}")))?;

        info!(
            "Source: s3://{} (region: {}{})",
            config.bucket,
            config.region,
            config
                .endpoint
                .as_deref()
                .map(|e| format!(", endpoint: {e}"))
                .unwrap_or_default()
        );

        Ok(Self {
            store: Arc::new(store),
            scheme: "s3".to_string(),
        })
    }

    /// Use a local directory as the store, for tests and offline runs
    pub fn local(root: impl AsRef<Path>) -> Result<Self> {
        let store = LocalFileSystem::new_with_prefix(root.as_ref())
            .map_err(|e| Error::config(format!("Failed to create local store: {e}")))?;
        Ok(Self {
            store: Arc::new(store),
            scheme: "file".to_string(),
        })
    }

    /// Wrap an arbitrary store implementation
    pub fn from_store(store: Arc<dyn ObjectStore>, scheme: impl Into<String>) -> Self {
        Self {
            store,
            scheme: scheme.into(),
        }
    }

    /// Scheme tag (s3, file)
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Whether an object exists at exactly this key
    pub async fn exists(&self, key: &str) -> Result<bool> {
        let path = ObjectPath::from(key.trim_start_matches('/'));
        match self.store.head(&path).await {
            Ok(_) => Ok(true),
            Err(object_store::Error::NotFound { .. }) => Ok(false),
            Err(e) => Err(classify_connectivity(e)),
        }
    }

    /// Discover the object(s) at a key or prefix
    ///
    /// A key that names an object yields exactly that object. Otherwise the
    /// key is treated as a prefix and every object beneath it is returned,
    /// skipping keys whose basename starts with '_' (Spark metadata such as
    /// `_SUCCESS` and `_spark_metadata`). Result is sorted by key; empty when
    /// nothing exists.
    pub async fn discover(&self, uri: &str) -> Result<Vec<RemoteObject>> {
        let key = uri.trim_start_matches('/');
        let path = ObjectPath::from(key);

        match self.store.head(&path).await {
            Ok(meta) => {
                debug!("'{}' is a single object ({} bytes)", key, meta.size);
                return Ok(vec![RemoteObject {
                    key: meta.location.to_string(),
                    size: meta.size,
                }]);
            }
            Err(object_store::Error::NotFound { .. }) => {}
            Err(e) => return Err(classify_connectivity(e)),
        }

        let mut objects = Vec::new();
        let mut listing = self.store.list(Some(&path));

        while let Some(meta) = listing
            .try_next()
            .await
            .map_err(classify_connectivity)?
        {
            let key = meta.location.to_string();
            if basename(&key).starts_with('_') {
                debug!("Skipping metadata object '{}'", key);
                continue;
            }
            objects.push(RemoteObject {
                key,
                size: meta.size,
            });
        }

        objects.sort_by(|a, b| a.key.cmp(&b.key));
        info!("Discovered {} object(s) under '{}'", objects.len(), key);
        Ok(objects)
    }

    /// Fetch one object into a local file, returning the byte count
    ///
    /// Single attempt; any mid-transfer failure surfaces immediately.
    pub async fn fetch(&self, key: &str, dest: &Path) -> Result<u64> {
        let path = ObjectPath::from(key.trim_start_matches('/'));

        let result = self
            .store
            .get(&path)
            .await
            .map_err(|e| classify_fetch(e, key))?;
        let data = result
            .bytes()
            .await
            .map_err(|e| classify_fetch(e, key))?;

        let len = data.len() as u64;
        std::fs::write(dest, &data)?;
        debug!("Fetched '{}' -> {} ({} bytes)", key, dest.display(), len);
        Ok(len)
    }
}

/// Final path segment of an object key
fn basename(key: &str) -> &str {
    key.rsplit('/').next().unwrap_or(key)
}

fn classify_connectivity(err: object_store::Error) -> Error {
    match err {
        object_store::Error::Unauthenticated { source, .. } => Error::auth(source.to_string()),
        object_store::Error::PermissionDenied { source, .. } => Error::auth(source.to_string()),
        other => Error::network(other.to_string()),
    }
}

fn classify_fetch(err: object_store::Error, key: &str) -> Error {
    match err {
        object_store::Error::NotFound { .. } => Error::not_found(key),
        object_store::Error::Unauthenticated { source, .. } => Error::auth(source.to_string()),
        object_store::Error::PermissionDenied { source, .. } => Error::auth(source.to_string()),
        other => Error::transfer(key, other.to_string()),
    }
}
