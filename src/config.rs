//! Connection configuration
//!
//! Raw options as supplied by the caller, and the resolved form produced by
//! the environment-fallback step. Resolution precedence for each field is
//! explicit option > environment variable > error (or default, for region).

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{Error, Result};

/// Environment variable consulted for the access key
pub const ENV_ACCESS_KEY: &str = "S3_ACCESS";

/// Environment variable consulted for the secret key
pub const ENV_SECRET_KEY: &str = "S3_SECRET";

/// Environment variable consulted for the bucket name
pub const ENV_BUCKET: &str = "S3_BUCKET";

/// Environment variable consulted for a custom S3-compatible endpoint
pub const ENV_ENDPOINT: &str = "S3_ENDPOINT";

/// Environment variable consulted for the region
pub const ENV_REGION: &str = "S3_REGION";

const DEFAULT_REGION: &str = "us-east-1";

/// Raw connection settings, before environment fallback
///
/// Every field is optional; anything left unset is resolved from the
/// corresponding environment variable when the store is first acquired.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConnectionOptions {
    /// Bucket to read from (falls back to `S3_BUCKET`)
    #[serde(default)]
    pub bucket: Option<String>,

    /// Access key (falls back to `S3_ACCESS`)
    #[serde(default)]
    pub access_key: Option<String>,

    /// Secret key (falls back to `S3_SECRET`)
    #[serde(default)]
    pub secret_key: Option<String>,

    /// Custom S3-compatible endpoint, e.g. a MinIO URL (falls back to `S3_ENDPOINT`)
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Region (falls back to `S3_REGION`, then "us-east-1")
    #[serde(default)]
    pub region: Option<String>,

    /// Directory to write output under; a timestamp-named temp directory
    /// is derived when unset
    #[serde(default)]
    pub destination_dir: Option<PathBuf>,
}

/// Fully resolved store configuration
///
/// Immutable once produced; all ambient environment access happens in
/// [`ResolvedConfig::resolve`], never deeper in the call path.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Bucket to read from
    pub bucket: String,
    /// Access key
    pub access_key: String,
    /// Secret key
    pub secret_key: String,
    /// Custom endpoint, if any
    pub endpoint: Option<String>,
    /// Region
    pub region: String,
}

impl ResolvedConfig {
    /// Resolve options against the process environment
    pub fn resolve(options: &ConnectionOptions) -> Result<Self> {
        Self::resolve_with(options, |name| std::env::var(name).ok())
    }

    /// Resolve options against an arbitrary variable lookup
    ///
    /// The lookup is injected so tests can exercise the fallback chain
    /// without mutating process environment.
    pub fn resolve_with(
        options: &ConnectionOptions,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let bucket = required(options.bucket.clone(), &env, ENV_BUCKET, "bucket")?;
        let access_key = required(options.access_key.clone(), &env, ENV_ACCESS_KEY, "access key")?;
        let secret_key = required(options.secret_key.clone(), &env, ENV_SECRET_KEY, "secret key")?;

        let endpoint = options.endpoint.clone().or_else(|| env(ENV_ENDPOINT));
        let region = options
            .region
            .clone()
            .or_else(|| env(ENV_REGION))
            .unwrap_or_else(|| DEFAULT_REGION.to_string());

        Ok(Self {
            bucket,
            access_key,
            secret_key,
            endpoint,
            region,
        })
    }
}

fn required(
    explicit: Option<String>,
    env: impl Fn(&str) -> Option<String>,
    var: &str,
    what: &str,
) -> Result<String> {
    explicit
        .filter(|v| !v.is_empty())
        .or_else(|| env(var).filter(|v| !v.is_empty()))
        .ok_or_else(|| Error::config(format!("{what} not set (pass it explicitly or set {var})")))
}
