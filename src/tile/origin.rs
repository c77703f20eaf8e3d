//! Remote tile origins.
//!
//! An origin is the remote store missing tiles are fetched from. The cache
//! only depends on the [`TileOrigin`] trait; production uses
//! [`HttpTileOrigin`], tests use in-memory mocks.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use url::Url;

use crate::error::DownloadError;

/// Default bound on a single tile fetch.
///
/// The origin serving has no latency guarantees, and an unbounded fetch would
/// stall the whole request, so every fetch carries a timeout.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// A remote store serving compressed tile files by filename.
#[async_trait]
pub trait TileOrigin: Send + Sync {
    /// Fetch the raw gzip-compressed bytes of `filename`.
    ///
    /// Network failures, timeouts, and non-success responses all map to
    /// [`DownloadError::OriginUnreachable`].
    async fn fetch(&self, filename: &str) -> Result<Bytes, DownloadError>;
}

/// HTTP origin: tiles live at `<base_url>/<filename>`.
#[derive(Debug, Clone)]
pub struct HttpTileOrigin {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpTileOrigin {
    /// Create an origin with the default fetch timeout.
    pub fn new(base_url: Url) -> Result<Self, reqwest::Error> {
        Self::with_timeout(base_url, DEFAULT_FETCH_TIMEOUT)
    }

    /// Create an origin with a custom fetch timeout.
    pub fn with_timeout(mut base_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        // Url::join treats a base without a trailing slash as a file and
        // would replace its last segment.
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("terrain-bundler/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, base_url })
    }

    /// The base URL tiles are fetched under (always slash-terminated).
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

#[async_trait]
impl TileOrigin for HttpTileOrigin {
    async fn fetch(&self, filename: &str) -> Result<Bytes, DownloadError> {
        let url = self
            .base_url
            .join(filename)
            .map_err(|e| DownloadError::OriginUnreachable {
                filename: filename.to_string(),
                reason: format!("invalid tile URL: {e}"),
            })?;

        let response =
            self.client
                .get(url.clone())
                .send()
                .await
                .map_err(|e| DownloadError::OriginUnreachable {
                    filename: filename.to_string(),
                    reason: e.to_string(),
                })?;

        if !response.status().is_success() {
            return Err(DownloadError::OriginUnreachable {
                filename: filename.to_string(),
                reason: format!("{} returned {}", url, response.status()),
            });
        }

        response
            .bytes()
            .await
            .map_err(|e| DownloadError::OriginUnreachable {
                filename: filename.to_string(),
                reason: e.to_string(),
            })
    }
}
