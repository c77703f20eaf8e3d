//! On-disk tile cache with fetch-on-miss.
//!
//! Tiles are permanent reference data: once a compressed tile file lands under
//! a version root it is never evicted or rewritten by this subsystem, unlike
//! the generated artifacts which age out. The cache therefore has exactly two
//! paths: serve the local file, or fetch it from the version's origin and
//! install it.
//!
//! # Concurrent misses
//!
//! The cache roots are shared by all in-flight requests. Two guards keep
//! concurrent misses of the same tile consistent and cheap:
//!
//! - a per-tile async mutex collapses duplicate downloads into one — the
//!   second resolver finds the file on disk after the first releases the lock;
//! - the installed file appears atomically via a unique temp path and rename,
//!   so a concurrent reader never observes a partially-written tile.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DownloadError, FilesystemError, ResolveError};

use super::id::{TerrainVersion, TileId};
use super::origin::TileOrigin;

// =============================================================================
// Version Store
// =============================================================================

/// Storage for one terrain version: a local root and an optional origin.
///
/// A version without an origin is local-cache-only; resolving a tile absent
/// from it fails with [`DownloadError::NotAvailable`].
pub struct VersionStore<O> {
    root: PathBuf,
    origin: Option<O>,
}

impl<O> VersionStore<O> {
    /// A local-only store rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            origin: None,
        }
    }

    /// A store that fetches missing tiles from `origin`.
    pub fn with_origin(root: impl Into<PathBuf>, origin: O) -> Self {
        Self {
            root: root.into(),
            origin: Some(origin),
        }
    }

    /// The local root directory of this version.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

// =============================================================================
// Cached Tile
// =============================================================================

/// A tile known to exist in the local cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedTile {
    /// The tile's identity.
    pub id: TileId,

    /// Local path of the compressed tile file.
    pub path: PathBuf,

    /// Whether this resolve had to download the tile from its origin.
    pub fetched: bool,
}

// =============================================================================
// Tile Cache
// =============================================================================

/// Shared on-disk cache of compressed tiles, partitioned by version.
///
/// Thread-safe; share across requests via `Arc`. Generic over the origin
/// implementation so tests can substitute an in-memory store.
pub struct TileCache<O: TileOrigin> {
    v1: VersionStore<O>,
    v3: VersionStore<O>,

    /// One lock per tile currently (or previously) being fetched. The map
    /// only ever holds tiles this process touched, and the tile namespace is
    /// finite, so it is not evicted.
    locks: Mutex<HashMap<TileId, Arc<Mutex<()>>>>,
}

impl<O: TileOrigin> TileCache<O> {
    /// Create a cache over the two version stores.
    pub fn new(v1: VersionStore<O>, v3: VersionStore<O>) -> Self {
        Self {
            v1,
            v3,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Local path a tile lives at (whether or not it exists yet).
    pub fn tile_path(&self, id: &TileId) -> PathBuf {
        self.store(id.version).root.join(id.filename())
    }

    /// Ensure a tile exists locally, fetching it from the version's origin if
    /// absent.
    ///
    /// Idempotent: a tile already on disk is served without touching the
    /// origin.
    ///
    /// # Errors
    ///
    /// - [`DownloadError::NotAvailable`] if the tile is absent and the version
    ///   has no origin configured
    /// - [`DownloadError::OriginUnreachable`] if the fetch fails or times out
    /// - [`FilesystemError`] if the local file cannot be probed or written
    pub async fn resolve(&self, id: &TileId) -> Result<CachedTile, ResolveError> {
        let path = self.tile_path(id);

        if file_exists(&path).await? {
            debug!(tile = %id, "tile already cached");
            return Ok(CachedTile {
                id: *id,
                path,
                fetched: false,
            });
        }

        let lock = self.tile_lock(id).await;
        let _guard = lock.lock().await;

        // A concurrent resolver may have installed the tile while we waited.
        if file_exists(&path).await? {
            debug!(tile = %id, "tile installed by concurrent request");
            return Ok(CachedTile {
                id: *id,
                path,
                fetched: false,
            });
        }

        let store = self.store(id.version);
        let filename = id.filename();
        let origin = store.origin.as_ref().ok_or_else(|| {
            DownloadError::NotAvailable {
                filename: filename.clone(),
                version: id.version,
            }
        })?;

        info!(tile = %filename, version = %id.version, "downloading tile from origin");
        let bytes = origin.fetch(&filename).await?;

        install_atomic(&store.root, &path, &bytes).await?;
        info!(tile = %filename, size = bytes.len(), "tile installed");

        Ok(CachedTile {
            id: *id,
            path,
            fetched: true,
        })
    }

    fn store(&self, version: TerrainVersion) -> &VersionStore<O> {
        match version {
            TerrainVersion::V1 => &self.v1,
            TerrainVersion::V3 => &self.v3,
        }
    }

    async fn tile_lock(&self, id: &TileId) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks
            .entry(*id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

async fn file_exists(path: &Path) -> Result<bool, FilesystemError> {
    tokio::fs::try_exists(path)
        .await
        .map_err(|e| FilesystemError::new(path, &e))
}

/// Write `bytes` to a unique temp path under `root`, then rename into place.
///
/// The unique suffix keeps concurrent writers (other processes sharing the
/// root) from clobbering each other's temp files; the rename makes the final
/// file appear atomically.
async fn install_atomic(root: &Path, path: &Path, bytes: &[u8]) -> Result<(), FilesystemError> {
    tokio::fs::create_dir_all(root)
        .await
        .map_err(|e| FilesystemError::new(root, &e))?;

    let tmp = path.with_extension(format!("part-{}", Uuid::new_v4().simple()));

    if let Err(e) = tokio::fs::write(&tmp, bytes).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(FilesystemError::new(&tmp, &e));
    }

    if let Err(e) = tokio::fs::rename(&tmp, path).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(FilesystemError::new(path, &e));
    }

    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
