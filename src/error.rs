use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::tile::TerrainVersion;

/// Errors acquiring a tile from its remote origin.
#[derive(Debug, Clone, Error)]
pub enum DownloadError {
    /// The tile is absent locally and no origin is configured for its version.
    #[error("tile {filename} is not available: no origin configured for version {version}")]
    NotAvailable {
        filename: String,
        version: TerrainVersion,
    },

    /// The origin could not be reached or returned a non-success response.
    /// Fetch timeouts surface here as well.
    #[error("origin unreachable for tile {filename}: {reason}")]
    OriginUnreachable { filename: String, reason: String },
}

/// I/O failure on a local read/write/rename/delete.
#[derive(Debug, Clone, Error)]
#[error("filesystem error at {}: {message}", path.display())]
pub struct FilesystemError {
    pub path: PathBuf,
    pub message: String,
}

impl FilesystemError {
    /// Capture an `io::Error` against the path it occurred on.
    pub fn new(path: impl AsRef<Path>, err: &std::io::Error) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            message: err.to_string(),
        }
    }
}

/// Errors from [`TileCache::resolve`](crate::tile::TileCache::resolve).
#[derive(Debug, Clone, Error)]
pub enum ResolveError {
    /// The tile could not be fetched from its origin.
    #[error(transparent)]
    Download(#[from] DownloadError),

    /// The local cache could not be read or written.
    #[error(transparent)]
    Filesystem(#[from] FilesystemError),
}

/// Errors during archive assembly.
///
/// Any tile-level failure aborts the whole build; no partial archive is left
/// on disk.
#[derive(Debug, Clone, Error)]
pub enum BuildError {
    /// A required tile failed to resolve.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// A resolved tile's gzip stream could not be decompressed.
    #[error("failed to decompress tile {filename}: {message}")]
    Decompress { filename: String, message: String },

    /// The destination archive could not be written.
    #[error("failed to write archive {entry}: {message}")]
    Archive { entry: String, message: String },
}

/// Errors from a whole `generate` call.
///
/// The service converts this into a structured outcome rather than raising it
/// to the boundary layer.
#[derive(Debug, Clone, Error)]
pub enum GenerateError {
    /// Archive assembly failed.
    #[error(transparent)]
    Build(#[from] BuildError),

    /// The artifact store could not reserve the destination path.
    #[error(transparent)]
    Store(#[from] FilesystemError),
}
