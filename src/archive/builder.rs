//! Archive assembly.
//!
//! Repacks a resolved tile set into the single downloadable artifact: each
//! tile's gzip stream is decompressed and written into a zip archive as a
//! deflate-compressed entry named without the `.gz` suffix, which is the
//! layout the consuming navigation client expects.
//!
//! Tiles are processed in ascending filename order so identical inputs always
//! produce identical archive contents. Resolution of *all* tiles completes
//! before assembly starts; assembly itself is CPU-bound and runs on the
//! blocking pool.

use std::collections::HashSet;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use flate2::read::GzDecoder;
use tracing::{debug, info};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{BuildError, FilesystemError, ResolveError};
use crate::tile::{TileCache, TileId, TileOrigin};

/// One tile staged for archiving: compressed filename, entry name, gzip bytes.
struct StagedTile {
    filename: String,
    entry_name: String,
    compressed: Vec<u8>,
}

/// Assembles tile sets into zip archives, resolving tiles through the cache.
pub struct ArchiveBuilder<O: TileOrigin> {
    cache: Arc<TileCache<O>>,
}

impl<O: TileOrigin> ArchiveBuilder<O> {
    /// Create a builder over a shared tile cache.
    pub fn new(cache: Arc<TileCache<O>>) -> Self {
        Self { cache }
    }

    /// Build the archive for `tiles` at `destination`.
    ///
    /// An empty tile set is not an error: it produces a validly-formed,
    /// zero-entry archive. Any tile failure aborts the whole build and
    /// removes a partially-written destination file.
    pub async fn build(
        &self,
        tiles: &HashSet<TileId>,
        destination: &Path,
    ) -> Result<(), BuildError> {
        let mut ordered: Vec<TileId> = tiles.iter().copied().collect();
        ordered.sort_by_key(|t| t.filename());

        // Resolve everything up front; assembly never starts with downloads
        // outstanding.
        let mut staged = Vec::with_capacity(ordered.len());
        for id in &ordered {
            let cached = self.cache.resolve(id).await?;
            let compressed = tokio::fs::read(&cached.path).await.map_err(|e| {
                ResolveError::Filesystem(FilesystemError::new(&cached.path, &e))
            })?;
            staged.push(StagedTile {
                filename: id.filename(),
                entry_name: id.entry_name(),
                compressed,
            });
        }

        debug!(
            tiles = staged.len(),
            destination = %destination.display(),
            "assembling archive"
        );

        let dest = destination.to_path_buf();
        let result = tokio::task::spawn_blocking(move || write_archive(&dest, staged)).await;

        let build_result = match result {
            Ok(inner) => inner,
            Err(join_err) => Err(BuildError::Archive {
                entry: destination.display().to_string(),
                message: format!("archive task failed: {join_err}"),
            }),
        };

        if let Err(e) = build_result {
            let _ = tokio::fs::remove_file(destination).await;
            return Err(e);
        }

        info!(
            tiles = ordered.len(),
            destination = %destination.display(),
            "archive assembled"
        );
        Ok(())
    }
}

/// Decompress each staged tile and write the zip. Runs on the blocking pool.
fn write_archive(destination: &PathBuf, staged: Vec<StagedTile>) -> Result<(), BuildError> {
    let file = std::fs::File::create(destination).map_err(|e| BuildError::Archive {
        entry: destination.display().to_string(),
        message: e.to_string(),
    })?;

    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for tile in staged {
        let mut decompressed = Vec::new();
        GzDecoder::new(tile.compressed.as_slice())
            .read_to_end(&mut decompressed)
            .map_err(|e| BuildError::Decompress {
                filename: tile.filename.clone(),
                message: e.to_string(),
            })?;

        zip.start_file(tile.entry_name.as_str(), options)
            .map_err(|e| BuildError::Archive {
                entry: tile.entry_name.clone(),
                message: e.to_string(),
            })?;
        zip.write_all(&decompressed).map_err(|e| BuildError::Archive {
            entry: tile.entry_name.clone(),
            message: e.to_string(),
        })?;
    }

    zip.finish().map_err(|e| BuildError::Archive {
        entry: destination.display().to_string(),
        message: e.to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
