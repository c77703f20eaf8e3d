//! Tile identity, acquisition, and caching.
//!
//! Everything that knows what a tile *is* and where its bytes live:
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            ArchiveBuilder               │
//! └────────────────────┬────────────────────┘
//!                      │ resolve(TileId)
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │             TileCache<O>                │
//! │  per-version roots · atomic installs    │
//! │  per-tile locks for concurrent misses   │
//! └────────────────────┬────────────────────┘
//!                      │ fetch(filename) on miss
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │           TileOrigin trait              │
//! │   HttpTileOrigin  /  test mocks         │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Components
//!
//! - [`TileId`] / [`TerrainVersion`]: immutable tile identity and canonical
//!   filename
//! - [`TileCache`]: serve-local-or-fetch disk cache, never evicts
//! - [`TileOrigin`] / [`HttpTileOrigin`]: remote store seam and its HTTP
//!   implementation with a bounded fetch timeout
//! - [`CachedTile`]: a resolved tile plus whether a download was needed

mod cache;
mod id;
mod origin;

pub use cache::{CachedTile, TileCache, VersionStore};
pub use id::{TerrainVersion, TileId, ENTRY_SUFFIX, TILE_SUFFIX};
pub use origin::{HttpTileOrigin, TileOrigin, DEFAULT_FETCH_TIMEOUT};
