//! # Terrain Bundler
//!
//! Generates downloadable archives of elevation tiles covering a geographic
//! area, for consumption by an offline terrain-aware navigation client.
//!
//! A request names an area (a circle around a point, or a bounding rectangle)
//! and a terrain version. The library resolves the area to the set of
//! integer-degree tiles that cover it, ensures each tile exists in a local
//! on-disk cache (fetching from a remote HTTP origin on miss), repacks the
//! tiles into a single zip archive keyed by a request identifier, and reclaims
//! old archives after a retention window.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`geo`] - area requests, the geodesic offset seam, and area-to-tile
//!   resolution with the ±84° coverage limit
//! - [`tile`] - tile identity/naming, the on-disk cache, and remote origins
//! - [`archive`] - zip assembly and the retention-swept artifact store
//! - [`service`] - the `generate` operation tying it all together
//! - [`config`] - CLI and configuration types
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use terrain_bundler::{
//!     AreaRequest, AreaResolver, ArtifactStore, SphericalOffset, TerrainService,
//!     TerrainVersion, TileCache, VersionStore,
//! };
//! use terrain_bundler::tile::HttpTileOrigin;
//! use url::Url;
//!
//! #[tokio::main]
//! async fn main() {
//!     let origin = HttpTileOrigin::new(
//!         Url::parse("https://terrain.example.org/tilesdat3/").unwrap(),
//!     )
//!     .unwrap();
//!
//!     let cache = Arc::new(TileCache::new(
//!         VersionStore::new("./tilesdat1"),
//!         VersionStore::with_origin("./tilesdat3", origin),
//!     ));
//!     let resolver = AreaResolver::new(SphericalOffset, "4.1");
//!     let store = ArtifactStore::new("./artifacts");
//!     let service = TerrainService::new(resolver, cache, store);
//!
//!     let outcome = service
//!         .generate(&AreaRequest::Circle {
//!             center_lat: -35.3,
//!             center_lon: 149.2,
//!             radius_km: 50.0,
//!             version: TerrainVersion::V3,
//!         })
//!         .await;
//!
//!     if let Some(path) = outcome.archive_path {
//!         println!("archive ready at {}", path.display());
//!     }
//! }
//! ```

pub mod archive;
pub mod config;
pub mod error;
pub mod geo;
pub mod service;
pub mod tile;

// Re-export commonly used types
pub use archive::{ArchiveBuilder, ArtifactStore, DEFAULT_RETENTION};
pub use config::{Cli, Command, Config};
pub use error::{BuildError, DownloadError, FilesystemError, GenerateError, ResolveError};
pub use geo::{
    AreaRequest, AreaResolver, GeodesicOffset, ResolvedArea, SphericalOffset, LAT_LIMIT_DEG,
};
pub use service::{GenerateOutcome, TerrainService};
pub use tile::{
    CachedTile, HttpTileOrigin, TerrainVersion, TileCache, TileId, TileOrigin, VersionStore,
    DEFAULT_FETCH_TIMEOUT,
};
