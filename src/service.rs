//! Terrain generation service.
//!
//! The single operation this crate exposes: turn an area request into a
//! downloadable archive. The service orchestrates the full pipeline and
//! reports the result as a structured outcome rather than raising errors to
//! the boundary layer.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      TerrainService                         │
//! │  ┌───────────────────────────────────────────────────────┐  │
//! │  │                    generate()                         │  │
//! │  │  1. Resolve area to tile set    3. Build archive      │  │
//! │  │  2. Reserve artifact path       4. Sweep old artifacts│  │
//! │  └───────────────────────────────────────────────────────┘  │
//! │        │                  │                   │             │
//! │        ▼                  ▼                   ▼             │
//! │  ┌──────────────┐  ┌────────────────┐  ┌───────────────┐    │
//! │  │ AreaResolver │  │ ArchiveBuilder │  │ ArtifactStore │    │
//! │  └──────────────┘  └───────┬────────┘  └───────────────┘    │
//! │                            ▼                                │
//! │                     ┌────────────┐                          │
//! │                     │ TileCache  │                          │
//! │                     └────────────┘                          │
//! └─────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{error, info};
use uuid::Uuid;

use crate::archive::{ArchiveBuilder, ArtifactStore};
use crate::error::GenerateError;
use crate::geo::{AreaRequest, AreaResolver, GeodesicOffset, ResolvedArea};
use crate::tile::{TileCache, TileOrigin};

// =============================================================================
// Generate Outcome
// =============================================================================

/// Structured result of one generation request.
///
/// Always carries the request identifier, even on failure, so the caller can
/// correlate logs. `outside_lat_limit` is advisory and accompanies successes
/// and failures alike.
#[derive(Debug, Clone)]
pub struct GenerateOutcome {
    /// Identifier minted for this request; names the artifact on success.
    pub request_id: Uuid,

    /// Path of the finished archive, when generation succeeded.
    pub archive_path: Option<PathBuf>,

    /// True if part of the requested area fell outside ±84° latitude.
    pub outside_lat_limit: bool,

    /// The failure, when generation did not succeed.
    pub error: Option<GenerateError>,
}

impl GenerateOutcome {
    /// Whether an archive was produced.
    pub fn success(&self) -> bool {
        self.archive_path.is_some()
    }
}

// =============================================================================
// Terrain Service
// =============================================================================

/// Orchestrates area resolution, tile acquisition, archive assembly, and
/// artifact retention for generation requests.
///
/// Requests run independently and concurrently; the service holds only shared
/// immutable wiring, so it can be cloned behind an `Arc` across handlers.
pub struct TerrainService<G: GeodesicOffset, O: TileOrigin> {
    resolver: AreaResolver<G>,
    builder: ArchiveBuilder<O>,
    store: ArtifactStore,
}

impl<G: GeodesicOffset, O: TileOrigin> TerrainService<G, O> {
    /// Wire a service from its collaborators.
    pub fn new(resolver: AreaResolver<G>, cache: Arc<TileCache<O>>, store: ArtifactStore) -> Self {
        Self {
            resolver,
            builder: ArchiveBuilder::new(cache),
            store,
        }
    }

    /// The artifact store backing this service.
    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    /// Generate the archive covering `area`.
    ///
    /// Never returns an error: failures originating in tile resolution or
    /// archive assembly are folded into the outcome for the boundary layer to
    /// translate. Every call, successful or not, triggers a retention sweep
    /// of the artifact store.
    pub async fn generate(&self, area: &AreaRequest) -> GenerateOutcome {
        let request_id = Uuid::new_v4();
        let resolved = self.resolver.resolve(area);

        info!(
            %request_id,
            version = %area.version(),
            tiles = resolved.tiles.len(),
            outside_lat_limit = resolved.outside_lat_limit,
            "generating terrain archive"
        );

        let result = self.try_generate(request_id, &resolved).await;

        let swept = self.store.sweep().await;
        if swept > 0 {
            info!(%request_id, removed = swept, "swept expired artifacts");
        }

        match result {
            Ok(archive_path) => {
                info!(%request_id, path = %archive_path.display(), "terrain archive ready");
                GenerateOutcome {
                    request_id,
                    archive_path: Some(archive_path),
                    outside_lat_limit: resolved.outside_lat_limit,
                    error: None,
                }
            }
            Err(e) => {
                error!(%request_id, error = %e, "terrain generation failed");
                GenerateOutcome {
                    request_id,
                    archive_path: None,
                    outside_lat_limit: resolved.outside_lat_limit,
                    error: Some(e),
                }
            }
        }
    }

    async fn try_generate(
        &self,
        request_id: Uuid,
        resolved: &ResolvedArea,
    ) -> Result<PathBuf, GenerateError> {
        let destination = self.store.deposit(request_id).await?;
        self.builder.build(&resolved.tiles, &destination).await?;
        Ok(destination)
    }
}
