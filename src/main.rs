//! Terrain bundler CLI.
//!
//! Wires the library components from configuration and runs one generation
//! request. The HTTP boundary layer lives elsewhere; this binary is the
//! operational entry point for local and scripted use.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

use terrain_bundler::{
    config::Cli, AreaResolver, ArtifactStore, HttpTileOrigin, SphericalOffset, TerrainService,
    TileCache, VersionStore,
};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = cli.config;

    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    let area = match cli.command.to_area() {
        Ok(area) => area,
        Err(e) => {
            error!("Invalid area: {}", e);
            return ExitCode::FAILURE;
        }
    };

    info!("Configuration:");
    info!("  v1 tiles: {}", config.tiles_v1.display());
    info!("  v3 tiles: {}", config.tiles_v3.display());
    match config.origin_v1.as_deref() {
        Some(origin) => info!("  v1 origin: {}", origin),
        None => warn!("  v1 origin: none (local cache only)"),
    }
    match config.origin_v3.as_deref() {
        Some(origin) => info!("  v3 origin: {}", origin),
        None => warn!("  v3 origin: none (local cache only)"),
    }
    info!("  artifacts: {}", config.artifacts.display());
    info!("  retention: {}h", config.retention_hours);

    // validate() already checked these parse.
    let timeout = config.fetch_timeout();
    let origin_v1 = config.origin_v1_url().unwrap_or_default();
    let origin_v3 = config.origin_v3_url().unwrap_or_default();

    let v1 = match version_store(config.tiles_v1.clone(), origin_v1, timeout) {
        Ok(store) => store,
        Err(e) => {
            error!("Failed to create v1 origin client: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let v3 = match version_store(config.tiles_v3.clone(), origin_v3, timeout) {
        Ok(store) => store,
        Err(e) => {
            error!("Failed to create v3 origin client: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let cache = Arc::new(TileCache::new(v1, v3));
    let resolver = AreaResolver::new(SphericalOffset, config.offset_variant.clone());
    let store = ArtifactStore::with_retention(config.artifacts.clone(), config.retention());
    let service = TerrainService::new(resolver, cache, store);

    let outcome = service.generate(&area).await;

    if outcome.outside_lat_limit {
        warn!("Part of the requested area lies outside ±84° latitude and is not covered");
    }

    match (outcome.archive_path, outcome.error) {
        (Some(path), _) => {
            info!("Request {}: archive at {}", outcome.request_id, path.display());
            println!("{}", path.display());
            ExitCode::SUCCESS
        }
        (None, Some(e)) => {
            error!("Request {} failed: {}", outcome.request_id, e);
            ExitCode::FAILURE
        }
        (None, None) => {
            // generate() always sets one of the two; defend anyway.
            error!("Request {} produced no archive", outcome.request_id);
            ExitCode::FAILURE
        }
    }
}

/// Build the store for one version, attaching an HTTP origin when configured.
fn version_store(
    root: PathBuf,
    origin: Option<Url>,
    timeout: Duration,
) -> Result<VersionStore<HttpTileOrigin>, reqwest::Error> {
    Ok(match origin {
        Some(url) => VersionStore::with_origin(root, HttpTileOrigin::with_timeout(url, timeout)?),
        None => VersionStore::new(root),
    })
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "terrain_bundler=debug"
    } else {
        "terrain_bundler=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
