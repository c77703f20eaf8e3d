//! Artifact retention behavior across generation requests.

use std::sync::Arc;
use std::time::{Duration, SystemTime};

use terrain_bundler::{
    AreaRequest, AreaResolver, ArtifactStore, SphericalOffset, TerrainService, TerrainVersion,
    TileCache, VersionStore,
};

use super::test_utils::{service_with_origin, MockOrigin};

fn single_cell_rectangle() -> AreaRequest {
    AreaRequest::Rectangle {
        min_lat: 10.5,
        max_lat: 10.5,
        min_lon: 20.5,
        max_lon: 20.5,
        version: TerrainVersion::V3,
    }
}

#[tokio::test]
async fn test_sweep_expires_generated_artifacts() {
    let dir = tempfile::TempDir::new().unwrap();
    let origin = MockOrigin::new().with_tile("N10E020.DAT.gz", b"tile");
    let service = service_with_origin(&dir, origin);

    let outcome = service.generate(&single_cell_rectangle()).await;
    assert!(outcome.success(), "error: {:?}", outcome.error);
    let path = outcome.archive_path.unwrap();

    // Fresh artifacts survive an early sweep.
    let in_1h = SystemTime::now() + Duration::from_secs(60 * 60);
    assert_eq!(service.store().sweep_at(in_1h).await, 0);
    assert!(path.exists());

    // Past the 24 h retention window they are reclaimed.
    let in_25h = SystemTime::now() + Duration::from_secs(25 * 60 * 60);
    assert_eq!(service.store().sweep_at(in_25h).await, 1);
    assert!(!path.exists());
    assert!(service.store().lookup(outcome.request_id).await.is_none());
}

#[tokio::test]
async fn test_generate_sweeps_expired_artifacts_of_earlier_requests() {
    let dir = tempfile::TempDir::new().unwrap();
    let origin = MockOrigin::new().with_tile("N10E020.DAT.gz", b"tile");

    // Wire the service by hand to get a near-zero retention window.
    let cache = Arc::new(TileCache::new(
        VersionStore::new(dir.path().join("tilesdat1")),
        VersionStore::with_origin(dir.path().join("tilesdat3"), origin),
    ));
    let resolver = AreaResolver::new(SphericalOffset, "4.1");
    let store =
        ArtifactStore::with_retention(dir.path().join("artifacts"), Duration::from_millis(250));
    let service = TerrainService::new(resolver, cache, store);

    let first = service.generate(&single_cell_rectangle()).await;
    assert!(first.success(), "error: {:?}", first.error);
    let first_path = first.archive_path.unwrap();

    tokio::time::sleep(Duration::from_secs(1)).await;

    // The second request's built-in sweep reclaims the expired first artifact.
    let second = service.generate(&single_cell_rectangle()).await;
    assert!(second.success(), "error: {:?}", second.error);

    assert!(!first_path.exists());
    assert!(service.store().lookup(first.request_id).await.is_none());
    assert!(service.store().lookup(second.request_id).await.is_some());
}
