//! Cache behavior across whole generation requests.

use std::sync::Arc;

use terrain_bundler::{AreaRequest, TerrainVersion};

use super::test_utils::{gzip, read_archive, service_with_origin, MockOrigin};

fn unit_circle(version: TerrainVersion) -> AreaRequest {
    AreaRequest::Circle {
        center_lat: 0.0,
        center_lon: 0.0,
        radius_km: 1.0,
        version,
    }
}

fn stub_origin_around_zero() -> MockOrigin {
    MockOrigin::new()
        .with_tile("N00E000.DAT.gz", b"ne")
        .with_tile("N00W001.DAT.gz", b"nw")
        .with_tile("S01E000.DAT.gz", b"se")
        .with_tile("S01W001.DAT.gz", b"sw")
}

#[tokio::test]
async fn test_repeated_generate_fetches_each_tile_once() {
    let dir = tempfile::TempDir::new().unwrap();
    let origin = stub_origin_around_zero();
    let service = service_with_origin(&dir, origin.clone());

    let first = service.generate(&unit_circle(TerrainVersion::V3)).await;
    assert!(first.success(), "error: {:?}", first.error);
    assert_eq!(origin.fetch_count(), 4);

    // The second request is served entirely from the on-disk cache.
    let second = service.generate(&unit_circle(TerrainVersion::V3)).await;
    assert!(second.success(), "error: {:?}", second.error);
    assert_eq!(origin.fetch_count(), 4);

    // Each request still gets its own artifact.
    let first_path = first.archive_path.unwrap();
    let second_path = second.archive_path.unwrap();
    assert_ne!(first_path, second_path);
    assert_eq!(read_archive(&first_path), read_archive(&second_path));
}

#[tokio::test]
async fn test_fetched_tiles_persist_in_version_root() {
    let dir = tempfile::TempDir::new().unwrap();
    let service = service_with_origin(&dir, stub_origin_around_zero());

    let outcome = service.generate(&unit_circle(TerrainVersion::V3)).await;
    assert!(outcome.success(), "error: {:?}", outcome.error);

    // Cached tiles keep their compressed wire form under the v3 root.
    let cached = dir.path().join("tilesdat3").join("N00E000.DAT.gz");
    let bytes = tokio::fs::read(&cached).await.unwrap();
    assert_eq!(bytes, gzip(b"ne"));
}

#[tokio::test]
async fn test_prefilled_cache_needs_no_origin() {
    let dir = tempfile::TempDir::new().unwrap();
    let origin = MockOrigin::new();
    let service = service_with_origin(&dir, origin.clone());

    let v3_root = dir.path().join("tilesdat3");
    tokio::fs::create_dir_all(&v3_root).await.unwrap();
    for name in ["N00E000", "N00W001", "S01E000", "S01W001"] {
        tokio::fs::write(v3_root.join(format!("{name}.DAT.gz")), gzip(name.as_bytes()))
            .await
            .unwrap();
    }

    let outcome = service.generate(&unit_circle(TerrainVersion::V3)).await;
    assert!(outcome.success(), "error: {:?}", outcome.error);
    assert_eq!(origin.fetch_count(), 0);
}

#[tokio::test]
async fn test_concurrent_generates_share_downloads() {
    let dir = tempfile::TempDir::new().unwrap();
    let origin = stub_origin_around_zero();
    let service = Arc::new(service_with_origin(&dir, origin.clone()));

    let mut handles = Vec::new();
    for _ in 0..4 {
        let service = Arc::clone(&service);
        handles.push(tokio::spawn(async move {
            service.generate(&unit_circle(TerrainVersion::V3)).await
        }));
    }

    for handle in handles {
        let outcome = handle.await.unwrap();
        assert!(outcome.success(), "error: {:?}", outcome.error);
    }

    // Per-tile locking collapses the concurrent misses to one download each.
    assert_eq!(origin.fetch_count(), 4);
}
