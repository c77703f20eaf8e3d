//! End-to-end generation tests against a stub origin.

use std::sync::Arc;

use terrain_bundler::{AreaRequest, GenerateError, TerrainVersion};

use super::test_utils::{gzip, read_archive, service_with_origin, MockOrigin};

#[tokio::test]
async fn test_generate_circle_end_to_end() {
    let dir = tempfile::TempDir::new().unwrap();
    // A 1 km circle at the origin touches the four cells around (0, 0).
    let origin = MockOrigin::new()
        .with_tile("N00E000.DAT.gz", b"tile N00E000")
        .with_tile("N00W001.DAT.gz", b"tile N00W001")
        .with_tile("S01E000.DAT.gz", b"tile S01E000")
        .with_tile("S01W001.DAT.gz", b"tile S01W001");
    let service = service_with_origin(&dir, origin);

    let outcome = service
        .generate(&AreaRequest::Circle {
            center_lat: 0.0,
            center_lon: 0.0,
            radius_km: 1.0,
            version: TerrainVersion::V3,
        })
        .await;

    assert!(outcome.success(), "error: {:?}", outcome.error);
    assert!(!outcome.outside_lat_limit);

    let path = outcome.archive_path.unwrap();
    assert_eq!(
        path.file_name().unwrap().to_string_lossy(),
        format!("{}.zip", outcome.request_id)
    );

    // Entries are the stub tiles, decompressed, renamed without the .gz
    // suffix, in ascending filename order.
    let entries = read_archive(&path);
    assert_eq!(
        entries,
        vec![
            ("N00E000.DAT".to_string(), b"tile N00E000".to_vec()),
            ("N00W001.DAT".to_string(), b"tile N00W001".to_vec()),
            ("S01E000.DAT".to_string(), b"tile S01E000".to_vec()),
            ("S01W001.DAT".to_string(), b"tile S01W001".to_vec()),
        ]
    );

    // The finished artifact is retrievable by request id.
    let looked_up = service.store().lookup(outcome.request_id).await;
    assert_eq!(looked_up, Some(path));
}

#[tokio::test]
async fn test_generate_rectangle_end_to_end() {
    let dir = tempfile::TempDir::new().unwrap();
    let origin = MockOrigin::new()
        .with_tile("N10E020.DAT.gz", b"tile 10/20")
        .with_tile("N11E020.DAT.gz", b"tile 11/20");
    let service = service_with_origin(&dir, origin);

    let outcome = service
        .generate(&AreaRequest::Rectangle {
            min_lat: 10.2,
            max_lat: 11.8,
            min_lon: 20.2,
            max_lon: 20.8,
            version: TerrainVersion::V3,
        })
        .await;

    assert!(outcome.success(), "error: {:?}", outcome.error);
    let entries = read_archive(&outcome.archive_path.unwrap());
    assert_eq!(
        entries,
        vec![
            ("N10E020.DAT".to_string(), b"tile 10/20".to_vec()),
            ("N11E020.DAT".to_string(), b"tile 11/20".to_vec()),
        ]
    );
}

#[tokio::test]
async fn test_generate_fully_outside_lat_limit() {
    let dir = tempfile::TempDir::new().unwrap();
    let service = service_with_origin(&dir, MockOrigin::new());

    let outcome = service
        .generate(&AreaRequest::Rectangle {
            min_lat: 86.0,
            max_lat: 87.0,
            min_lon: 0.0,
            max_lon: 1.0,
            version: TerrainVersion::V3,
        })
        .await;

    // Not an error: an empty but valid archive, with the advisory flag set.
    assert!(outcome.success(), "error: {:?}", outcome.error);
    assert!(outcome.outside_lat_limit);
    assert!(read_archive(&outcome.archive_path.unwrap()).is_empty());
}

#[tokio::test]
async fn test_generate_failure_is_structured_and_leaves_no_artifact() {
    let dir = tempfile::TempDir::new().unwrap();
    // The stub serves nothing; every tile fetch fails.
    let service = service_with_origin(&dir, MockOrigin::new());

    let outcome = service
        .generate(&AreaRequest::Circle {
            center_lat: 45.5,
            center_lon: 7.5,
            radius_km: 1.0,
            version: TerrainVersion::V3,
        })
        .await;

    assert!(!outcome.success());
    assert!(outcome.archive_path.is_none());
    assert!(matches!(outcome.error, Some(GenerateError::Build(_))));

    // No partial archive survives in the artifact store.
    assert!(service.store().lookup(outcome.request_id).await.is_none());
    let mut entries = tokio::fs::read_dir(service.store().root()).await.unwrap();
    assert!(entries.next_entry().await.unwrap().is_none());
}

#[tokio::test]
async fn test_generate_local_only_version() {
    let dir = tempfile::TempDir::new().unwrap();
    let service = service_with_origin(&dir, MockOrigin::new());

    // Version 1 has no origin; stage its tile on disk directly.
    let v1_root = dir.path().join("tilesdat1");
    tokio::fs::create_dir_all(&v1_root).await.unwrap();
    tokio::fs::write(v1_root.join("N10E020.DAT.gz"), gzip(b"local v1 tile"))
        .await
        .unwrap();

    let outcome = service
        .generate(&AreaRequest::Rectangle {
            min_lat: 10.5,
            max_lat: 10.5,
            min_lon: 20.5,
            max_lon: 20.5,
            version: TerrainVersion::V1,
        })
        .await;

    assert!(outcome.success(), "error: {:?}", outcome.error);
    let entries = read_archive(&outcome.archive_path.unwrap());
    assert_eq!(
        entries,
        vec![("N10E020.DAT".to_string(), b"local v1 tile".to_vec())]
    );
}

#[tokio::test]
async fn test_concurrent_generates_for_disjoint_rectangles() {
    let dir = tempfile::TempDir::new().unwrap();
    let origin = MockOrigin::new()
        .with_tile("N10E020.DAT.gz", b"alpha")
        .with_tile("N40E050.DAT.gz", b"beta");
    let service = Arc::new(service_with_origin(&dir, origin));

    let first = {
        let service = Arc::clone(&service);
        tokio::spawn(async move {
            service
                .generate(&AreaRequest::Rectangle {
                    min_lat: 10.5,
                    max_lat: 10.5,
                    min_lon: 20.5,
                    max_lon: 20.5,
                    version: TerrainVersion::V3,
                })
                .await
        })
    };
    let second = {
        let service = Arc::clone(&service);
        tokio::spawn(async move {
            service
                .generate(&AreaRequest::Rectangle {
                    min_lat: 40.5,
                    max_lat: 40.5,
                    min_lon: 50.5,
                    max_lon: 50.5,
                    version: TerrainVersion::V3,
                })
                .await
        })
    };

    let first = first.await.unwrap();
    let second = second.await.unwrap();

    assert!(first.success(), "error: {:?}", first.error);
    assert!(second.success(), "error: {:?}", second.error);
    assert_ne!(first.request_id, second.request_id);

    let first_entries = read_archive(&first.archive_path.unwrap());
    let second_entries = read_archive(&second.archive_path.unwrap());
    assert_eq!(first_entries[0].0, "N10E020.DAT");
    assert_eq!(second_entries[0].0, "N40E050.DAT");
}
