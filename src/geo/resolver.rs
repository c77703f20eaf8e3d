//! Area-to-tile resolution.
//!
//! Expands a circular or rectangular area request into the deduplicated set of
//! integer-degree tile cells that cover it, applying the ±84° latitude
//! coverage limit.
//!
//! The two request shapes scan differently, and the difference is deliberate:
//!
//! - **Circle** walks a square grid of metric offsets (1000 m steps) through
//!   the geodesic offset function, so its footprint is whatever that square
//!   projects to — edge and corner cells beyond the true radius are included.
//! - **Rectangle** steps the degree bounds directly at 1.0° intervals.
//!
//! Meters on one path, degrees on the other: both scans are reproduced
//! faithfully from the system this replaces, because unifying them would
//! change which tiles a given request covers.

use std::collections::HashSet;

use crate::tile::{TerrainVersion, TileId};

use super::offset::{GeodesicOffset, COORD_SCALE};

/// Tiles beyond this latitude (either pole) are not covered by the dataset.
pub const LAT_LIMIT_DEG: i32 = 84;

/// Metric step of the circular scan, in meters.
const CIRCLE_STEP_M: i64 = 1000;

/// Degree step of the rectangular scan.
const RECT_STEP_DEG: f64 = 1.0;

// =============================================================================
// Area Request
// =============================================================================

/// A request for tile coverage of a geographic area.
///
/// Validation of user input (coordinate ranges, radius caps) belongs to the
/// boundary layer; the resolver only defends against degenerate shapes by
/// producing an empty tile set.
#[derive(Debug, Clone, PartialEq)]
pub enum AreaRequest {
    /// A circle around a center point.
    Circle {
        center_lat: f64,
        center_lon: f64,
        radius_km: f64,
        version: TerrainVersion,
    },

    /// A latitude/longitude bounding rectangle.
    Rectangle {
        min_lat: f64,
        max_lat: f64,
        min_lon: f64,
        max_lon: f64,
        version: TerrainVersion,
    },
}

impl AreaRequest {
    /// The terrain version this request targets.
    pub fn version(&self) -> TerrainVersion {
        match *self {
            AreaRequest::Circle { version, .. } => version,
            AreaRequest::Rectangle { version, .. } => version,
        }
    }
}

// =============================================================================
// Resolved Area
// =============================================================================

/// The tile set covering an area request.
#[derive(Debug, Clone, Default)]
pub struct ResolvedArea {
    /// Deduplicated tile identifiers, order irrelevant.
    pub tiles: HashSet<TileId>,

    /// True if any scanned cell fell outside the ±84° latitude limit.
    ///
    /// Advisory, not an error: it is surfaced even when the tile set is
    /// otherwise empty so the caller can tell the user why.
    pub outside_lat_limit: bool,
}

// =============================================================================
// Area Resolver
// =============================================================================

/// Expands area requests into tile sets.
///
/// Generic over the geodesic offset implementation so tests can substitute a
/// deterministic model.
pub struct AreaResolver<G: GeodesicOffset> {
    offset: G,
    variant: String,
}

impl<G: GeodesicOffset> AreaResolver<G> {
    /// Create a resolver using `offset` with the given projection variant tag.
    pub fn new(offset: G, variant: impl Into<String>) -> Self {
        Self {
            offset,
            variant: variant.into(),
        }
    }

    /// Resolve an area request into its covering tile set.
    ///
    /// Never fails: degenerate requests (radius ≤ 0, inverted rectangle
    /// bounds) and fully out-of-range areas yield an empty set, with
    /// `outside_lat_limit` reporting any excluded cells.
    pub fn resolve(&self, area: &AreaRequest) -> ResolvedArea {
        match *area {
            AreaRequest::Circle {
                center_lat,
                center_lon,
                radius_km,
                version,
            } => self.resolve_circle(center_lat, center_lon, radius_km, version),
            AreaRequest::Rectangle {
                min_lat,
                max_lat,
                min_lon,
                max_lon,
                version,
            } => self.resolve_rectangle(min_lat, max_lat, min_lon, max_lon, version),
        }
    }

    /// Square metric scan around the center through the offset function.
    fn resolve_circle(
        &self,
        center_lat: f64,
        center_lon: f64,
        radius_km: f64,
        version: TerrainVersion,
    ) -> ResolvedArea {
        let mut resolved = ResolvedArea::default();
        let mut seen: HashSet<(i32, i32)> = HashSet::new();

        let lat_e7 = (center_lat / COORD_SCALE).round() as i64;
        let lon_e7 = (center_lon / COORD_SCALE).round() as i64;
        let radius_m = (radius_km * 1000.0) as i64;

        let mut dx = -radius_m;
        while dx < radius_m {
            let mut dy = -radius_m;
            while dy < radius_m {
                let (lat2, lon2) =
                    self.offset
                        .offset(lat_e7, lon_e7, dx as f64, dy as f64, &self.variant);
                let lat_int = (lat2 as f64 * COORD_SCALE).floor() as i32;
                let lon_int = (lon2 as f64 * COORD_SCALE).floor() as i32;
                insert_cell(&mut resolved, &mut seen, lat_int, lon_int, version);
                dy += CIRCLE_STEP_M;
            }
            dx += CIRCLE_STEP_M;
        }

        resolved
    }

    /// Direct degree-step scan across the bounds, inclusive of both endpoints.
    fn resolve_rectangle(
        &self,
        min_lat: f64,
        max_lat: f64,
        min_lon: f64,
        max_lon: f64,
        version: TerrainVersion,
    ) -> ResolvedArea {
        let mut resolved = ResolvedArea::default();
        let mut seen: HashSet<(i32, i32)> = HashSet::new();

        let mut lat = min_lat;
        while lat <= max_lat {
            let mut lon = min_lon;
            while lon <= max_lon {
                let lat_int = lat.floor() as i32;
                let lon_int = lon.floor() as i32;
                insert_cell(&mut resolved, &mut seen, lat_int, lon_int, version);
                lon += RECT_STEP_DEG;
            }
            lat += RECT_STEP_DEG;
        }

        resolved
    }
}

/// Record one scanned cell: dedup first, then apply the latitude limit.
fn insert_cell(
    resolved: &mut ResolvedArea,
    seen: &mut HashSet<(i32, i32)>,
    lat_int: i32,
    lon_int: i32,
    version: TerrainVersion,
) {
    if !seen.insert((lat_int, lon_int)) {
        return;
    }
    if lat_int.abs() <= LAT_LIMIT_DEG {
        resolved.tiles.insert(TileId::new(lat_int, lon_int, version));
    } else {
        resolved.outside_lat_limit = true;
    }
}

// =============================================================================
// Tests
// =============================================================================
