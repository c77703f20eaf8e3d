//! Geodesic offset seam.
//!
//! Area resolution for circular requests walks a square grid of metric
//! displacements and asks an offset function where each displacement lands.
//! That function is an external collaborator: the resolver only depends on the
//! [`GeodesicOffset`] trait, and tests or alternative projection models plug in
//! their own implementation.
//!
//! Coordinates cross this boundary in fixed-point 1e-7-degree units, the
//! resolution the tile data itself is keyed in.

/// Scale of the fixed-point coordinate representation: 1e-7 degrees per unit.
pub const COORD_SCALE: f64 = 1.0e-7;

/// Meters of surface distance per fixed-point latitude unit on a spherical
/// earth (radius 6 378 100 m): `R * pi / 180 * 1e-7`.
const METERS_PER_E7_DEG: f64 = 0.011_131_884_502_145_034;

/// Displaces a fixed-point coordinate by a metric offset.
///
/// `variant` is an opaque configuration tag selecting the projection model
/// inside the implementation; callers pass it through unchanged.
pub trait GeodesicOffset: Send + Sync {
    /// Return the coordinate reached by moving `east_m` meters east and
    /// `north_m` meters north of `(lat_e7, lon_e7)`.
    fn offset(
        &self,
        lat_e7: i64,
        lon_e7: i64,
        east_m: f64,
        north_m: f64,
        variant: &str,
    ) -> (i64, i64);
}

/// Spherical-earth offset model.
///
/// Latitude displaces linearly; longitude is scaled by the cosine of the
/// latitude so a metric step covers more degrees near the poles. The cosine is
/// clamped away from zero to keep the result finite at extreme latitudes,
/// which the ±84° coverage limit excludes anyway.
#[derive(Debug, Clone, Copy, Default)]
pub struct SphericalOffset;

impl GeodesicOffset for SphericalOffset {
    fn offset(
        &self,
        lat_e7: i64,
        lon_e7: i64,
        east_m: f64,
        north_m: f64,
        _variant: &str,
    ) -> (i64, i64) {
        let dlat = north_m / METERS_PER_E7_DEG;
        let lat2 = lat_e7 as f64 + dlat;

        let lat_rad = lat2 * COORD_SCALE * std::f64::consts::PI / 180.0;
        let scale = lat_rad.cos().max(0.01);
        let dlon = east_m / (METERS_PER_E7_DEG * scale);
        let lon2 = lon_e7 as f64 + dlon;

        (lat2.round() as i64, lon2.round() as i64)
    }
}
