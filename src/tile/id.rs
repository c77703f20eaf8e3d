//! Tile identity and canonical naming.
//!
//! Elevation data is stored as one compressed file per integer degree of
//! latitude and longitude, per terrain version. The filename is the only
//! on-disk key, so every component that touches a tile goes through
//! [`TileId::filename`].
//!
//! # Naming
//!
//! Filenames follow the `<NS><LL><EW><LLL>.DAT.gz` convention: hemisphere
//! letter from the sign of the degree value, two-digit latitude magnitude,
//! three-digit longitude magnitude, and a fixed suffix marking the
//! gzip-compressed payload. Magnitudes are clamped (99 / 999) instead of
//! failing, which makes naming a total function.

use std::fmt;

/// Suffix shared by every compressed tile file.
pub const TILE_SUFFIX: &str = ".DAT.gz";

/// Suffix of a tile once its gzip layer is stripped (archive entry name).
pub const ENTRY_SUFFIX: &str = ".DAT";

// =============================================================================
// Terrain Version
// =============================================================================

/// Terrain data format/resolution identifier.
///
/// Each version selects an independent tile namespace on disk and an
/// independently configured remote origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TerrainVersion {
    /// Version 1 terrain data.
    V1,
    /// Version 3 terrain data.
    V3,
}

impl TerrainVersion {
    /// The numeric tag used on the wire and in configuration.
    pub fn as_number(self) -> u8 {
        match self {
            TerrainVersion::V1 => 1,
            TerrainVersion::V3 => 3,
        }
    }

    /// Parse a numeric tag. Only 1 and 3 are valid terrain versions.
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(TerrainVersion::V1),
            3 => Some(TerrainVersion::V3),
            _ => None,
        }
    }
}

impl fmt::Display for TerrainVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_number())
    }
}

// =============================================================================
// Tile Id
// =============================================================================

/// Identity of a single elevation tile.
///
/// A `TileId` is an immutable value type: two ids with the same degree cell
/// and version are the same tile, which is what makes it usable as the key of
/// the dedup set in area resolution and of the per-tile locks in the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileId {
    /// Integer degree of latitude (floored from the covered area).
    pub lat_deg: i32,

    /// Integer degree of longitude (floored from the covered area).
    pub lon_deg: i32,

    /// Terrain version selecting namespace and origin.
    pub version: TerrainVersion,
}

impl TileId {
    /// Create a new tile id.
    pub fn new(lat_deg: i32, lon_deg: i32, version: TerrainVersion) -> Self {
        Self {
            lat_deg,
            lon_deg,
            version,
        }
    }

    /// Canonical compressed filename for this tile, e.g. `S34E018.DAT.gz`.
    ///
    /// Hemisphere letters come from the sign of the degree values
    /// (`N`/`E` for non-negative); magnitudes clamp to 99 and 999.
    pub fn filename(&self) -> String {
        let ns = if self.lat_deg < 0 { 'S' } else { 'N' };
        let ew = if self.lon_deg < 0 { 'W' } else { 'E' };
        let lat = self.lat_deg.unsigned_abs().min(99);
        let lon = self.lon_deg.unsigned_abs().min(999);
        format!("{ns}{lat:02}{ew}{lon:03}{TILE_SUFFIX}")
    }

    /// Name of the tile inside a generated archive: the filename with the
    /// compression suffix stripped, e.g. `S34E018.DAT`.
    pub fn entry_name(&self) -> String {
        let ns = if self.lat_deg < 0 { 'S' } else { 'N' };
        let ew = if self.lon_deg < 0 { 'W' } else { 'E' };
        let lat = self.lat_deg.unsigned_abs().min(99);
        let lon = self.lon_deg.unsigned_abs().min(999);
        format!("{ns}{lat:02}{ew}{lon:03}{ENTRY_SUFFIX}")
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (v{})", self.filename(), self.version)
    }
}

// =============================================================================
// Tests
// =============================================================================
