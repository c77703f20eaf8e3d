//! Configuration management for the terrain bundler.
//!
//! Supports command-line arguments via clap and environment variables with a
//! `TERRAIN_` prefix, with sensible defaults for everything optional.
//!
//! # Environment Variables
//!
//! - `TERRAIN_TILES_V1` / `TERRAIN_TILES_V3` - tile cache roots per version
//! - `TERRAIN_ORIGIN_V1` / `TERRAIN_ORIGIN_V3` - remote origin base URLs;
//!   leaving one unset makes that version local-cache-only
//! - `TERRAIN_ARTIFACTS` - directory of generated archives
//! - `TERRAIN_RETENTION_HOURS` - artifact retention window (default: 24)
//! - `TERRAIN_FETCH_TIMEOUT_SECS` - bound on a single tile fetch (default: 30)
//! - `TERRAIN_OFFSET_VARIANT` - projection variant tag passed to the geodesic
//!   offset function (default: "4.1")

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use url::Url;

use crate::geo::AreaRequest;
use crate::tile::TerrainVersion;

// =============================================================================
// Default Values
// =============================================================================

/// Default artifact retention in hours.
pub const DEFAULT_RETENTION_HOURS: u64 = 24;

/// Default tile fetch timeout in seconds.
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

/// Default geodesic offset variant tag.
pub const DEFAULT_OFFSET_VARIANT: &str = "4.1";

// =============================================================================
// CLI
// =============================================================================

/// Terrain bundler - generates archives of elevation tiles covering an area.
#[derive(Parser, Debug, Clone)]
#[command(name = "terrain-bundler")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub config: Config,

    #[command(subcommand)]
    pub command: Command,
}

/// The area shape to generate coverage for.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Generate tiles covering a circle around a point.
    Circle(CircleArgs),

    /// Generate tiles covering a latitude/longitude rectangle.
    Rectangle(RectangleArgs),
}

impl Command {
    /// Turn the parsed arguments into an area request.
    pub fn to_area(&self) -> Result<AreaRequest, String> {
        match self {
            Command::Circle(args) => args.to_area(),
            Command::Rectangle(args) => args.to_area(),
        }
    }
}

/// Arguments for a circular area.
#[derive(Args, Debug, Clone)]
pub struct CircleArgs {
    /// Center latitude in degrees.
    #[arg(long, allow_hyphen_values = true)]
    pub lat: f64,

    /// Center longitude in degrees.
    #[arg(long, allow_hyphen_values = true)]
    pub lon: f64,

    /// Radius in kilometers.
    #[arg(long)]
    pub radius_km: f64,

    /// Terrain version (1 or 3).
    #[arg(long, default_value_t = 3)]
    pub version: u8,
}

impl CircleArgs {
    fn to_area(&self) -> Result<AreaRequest, String> {
        Ok(AreaRequest::Circle {
            center_lat: self.lat,
            center_lon: self.lon,
            radius_km: self.radius_km,
            version: parse_version(self.version)?,
        })
    }
}

/// Arguments for a rectangular area.
#[derive(Args, Debug, Clone)]
pub struct RectangleArgs {
    /// Minimum latitude in degrees.
    #[arg(long, allow_hyphen_values = true)]
    pub min_lat: f64,

    /// Maximum latitude in degrees.
    #[arg(long, allow_hyphen_values = true)]
    pub max_lat: f64,

    /// Minimum longitude in degrees.
    #[arg(long, allow_hyphen_values = true)]
    pub min_lon: f64,

    /// Maximum longitude in degrees.
    #[arg(long, allow_hyphen_values = true)]
    pub max_lon: f64,

    /// Terrain version (1 or 3).
    #[arg(long, default_value_t = 3)]
    pub version: u8,
}

impl RectangleArgs {
    fn to_area(&self) -> Result<AreaRequest, String> {
        Ok(AreaRequest::Rectangle {
            min_lat: self.min_lat,
            max_lat: self.max_lat,
            min_lon: self.min_lon,
            max_lon: self.max_lon,
            version: parse_version(self.version)?,
        })
    }
}

fn parse_version(n: u8) -> Result<TerrainVersion, String> {
    TerrainVersion::from_number(n)
        .ok_or_else(|| format!("invalid terrain version {n}: must be 1 or 3"))
}

// =============================================================================
// Configuration
// =============================================================================

/// Deployment configuration shared by all commands.
#[derive(Args, Debug, Clone)]
pub struct Config {
    // =========================================================================
    // Tile Cache Configuration
    // =========================================================================
    /// Local cache root for version 1 tiles.
    #[arg(long, default_value = "./tilesdat1", env = "TERRAIN_TILES_V1")]
    pub tiles_v1: PathBuf,

    /// Local cache root for version 3 tiles.
    #[arg(long, default_value = "./tilesdat3", env = "TERRAIN_TILES_V3")]
    pub tiles_v3: PathBuf,

    /// Remote origin base URL for version 1 tiles.
    ///
    /// If not set, version 1 is served from the local cache only.
    #[arg(long, env = "TERRAIN_ORIGIN_V1")]
    pub origin_v1: Option<String>,

    /// Remote origin base URL for version 3 tiles.
    ///
    /// If not set, version 3 is served from the local cache only.
    #[arg(long, env = "TERRAIN_ORIGIN_V3")]
    pub origin_v3: Option<String>,

    /// Bound on a single tile fetch, in seconds.
    #[arg(long, default_value_t = DEFAULT_FETCH_TIMEOUT_SECS, env = "TERRAIN_FETCH_TIMEOUT_SECS")]
    pub fetch_timeout_secs: u64,

    // =========================================================================
    // Artifact Store Configuration
    // =========================================================================
    /// Directory generated archives are written to.
    #[arg(long, default_value = "./artifacts", env = "TERRAIN_ARTIFACTS")]
    pub artifacts: PathBuf,

    /// Hours a generated archive is retained before the sweep removes it.
    #[arg(long, default_value_t = DEFAULT_RETENTION_HOURS, env = "TERRAIN_RETENTION_HOURS")]
    pub retention_hours: u64,

    // =========================================================================
    // Area Resolution Configuration
    // =========================================================================
    /// Projection variant tag passed to the geodesic offset function.
    #[arg(long, default_value = DEFAULT_OFFSET_VARIANT, env = "TERRAIN_OFFSET_VARIANT")]
    pub offset_variant: String,

    // =========================================================================
    // Logging Configuration
    // =========================================================================
    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl Config {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.retention_hours == 0 {
            return Err("retention_hours must be greater than 0".to_string());
        }
        if self.fetch_timeout_secs == 0 {
            return Err("fetch_timeout_secs must be greater than 0".to_string());
        }

        self.origin_v1_url()?;
        self.origin_v3_url()?;

        Ok(())
    }

    /// The artifact retention window.
    pub fn retention(&self) -> Duration {
        Duration::from_secs(self.retention_hours * 60 * 60)
    }

    /// The tile fetch timeout.
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// Parsed version 1 origin URL, if configured.
    pub fn origin_v1_url(&self) -> Result<Option<Url>, String> {
        parse_origin("origin_v1", self.origin_v1.as_deref())
    }

    /// Parsed version 3 origin URL, if configured.
    pub fn origin_v3_url(&self) -> Result<Option<Url>, String> {
        parse_origin("origin_v3", self.origin_v3.as_deref())
    }
}

fn parse_origin(name: &str, raw: Option<&str>) -> Result<Option<Url>, String> {
    let Some(raw) = raw else {
        return Ok(None);
    };

    let url = Url::parse(raw).map_err(|e| format!("{name} is not a valid URL: {e}"))?;
    match url.scheme() {
        "http" | "https" => Ok(Some(url)),
        scheme => Err(format!("{name} must be an http(s) URL, got scheme {scheme}")),
    }
}

// =============================================================================
// Tests
// =============================================================================
