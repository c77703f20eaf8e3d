//! Geographic area resolution.
//!
//! This module turns an area request into the set of tiles that cover it:
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │             AreaRequest                 │
//! │        (Circle | Rectangle)             │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │         AreaResolver<G>                 │
//! │  circle: metric scan via GeodesicOffset │
//! │  rectangle: direct degree scan          │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │            ResolvedArea                 │
//! │   (dedup TileId set + ±84° flag)        │
//! └─────────────────────────────────────────┘
//! ```

mod offset;
mod resolver;

pub use offset::{GeodesicOffset, SphericalOffset, COORD_SCALE};
pub use resolver::{AreaRequest, AreaResolver, ResolvedArea, LAT_LIMIT_DEG};
