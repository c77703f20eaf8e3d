//! Archive assembly and artifact retention.
//!
//! - [`ArchiveBuilder`]: repacks a resolved tile set into one deflate zip,
//!   entries named without the tile compression suffix, deterministic order
//! - [`ArtifactStore`]: flat directory of `<uuid>.zip` artifacts with
//!   deposit/lookup and time-based sweep eviction

mod builder;
mod store;

pub use builder::ArchiveBuilder;
pub use store::{ArtifactStore, DEFAULT_RETENTION};
