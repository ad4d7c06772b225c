//! Readers for the two local tile archive formats and the cache that keeps their handles open.
//!
//! - [`MBTilesReader`]: SQLite based archives (`mbtiles://`)
//! - [`PMTilesReader`]: indexed single-file archives (`pmtiles://`), read from local files or
//!   over HTTP range requests
//! - [`ArchiveHandleCache`]: shared handles keyed by locator, with an explicit eviction policy

mod archive;
pub use archive::*;

pub mod cache;
pub use cache::*;

mod container;
pub use container::*;

#[cfg(any(test, feature = "test"))]
pub mod testing;
