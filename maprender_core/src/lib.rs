//! Shared building blocks of the maprender workspace.
//!
//! - [`types`]: byte blobs, byte ranges, tile addresses, source descriptors and TileJSON documents
//! - [`io`]: pluggable byte sources (local files, HTTP range requests) and a little-endian value reader
//! - [`utils`]: payload (de)compression and Web-Mercator coordinate math

pub mod io;
pub mod types;
pub mod utils;

pub use types::*;
