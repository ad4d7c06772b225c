//! Resolves the resource requests of a map rendering engine against MBTiles and PMTiles
//! archives, remote PMTiles archives, tile servers and asset directories, and turns the
//! engine's raster output into finished PNG tiles.
//!
//! - [`dispatcher`]: classification and resolution of resource requests
//! - [`sources`]: archive, tile server and HTTP backends
//! - [`render`]: tile request parameters, render planning and the [`render::RenderEngine`] seam
//! - [`config`]: YAML configuration

pub mod config;
pub mod dispatcher;
pub mod render;
pub mod sources;
