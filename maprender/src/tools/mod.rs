pub mod center;
mod config_args;
pub mod params;
pub mod tile;
pub mod tilejson;

pub use config_args::ConfigArgs;
