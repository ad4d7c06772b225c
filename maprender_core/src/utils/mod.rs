mod compression;
pub mod mercator;

pub use compression::*;
