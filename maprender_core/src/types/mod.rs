mod blob;
mod byte_range;
mod source_descriptor;
mod tile_address;
mod tile_compression;
mod tilejson;

pub use blob::*;
pub use byte_range::*;
pub use source_descriptor::*;
pub use tile_address::*;
pub use tile_compression::*;
pub use tilejson::*;
