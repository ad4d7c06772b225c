mod entries_v3;
mod header_v3;
mod tile_compression;
mod tile_id;
mod tile_type;

pub use entries_v3::*;
pub use header_v3::*;
pub use tile_compression::*;
pub use tile_id::*;
pub use tile_type::*;
