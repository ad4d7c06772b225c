mod mbtiles;
pub use mbtiles::*;

mod pmtiles;
pub use pmtiles::*;
