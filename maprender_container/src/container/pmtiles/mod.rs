mod reader;
pub use reader::PMTilesReader;

mod types;
pub use types::*;
