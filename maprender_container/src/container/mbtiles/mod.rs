mod reader;
pub use reader::MBTilesReader;
