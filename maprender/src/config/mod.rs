mod archive_cache;
pub use archive_cache::*;

mod main;
pub use main::*;

mod style;
pub use style::*;
