mod handle_cache;
pub use handle_cache::*;
