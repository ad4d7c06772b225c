//! The backends resource requests are resolved against.

mod archive;
pub use archive::*;

mod remote;
pub use remote::*;

mod tile_server;
pub use tile_server::*;
