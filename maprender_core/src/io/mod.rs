//! Byte sources for archive readers and a reader for little-endian binary values.

mod data_reader;
mod data_reader_file;
mod data_reader_http;
mod value_reader_slice;

pub use data_reader::*;
pub use data_reader_file::*;
pub use data_reader_http::*;
pub use value_reader_slice::*;
