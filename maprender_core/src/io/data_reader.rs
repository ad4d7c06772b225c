//! The `DataReaderTrait` abstracts "give me `length` bytes at `offset`" so archive readers can
//! work on local files and on HTTP-hosted files alike.
//!
//! ```rust
//! use maprender_core::{io::{DataReader, DataReaderTrait}, Blob, ByteRange};
//! use anyhow::Result;
//! use async_trait::async_trait;
//!
//! #[derive(Debug)]
//! struct MemoryReader(Vec<u8>);
//!
//! #[async_trait]
//! impl DataReaderTrait for MemoryReader {
//!     async fn read_range(&self, range: &ByteRange) -> Result<Blob> {
//!         Ok(Blob::from(&self.0[range.as_range_usize()]))
//!     }
//!     fn get_name(&self) -> &str {
//!         "memory"
//!     }
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<()> {
//!     let reader: DataReader = Box::new(MemoryReader(vec![1, 2, 3, 4, 5]));
//!     let blob = reader.read_range(&ByteRange::new(1, 3)).await?;
//!     assert_eq!(blob.as_slice(), &[2, 3, 4]);
//!     Ok(())
//! }
//! ```

use crate::{Blob, ByteRange};
use anyhow::Result;
use async_trait::async_trait;
use std::fmt::Debug;

/// Type alias for a boxed dynamic implementation of the `DataReaderTrait`.
pub type DataReader = Box<dyn DataReaderTrait>;

#[async_trait]
pub trait DataReaderTrait: Debug + Send + Sync {
	/// Reads exactly `range.length` bytes starting at `range.offset`.
	async fn read_range(&self, range: &ByteRange) -> Result<Blob>;

	/// A human readable name of the source, usually its path or URL.
	fn get_name(&self) -> &str;
}
