//! Reads byte ranges from a local file.
//!
//! The file is opened, positioned, read and closed again for every call, so a reader holds no
//! descriptor between requests.

use super::DataReaderTrait;
use crate::{Blob, ByteRange};
use anyhow::{Context, Result, bail, ensure};
use async_trait::async_trait;
use std::{
	io::SeekFrom,
	path::{Path, PathBuf},
};
use tokio::{
	fs::File,
	io::{AsyncReadExt, AsyncSeekExt},
};

#[derive(Debug)]
pub struct DataReaderFile {
	name: String,
	path: PathBuf,
}

impl DataReaderFile {
	/// Checks that `path` is an existing file and creates a reader for it.
	pub async fn open(path: &Path) -> Result<Box<DataReaderFile>> {
		let Ok(metadata) = tokio::fs::metadata(path).await else {
			bail!("file {path:?} does not exist");
		};
		ensure!(metadata.is_file(), "path {path:?} must be a file");

		Ok(Box::new(DataReaderFile {
			name: path.to_string_lossy().into_owned(),
			path: path.to_path_buf(),
		}))
	}
}

#[async_trait]
impl DataReaderTrait for DataReaderFile {
	async fn read_range(&self, range: &ByteRange) -> Result<Blob> {
		let mut file = File::open(&self.path)
			.await
			.with_context(|| format!("failed to open file '{}'", self.name))?;
		file
			.seek(SeekFrom::Start(range.offset))
			.await
			.with_context(|| format!("failed to seek to offset {} in file '{}'", range.offset, self.name))?;

		let mut buffer = vec![0; range.length as usize];
		file.read_exact(&mut buffer).await.with_context(|| {
			format!(
				"failed to read {} bytes at offset {} in file '{}'",
				range.length, range.offset, self.name
			)
		})?;
		Ok(Blob::from(buffer))
	}

	fn get_name(&self) -> &str {
		&self.name
	}
}
