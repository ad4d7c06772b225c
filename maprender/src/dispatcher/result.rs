use anyhow::{Error, Result};
use maprender_core::Blob;

/// The outcome of resolving one resource request.
#[derive(Debug)]
pub enum ResourceResult {
	Hit(Blob),
	/// The resource does not exist, or there is nothing to deliver. Not an error.
	Miss,
	Error(Error),
}

impl ResourceResult {
	/// Collapses the result into the `(error, data)` pair handed to the engine.
	#[must_use]
	pub fn into_callback_args(self) -> (Option<Error>, Option<Blob>) {
		match self {
			ResourceResult::Hit(blob) => (None, Some(blob)),
			ResourceResult::Miss => (None, None),
			ResourceResult::Error(error) => (Some(error), None),
		}
	}

	#[must_use]
	pub fn is_hit(&self) -> bool {
		matches!(self, ResourceResult::Hit(_))
	}

	#[must_use]
	pub fn is_miss(&self) -> bool {
		matches!(self, ResourceResult::Miss)
	}

	#[must_use]
	pub fn is_error(&self) -> bool {
		matches!(self, ResourceResult::Error(_))
	}
}

impl From<Result<Option<Blob>>> for ResourceResult {
	fn from(result: Result<Option<Blob>>) -> Self {
		match result {
			Ok(Some(blob)) => ResourceResult::Hit(blob),
			Ok(None) => ResourceResult::Miss,
			Err(error) => ResourceResult::Error(error),
		}
	}
}
