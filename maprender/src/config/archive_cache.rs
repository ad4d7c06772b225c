use maprender_container::CachePolicy;
use serde::Deserialize;
use std::num::NonZeroUsize;

/// How many archive handles stay open.
///
/// ```yaml
/// archive_cache: unbounded
/// # or
/// archive_cache:
///   lru: 64
/// ```
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ArchiveCacheConfig {
	#[default]
	Unbounded,
	Lru(NonZeroUsize),
}

impl From<ArchiveCacheConfig> for CachePolicy {
	fn from(config: ArchiveCacheConfig) -> Self {
		match config {
			ArchiveCacheConfig::Unbounded => CachePolicy::Unbounded,
			ArchiveCacheConfig::Lru(capacity) => CachePolicy::Lru(capacity),
		}
	}
}
