//! A keyed cache of opened archive handles.
//!
//! Handles are keyed by their locator (resolved file path or remote URL). Opening runs outside
//! the lock, so two concurrent first requests for the same locator may both open a handle; the
//! one inserted first is kept and returned to both callers.
//!
//! ```rust
//! use maprender_container::{ArchiveHandleCache, CachePolicy};
//! use std::sync::Arc;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let cache: ArchiveHandleCache<String> = ArchiveHandleCache::new(CachePolicy::Unbounded);
//!     let a = cache.get_or_open("/tiles/osm.pmtiles", || async { Ok::<_, anyhow::Error>(Arc::new(String::from("handle"))) }).await?;
//!     let b = cache
//!         .get_or_open("/tiles/osm.pmtiles", || async { Err::<Arc<String>, _>(anyhow::anyhow!("not opened twice")) })
//!         .await?;
//!     assert!(Arc::ptr_eq(&a, &b));
//!     Ok(())
//! }
//! ```

use anyhow::Result;
use lru::LruCache;
use parking_lot::Mutex;
use std::{fmt, future::Future, num::NonZeroUsize, sync::Arc};

/// An unbounded cache logs a warning once it holds this many handles.
pub const UNBOUNDED_WARN_THRESHOLD: usize = 1024;

/// How many handles a cache keeps.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CachePolicy {
	/// Handles stay open for the lifetime of the cache, or until [`ArchiveHandleCache::clear`].
	#[default]
	Unbounded,
	/// At most this many handles; the least recently used one is dropped first.
	Lru(NonZeroUsize),
}

pub struct ArchiveHandleCache<V: ?Sized> {
	policy: CachePolicy,
	entries: Mutex<LruCache<String, Arc<V>>>,
}

impl<V: ?Sized> ArchiveHandleCache<V> {
	#[must_use]
	pub fn new(policy: CachePolicy) -> Self {
		let entries = match policy {
			CachePolicy::Unbounded => LruCache::unbounded(),
			CachePolicy::Lru(capacity) => LruCache::new(capacity),
		};
		ArchiveHandleCache {
			policy,
			entries: Mutex::new(entries),
		}
	}

	#[must_use]
	pub fn policy(&self) -> CachePolicy {
		self.policy
	}

	/// Returns the cached handle for `key` and marks it as recently used.
	pub fn get(&self, key: &str) -> Option<Arc<V>> {
		self.entries.lock().get(key).cloned()
	}

	/// Returns the cached handle for `key`, opening and caching it on first use.
	///
	/// A failed `open` caches nothing, so the next request tries again.
	pub async fn get_or_open<F, Fut>(&self, key: &str, open: F) -> Result<Arc<V>>
	where
		F: FnOnce() -> Fut,
		Fut: Future<Output = Result<Arc<V>>>,
	{
		if let Some(handle) = self.get(key) {
			return Ok(handle);
		}

		log::debug!("opening archive handle for '{key}'");
		let handle = open().await?;

		let mut entries = self.entries.lock();
		if let Some(existing) = entries.get(key) {
			log::trace!("handle for '{key}' was opened concurrently, keeping the first one");
			return Ok(existing.clone());
		}
		if let Some((evicted, _)) = entries.push(key.to_string(), handle.clone()) {
			log::debug!("evicted archive handle for '{evicted}'");
		}
		if self.policy == CachePolicy::Unbounded && entries.len() == UNBOUNDED_WARN_THRESHOLD {
			log::warn!(
				"archive handle cache holds {UNBOUNDED_WARN_THRESHOLD} open handles and is not bounded, consider an LRU capacity"
			);
		}
		Ok(handle)
	}

	/// Drops every cached handle.
	pub fn clear(&self) {
		let mut entries = self.entries.lock();
		log::debug!("clearing {} archive handles", entries.len());
		entries.clear();
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.entries.lock().len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.entries.lock().is_empty()
	}
}

impl<V: ?Sized> Default for ArchiveHandleCache<V> {
	fn default() -> Self {
		Self::new(CachePolicy::Unbounded)
	}
}

impl<V: ?Sized> fmt::Debug for ArchiveHandleCache<V> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ArchiveHandleCache")
			.field("policy", &self.policy)
			.field("len", &self.len())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use anyhow::anyhow;
	use std::sync::atomic::{AtomicUsize, Ordering};

	async fn open_counted(counter: &AtomicUsize, value: &str) -> Result<Arc<String>> {
		counter.fetch_add(1, Ordering::SeqCst);
		Ok(Arc::new(value.to_string()))
	}

	#[tokio::test]
	async fn opens_each_locator_once() -> Result<()> {
		let cache: ArchiveHandleCache<String> = ArchiveHandleCache::default();
		let counter = AtomicUsize::new(0);

		let a1 = cache.get_or_open("a", || open_counted(&counter, "A")).await?;
		let a2 = cache.get_or_open("a", || open_counted(&counter, "A")).await?;
		let b = cache.get_or_open("b", || open_counted(&counter, "B")).await?;

		assert!(Arc::ptr_eq(&a1, &a2));
		assert_eq!(*b, "B");
		assert_eq!(counter.load(Ordering::SeqCst), 2);
		assert_eq!(cache.len(), 2);
		Ok(())
	}

	#[tokio::test]
	async fn failed_open_is_not_cached() -> Result<()> {
		let cache: ArchiveHandleCache<String> = ArchiveHandleCache::default();
		let result = cache
			.get_or_open("a", || async { Err::<Arc<String>, _>(anyhow!("missing file")) })
			.await;
		assert!(result.is_err());
		assert!(cache.is_empty());

		cache.get_or_open("a", || async { Ok::<_, anyhow::Error>(Arc::new(String::from("A"))) }).await?;
		assert_eq!(cache.len(), 1);
		Ok(())
	}

	#[tokio::test]
	async fn concurrent_first_references_keep_one_handle() -> Result<()> {
		let cache: ArchiveHandleCache<String> = ArchiveHandleCache::default();
		let (first, second) = futures::join!(
			cache.get_or_open("a", || async {
				tokio::task::yield_now().await;
				Ok::<_, anyhow::Error>(Arc::new(String::from("first")))
			}),
			cache.get_or_open("a", || async {
				tokio::task::yield_now().await;
				tokio::task::yield_now().await;
				Ok::<_, anyhow::Error>(Arc::new(String::from("second")))
			}),
		);
		let (first, second) = (first?, second?);
		assert!(Arc::ptr_eq(&first, &second));
		assert_eq!(*first, "first");
		assert_eq!(cache.len(), 1);
		Ok(())
	}

	#[tokio::test]
	async fn lru_policy_evicts_least_recently_used() -> Result<()> {
		let cache: ArchiveHandleCache<String> =
			ArchiveHandleCache::new(CachePolicy::Lru(NonZeroUsize::new(2).unwrap()));
		let counter = AtomicUsize::new(0);

		cache.get_or_open("a", || open_counted(&counter, "A")).await?;
		cache.get_or_open("b", || open_counted(&counter, "B")).await?;
		assert!(cache.get("a").is_some());
		cache.get_or_open("c", || open_counted(&counter, "C")).await?;

		assert_eq!(cache.len(), 2);
		assert!(cache.get("b").is_none());
		assert!(cache.get("a").is_some());
		assert!(cache.get("c").is_some());
		Ok(())
	}

	#[tokio::test]
	async fn clear_drops_everything() -> Result<()> {
		let cache: ArchiveHandleCache<String> = ArchiveHandleCache::default();
		let counter = AtomicUsize::new(0);
		cache.get_or_open("a", || open_counted(&counter, "A")).await?;
		cache.clear();
		assert!(cache.is_empty());

		cache.get_or_open("a", || open_counted(&counter, "A")).await?;
		assert_eq!(counter.load(Ordering::SeqCst), 2);
		assert_eq!(format!("{cache:?}"), "ArchiveHandleCache { policy: Unbounded, len: 1 }");
		Ok(())
	}
}
