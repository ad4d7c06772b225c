use super::{ResourceKind, ResourceResult, Route};
use crate::{
	config::Config,
	sources::{ArchiveSources, RemoteTileClient, TileServerSource},
};
use anyhow::{Context, Result, anyhow};
use futures::FutureExt;
use maprender_core::Blob;
use reqwest::Client;
use std::{
	any::Any,
	panic::AssertUnwindSafe,
	path::{Path, PathBuf},
	sync::Arc,
};
use tokio::task::JoinHandle;

/// Routes resource requests to archives, tile servers and asset files.
#[derive(Debug)]
pub struct Dispatcher {
	data_path: PathBuf,
	archives: ArchiveSources,
	tile_server: TileServerSource,
	remote: RemoteTileClient,
}

impl Dispatcher {
	pub fn new(config: &Config) -> Result<Dispatcher> {
		let data_path = config.data_path()?.to_path_buf();
		let client = Client::new();
		let remote = RemoteTileClient::new(client.clone());

		Ok(Dispatcher {
			archives: ArchiveSources::new(&data_path.join("tiles"), config.archive_cache.into(), client),
			tile_server: TileServerSource::new(remote.clone(), config.probe_tilejson),
			remote,
			data_path,
		})
	}

	#[must_use]
	pub fn data_path(&self) -> &Path {
		&self.data_path
	}

	#[must_use]
	pub fn archives(&self) -> &ArchiveSources {
		&self.archives
	}

	pub fn classify(&self, kind: ResourceKind, url: &str) -> Result<Route> {
		Route::classify(kind, url, &self.data_path)
	}

	/// Resolves a request. Errors and panics of the backends become [`ResourceResult::Error`].
	pub async fn resolve(&self, kind: ResourceKind, url: &str) -> ResourceResult {
		log::debug!("map request ({kind}): {url}");

		let result = match AssertUnwindSafe(self.resolve_route(kind, url)).catch_unwind().await {
			Ok(result) => ResourceResult::from(result),
			Err(panic) => ResourceResult::Error(anyhow!("panic while resolving '{url}': {}", panic_message(&*panic))),
		};

		if let ResourceResult::Error(error) = &result {
			log::error!("error while resolving {kind} '{url}': {error:#}");
		}
		result
	}

	async fn resolve_route(&self, kind: ResourceKind, url: &str) -> Result<Option<Blob>> {
		match self.classify(kind, url)? {
			Route::Noop => Ok(None),
			Route::ArchiveTileJson(source) => Ok(Some(self.archives.tilejson(&source).await?.as_blob()?)),
			Route::ArchiveTile(source, address) => self.archives.tile(&source, &address).await,
			Route::TileServerTileJson(template) => Ok(Some(self.tile_server.tilejson(&template).await?)),
			Route::TileServerTile(url) => self.tile_server.tile(&url).await,
			Route::RemoteAsset(url) => Ok(Some(self.remote.get_asset(&url).await?)),
			Route::LocalAsset(path) => {
				log::debug!("get local asset: {path:?}");
				let data = tokio::fs::read(&path)
					.await
					.with_context(|| format!("reading asset {path:?}"))?;
				Ok(Some(Blob::from(data)))
			}
		}
	}

	/// The callback boundary of the rendering engine.
	///
	/// Resolves the request on the tokio runtime and calls `callback(error, data)` exactly once.
	/// An unknown `kind` is logged and the callback is never called; `None` is returned then.
	pub fn request<F>(self: &Arc<Self>, kind: u8, url: &str, callback: F) -> Option<JoinHandle<()>>
	where
		F: FnOnce(Option<anyhow::Error>, Option<Blob>) + Send + 'static,
	{
		let kind = match ResourceKind::try_from(kind) {
			Ok(kind) => kind,
			Err(error) => {
				log::error!("request kind not handled: {error} ({url})");
				return None;
			}
		};

		let dispatcher = Arc::clone(self);
		let url = url.to_string();
		Some(tokio::spawn(async move {
			let (error, data) = dispatcher.resolve(kind, &url).await.into_callback_args();
			callback(error, data);
		}))
	}
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
	if let Some(message) = panic.downcast_ref::<&str>() {
		message
	} else if let Some(message) = panic.downcast_ref::<String>() {
		message
	} else {
		"unknown panic"
	}
}
