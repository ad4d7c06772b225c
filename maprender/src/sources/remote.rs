//! Plain HTTP GETs for tiles and assets hosted on web servers.

use anyhow::{Context, Result, bail};
use maprender_core::Blob;
use reqwest::{Client, Response, StatusCode};

/// Fetches tiles and assets over HTTP. Requests are not retried.
#[derive(Clone, Debug, Default)]
pub struct RemoteTileClient {
	client: Client,
}

impl RemoteTileClient {
	#[must_use]
	pub fn new(client: Client) -> Self {
		RemoteTileClient { client }
	}

	#[must_use]
	pub fn client(&self) -> &Client {
		&self.client
	}

	async fn get(&self, url: &str) -> Result<Response> {
		log::debug!("GET {url}");
		self
			.client
			.get(url)
			.send()
			.await
			.with_context(|| format!("requesting '{url}'"))
	}

	/// Fetches a tile.
	///
	/// `200` is a hit, `204` and `404` are misses. Every other status is an error.
	pub async fn get_tile(&self, url: &str) -> Result<Option<Blob>> {
		let response = self.get(url).await?;
		match response.status() {
			StatusCode::OK => Ok(Some(read_body(response, url).await?)),
			StatusCode::NO_CONTENT => {
				log::debug!("no content for tile '{url}'");
				Ok(None)
			}
			StatusCode::NOT_FOUND => {
				log::warn!("tile not found: '{url}'");
				Ok(None)
			}
			status => bail!("request for tile '{url}' failed with status {status}"),
		}
	}

	/// Fetches a glyph or sprite. Only `200` is a success.
	pub async fn get_asset(&self, url: &str) -> Result<Blob> {
		let response = self.get(url).await?;
		match response.status() {
			StatusCode::OK => read_body(response, url).await,
			status => bail!("request for asset '{url}' failed with status {status}"),
		}
	}

	/// Returns the body of a `200` response and `None` for any other outcome.
	pub async fn get_if_ok(&self, url: &str) -> Option<Blob> {
		match self.get(url).await {
			Ok(response) if response.status() == StatusCode::OK => read_body(response, url).await.ok(),
			Ok(response) => {
				log::debug!("'{url}' answered with status {}", response.status());
				None
			}
			Err(error) => {
				log::debug!("{error:#}");
				None
			}
		}
	}
}

async fn read_body(response: Response, url: &str) -> Result<Blob> {
	let bytes = response
		.bytes()
		.await
		.with_context(|| format!("reading response body of '{url}'"))?;
	Ok(Blob::from(bytes.to_vec()))
}
