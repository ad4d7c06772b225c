//! Reads byte ranges of an HTTP(S)-hosted file with `Range` requests.
//!
//! Every call issues exactly one request. The server must answer `206 Partial Content` with a
//! `Content-Range` matching the requested range; anything else is an error and is not retried.

use super::DataReaderTrait;
use crate::{Blob, ByteRange};
use anyhow::{Context, Result, anyhow, bail, ensure};
use async_trait::async_trait;
use regex::{Regex, RegexBuilder};
use reqwest::{Client, StatusCode, Url, header};
use std::sync::LazyLock;

#[derive(Debug)]
pub struct DataReaderHttp {
	client: Client,
	name: String,
	url: Url,
}

static RE_RANGE: LazyLock<Regex> = LazyLock::new(|| {
	RegexBuilder::new(r"^bytes (\d+)-(\d+)/(?:\d+|\*)$")
		.case_insensitive(true)
		.build()
		.expect("content-range regex is valid")
});

impl DataReaderHttp {
	pub fn from_url(url: Url) -> Result<Box<DataReaderHttp>> {
		Self::from_url_with_client(url, Client::new())
	}

	/// Creates a reader sharing an existing connection pool.
	pub fn from_url_with_client(url: Url, client: Client) -> Result<Box<DataReaderHttp>> {
		match url.scheme() {
			"http" | "https" => (),
			other => bail!("unsupported URL scheme '{other}' in '{url}', expected 'http' or 'https'"),
		}

		Ok(Box::new(DataReaderHttp {
			client,
			name: url.to_string(),
			url,
		}))
	}
}

#[async_trait]
impl DataReaderTrait for DataReaderHttp {
	async fn read_range(&self, range: &ByteRange) -> Result<Blob> {
		ensure!(range.length > 0, "cannot request an empty range from '{}'", self.url);
		let expected_end = range.offset + range.length - 1;

		let response = self
			.client
			.get(self.url.clone())
			.header(header::RANGE, format!("bytes={}-{expected_end}", range.offset))
			.send()
			.await
			.with_context(|| format!("requesting range {range} from '{}'", self.url))?;

		if response.status() != StatusCode::PARTIAL_CONTENT {
			bail!(
				"expected HTTP 206 (Partial Content) for range {range} of '{}', got {}",
				self.url,
				response.status()
			);
		}

		let content_range = response
			.headers()
			.get(header::CONTENT_RANGE)
			.ok_or_else(|| anyhow!("response for '{}' is missing the Content-Range header", self.url))?
			.to_str()?
			.to_string();

		let caps = RE_RANGE.captures(&content_range).ok_or_else(|| {
			anyhow!("unexpected Content-Range format: '{content_range}', expected 'bytes <start>-<end>/<total>'")
		})?;
		let start: u64 = caps[1].parse()?;
		let end: u64 = caps[2].parse()?;

		ensure!(
			start == range.offset,
			"Content-Range start mismatch: expected {}, got {start}",
			range.offset
		);
		ensure!(
			end == expected_end,
			"Content-Range end mismatch: expected {expected_end}, got {end}"
		);

		let bytes = response
			.bytes()
			.await
			.with_context(|| format!("reading body of range {range} from '{}'", self.url))?;
		ensure!(
			bytes.len() as u64 == range.length,
			"expected {} bytes from '{}', received {}",
			range.length,
			self.url,
			bytes.len()
		);

		Ok(Blob::from(&*bytes))
	}

	fn get_name(&self) -> &str {
		&self.name
	}
}
