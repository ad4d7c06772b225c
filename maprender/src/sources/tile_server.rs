//! Sources backed by a remote tile server with a templated URL like
//! `https://example.org/tiles/{z}/{x}/{y}.pbf`.

use super::RemoteTileClient;
use anyhow::{Result, bail, ensure};
use maprender_core::{Blob, TILEJSON_VERSION, TileJSON, WEB_MERCATOR_BOUNDS};

/// Serves TileJSON and tiles of vector tile servers.
#[derive(Clone, Debug)]
pub struct TileServerSource {
	client: RemoteTileClient,
	probe_tilejson: bool,
}

impl TileServerSource {
	#[must_use]
	pub fn new(client: RemoteTileClient, probe_tilejson: bool) -> Self {
		TileServerSource { client, probe_tilejson }
	}

	/// Returns the TileJSON of a template.
	///
	/// With probing enabled, a TileJSON published as `<base>.json` next to the template is
	/// returned unchanged. Otherwise a document covering the whole world is synthesized.
	pub async fn tilejson(&self, template: &str) -> Result<Blob> {
		validate_template(template)?;

		if self.probe_tilejson {
			if let Some(url) = sibling_tilejson_url(template) {
				if let Some(blob) = self.client.get_if_ok(&url).await {
					log::debug!("using TileJSON published at '{url}'");
					return Ok(blob);
				}
			}
		}

		synthesize_tilejson(template).as_blob()
	}

	pub async fn tile(&self, url: &str) -> Result<Option<Blob>> {
		self.client.get_tile(url).await
	}
}

/// Checks that a template has all placeholders and points at vector tiles.
pub fn validate_template(template: &str) -> Result<()> {
	for placeholder in ["{z}", "{x}", "{y}"] {
		ensure!(
			template.contains(placeholder),
			"tile URL template '{template}' is missing the {placeholder} placeholder"
		);
	}

	let after_y = template.rsplit_once("{y}").map_or("", |(_, rest)| rest);
	let extension = after_y
		.strip_prefix('.')
		.map(|rest| rest.split(['?', '#']).next().unwrap_or(rest));
	match extension {
		Some("pbf" | "mvt") => Ok(()),
		_ => bail!("tile URL template '{template}' must point at vector tiles (.pbf or .mvt)"),
	}
}

/// The URL of a TileJSON published next to the template: everything before `/{z}` plus `.json`.
#[must_use]
pub fn sibling_tilejson_url(template: &str) -> Option<String> {
	let (base, _) = template.split_once("/{z}")?;
	Some(format!("{base}.json"))
}

#[must_use]
pub fn synthesize_tilejson(template: &str) -> TileJSON {
	TileJSON {
		tilejson: TILEJSON_VERSION.to_string(),
		tiles: vec![template.to_string()],
		minzoom: 0,
		maxzoom: 14,
		center: [0.0, 0.0, 0.0],
		bounds: WEB_MERCATOR_BOUNDS,
		format: Some(String::from("pbf")),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use axum::{Router, routing::get};
	use pretty_assertions::assert_eq;
	use rstest::rstest;
	use tokio::net::TcpListener;

	#[rstest]
	#[case("https://t.example/{z}/{x}/{y}.pbf")]
	#[case("https://t.example/v1/{z}/{x}/{y}.mvt?key=abc")]
	fn valid_templates(#[case] template: &str) {
		validate_template(template).unwrap();
	}

	#[rstest]
	#[case("https://t.example/{z}/{x}.pbf", "{y}")]
	#[case("https://t.example/{x}/{y}.pbf", "{z}")]
	#[case("https://t.example/{z}/{x}/{y}.png", "vector tiles")]
	#[case("https://t.example/{z}/{x}/{y}", "vector tiles")]
	fn invalid_templates(#[case] template: &str, #[case] message: &str) {
		let error = validate_template(template).unwrap_err().to_string();
		assert!(error.contains(message), "{error}");
	}

	#[test]
	fn sibling_url() {
		assert_eq!(
			sibling_tilejson_url("https://t.example/osm/{z}/{x}/{y}.pbf").as_deref(),
			Some("https://t.example/osm.json")
		);
		assert_eq!(sibling_tilejson_url("https://t.example/{x}/{z}.pbf"), None);
	}

	#[tokio::test]
	async fn synthesizes_without_probe() -> Result<()> {
		let source = TileServerSource::new(RemoteTileClient::default(), false);
		let template = "http://127.0.0.1:9/tiles/{z}/{x}/{y}.pbf";
		let tilejson = TileJSON::from_blob(&source.tilejson(template).await?)?;

		assert_eq!(tilejson, synthesize_tilejson(template));
		assert_eq!(
			serde_json::to_value(&tilejson)?,
			serde_json::json!({
				"tilejson": "1.0.0",
				"tiles": [template],
				"minzoom": 0,
				"maxzoom": 14,
				"center": [0.0, 0.0, 0.0],
				"bounds": [-180.0, -85.051129, 180.0, 85.051129],
				"format": "pbf"
			})
		);
		Ok(())
	}

	#[tokio::test]
	async fn forwards_published_tilejson() -> Result<()> {
		let app = Router::new().route("/osm.json", get(|| async { r#"{"tilejson":"3.0.0"}"# }));
		let listener = TcpListener::bind("127.0.0.1:0").await?;
		let base = format!("http://{}", listener.local_addr()?);
		tokio::spawn(async move { axum::serve(listener, app).await });

		let source = TileServerSource::new(RemoteTileClient::default(), true);
		let blob = source.tilejson(&format!("{base}/osm/{{z}}/{{x}}/{{y}}.pbf")).await?;
		assert_eq!(blob.as_str(), r#"{"tilejson":"3.0.0"}"#);

		let template = format!("{base}/other/{{z}}/{{x}}/{{y}}.pbf");
		let tilejson = TileJSON::from_blob(&source.tilejson(&template).await?)?;
		assert_eq!(tilejson, synthesize_tilejson(&template));
		Ok(())
	}

	#[tokio::test]
	async fn invalid_template_fails_before_any_request() {
		let source = TileServerSource::new(RemoteTileClient::default(), true);
		assert!(source.tilejson("http://127.0.0.1:9/{z}/{x}/{y}.png").await.is_err());
	}
}
