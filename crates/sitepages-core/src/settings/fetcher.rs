//! Settings sources
//!
//! A `SettingsFetcher` delivers one complete `SiteSettings` record per call.
//! Fetchers do not retry; every failure is reported as `Error::SettingsFetch`.

use async_trait::async_trait;
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::Bytes;
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::prelude::*;

#[async_trait]
pub trait SettingsFetcher: Send + Sync {
	async fn fetch(&self) -> ClResult<SiteSettings>;

	/// Human-readable description of the source, for logs
	fn source(&self) -> String;
}

/// Largest settings document accepted from an HTTP source
pub const MAX_SETTINGS_BODY_SIZE: usize = 1024 * 1024;

type HttpClient = Client<HttpsConnector<HttpConnector>, Full<Bytes>>;

/// Reads the settings document from an HTTP(S) endpoint returning JSON
pub struct HttpSettingsFetcher {
	client: HttpClient,
	url: hyper::Uri,
	timeout: Option<Duration>,
}

impl HttpSettingsFetcher {
	pub fn new(url: &str) -> ClResult<Self> {
		let url: hyper::Uri = url
			.parse()
			.map_err(|e| Error::ConfigError(format!("Invalid settings URL '{}': {}", url, e)))?;

		let builder = match HttpsConnectorBuilder::new().with_native_roots() {
			Ok(builder) => builder,
			Err(e) => {
				warn!("No native root certificates ({}), using bundled roots", e);
				HttpsConnectorBuilder::new().with_webpki_roots()
			}
		};
		let connector = builder.https_or_http().enable_http1().build();
		let client = Client::builder(TokioExecutor::new()).build(connector);

		Ok(Self { client, url, timeout: None })
	}

	pub fn with_timeout(mut self, timeout: Duration) -> Self {
		self.timeout = Some(timeout);
		self
	}

	async fn request(&self) -> ClResult<SiteSettings> {
		let request = hyper::Request::builder()
			.method(hyper::Method::GET)
			.uri(self.url.clone())
			.header(hyper::header::ACCEPT, "application/json")
			.body(Full::default())
			.map_err(|e| Error::Internal(format!("Request build error: {}", e)))?;

		let response = self
			.client
			.request(request)
			.await
			.map_err(|e| Error::SettingsFetch(format!("Network error: {}", e)))?;

		let status = response.status();
		if !status.is_success() {
			return Err(Error::SettingsFetch(format!("HTTP {} from {}", status, self.url)));
		}

		let body = Limited::new(response.into_body(), MAX_SETTINGS_BODY_SIZE)
			.collect()
			.await
			.map_err(|e| {
				if e.downcast_ref::<LengthLimitError>().is_some() {
					Error::SettingsFetch(format!(
						"Settings document from {} exceeds {} bytes",
						self.url, MAX_SETTINGS_BODY_SIZE
					))
				} else {
					Error::SettingsFetch(format!("Failed to read response body: {}", e))
				}
			})?
			.to_bytes();

		serde_json::from_slice(&body)
			.map_err(|e| Error::SettingsFetch(format!("Invalid settings document: {}", e)))
	}
}

#[async_trait]
impl SettingsFetcher for HttpSettingsFetcher {
	async fn fetch(&self) -> ClResult<SiteSettings> {
		match self.timeout {
			Some(timeout) => tokio::time::timeout(timeout, self.request()).await.map_err(|_| {
				Error::SettingsFetch(format!("Timed out after {:?} fetching {}", timeout, self.url))
			})?,
			None => self.request().await,
		}
	}

	fn source(&self) -> String {
		self.url.to_string()
	}
}

/// Reads the settings document from a local JSON or YAML file
pub struct FileSettingsFetcher {
	path: PathBuf,
}

impl FileSettingsFetcher {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	fn is_yaml(path: &Path) -> bool {
		path.extension()
			.and_then(|ext| ext.to_str())
			.is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
	}
}

#[async_trait]
impl SettingsFetcher for FileSettingsFetcher {
	async fn fetch(&self) -> ClResult<SiteSettings> {
		let content = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
			Error::SettingsFetch(format!("Cannot read {}: {}", self.path.display(), e))
		})?;

		if Self::is_yaml(&self.path) {
			serde_yaml::from_str(&content).map_err(|e| {
				Error::SettingsFetch(format!("Invalid YAML in {}: {}", self.path.display(), e))
			})
		} else {
			serde_json::from_str(&content).map_err(|e| {
				Error::SettingsFetch(format!("Invalid JSON in {}: {}", self.path.display(), e))
			})
		}
	}

	fn source(&self) -> String {
		format!("file:{}", self.path.display())
	}
}

/// Always returns the same record
pub struct StaticSettingsFetcher {
	settings: SiteSettings,
}

impl StaticSettingsFetcher {
	pub fn new(settings: SiteSettings) -> Self {
		Self { settings }
	}
}

#[async_trait]
impl SettingsFetcher for StaticSettingsFetcher {
	async fn fetch(&self) -> ClResult<SiteSettings> {
		Ok(self.settings.clone())
	}

	fn source(&self) -> String {
		"static".to_string()
	}
}


// vim: ts=4
