//! App builder - constructs and runs the sitepages application

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::pages::LegalDocumentRenderer;
use crate::prelude::*;
use crate::routes;
use crate::templates::TemplateEngine;
use sitepages_core::{CacheOptions, Clock, RevalidateMode, SettingsAccessor, SettingsFetcher};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub struct AppState {
	pub opts: AppBuilderOpts,
	pub settings: Arc<SettingsAccessor>,
	pub templates: Arc<TemplateEngine>,
	pub legal: LegalDocumentRenderer,
}

pub type App = Arc<AppState>;

#[derive(Debug)]
pub struct AppBuilderOpts {
	pub listen: Box<str>,
	/// Shown when the settings carry no site name
	pub site_name: Box<str>,
	pub template_dir: Option<Box<Path>>,
	pub cache: CacheOptions,
}

pub struct AppBuilder {
	opts: AppBuilderOpts,
	fetcher: Option<Arc<dyn SettingsFetcher>>,
	clock: Option<Arc<dyn Clock>>,
}

impl AppBuilder {
	pub fn new() -> Self {
		// Ignore the error when a subscriber is already installed (tests)
		let _ = tracing_subscriber::fmt()
			.with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
			.with_target(false)
			.try_init();
		AppBuilder {
			opts: AppBuilderOpts {
				listen: "127.0.0.1:8080".into(),
				site_name: "sitepages".into(),
				template_dir: None,
				cache: CacheOptions::default(),
			},
			fetcher: None,
			clock: None,
		}
	}

	// Opts
	pub fn listen(&mut self, listen: impl Into<Box<str>>) -> &mut Self {
		self.opts.listen = listen.into();
		self
	}
	pub fn site_name(&mut self, site_name: impl Into<Box<str>>) -> &mut Self {
		self.opts.site_name = site_name.into();
		self
	}
	pub fn template_dir(&mut self, template_dir: impl Into<Box<Path>>) -> &mut Self {
		self.opts.template_dir = Some(template_dir.into());
		self
	}
	pub fn settings_ttl(&mut self, ttl: Duration) -> &mut Self {
		self.opts.cache.ttl = ttl;
		self
	}
	pub fn revalidate_mode(&mut self, mode: RevalidateMode) -> &mut Self {
		self.opts.cache.mode = mode;
		self
	}
	pub fn cache_capacity(&mut self, capacity: usize) -> &mut Self {
		self.opts.cache.capacity = capacity;
		self
	}

	// Collaborators
	pub fn settings_fetcher(&mut self, fetcher: Arc<dyn SettingsFetcher>) -> &mut Self {
		self.fetcher = Some(fetcher);
		self
	}
	pub fn clock(&mut self, clock: Arc<dyn Clock>) -> &mut Self {
		self.clock = Some(clock);
		self
	}

	/// Assemble the app state without binding a listener
	pub fn build(self) -> ClResult<App> {
		let Some(fetcher) = self.fetcher else {
			error!("FATAL: No settings source configured");
			return Err(Error::ConfigError("No settings source configured".to_string()));
		};
		info!("Settings source: {}", fetcher.source());
		info!(
			"Settings cache: ttl={:?}, mode={:?}, capacity={}",
			self.opts.cache.ttl, self.opts.cache.mode, self.opts.cache.capacity
		);

		let settings = Arc::new(match self.clock {
			Some(clock) => SettingsAccessor::with_clock(fetcher, self.opts.cache.clone(), clock),
			None => SettingsAccessor::new(fetcher, self.opts.cache.clone()),
		});

		let templates =
			Arc::new(TemplateEngine::with_overrides(self.opts.template_dir.as_deref())?);

		let legal = LegalDocumentRenderer::new(
			settings.clone(),
			templates.clone(),
			self.opts.site_name.clone(),
		);

		Ok(Arc::new(AppState { opts: self.opts, settings, templates, legal }))
	}

	pub async fn run(self) -> ClResult<()> {
		info!("sitepages V{}", VERSION);

		let app = self.build()?;

		// Warm the cache; pages fall back to defaults if this fails
		match app.settings.get_site_settings().await {
			Ok(settings) => info!(
				"Site settings loaded ({} entries)",
				settings.entries.len() + usize::from(settings.site_name.is_some())
			),
			Err(e) => warn!("Initial settings fetch failed: {}", e),
		}

		let router = routes::init(app.clone());
		let listener = tokio::net::TcpListener::bind(app.opts.listen.as_ref()).await.map_err(|e| {
			error!("FATAL: Cannot listen on {}: {}", app.opts.listen, e);
			Error::from(e)
		})?;
		info!("Listening on HTTP {}", app.opts.listen);

		axum::serve(listener, router).with_graceful_shutdown(shutdown_signal()).await?;

		info!("Shut down");
		Ok(())
	}
}

impl Default for AppBuilder {
	fn default() -> Self {
		Self::new()
	}
}

async fn shutdown_signal() {
	if let Err(e) = tokio::signal::ctrl_c().await {
		error!("Cannot listen for shutdown signal: {}", e);
		std::future::pending::<()>().await;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use sitepages_core::StaticSettingsFetcher;

	#[test]
	fn test_build_requires_settings_source() {
		let err = AppBuilder::new().build().err().unwrap();
		assert!(matches!(err, Error::ConfigError(_)));
	}

	#[test]
	fn test_builder_options() {
		let mut builder = AppBuilder::new();
		builder
			.listen("0.0.0.0:9000")
			.site_name("Corner Shop")
			.settings_ttl(Duration::from_secs(30))
			.revalidate_mode(RevalidateMode::Blocking)
			.settings_fetcher(Arc::new(StaticSettingsFetcher::new(SiteSettings::default())));
		let app = builder.build().unwrap();

		assert_eq!(&*app.opts.listen, "0.0.0.0:9000");
		assert_eq!(&*app.opts.site_name, "Corner Shop");
		assert_eq!(app.opts.cache.ttl, Duration::from_secs(30));
		assert_eq!(app.opts.cache.mode, RevalidateMode::Blocking);
		assert_eq!(app.settings.source(), "static");
	}
}

// vim: ts=4
