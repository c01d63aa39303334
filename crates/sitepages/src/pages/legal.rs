//! Legal document pages
//!
//! Every legal page is the same component configured with a settings key and
//! its defaults. The text comes from the site settings entry under that key;
//! until an admin fills it in, the defaults are shown.

use axum::extract::State;
use axum::response::Html;
use serde::Serialize;
use std::sync::Arc;

use crate::prelude::*;
use crate::templates::TemplateEngine;
use sitepages_core::SettingsAccessor;

pub const TERMS: LegalDocumentConfig = LegalDocumentConfig::new(
	"terms",
	"Terms & Conditions",
	"Our terms and conditions have not been published yet. Please check back soon.",
);

pub const PRIVACY: LegalDocumentConfig = LegalDocumentConfig::new(
	"privacy",
	"Privacy Policy",
	"Our privacy policy has not been published yet. Please check back soon.",
);

#[derive(Serialize)]
struct LegalVars<'a> {
	document: &'a ResolvedDocument,
}

pub struct LegalDocumentRenderer {
	settings: Arc<SettingsAccessor>,
	templates: Arc<TemplateEngine>,
	default_site_name: Box<str>,
}

impl LegalDocumentRenderer {
	pub fn new(
		settings: Arc<SettingsAccessor>,
		templates: Arc<TemplateEngine>,
		default_site_name: impl Into<Box<str>>,
	) -> Self {
		Self { settings, templates, default_site_name: default_site_name.into() }
	}

	/// Resolve the document against the current site settings
	pub async fn resolve(&self, config: &LegalDocumentConfig) -> ClResult<ResolvedDocument> {
		let settings = self.settings.get_site_settings().await?;
		Ok(ResolvedDocument::resolve(config, &settings))
	}

	/// Render the full page
	///
	/// If the settings cannot be fetched the page still renders, showing the
	/// configured defaults.
	pub async fn render(&self, config: &LegalDocumentConfig) -> ClResult<String> {
		let (document, settings) = match self.settings.get_site_settings().await {
			Ok(settings) => (ResolvedDocument::resolve(config, &settings), Some(settings)),
			Err(e) => {
				warn!("Rendering '{}' with defaults: {}", config.setting_key, e);
				(ResolvedDocument::fallback(config), None)
			}
		};
		let site_name = settings
			.as_deref()
			.and_then(SiteSettings::display_name)
			.unwrap_or(&self.default_site_name);

		self.templates.render_page("legal", &document.title, site_name, &LegalVars {
			document: &document,
		})
	}
}

pub async fn terms(State(app): State<App>) -> ClResult<Html<String>> {
	Ok(Html(app.legal.render(&TERMS).await?))
}

pub async fn privacy(State(app): State<App>) -> ClResult<Html<String>> {
	Ok(Html(app.legal.render(&PRIVACY).await?))
}


// vim: ts=4
