//! Settings record and document types

use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Site-wide settings record
///
/// Only `site_name` is interpreted directly. Every other top-level key is kept
/// as-is, so pages can look up their own entries (e.g. `terms`, `privacy`)
/// without this type knowing about them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteSettings {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub site_name: Option<String>,

	#[serde(flatten)]
	pub entries: serde_json::Map<String, serde_json::Value>,
}

impl SiteSettings {
	/// Configured site name, unless it is blank
	pub fn display_name(&self) -> Option<&str> {
		self.site_name.as_deref().filter(|name| !name.trim().is_empty())
	}

	/// Look up a document-like entry
	///
	/// A bare string entry is taken as the document content. Objects are read
	/// as `{ "title": ..., "content": ... }`. Anything else counts as missing.
	pub fn document(&self, key: &str) -> Option<LegalDocument> {
		match self.entries.get(key)? {
			serde_json::Value::String(content) => {
				Some(LegalDocument { title: None, content: Some(content.clone()) })
			}
			value @ serde_json::Value::Object(_) => {
				serde_json::from_value::<LegalDocument>(value.clone()).ok()
			}
			_ => None,
		}
	}
}

/// Admin-configurable title/text pair stored under a settings key
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegalDocument {
	#[serde(default)]
	pub title: Option<String>,
	#[serde(default, alias = "body")]
	pub content: Option<String>,
}

/// Static per-page configuration of a legal document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegalDocumentConfig {
	pub setting_key: Cow<'static, str>,
	pub default_title: Cow<'static, str>,
	pub default_fallback_message: Cow<'static, str>,
}

impl LegalDocumentConfig {
	pub const fn new(
		setting_key: &'static str,
		default_title: &'static str,
		default_fallback_message: &'static str,
	) -> Self {
		Self {
			setting_key: Cow::Borrowed(setting_key),
			default_title: Cow::Borrowed(default_title),
			default_fallback_message: Cow::Borrowed(default_fallback_message),
		}
	}
}

/// A legal document after applying the page defaults
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedDocument {
	pub title: String,
	pub body: String,
	pub title_is_fallback: bool,
	pub body_is_fallback: bool,
}

fn non_blank(value: Option<String>) -> Option<String> {
	value.filter(|s| !s.trim().is_empty())
}

impl ResolvedDocument {
	/// Resolve a page configuration against a settings record
	pub fn resolve(config: &LegalDocumentConfig, settings: &SiteSettings) -> Self {
		let doc = settings.document(&config.setting_key).unwrap_or_default();
		Self::from_parts(config, doc)
	}

	/// Document made only of the page defaults
	pub fn fallback(config: &LegalDocumentConfig) -> Self {
		Self::from_parts(config, LegalDocument::default())
	}

	fn from_parts(config: &LegalDocumentConfig, doc: LegalDocument) -> Self {
		let title = non_blank(doc.title);
		let body = non_blank(doc.content);
		Self {
			title_is_fallback: title.is_none(),
			body_is_fallback: body.is_none(),
			title: title.unwrap_or_else(|| config.default_title.to_string()),
			body: body.unwrap_or_else(|| config.default_fallback_message.to_string()),
		}
	}

	pub fn is_fallback(&self) -> bool {
		self.title_is_fallback && self.body_is_fallback
	}
}


// vim: ts=4
