//! Favourites page
//!
//! Lists the links configured under the `favourites` settings entry. The same
//! handler is mounted under the account area (see `pages::account`).

use axum::extract::State;
use axum::response::Html;
use serde::{Deserialize, Serialize};

use crate::prelude::*;

pub const FAVOURITES_KEY: &str = "favourites";
const DEFAULT_TITLE: &str = "Favourites";
const EMPTY_MESSAGE: &str = "Nothing here yet.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavouriteItem {
	pub label: String,
	pub href: String,
}

#[derive(Debug, Default, Deserialize)]
struct FavouritesEntry {
	#[serde(default)]
	title: Option<String>,
	#[serde(default)]
	items: Vec<FavouriteItem>,
}

/// Relative links and http(s) URLs only
fn is_safe_href(href: &str) -> bool {
	if href.is_empty() || href.chars().any(|c| c.is_control() || c.is_whitespace()) {
		return false;
	}
	// A scheme ends at the first ':' that comes before any '/', '?' or '#'
	match href.find([':', '/', '?', '#']) {
		Some(i) if href[i..].starts_with(':') => {
			let scheme = &href[..i];
			scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("https")
		}
		_ => true,
	}
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavouritesView {
	pub title: String,
	pub items: Vec<FavouriteItem>,
	pub empty_message: &'static str,
}

impl FavouritesView {
	/// Read the favourites entry; a missing or malformed entry gives an empty list
	pub fn from_settings(settings: &SiteSettings) -> Self {
		let entry = match settings.entries.get(FAVOURITES_KEY) {
			Some(value) => serde_json::from_value::<FavouritesEntry>(value.clone())
				.inspect_err(|e| warn!("Ignoring malformed '{}' entry: {}", FAVOURITES_KEY, e))
				.unwrap_or_default(),
			None => FavouritesEntry::default(),
		};
		Self {
			title: entry
				.title
				.filter(|t| !t.trim().is_empty())
				.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
			items: entry
				.items
				.into_iter()
				.filter(|item| {
					let safe = is_safe_href(&item.href);
					if !safe {
						warn!("Dropping favourite '{}' with unsupported link", item.label);
					}
					safe
				})
				.collect(),
			empty_message: EMPTY_MESSAGE,
		}
	}

	fn empty() -> Self {
		Self::from_settings(&SiteSettings::default())
	}
}

pub async fn favourites(State(app): State<App>) -> ClResult<Html<String>> {
	let (view, site_name) = match app.settings.get_site_settings().await {
		Ok(settings) => {
			(FavouritesView::from_settings(&settings), settings.display_name().map(str::to_string))
		}
		Err(e) => {
			warn!("Rendering favourites without settings: {}", e);
			(FavouritesView::empty(), None)
		}
	};
	let site_name = site_name.as_deref().unwrap_or(&app.opts.site_name);

	Ok(Html(app.templates.render_page("favourites", &view.title, site_name, &view)?))
}


// vim: ts=4
