//! JSON endpoints

use axum::Json;
use axum::extract::State;

use crate::app::VERSION;
use crate::prelude::*;

/// GET /api/settings - current site settings record
pub async fn get_settings(State(app): State<App>) -> ClResult<Json<SiteSettings>> {
	let settings = app.settings.get_site_settings().await?;
	Ok(Json(SiteSettings::clone(&settings)))
}

/// GET /health - liveness plus settings cache counters
pub async fn health(State(app): State<App>) -> Json<serde_json::Value> {
	let stats = app.settings.stats();
	Json(serde_json::json!({
		"status": "ok",
		"version": VERSION,
		"settings": {
			"source": app.settings.source(),
			"cached": app.settings.cached().is_some(),
			"hits": stats.hits,
			"staleHits": stats.stale_hits,
			"misses": stats.misses,
			"fetches": stats.fetches,
			"failures": stats.failures,
		}
	}))
}

// vim: ts=4
