//! Route table

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use crate::pages::{account, api, favourites, legal};
use crate::prelude::*;

pub fn init(app: App) -> Router {
	Router::new()
		// Legal documents
		.route("/terms", get(legal::terms))
		.route("/privacy", get(legal::privacy))
		// Favourites
		.route("/favourites", get(favourites::favourites))
		.route("/account/favourites", get(account::favourites))
		// API
		.route("/api/settings", get(api::get_settings))
		.route("/health", get(api::health))
		.layer(TraceLayer::new_for_http())
		.with_state(app)
}

// vim: ts=4
