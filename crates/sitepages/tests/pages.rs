//! Router-level tests for the page handlers

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use sitepages::core::{ManualClock, RevalidateMode, SettingsFetcher, StaticSettingsFetcher};
use sitepages::error::{ClResult, Error};
use sitepages::types::SiteSettings;
use sitepages::{App, AppBuilder, routes};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use tower::ServiceExt;

/// Settings source that counts calls and can be switched to failing
struct TestFetcher {
	settings: SiteSettings,
	calls: AtomicUsize,
	failing: AtomicBool,
}

impl TestFetcher {
	fn new(value: Value) -> Arc<Self> {
		Arc::new(Self {
			settings: serde_json::from_value(value).unwrap(),
			calls: AtomicUsize::new(0),
			failing: AtomicBool::new(false),
		})
	}
}

#[async_trait]
impl SettingsFetcher for TestFetcher {
	async fn fetch(&self) -> ClResult<SiteSettings> {
		self.calls.fetch_add(1, Ordering::SeqCst);
		if self.failing.load(Ordering::SeqCst) {
			return Err(Error::SettingsFetch("upstream unavailable".into()));
		}
		Ok(self.settings.clone())
	}

	fn source(&self) -> String {
		"test".into()
	}
}

fn build_app(fetcher: Arc<dyn SettingsFetcher>) -> App {
	let mut builder = AppBuilder::new();
	builder.site_name("Fallback Site").settings_fetcher(fetcher);
	builder.build().unwrap()
}

async fn get(app: &App, uri: &str) -> (StatusCode, String) {
	let response = routes::init(app.clone())
		.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
		.await
		.unwrap();
	let status = response.status();
	let body = response.into_body().collect().await.unwrap().to_bytes();
	(status, String::from_utf8(body.to_vec()).unwrap())
}

#[tokio::test]
async fn test_terms_page_falls_back_to_defaults() {
	let app = build_app(Arc::new(StaticSettingsFetcher::new(SiteSettings::default())));

	let (status, body) = get(&app, "/terms").await;
	assert_eq!(status, StatusCode::OK);
	assert!(body.contains("<h1>Terms &amp; Conditions</h1>"));
	assert!(body.contains("legal-document--placeholder"));
	assert!(body.contains("<title>Terms &amp; Conditions | Fallback Site</title>"));
}

#[tokio::test]
async fn test_privacy_page_uses_settings() {
	let fetcher = TestFetcher::new(json!({
		"siteName": "Corner Shop",
		"privacy": { "title": "Privacy at Corner Shop", "content": "We only keep receipts." }
	}));
	let app = build_app(fetcher);

	let (status, body) = get(&app, "/privacy").await;
	assert_eq!(status, StatusCode::OK);
	assert!(body.contains("<h1>Privacy at Corner Shop</h1>"));
	assert!(body.contains("We only keep receipts."));
	assert!(body.contains("Corner Shop</a>"));
}

#[tokio::test]
async fn test_pages_share_one_settings_fetch() {
	let fetcher = TestFetcher::new(json!({ "siteName": "Corner Shop" }));
	let app = build_app(fetcher.clone());

	for uri in ["/terms", "/privacy", "/favourites", "/api/settings", "/terms"] {
		let (status, _) = get(&app, uri).await;
		assert_eq!(status, StatusCode::OK, "{}", uri);
	}
	assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_account_favourites_reexports_favourites() {
	let fetcher = TestFetcher::new(json!({
		"favourites": {
			"title": "Staff picks",
			"items": [
				{ "label": "Flat white", "href": "/menu/flat-white" },
				{ "label": "Croissant", "href": "/menu/croissant" }
			]
		}
	}));
	let app = build_app(fetcher);

	let (status, favourites) = get(&app, "/favourites").await;
	assert_eq!(status, StatusCode::OK);
	assert!(favourites.contains("<h1>Staff picks</h1>"));
	assert!(favourites.contains(r#"<a href="/menu/croissant">Croissant</a>"#));

	let (status, account) = get(&app, "/account/favourites").await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(account, favourites);
}

#[tokio::test]
async fn test_favourites_page_drops_script_links_and_blank_site_name() {
	let fetcher = TestFetcher::new(json!({
		"siteName": " ",
		"favourites": {
			"items": [
				{ "label": "Menu", "href": "/menu" },
				{ "label": "Click me", "href": "javascript:alert(1)" }
			]
		}
	}));
	let app = build_app(fetcher);

	let (status, body) = get(&app, "/favourites").await;
	assert_eq!(status, StatusCode::OK);
	assert!(body.contains(r#"<a href="/menu">Menu</a>"#));
	assert!(!body.contains("javascript:"));
	assert!(!body.contains("Click me"));
	assert!(body.contains("<title>Favourites | Fallback Site</title>"));
}

#[tokio::test]
async fn test_settings_api_returns_record() {
	let fetcher = TestFetcher::new(json!({ "siteName": "Corner Shop", "terms": "Be kind." }));
	let app = build_app(fetcher);

	let (status, body) = get(&app, "/api/settings").await;
	assert_eq!(status, StatusCode::OK);
	let value: Value = serde_json::from_str(&body).unwrap();
	assert_eq!(value, json!({ "siteName": "Corner Shop", "terms": "Be kind." }));
}

#[tokio::test]
async fn test_fetch_failure_surfaces_and_is_retried() {
	let fetcher = TestFetcher::new(json!({ "siteName": "Corner Shop" }));
	fetcher.failing.store(true, Ordering::SeqCst);
	let app = build_app(fetcher.clone());

	// The API reports the failure
	let (status, body) = get(&app, "/api/settings").await;
	assert_eq!(status, StatusCode::BAD_GATEWAY);
	let value: Value = serde_json::from_str(&body).unwrap();
	assert_eq!(value["error"]["code"], "E-SETTINGS-FETCH");

	// Pages still render, with defaults
	let (status, body) = get(&app, "/terms").await;
	assert_eq!(status, StatusCode::OK);
	assert!(body.contains("Fallback Site"));
	assert_eq!(fetcher.calls.load(Ordering::SeqCst), 2);

	// Nothing negative was cached
	fetcher.failing.store(false, Ordering::SeqCst);
	let (status, body) = get(&app, "/terms").await;
	assert_eq!(status, StatusCode::OK);
	assert!(body.contains("Corner Shop"));
	assert_eq!(fetcher.calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_blocking_mode_refetches_after_ttl() {
	let fetcher = TestFetcher::new(json!({ "siteName": "Corner Shop" }));
	let clock = Arc::new(ManualClock::new());
	let mut builder = AppBuilder::new();
	builder
		.settings_fetcher(fetcher.clone())
		.clock(clock.clone())
		.settings_ttl(Duration::from_secs(600))
		.revalidate_mode(RevalidateMode::Blocking);
	let app = builder.build().unwrap();

	get(&app, "/terms").await;
	clock.advance(Duration::from_secs(599));
	get(&app, "/terms").await;
	assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);

	clock.advance(Duration::from_secs(2));
	get(&app, "/terms").await;
	assert_eq!(fetcher.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_health_reports_cache_counters() {
	let app = build_app(Arc::new(StaticSettingsFetcher::new(SiteSettings::default())));
	get(&app, "/terms").await;
	get(&app, "/terms").await;

	let (status, body) = get(&app, "/health").await;
	assert_eq!(status, StatusCode::OK);
	let value: Value = serde_json::from_str(&body).unwrap();
	assert_eq!(value["status"], "ok");
	assert_eq!(value["settings"]["source"], "static");
	assert_eq!(value["settings"]["fetches"], 1);
	assert_eq!(value["settings"]["hits"], 1);
	assert_eq!(value["settings"]["cached"], true);
}

#[tokio::test]
async fn test_unknown_route_is_404() {
	let app = build_app(Arc::new(StaticSettingsFetcher::new(SiteSettings::default())));
	let (status, _) = get(&app, "/nope").await;
	assert_eq!(status, StatusCode::NOT_FOUND);
}

// vim: ts=4
