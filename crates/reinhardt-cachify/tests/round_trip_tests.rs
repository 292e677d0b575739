//! End-to-end cache busting tests against an on-disk asset root


use fixtures::{FileServer, md5_hex, static_dir};
use reinhardt_cachify::cache::CacheEntry;
use reinhardt_cachify::handler::{Handler, MiddlewareChain, Request};
use reinhardt_cachify::{CACHE_CONTROL_VALUE, Cachify, CachifyConfig};
use rstest::rstest;
use std::sync::Arc;

fn production_config(root: std::path::PathBuf) -> CachifyConfig {
	CachifyConfig::new(root)
		.with_js_bundle(
			"/app.js",
			vec!["/js/a.js".to_string(), "/js/b.js".to_string()],
		)
		.with_css_bundle("/app.css", vec!["/css/reset.css".to_string()])
}

#[rstest]
#[tokio::test]
async fn test_hashed_url_round_trip() {
	let temp_dir = static_dir();
	let root = temp_dir.static_root();
	let cachify = Cachify::new(production_config(root.clone())).unwrap();
	let server = Arc::new(FileServer::new(root));
	let chain = MiddlewareChain::new(server.clone()).with_middleware(cachify.middleware());

	let url = cachify.tags().cachify("/js/a.js").await;
	assert_eq!(url, format!("/{}/js/a.js", md5_hex(b"console.log('a');")));

	let response = chain.handle(Request::get(&url).unwrap()).await.unwrap();

	assert_eq!(response.status, 200);
	assert_eq!(response.body, "console.log('a');");
	assert_eq!(response.headers["cache-control"], CACHE_CONTROL_VALUE);
	assert_eq!(*server.requested.lock().unwrap(), vec!["/js/a.js".to_string()]);
}

#[rstest]
#[tokio::test]
async fn test_production_tags_reference_bundle() {
	let temp_dir = static_dir();
	let cachify = Cachify::new(production_config(temp_dir.static_root())).unwrap();
	let tags = cachify.tags();

	let js_hash = md5_hex(b"console.log('bundle');");
	let css_hash = md5_hex(b"body { color: red; }");

	assert_eq!(
		tags.cachify_js("/app.js").await,
		format!("<script src=\"/{js_hash}/app.js\"></script>")
	);
	assert_eq!(
		tags.cachify_css("/app.css").await,
		format!("<link rel=\"stylesheet\" type=\"text/css\" href=\"/{css_hash}/app.css\">")
	);
}

#[rstest]
#[tokio::test]
async fn test_development_tags_reference_sources() {
	let temp_dir = static_dir();
	let config = production_config(temp_dir.static_root()).with_production(false);
	let cachify = Cachify::new(config).unwrap();

	assert_eq!(
		cachify.tags().cachify_js("/app.js").await,
		"<script src=\"/js/a.js\"></script>\n<script src=\"/js/b.js\"></script>"
	);
	assert!(cachify.cache().is_empty());
}

#[rstest]
#[tokio::test]
async fn test_unknown_hashed_url_falls_through_to_not_found() {
	let temp_dir = static_dir();
	let root = temp_dir.static_root();
	let cachify = Cachify::new(production_config(root.clone())).unwrap();
	let server = Arc::new(FileServer::new(root.clone()));
	let chain = MiddlewareChain::new(server.clone()).with_middleware(cachify.middleware());

	let url = format!("/{}/late.js", md5_hex(b"late"));
	let response = chain.handle(Request::get(&url).unwrap()).await.unwrap();

	assert_eq!(response.status, 404);
	assert!(!response.headers.contains_key("cache-control"));
	assert_eq!(*server.requested.lock().unwrap(), vec![url.clone()]);
	assert_eq!(
		cachify.cache().lookup("/late.js"),
		Some(CacheEntry::existence(false))
	);

	// The negative result is kept even after the file appears
	std::fs::write(root.join("late.js"), "late").unwrap();
	let response = chain.handle(Request::get(&url).unwrap()).await.unwrap();
	assert_eq!(response.status, 404);
}

#[rstest]
#[tokio::test]
async fn test_bundle_request_rewritten_before_file_exists_check() {
	let temp_dir = static_dir();
	let root = temp_dir.static_root();
	let cachify = Cachify::new(production_config(root.clone())).unwrap();
	let chain = MiddlewareChain::new(Arc::new(FileServer::new(root)))
		.with_middleware(cachify.middleware());

	let url = cachify.tags().cachify("/app.css").await;
	let response = chain.handle(Request::get(&url).unwrap()).await.unwrap();

	assert_eq!(response.status, 200);
	assert_eq!(response.headers["cache-control"], CACHE_CONTROL_VALUE);
	// Entry was written by hashing, not by an existence check
	assert_eq!(
		cachify.cache().lookup("/app.css").map(|entry| entry.exists),
		Some(true)
	);
}

#[rstest]
#[tokio::test]
async fn test_missing_asset_renders_unhashed() {
	let temp_dir = static_dir();
	let cachify = Cachify::new(production_config(temp_dir.static_root())).unwrap();

	assert_eq!(
		cachify.tags().cachify_js("/vendor.js").await,
		"<script src=\"/vendor.js\"></script>"
	);
	assert!(cachify.cache().lookup("/vendor.js").is_none());
}

#[rstest]
#[tokio::test]
async fn test_config_loaded_from_json_file() {
	let temp_dir = static_dir();
	let config_path = temp_dir.path().join("cachify.json");
	let json = serde_json::json!({
		"root": [temp_dir.static_root(), temp_dir.path()],
		"debug": true,
		"production": false,
		"js": {"/app.js": ["/js/a.js"]}
	});
	std::fs::write(&config_path, json.to_string()).unwrap();

	let config = CachifyConfig::from_json_file(&config_path).await.unwrap();
	let cachify = Cachify::new(config).unwrap();

	assert_eq!(
		cachify.tags().cachify_js("/app.js").await,
		format!(
			"<script src=\"/{}/js/a.js\"></script>",
			md5_hex(b"console.log('a');")
		)
	);
}

#[rstest]
#[tokio::test]
async fn test_preload_warms_cache_for_requests() {
	let temp_dir = static_dir();
	let cachify = Cachify::new(production_config(temp_dir.static_root())).unwrap();

	// Two bundles plus three sources
	assert_eq!(cachify.preload().await, 5);
	assert_eq!(
		cachify.cache().lookup("/js/b.js"),
		Some(CacheEntry::hashed(md5_hex(b"console.log('b');")))
	);
}
