//! Integration Tests for the Remote Data Client and Game Data Service
//!
//! Exercises the client against local mock upstreams: typed decoding,
//! envelope unwrapping, error surfacing, relay routing, and the game data
//! service's cache-then-network behavior.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::{routing::get, Json, Router};
use chrono::{Duration as ChronoDuration, Utc};
use serde_json::json;

use predstats::cache::{MemoryStorage, TtlCache};
use predstats::models::MatchesOptions;
use predstats::{ApiClient, ApiError, Config, GameDataService};

// == Helper Functions ==

/// Serves `router` on an ephemeral loopback port and returns its base URL.
async fn spawn_upstream(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

fn config_for(base_url: &str) -> Config {
    Config {
        api_base_url: base_url.to_string(),
        ..Config::default()
    }
}

fn client_for(base_url: &str) -> ApiClient {
    ApiClient::new(&config_for(base_url)).unwrap()
}

fn fresh_cache() -> Arc<TtlCache> {
    Arc::new(TtlCache::new(
        Arc::new(MemoryStorage::new()),
        "predecessor_stats_",
    ))
}

fn heroes_body() -> serde_json::Value {
    json!([
        {"id": 1, "name": "Sparrow", "display_name": "Sparrow the Archer",
         "image_url": "/images/heroes/sparrow.png"},
        {"id": 2, "name": "Muriel", "display_name": "Muriel",
         "image_url": "https://cdn.example.com/muriel.png"}
    ])
}

fn items_body() -> serde_json::Value {
    json!([
        {"id": 10, "name": "vanguardian", "display_name": "Vanguardian",
         "image_url": "/images/items/vanguardian.png", "price": 2600}
    ])
}

/// Mock upstream serving heroes and items, counting fetches per endpoint.
fn game_data_upstream(hero_fetches: Arc<AtomicUsize>, item_fetches: Arc<AtomicUsize>) -> Router {
    Router::new()
        .route(
            "/heroes.json",
            get(move || {
                let fetches = hero_fetches.clone();
                async move {
                    fetches.fetch_add(1, Ordering::SeqCst);
                    Json(heroes_body())
                }
            }),
        )
        .route(
            "/items.json",
            get(move || {
                let fetches = item_fetches.clone();
                async move {
                    fetches.fetch_add(1, Ordering::SeqCst);
                    Json(items_body())
                }
            }),
        )
}

// == Client Tests ==

#[tokio::test]
async fn test_get_player_decodes_typed_record() {
    let upstream = spawn_upstream(Router::new().route(
        "/players/abc.json",
        get(|| async {
            Json(json!({"id": "abc", "name": "TestPlayer", "mmr": 1450.5, "wins": 12}))
        }),
    ))
    .await;

    let player = client_for(&upstream).get_player("abc").await.unwrap();
    assert_eq!(player.id, "abc");
    assert_eq!(player.name, "TestPlayer");
    assert_eq!(player.wins, 12);
}

#[tokio::test]
async fn test_missing_resource_surfaces_status_error() {
    let upstream = spawn_upstream(Router::new()).await;

    let result = client_for(&upstream).get_player("nope").await;
    match result {
        Err(ApiError::Status { status, .. }) => assert_eq!(status, 404),
        other => panic!("expected status error, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn test_envelope_with_string_contents_is_unwrapped() {
    let inner = serde_json::to_string(&heroes_body()).unwrap();
    let upstream = spawn_upstream(Router::new().route(
        "/heroes.json",
        get(move || {
            let inner = inner.clone();
            async move { Json(json!({"contents": inner})) }
        }),
    ))
    .await;

    let heroes = client_for(&upstream).get_heroes().await.unwrap();
    assert_eq!(heroes.len(), 2);
    assert_eq!(heroes[0].name, "Sparrow");
}

#[tokio::test]
async fn test_statistics_envelope_is_unwrapped() {
    // Raw-document endpoints must not hand the wrapper back to callers
    let upstream = spawn_upstream(Router::new().route(
        "/players/abc/statistics.json",
        get(|| async { Json(json!({"contents": {"matches_played": 42, "win_rate": 0.54}})) }),
    ))
    .await;

    let stats = client_for(&upstream)
        .get_player_statistics("abc", None)
        .await
        .unwrap();
    assert_eq!(stats["matches_played"], 42);
    assert!(stats.get("contents").is_none());
}

#[tokio::test]
async fn test_player_matches_sends_flattened_filters() {
    let upstream = spawn_upstream(Router::new().route(
        "/players/abc/matches.json",
        get(|axum::extract::RawQuery(query): axum::extract::RawQuery| async move {
            let query = query.unwrap_or_default();
            assert!(query.contains("page=2"));
            assert!(query.contains("filter%5Bhero_id%5D=14"));
            Json(json!({"matches": [{"id": "m1"}], "cursor": "next"}))
        }),
    ))
    .await;

    let options = MatchesOptions {
        page: Some(2),
        filter: Some(predstats::models::MatchFilter {
            hero_id: Some(14),
            ..Default::default()
        }),
        ..Default::default()
    };
    let page = client_for(&upstream)
        .get_player_matches("abc", &options)
        .await
        .unwrap();
    assert_eq!(page.matches.len(), 1);
    assert_eq!(page.cursor.as_deref(), Some("next"));
}

#[tokio::test]
async fn test_client_routes_through_relay() {
    // Full chain: client -> relay server -> upstream
    let upstream = spawn_upstream(Router::new().route(
        "/players/abc.json",
        get(|| async { Json(json!({"id": "abc", "name": "ViaRelay"})) }),
    ))
    .await;

    let relay_app = predstats::relay::create_router(
        predstats::RelayState::from_config(&config_for(&upstream)).unwrap(),
    );
    let relay_base = spawn_upstream(relay_app).await;

    let config = Config {
        api_base_url: "https://omeda.city".to_string(),
        relay_url: Some(format!("{}/api/relay", relay_base)),
        use_relay: true,
        ..Config::default()
    };
    let client = ApiClient::new(&config).unwrap();

    let player = client.get_player("abc").await.unwrap();
    assert_eq!(player.name, "ViaRelay");
}

// == Current Match Heuristic ==

#[tokio::test]
async fn test_current_match_reported_within_window() {
    let recent = (Utc::now() - ChronoDuration::minutes(2)).to_rfc3339();
    let upstream = spawn_upstream(Router::new().route(
        "/players/abc/matches.json",
        get(move || {
            let recent = recent.clone();
            async move { Json(json!({"matches": [{"id": "m1", "ended_at": recent}]})) }
        }),
    ))
    .await;

    let current = client_for(&upstream).get_current_match("abc").await.unwrap();
    assert_eq!(current.map(|m| m.id), Some("m1".to_string()));
}

#[tokio::test]
async fn test_stale_match_not_reported_as_current() {
    let old = (Utc::now() - ChronoDuration::hours(3)).to_rfc3339();
    let upstream = spawn_upstream(Router::new().route(
        "/players/abc/matches.json",
        get(move || {
            let old = old.clone();
            async move { Json(json!({"matches": [{"id": "m1", "ended_at": old}]})) }
        }),
    ))
    .await;

    let current = client_for(&upstream).get_current_match("abc").await.unwrap();
    assert!(current.is_none());
}

// == Game Data Service Tests ==

#[tokio::test]
async fn test_first_fetch_populates_cache_and_snapshot() {
    let hero_fetches = Arc::new(AtomicUsize::new(0));
    let item_fetches = Arc::new(AtomicUsize::new(0));
    let upstream =
        spawn_upstream(game_data_upstream(hero_fetches.clone(), item_fetches.clone())).await;

    let cache = fresh_cache();
    let service = GameDataService::new(Arc::new(client_for(&upstream)), cache.clone());

    let heroes = service.get_heroes().await.unwrap();
    assert_eq!(heroes.len(), 2);
    assert_eq!(hero_fetches.load(Ordering::SeqCst), 1);
    assert!(cache.size_bytes() > 0);

    // Second call is served from cache: no further network calls
    let heroes_again = service.get_heroes().await.unwrap();
    assert_eq!(heroes_again, heroes);
    assert_eq!(hero_fetches.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_image_urls_are_qualified() {
    let upstream = spawn_upstream(game_data_upstream(
        Arc::new(AtomicUsize::new(0)),
        Arc::new(AtomicUsize::new(0)),
    ))
    .await;

    let service = GameDataService::new(Arc::new(client_for(&upstream)), fresh_cache());
    let heroes = service.get_heroes().await.unwrap();

    // Relative path qualified against the external host
    assert_eq!(
        heroes[0].image_url.as_deref(),
        Some(format!("{}/images/heroes/sparrow.png", upstream).as_str())
    );
    // Absolute URL passes through unchanged
    assert_eq!(
        heroes[1].image_url.as_deref(),
        Some("https://cdn.example.com/muriel.png")
    );
}

#[tokio::test]
async fn test_lookups_absent_before_load_and_found_after() {
    let upstream = spawn_upstream(game_data_upstream(
        Arc::new(AtomicUsize::new(0)),
        Arc::new(AtomicUsize::new(0)),
    ))
    .await;

    let service = GameDataService::new(Arc::new(client_for(&upstream)), fresh_cache());

    assert!(service.get_hero_by_id(1).is_none());
    assert!(service.get_hero_by_name("Sparrow").is_none());

    service.get_heroes().await.unwrap();
    service.get_items().await.unwrap();

    assert_eq!(service.get_hero_by_id(1).unwrap().name, "Sparrow");
    // Both internal and display names match
    assert_eq!(service.get_hero_by_name("Sparrow").unwrap().id, 1);
    assert_eq!(service.get_hero_by_name("Sparrow the Archer").unwrap().id, 1);
    assert!(service.get_hero_by_name("Unknown").is_none());
    assert_eq!(service.get_item_by_id(10).unwrap().name, "vanguardian");
    assert_eq!(service.get_item_by_name("Vanguardian").unwrap().id, 10);
}

#[tokio::test]
async fn test_failed_fetch_does_not_populate_cache() {
    // Upstream serves nothing: heroes fetch is a 404
    let upstream = spawn_upstream(Router::new()).await;

    let cache = fresh_cache();
    let service = GameDataService::new(Arc::new(client_for(&upstream)), cache.clone());

    let result = service.get_heroes().await;
    assert!(matches!(result, Err(ApiError::Status { status: 404, .. })));
    assert_eq!(cache.size_bytes(), 0);
    assert!(service.get_hero_by_id(1).is_none());
}

#[tokio::test]
async fn test_preload_all_fetches_both_collections() {
    let hero_fetches = Arc::new(AtomicUsize::new(0));
    let item_fetches = Arc::new(AtomicUsize::new(0));
    let upstream =
        spawn_upstream(game_data_upstream(hero_fetches.clone(), item_fetches.clone())).await;

    let service = GameDataService::new(Arc::new(client_for(&upstream)), fresh_cache());
    service.preload_all().await.unwrap();

    assert_eq!(hero_fetches.load(Ordering::SeqCst), 1);
    assert_eq!(item_fetches.load(Ordering::SeqCst), 1);
    assert!(service.get_hero_by_id(1).is_some());
    assert!(service.get_item_by_id(10).is_some());
}

#[tokio::test]
async fn test_preload_all_propagates_single_failure() {
    // Heroes resolve, items 404
    let upstream = spawn_upstream(Router::new().route(
        "/heroes.json",
        get(|| async { Json(heroes_body()) }),
    ))
    .await;

    let service = GameDataService::new(Arc::new(client_for(&upstream)), fresh_cache());
    assert!(service.preload_all().await.is_err());
}

#[tokio::test]
async fn test_service_from_config_persists_across_instances() {
    // CACHE_DIR-style configuration: the cache survives the service, so a
    // second instance built from the same config never hits the network
    let hero_fetches = Arc::new(AtomicUsize::new(0));
    let upstream = spawn_upstream(game_data_upstream(
        hero_fetches.clone(),
        Arc::new(AtomicUsize::new(0)),
    ))
    .await;

    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        cache_dir: Some(dir.path().to_path_buf()),
        ..config_for(&upstream)
    };

    let first = GameDataService::from_config(&config).unwrap();
    let heroes = first.get_heroes().await.unwrap();
    assert_eq!(hero_fetches.load(Ordering::SeqCst), 1);
    drop(first);

    let second = GameDataService::from_config(&config).unwrap();
    assert_eq!(second.get_heroes().await.unwrap(), heroes);
    assert_eq!(hero_fetches.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_service_from_config_defaults_to_memory() {
    // Without a cache directory nothing persists between instances
    let hero_fetches = Arc::new(AtomicUsize::new(0));
    let upstream = spawn_upstream(game_data_upstream(
        hero_fetches.clone(),
        Arc::new(AtomicUsize::new(0)),
    ))
    .await;

    let config = config_for(&upstream);
    GameDataService::from_config(&config)
        .unwrap()
        .get_heroes()
        .await
        .unwrap();
    GameDataService::from_config(&config)
        .unwrap()
        .get_heroes()
        .await
        .unwrap();

    assert_eq!(hero_fetches.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_concurrent_hero_fetches_leave_consistent_cache() {
    let hero_fetches = Arc::new(AtomicUsize::new(0));
    let upstream = spawn_upstream(game_data_upstream(
        hero_fetches.clone(),
        Arc::new(AtomicUsize::new(0)),
    ))
    .await;

    let cache = fresh_cache();
    let service = Arc::new(GameDataService::new(
        Arc::new(client_for(&upstream)),
        cache.clone(),
    ));

    // Two overlapping fetches: both may hit the network (no per-key
    // request coalescing), last writer wins in the cache
    let (a, b) = tokio::join!(service.get_heroes(), service.get_heroes());
    let a = a.unwrap();
    let b = b.unwrap();
    assert_eq!(a, b);

    let fetches = hero_fetches.load(Ordering::SeqCst);
    assert!((1..=2).contains(&fetches));

    // The cached value decodes cleanly and matches what callers saw
    let service2 = GameDataService::new(Arc::new(client_for(&upstream)), cache);
    assert_eq!(service2.get_heroes().await.unwrap(), a);
    assert_eq!(hero_fetches.load(Ordering::SeqCst), fetches);
}
