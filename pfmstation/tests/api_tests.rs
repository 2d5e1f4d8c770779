//! Tests de l'API REST de contrôle (routers montés en mémoire).

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use tower::ServiceExt;

use pfmcatalog::{Catalog, Track};
use pfmstation::{station_api_router, Station, StationOptions};

fn make_catalog(n: usize) -> Arc<Catalog> {
    let tracks = (0..n)
        .map(|i| {
            let url = format!("https://cdn.example.com/{i:02}_song.mp3");
            Track {
                id: Track::id_for_url(&url),
                url,
                title: format!("Song {i}"),
                artist: "Artist".to_string(),
                album: "Album".to_string(),
                duration_secs: Some(180),
                unreleased: false,
                cover_url: None,
            }
        })
        .collect();
    Arc::new(Catalog::with_tracks(tracks))
}

fn make_app(n: usize) -> (Arc<Station>, Router) {
    let station = Arc::new(Station::with_seed(
        make_catalog(n),
        StationOptions::default(),
        42,
    ));
    let app = Router::new()
        .nest("/api/station", station_api_router(station.clone()))
        .merge(pfmstation::publish_router(station.clone()));
    (station, app)
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn post(uri: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_status_reports_stopped_initially() {
    let (_station, app) = make_app(5);

    let response = app.oneshot(get("/api/station/status")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["state"], "stopped");
    assert!(json["current"].is_null());
    assert_eq!(json["upcoming"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_start_returns_playing_status() {
    let (_station, app) = make_app(5);

    let response = app.oneshot(post("/api/station/start")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["state"], "playing");
    assert!(json["current"]["url"].is_string());
    assert!(json["generation"].is_u64());
}

#[tokio::test]
async fn test_start_on_empty_catalog_conflicts() {
    let (_station, app) = make_app(0);

    let response = app.oneshot(post("/api/station/start")).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let json = body_json(response).await;
    assert_eq!(json["error"], "CATALOG_EMPTY");
}

#[tokio::test]
async fn test_skip_moves_current_forward() {
    let (station, app) = make_app(5);
    station.start().await.unwrap();

    let before = station.status().await.current.unwrap();
    let response = app.oneshot(post("/api/station/skip")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_ne!(json["current"]["id"], before.id.as_str());
}

#[tokio::test]
async fn test_play_known_and_unknown_track() {
    let (station, app) = make_app(5);
    station.start().await.unwrap();

    let wanted = station.catalog().tracks()[3].clone();
    let response = app
        .clone()
        .oneshot(post(&format!("/api/station/play/{}", wanted.id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["id"], wanted.id.as_str());

    let response = app
        .oneshot(post("/api/station/play/deadbeefdeadbeef"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["error"], "TRACK_NOT_FOUND");
}

#[tokio::test]
async fn test_play_blank_track_id_is_bad_request() {
    let (station, app) = make_app(5);
    station.start().await.unwrap();

    let response = app.oneshot(post("/api/station/play/%20")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "INVALID_REQUEST");
}

#[tokio::test]
async fn test_reshuffle_requires_playing() {
    let (station, app) = make_app(5);

    let response = app
        .clone()
        .oneshot(post("/api/station/reshuffle"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["error"], "NOT_PLAYING");

    station.start().await.unwrap();
    let generation = station.status().await.generation.unwrap();

    let response = app.oneshot(post("/api/station/reshuffle")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["generation"].as_u64().unwrap() > generation);
}

#[tokio::test]
async fn test_tracks_lists_whole_catalog() {
    let (_station, app) = make_app(7);

    let response = app.oneshot(get("/api/station/tracks")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json.as_array().unwrap().len(), 7);
}

#[tokio::test]
async fn test_playlist_txt_lists_urls_when_playing() {
    let (station, app) = make_app(5);
    station.start().await.unwrap();

    let response = app.oneshot(get("/playlist.txt")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let text = body_text(response).await;
    assert!(text.ends_with('\n'));
    for line in text.lines() {
        assert!(line.starts_with("https://cdn.example.com/"));
    }
    assert_eq!(
        text.lines().next().unwrap(),
        station.status().await.current.unwrap().url
    );
}

#[tokio::test]
async fn test_playlist_txt_falls_back_when_stopped() {
    let (_station, app) = make_app(5);

    let response = app.oneshot(get("/playlist.txt")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let text = body_text(response).await;
    assert_eq!(text.lines().count(), 1);
    assert!(!text.trim().is_empty());
}

#[test]
fn test_openapi_document_exposes_all_schemas() {
    use utoipa::OpenApi;

    let doc = pfmstation::openapi::ApiDoc::openapi();
    let json = serde_json::to_value(&doc).unwrap();

    // Le schéma des évènements SSE (avec son horodatage) doit être généré
    for schema in ["StatusResponse", "TrackResponse", "ErrorResponse", "EventPayload"] {
        assert!(
            json["components"]["schemas"][schema].is_object(),
            "missing schema {schema}"
        );
    }
}

#[tokio::test]
async fn test_stop_is_idempotent_over_http() {
    let (station, app) = make_app(5);
    station.start().await.unwrap();

    let response = app.clone().oneshot(post("/api/station/stop")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["state"], "stopped");

    let response = app.oneshot(post("/api/station/stop")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
