//! API REST de contrôle de la station.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::station::{Station, StationStatus};
use pfmcatalog::Track;

/// Router `/api/station` combinant les endpoints de contrôle.
pub fn station_api_router(station: Arc<Station>) -> Router {
    Router::new()
        .route("/status", get(get_status))
        .route("/start", post(start_station))
        .route("/stop", post(stop_station))
        .route("/skip", post(skip_track))
        .route("/play/{track_id}", post(play_track))
        .route("/reshuffle", post(reshuffle_station))
        .route("/tracks", get(list_tracks))
        .route("/events", get(crate::sse::station_events_sse))
        .with_state(station)
}

/// Router racine exposant la ressource texte consommée par le moteur audio.
pub fn publish_router(station: Arc<Station>) -> Router {
    Router::new()
        .route("/playlist.txt", get(get_playlist_text))
        .with_state(station)
}

/// Un morceau du catalogue, tel qu'exposé par l'API.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TrackResponse {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub album: String,
    pub duration_secs: Option<u32>,
    pub unreleased: bool,
    pub cover_url: Option<String>,
    pub url: String,
}

impl From<&Track> for TrackResponse {
    fn from(track: &Track) -> Self {
        Self {
            id: track.id.clone(),
            title: track.title.clone(),
            artist: track.artist.clone(),
            album: track.album.clone(),
            duration_secs: track.duration_secs,
            unreleased: track.unreleased,
            cover_url: track.cover_url.clone(),
            url: track.url.clone(),
        }
    }
}

/// État de la station : run state, morceau courant, morceaux à venir.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatusResponse {
    /// `stopped`, `starting`, `playing` ou `reloading`
    pub state: String,
    /// Génération de la playlist courante
    pub generation: Option<u64>,
    pub current: Option<TrackResponse>,
    pub upcoming: Vec<TrackResponse>,
}

impl From<StationStatus> for StatusResponse {
    fn from(status: StationStatus) -> Self {
        Self {
            state: status.run_state.as_str().to_string(),
            generation: status.generation,
            current: status.current.as_deref().map(TrackResponse::from),
            upcoming: status
                .upcoming
                .iter()
                .map(|t| TrackResponse::from(t.as_ref()))
                .collect(),
        }
    }
}

/// Réponse d'erreur REST générique.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

#[utoipa::path(
    get,
    path = "/api/station/status",
    tag = "station",
    responses(
        (status = 200, description = "État courant de la station", body = StatusResponse)
    )
)]
pub async fn get_status(State(station): State<Arc<Station>>) -> Response {
    let status = station.status().await;
    (StatusCode::OK, Json(StatusResponse::from(status))).into_response()
}

#[utoipa::path(
    post,
    path = "/api/station/start",
    tag = "station",
    responses(
        (status = 200, description = "Diffusion démarrée (ou déjà en cours)", body = StatusResponse),
        (status = 409, description = "Catalogue vide", body = ErrorResponse)
    )
)]
pub async fn start_station(State(station): State<Arc<Station>>) -> Response {
    match station.start().await {
        Ok(()) => {
            let status = station.status().await;
            (StatusCode::OK, Json(StatusResponse::from(status))).into_response()
        }
        Err(err) => map_error(err),
    }
}

#[utoipa::path(
    post,
    path = "/api/station/stop",
    tag = "station",
    responses(
        (status = 200, description = "Diffusion arrêtée (idempotent)", body = StatusResponse)
    )
)]
pub async fn stop_station(State(station): State<Arc<Station>>) -> Response {
    station.stop().await;
    let status = station.status().await;
    (StatusCode::OK, Json(StatusResponse::from(status))).into_response()
}

#[utoipa::path(
    post,
    path = "/api/station/skip",
    tag = "station",
    responses(
        (status = 200, description = "Morceau sauté (sans effet si arrêtée)", body = StatusResponse)
    )
)]
pub async fn skip_track(State(station): State<Arc<Station>>) -> Response {
    match station.skip().await {
        Ok(()) => {
            let status = station.status().await;
            (StatusCode::OK, Json(StatusResponse::from(status))).into_response()
        }
        Err(err) => map_error(err),
    }
}

#[utoipa::path(
    post,
    path = "/api/station/play/{track_id}",
    tag = "station",
    params(
        ("track_id" = String, Path, description = "Identifiant du morceau demandé")
    ),
    responses(
        (status = 200, description = "Morceau placé en tête de séquence", body = TrackResponse),
        (status = 400, description = "Identifiant vide", body = ErrorResponse),
        (status = 404, description = "Morceau inconnu du catalogue", body = ErrorResponse)
    )
)]
pub async fn play_track(
    State(station): State<Arc<Station>>,
    Path(track_id): Path<String>,
) -> Response {
    if track_id.trim().is_empty() {
        return map_error(crate::Error::InvalidRequest(
            "track id cannot be empty".to_string(),
        ));
    }

    match station.play_next(&track_id).await {
        Ok(track) => (StatusCode::OK, Json(TrackResponse::from(track.as_ref()))).into_response(),
        Err(err) => map_error(err),
    }
}

#[utoipa::path(
    post,
    path = "/api/station/reshuffle",
    tag = "station",
    responses(
        (status = 200, description = "Anneau de rotation regénéré", body = StatusResponse),
        (status = 409, description = "Station arrêtée", body = ErrorResponse)
    )
)]
pub async fn reshuffle_station(State(station): State<Arc<Station>>) -> Response {
    match station.reshuffle().await {
        Ok(_generation) => {
            let status = station.status().await;
            (StatusCode::OK, Json(StatusResponse::from(status))).into_response()
        }
        Err(err) => map_error(err),
    }
}

#[utoipa::path(
    get,
    path = "/api/station/tracks",
    tag = "station",
    responses(
        (status = 200, description = "Snapshot complet du catalogue", body = [TrackResponse])
    )
)]
pub async fn list_tracks(State(station): State<Arc<Station>>) -> Response {
    let tracks: Vec<TrackResponse> = station
        .catalog()
        .tracks()
        .iter()
        .map(|t| TrackResponse::from(t.as_ref()))
        .collect();
    (StatusCode::OK, Json(tracks)).into_response()
}

/// Ressource ligne-par-ligne relue par le moteur audio.
///
/// Toujours valide et non vide : la référence idle est substituée en repli.
#[utoipa::path(
    get,
    path = "/playlist.txt",
    tag = "station",
    responses(
        (status = 200, description = "Séquence effective à venir, une URL par ligne", content_type = "text/plain")
    )
)]
pub async fn get_playlist_text(State(station): State<Arc<Station>>) -> String {
    station.publish_plan().await.render()
}

fn map_status<S: Into<String>>(status: StatusCode, error: &str, message: S) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
            message: message.into(),
        }),
    )
        .into_response()
}

fn map_error(error: crate::Error) -> Response {
    let (status, code) = match &error {
        crate::Error::CatalogEmpty => (StatusCode::CONFLICT, "CATALOG_EMPTY"),
        crate::Error::NotPlaying => (StatusCode::CONFLICT, "NOT_PLAYING"),
        crate::Error::TrackNotFound(_) => (StatusCode::NOT_FOUND, "TRACK_NOT_FOUND"),
        crate::Error::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "INVALID_REQUEST"),
        crate::Error::Other(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
    };

    map_status(status, code, error.to_string())
}
