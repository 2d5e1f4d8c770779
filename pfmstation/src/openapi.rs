//! Documentation OpenAPI pour l'API de contrôle de la station.

use utoipa::OpenApi;

/// Documentation OpenAPI pour l'API station (contrôle + flux SSE).
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::api::get_status,
        crate::api::start_station,
        crate::api::stop_station,
        crate::api::skip_track,
        crate::api::play_track,
        crate::api::reshuffle_station,
        crate::api::list_tracks,
        crate::api::get_playlist_text,
        crate::sse::station_events_sse,
    ),
    components(
        schemas(
            crate::api::StatusResponse,
            crate::api::TrackResponse,
            crate::api::ErrorResponse,
            crate::sse::EventPayload,
        )
    ),
    tags(
        (name = "station", description = "Contrôle de la diffusion et séquence publiée")
    ),
    info(
        title = "PulsarFM Station API",
        version = "0.1.0",
        description = r#"
# Contrôle de la station

Endpoints REST pour piloter la diffusion :
- `start` / `stop` : démarrage et arrêt (idempotents)
- `skip` : passage au morceau suivant
- `play/{track_id}` : demande d'un morceau précis en tête de séquence
- `reshuffle` : regénération complète de l'anneau de rotation
- `status` : run state, morceau courant et morceaux à venir
- `tracks` : snapshot du catalogue

La ressource `/playlist.txt` expose la séquence effective en texte brut,
une URL par ligne, relue périodiquement par le moteur audio externe.
Elle n'est jamais vide : une référence idle est substituée en repli.

Le flux SSE `events` diffuse les transitions (started, stopped, skipped,
track_requested, reshuffled, rotation_promoted, fallback_engaged,
catalog_replaced).
        "#,
        license(
            name = "MIT",
        ),
    )
)]
pub struct ApiDoc;
