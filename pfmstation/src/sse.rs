//! SSE pour suivre les évènements de la station (démarrage, skips, replis).
//!
//! Route type : `GET /api/station/events`

use std::sync::Arc;

use async_stream::stream;
use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    response::IntoResponse,
};
use serde::Serialize;

use crate::station::{Station, StationEventKind};

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct EventPayload {
    pub kind: String,
    pub track_id: Option<String>,
    pub generation: Option<u64>,
    pub tracks: Option<usize>,
    pub reason: Option<String>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Handler SSE : diffuse les évènements de la station enrichis.
#[utoipa::path(
    get,
    path = "/api/station/events",
    tag = "station",
    responses(
        (status = 200, description = "Flux SSE des évènements de la station (started, skipped, fallback_engaged, ...)", content_type = "text/event-stream")
    )
)]
pub async fn station_events_sse(State(station): State<Arc<Station>>) -> impl IntoResponse {
    let mut rx = station.subscribe_events();

    let stream = stream! {
        while let Ok(envelope) = rx.recv().await {
            let (kind, track_id, generation, tracks, reason) = match &envelope.event.kind {
                StationEventKind::Started => ("started", None, None, None, None),
                StationEventKind::Stopped => ("stopped", None, None, None, None),
                StationEventKind::Skipped { track_id } => {
                    ("skipped", track_id.clone(), None, None, None)
                }
                StationEventKind::TrackRequested { track_id } => {
                    ("track_requested", Some(track_id.clone()), None, None, None)
                }
                StationEventKind::Reshuffled { generation } => {
                    ("reshuffled", None, Some(*generation), None, None)
                }
                StationEventKind::RotationPromoted { generation } => {
                    ("rotation_promoted", None, Some(*generation), None, None)
                }
                StationEventKind::FallbackEngaged { reason } => {
                    ("fallback_engaged", None, None, None, Some(reason.as_str().to_string()))
                }
                StationEventKind::CatalogReplaced { tracks } => {
                    ("catalog_replaced", None, None, Some(*tracks), None)
                }
            };

            let ts = chrono::DateTime::<chrono::Utc>::from(envelope.timestamp);
            let payload = EventPayload {
                kind: kind.to_string(),
                track_id,
                generation,
                tracks,
                reason,
                timestamp: ts,
            };

            if let Ok(json) = serde_json::to_string(&payload) {
                yield Ok::<_, axum::Error>(Event::default().event("station").data(json));
            }
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}
