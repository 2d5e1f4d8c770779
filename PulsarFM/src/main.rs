use std::sync::Arc;

use pfmcatalog::{Catalog, CatalogConfigExt, manifest};
use pfmconfig::get_config;
use pfmserver::{ServerBuilder, logs::LoggingOptions};
use pfmstation::{Station, StationConfigExt, openapi::ApiDoc, publish_router, station_api_router};
use tracing::{info, warn};
use utoipa::OpenApi;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ========== PHASE 1 : Infrastructure ==========

    let mut server = ServerBuilder::new_configured().build();
    server.init_logging(LoggingOptions::from_config()).await;

    let config = get_config();
    info!("🎙️ Starting {}...", config.get_station_name());

    // ========== PHASE 2 : Catalogue et station ==========

    let manifest_path = config.catalog_manifest_path();
    let catalog = match manifest::load(&manifest_path) {
        Ok(tracks) => {
            info!("📦 Catalog loaded: {} track(s) from {}", tracks.len(), manifest_path);
            Arc::new(Catalog::with_tracks(tracks))
        }
        Err(e) => {
            warn!("⚠️ Could not load catalog manifest {}: {}", manifest_path, e);
            warn!("⚠️ Starting with an empty catalog, only the idle reference will be published");
            Arc::new(Catalog::new())
        }
    };

    let station = Arc::new(Station::new(catalog, config.station_options()));

    if config.autostart() {
        match station.start().await {
            Ok(()) => info!("📻 Playback started automatically"),
            Err(e) => warn!("⚠️ Autostart skipped: {}", e),
        }
    }

    // ========== PHASE 3 : Routes HTTP ==========

    // API de contrôle, montée sous /api/station avec sa documentation Swagger
    server
        .add_openapi(
            station_api_router(station.clone()),
            ApiDoc::openapi(),
            "station",
        )
        .await;

    // Ressource texte relue par le moteur audio
    server.add_router("/", publish_router(station.clone())).await;

    let server_info = server.info();
    server
        .add_route("/api/healthz", || async {
            serde_json::json!({"status": "ok"})
        })
        .await;
    server
        .add_route("/info", move || {
            let info = server_info.clone();
            async move {
                serde_json::json!({
                    "name": info.name,
                    "version": env!("CARGO_PKG_VERSION"),
                    "base_url": info.base_url,
                    "http_port": info.http_port,
                })
            }
        })
        .await;

    server.add_redirect("/", "/swagger-ui/station").await;

    // ========== PHASE 4 : Démarrage ==========

    info!("🌐 Starting HTTP server...");
    server.start().await;

    info!("✅ {} is ready!", server.info().name);
    info!("Press Ctrl+C to stop...");
    server.wait().await;

    Ok(())
}
