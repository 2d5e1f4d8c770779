//! # pfmserver - Serveur web haut niveau basé sur Axum
//!
//! Cette crate fournit une abstraction simple pour créer le serveur HTTP de
//! PulsarFM : routage, documentation OpenAPI/Swagger, logs observables et
//! arrêt gracieux.
//!
//! ## Fonctionnalités
//!
//! - **Routes JSON simples** : ajoutez des endpoints avec `add_route()`
//! - **Sous-routers** : montez des routers Axum complets avec `add_router()`
//! - **Documentation API** : OpenAPI/Swagger automatique avec `add_openapi()`
//! - **Logs en temps réel** : buffer circulaire + flux SSE via `init_logging()`
//! - **Arrêt gracieux** : gestion propre de Ctrl+C
//!
//! ## Exemple d'utilisation
//!
//! ```rust,no_run
//! use pfmserver::{ServerBuilder, logs::LoggingOptions};
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut server = ServerBuilder::new_configured().build();
//!     server.init_logging(LoggingOptions::default()).await;
//!
//!     server.add_route("/api/healthz", || async {
//!         serde_json::json!({"status": "ok"})
//!     }).await;
//!
//!     server.start().await;
//!     server.wait().await;
//! }
//! ```

pub mod logs;
pub mod server;

pub use logs::{BufferLayer, LogState, log_dump, log_sse};
pub use server::{Server, ServerBuilder, ServerInfo};
