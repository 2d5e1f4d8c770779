//! # pfmstation - Orchestration de la diffusion continue
//!
//! Cette crate est le coeur de PulsarFM : elle maintient le moteur audio
//! externe alimenté en une séquence de morceaux mélangée, sans fin et sans
//! silence, tout en exposant une petite surface de contrôle.
//!
//! # Architecture
//!
//! - **RotationSet** : anneau de playlists immuables mélangées, maintenu
//!   prêt en avance pour masquer la latence du shuffle
//! - **Station** : machine à états de lecture (stopped → starting → playing
//!   ⇄ reloading), file de requêtes, unique état mutable partagé
//! - **PublishPlan** : rendu de l'état courant au format texte que le moteur
//!   audio vient chercher par polling (une URL par ligne, jamais vide)
//! - **Fallback** : substitution d'une référence silence connue quand aucune
//!   séquence valide n'est publiable
//!
//! Le moteur audio ne rapporte rien en retour : l'intégration est
//! strictement pull, la ressource publiée doit donc être valide à tout
//! instant d'observation.
//!
//! # Exemple d'utilisation
//!
//! ```no_run
//! use std::sync::Arc;
//! use pfmcatalog::Catalog;
//! use pfmstation::{Station, StationOptions};
//!
//! # #[tokio::main]
//! # async fn main() -> pfmstation::Result<()> {
//! let catalog = Arc::new(Catalog::new());
//! let station = Station::new(catalog, StationOptions::default());
//!
//! station.start().await?;
//! let status = station.status().await;
//! println!("Now playing: {:?}", status.current.map(|t| t.title.clone()));
//!
//! // Ressource pour le moteur audio
//! let body = station.publish_plan().await.render();
//! # Ok(())
//! # }
//! ```

mod error;
mod fallback;
mod publish;
mod rotation;
mod station;

#[cfg(feature = "pfmconfig")]
mod config_ext;

#[cfg(feature = "pfmserver")]
pub mod api;
#[cfg(feature = "pfmserver")]
pub mod openapi;
#[cfg(feature = "pfmserver")]
pub mod sse;

// Réexports publics
pub use error::{Error, Result};
pub use fallback::FallbackReason;
pub use publish::PublishPlan;
pub use rotation::{Playlist, RotationSet};
pub use station::{
    RunState, Station, StationEvent, StationEventEnvelope, StationEventKind, StationOptions,
    StationStatus,
};

#[cfg(feature = "pfmconfig")]
pub use config_ext::StationConfigExt;

#[cfg(feature = "pfmserver")]
pub use api::{publish_router, station_api_router};
