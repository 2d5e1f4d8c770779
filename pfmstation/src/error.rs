//! Types d'erreurs pour pfmstation

/// Erreurs de contrôle de la station
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Catalog is empty, nothing to play")]
    CatalogEmpty,

    #[error("Track not found: {0}")]
    TrackNotFound(String),

    #[error("Station is not playing")]
    NotPlaying,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Type Result spécialisé pour pfmstation
pub type Result<T> = std::result::Result<T, Error>;
