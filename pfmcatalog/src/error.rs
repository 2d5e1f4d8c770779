//! Types d'erreurs pour pfmcatalog

/// Erreurs du catalogue
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Manifest error: {0}")]
    ManifestError(String),

    #[error("Manifest I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Manifest parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Type Result spécialisé pour pfmcatalog
pub type Result<T> = std::result::Result<T, Error>;
