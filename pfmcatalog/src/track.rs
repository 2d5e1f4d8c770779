//! Track : référence immuable vers un morceau diffusable

use serde::{Deserialize, Serialize};

/// Un morceau du catalogue
///
/// Immuable une fois ingéré. L'identifiant est stable d'une ingestion à
/// l'autre : il est dérivé de l'URL jouable (voir [`Track::id_for_url`]),
/// comme les clés primaires des caches dérivées du contenu.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Track {
    /// Identifiant stable et unique
    pub id: String,
    /// URL (ou chemin) jouable par le moteur audio
    pub url: String,
    /// Titre affichable
    pub title: String,
    /// Artiste
    pub artist: String,
    /// Album
    pub album: String,
    /// Durée en secondes (inconnue pour certains morceaux)
    pub duration_secs: Option<u32>,
    /// Morceau spécial (inédit / bonus)
    pub unreleased: bool,
    /// URL de la pochette (optionnelle)
    pub cover_url: Option<String>,
}

impl Track {
    /// Dérive un identifiant stable à partir de l'URL jouable
    ///
    /// SHA-256 de l'URL, tronqué à 16 caractères hexadécimaux. Deux
    /// ingestions du même morceau produisent donc le même identifiant.
    pub fn id_for_url(url: &str) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(url.as_bytes());
        let digest = hasher.finalize();
        digest[..8].iter().map(|b| format!("{:02x}", b)).collect()
    }
}
