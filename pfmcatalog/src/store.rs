//! Catalog : snapshots atomiques du catalogue de morceaux

use crate::track::Track;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Snapshot immuable du catalogue
///
/// Construit d'un bloc par [`Catalog::replace_all`]. Les lecteurs clonent
/// l'`Arc` et ne voient jamais un catalogue à moitié mis à jour.
#[derive(Debug, Default)]
pub struct CatalogSnapshot {
    tracks: Vec<Arc<Track>>,
    by_id: HashMap<String, Arc<Track>>,
}

impl CatalogSnapshot {
    fn new(tracks: Vec<Track>) -> Self {
        let tracks: Vec<Arc<Track>> = tracks.into_iter().map(Arc::new).collect();
        let mut by_id = HashMap::with_capacity(tracks.len());
        for track in &tracks {
            by_id.insert(track.id.clone(), track.clone());
        }
        Self { tracks, by_id }
    }

    /// Tous les morceaux, dans l'ordre d'ingestion
    pub fn tracks(&self) -> &[Arc<Track>] {
        &self.tracks
    }

    /// Recherche par identifiant
    pub fn get(&self, id: &str) -> Option<Arc<Track>> {
        self.by_id.get(id).cloned()
    }

    /// Vérifie l'appartenance d'un identifiant au snapshot
    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

/// Magasin du catalogue
///
/// Une seule opération de mutation : `replace_all`, qui échange le snapshot
/// courant atomiquement. Toutes les lectures passent par `snapshot()`.
#[derive(Debug)]
pub struct Catalog {
    current: RwLock<Arc<CatalogSnapshot>>,
}

impl Catalog {
    /// Crée un catalogue vide
    pub fn new() -> Self {
        Self {
            current: RwLock::new(Arc::new(CatalogSnapshot::default())),
        }
    }

    /// Crée un catalogue pré-rempli (pratique pour les tests)
    pub fn with_tracks(tracks: Vec<Track>) -> Self {
        let catalog = Self::new();
        catalog.replace_all(tracks);
        catalog
    }

    /// Remplace l'intégralité du catalogue par un nouveau snapshot
    ///
    /// Les identifiants dupliqués sont ignorés (le premier gagne).
    pub fn replace_all(&self, tracks: Vec<Track>) {
        let mut seen = HashMap::new();
        let mut deduped = Vec::with_capacity(tracks.len());
        for track in tracks {
            if seen.insert(track.id.clone(), ()).is_none() {
                deduped.push(track);
            } else {
                tracing::warn!(track_id = %track.id, "Duplicate track id in catalog, ignoring");
            }
        }

        let snapshot = Arc::new(CatalogSnapshot::new(deduped));
        let count = snapshot.len();
        *self.current.write().unwrap() = snapshot;
        tracing::info!(tracks = count, "Catalog snapshot replaced");
    }

    /// Snapshot stable du catalogue courant
    pub fn snapshot(&self) -> Arc<CatalogSnapshot> {
        self.current.read().unwrap().clone()
    }

    /// Tous les morceaux du snapshot courant
    pub fn tracks(&self) -> Vec<Arc<Track>> {
        self.snapshot().tracks().to_vec()
    }

    /// Recherche par identifiant dans le snapshot courant
    pub fn get(&self, id: &str) -> Option<Arc<Track>> {
        self.snapshot().get(id)
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}
