//! RotationSet : anneau de playlists mélangées maintenues prêtes en avance

use pfmcatalog::{CatalogSnapshot, Track};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::VecDeque;
use std::sync::Arc;

/// Une playlist : permutation figée du catalogue
///
/// Immuable une fois produite. Une playlist n'est jamais modifiée en place :
/// un reshuffle produit une nouvelle génération qui la remplace.
#[derive(Debug)]
pub struct Playlist {
    /// Identifiant de génération, strictement croissant
    pub generation: u64,
    /// Graine du mélange (reproductibilité des tests)
    pub seed: u64,
    entries: Vec<Arc<Track>>,
}

impl Playlist {
    /// Produit une permutation uniforme (Fisher–Yates) du snapshot
    pub fn shuffled(snapshot: &CatalogSnapshot, seed: u64, generation: u64) -> Self {
        let mut entries = snapshot.tracks().to_vec();
        let mut rng = StdRng::seed_from_u64(seed);
        entries.shuffle(&mut rng);
        Self {
            generation,
            seed,
            entries,
        }
    }

    /// Décale la première entrée en queue si elle porte l'identifiant donné
    ///
    /// Heuristique anti-répétition à la frontière de rotation : évite que le
    /// dernier morceau d'une playlist soit aussi le premier de la suivante.
    /// Sans effet si la playlist a moins de deux entrées.
    fn avoiding_lead(mut self, track_id: Option<&str>) -> Self {
        if let Some(id) = track_id {
            if self.entries.len() > 1 && self.entries[0].id == id {
                self.entries.rotate_left(1);
            }
        }
        self
    }

    pub fn entries(&self) -> &[Arc<Track>] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&Arc<Track>> {
        self.entries.get(index)
    }

    pub fn first(&self) -> Option<&Arc<Track>> {
        self.entries.first()
    }

    pub fn last(&self) -> Option<&Arc<Track>> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Anneau de playlists prêtes à diffuser
///
/// Le membre de tête est la playlist courante ; les suivants sont des
/// permutations différentes déjà synthétisées, promues quand la courante
/// s'épuise. L'anneau est regarni au moment de la promotion, sous le même
/// verrou d'état : le chemin de publication n'attend jamais un shuffle.
#[derive(Debug)]
pub struct RotationSet {
    members: VecDeque<Arc<Playlist>>,
    depth: usize,
    next_generation: u64,
}

impl RotationSet {
    /// Crée un anneau vide de profondeur donnée (minimum 2)
    pub fn new(depth: usize) -> Self {
        Self {
            members: VecDeque::new(),
            depth: depth.max(2),
            next_generation: 1,
        }
    }

    /// Playlist courante
    pub fn current(&self) -> Option<&Arc<Playlist>> {
        self.members.front()
    }

    /// Prochain membre de la rotation (déjà prêt)
    pub fn peek_next(&self) -> Option<&Arc<Playlist>> {
        self.members.get(1)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Regénère l'intégralité de l'anneau depuis un snapshot du catalogue
    ///
    /// Les anciennes playlists sont abandonnées (jamais mutées). Chaque
    /// membre est enchaîné avec la politique anti-répétition de frontière.
    pub fn regenerate<F: FnMut() -> u64>(&mut self, snapshot: &CatalogSnapshot, mut seeds: F) {
        self.members.clear();
        if snapshot.is_empty() {
            return;
        }

        for _ in 0..self.depth {
            self.synthesize(snapshot, seeds());
        }
    }

    /// Retire la playlist épuisée et promeut la suivante
    ///
    /// Une playlist de remplacement est synthétisée immédiatement pour
    /// restaurer la profondeur. Retourne la nouvelle playlist courante.
    pub fn promote(&mut self, snapshot: &CatalogSnapshot, seed: u64) -> Option<Arc<Playlist>> {
        let retired = self.members.pop_front();
        if let Some(retired) = retired {
            tracing::debug!(
                generation = retired.generation,
                "Rotation member exhausted, retiring"
            );
        }

        if !snapshot.is_empty() {
            while self.members.len() < self.depth {
                self.synthesize(snapshot, seed.wrapping_add(self.next_generation));
            }
        }

        self.current().cloned()
    }

    /// Synthétise une playlist en queue d'anneau
    fn synthesize(&mut self, snapshot: &CatalogSnapshot, seed: u64) {
        let generation = self.next_generation;
        self.next_generation += 1;

        let tail_last = self
            .members
            .back()
            .and_then(|p| p.last())
            .map(|t| t.id.clone());

        let playlist =
            Playlist::shuffled(snapshot, seed, generation).avoiding_lead(tail_last.as_deref());
        self.members.push_back(Arc::new(playlist));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pfmcatalog::Catalog;

    fn catalog(n: usize) -> Catalog {
        let tracks = (0..n)
            .map(|i| Track {
                id: format!("t{i}"),
                url: format!("https://cdn.example.com/t{i}.mp3"),
                title: format!("Track {i}"),
                artist: "Artist".to_string(),
                album: "Album".to_string(),
                duration_secs: Some(200),
                unreleased: false,
                cover_url: None,
            })
            .collect();
        Catalog::with_tracks(tracks)
    }

    #[test]
    fn test_shuffle_is_a_permutation() {
        let catalog = catalog(10);
        let snapshot = catalog.snapshot();
        let playlist = Playlist::shuffled(&snapshot, 42, 1);

        assert_eq!(playlist.len(), 10);
        let mut ids: Vec<_> = playlist.entries().iter().map(|t| t.id.clone()).collect();
        ids.sort();
        let mut expected: Vec<_> = snapshot.tracks().iter().map(|t| t.id.clone()).collect();
        expected.sort();
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_shuffle_is_reproducible() {
        let catalog = catalog(10);
        let snapshot = catalog.snapshot();
        let a = Playlist::shuffled(&snapshot, 42, 1);
        let b = Playlist::shuffled(&snapshot, 42, 2);
        let ids = |p: &Playlist| p.entries().iter().map(|t| t.id.clone()).collect::<Vec<_>>();
        assert_eq!(ids(&a), ids(&b));
    }

    #[test]
    fn test_regenerate_fills_to_depth() {
        let catalog = catalog(5);
        let mut seed = 0u64;
        let mut rotation = RotationSet::new(3);
        rotation.regenerate(&catalog.snapshot(), || {
            seed += 1;
            seed
        });

        assert_eq!(rotation.len(), 3);
        // Générations strictement croissantes
        assert_eq!(rotation.current().unwrap().generation, 1);
        assert_eq!(rotation.peek_next().unwrap().generation, 2);
    }

    #[test]
    fn test_regenerate_empty_snapshot_leaves_ring_empty() {
        let catalog = catalog(0);
        let mut rotation = RotationSet::new(3);
        rotation.regenerate(&catalog.snapshot(), || 7);
        assert!(rotation.is_empty());
    }

    #[test]
    fn test_promote_restores_depth_and_advances_generation() {
        let catalog = catalog(5);
        let snapshot = catalog.snapshot();
        let mut rotation = RotationSet::new(2);
        rotation.regenerate(&snapshot, || 11);

        let old_current = rotation.current().unwrap().generation;
        let promoted = rotation.promote(&snapshot, 99).unwrap();

        assert_eq!(rotation.len(), 2);
        assert!(promoted.generation > old_current);
        assert_eq!(rotation.current().unwrap().generation, promoted.generation);
    }

    #[test]
    fn test_boundary_no_repeat() {
        let catalog = catalog(8);
        let snapshot = catalog.snapshot();

        // De nombreuses promotions successives : jamais de répétition
        // dos-à-dos à la frontière entre deux membres consécutifs.
        let mut rotation = RotationSet::new(3);
        rotation.regenerate(&snapshot, || 3);

        for round in 0..50u64 {
            let members: Vec<_> = rotation.members.iter().cloned().collect();
            for pair in members.windows(2) {
                let last = pair[0].last().unwrap();
                let first = pair[1].first().unwrap();
                assert_ne!(last.id, first.id, "back-to-back repeat at rotation boundary");
            }
            rotation.promote(&snapshot, round * 31 + 7);
        }
    }

    #[test]
    fn test_boundary_policy_waived_for_single_track() {
        let catalog = catalog(1);
        let snapshot = catalog.snapshot();
        let mut rotation = RotationSet::new(2);
        rotation.regenerate(&snapshot, || 5);

        // Impossible d'éviter la répétition : la contrainte est levée
        assert_eq!(rotation.current().unwrap().len(), 1);
        assert_eq!(rotation.peek_next().unwrap().len(), 1);
    }
}
