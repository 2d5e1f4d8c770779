//! Station : machine à états de lecture et unique état mutable partagé

use crate::fallback::{Fallback, FallbackReason};
use crate::publish::PublishPlan;
use crate::rotation::RotationSet;
use crate::{Error, Result};
use pfmcatalog::{Catalog, CatalogSnapshot, Track};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::{broadcast, RwLock};

/// État de marche de la station
///
/// `Starting` et `Reloading` sont transitoires : ils ne sont jamais
/// observables depuis l'extérieur d'une opération de contrôle, un poll
/// concurrent voit toujours un snapshot complet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Stopped,
    Starting,
    Playing,
    Reloading,
}

impl RunState {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunState::Stopped => "stopped",
            RunState::Starting => "starting",
            RunState::Playing => "playing",
            RunState::Reloading => "reloading",
        }
    }
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options de la station
#[derive(Debug, Clone)]
pub struct StationOptions {
    /// Profondeur de l'anneau de rotation (minimum 2)
    pub rotation_depth: usize,
    /// Nombre de morceaux à venir retournés par `status()`
    pub status_lookahead: usize,
    /// Nombre maximum de lignes publiées pour le moteur audio
    pub publish_window: usize,
    /// Référence audio sûre publiée en repli
    pub idle_track_url: String,
}

impl Default for StationOptions {
    fn default() -> Self {
        Self {
            rotation_depth: 3,
            status_lookahead: 25,
            publish_window: 50,
            idle_track_url: "file:///usr/share/pulsarfm/silence.mp3".to_string(),
        }
    }
}

/// Évènement émis par la station
#[derive(Debug, Clone)]
pub struct StationEvent {
    pub kind: StationEventKind,
}

/// Variantes d'évènements station
#[derive(Debug, Clone)]
pub enum StationEventKind {
    /// La diffusion a démarré
    Started,
    /// La diffusion a été arrêtée
    Stopped,
    /// Le morceau courant a été sauté
    Skipped { track_id: Option<String> },
    /// Un morceau a été demandé en tête de file
    TrackRequested { track_id: String },
    /// L'anneau de rotation a été regénéré
    Reshuffled { generation: u64 },
    /// Un membre de rotation a été promu
    RotationPromoted { generation: u64 },
    /// Le repli a été engagé (mode dégradé)
    FallbackEngaged { reason: FallbackReason },
    /// Le catalogue a été remplacé atomiquement
    CatalogReplaced { tracks: usize },
}

/// Évènement enrichi pour diffusion (timestamp)
#[derive(Debug, Clone)]
pub struct StationEventEnvelope {
    pub event: StationEvent,
    pub timestamp: std::time::SystemTime,
}

/// Vue en lecture seule de l'état de lecture
#[derive(Debug, Clone)]
pub struct StationStatus {
    pub run_state: RunState,
    /// Tête de la séquence effective (morceau en cours / imminent)
    pub current: Option<Arc<Track>>,
    /// Morceaux suivants, borné par `status_lookahead`
    pub upcoming: Vec<Arc<Track>>,
    /// Génération de la playlist courante
    pub generation: Option<u64>,
}

/// État de lecture : la seule donnée mutable partagée du système
struct PlaybackState {
    run_state: RunState,
    rotation: RotationSet,
    /// Position du morceau courant dans la playlist de tête
    index: usize,
    /// File de requêtes : insérées devant la rotation, une seule écoute
    requests: VecDeque<Arc<Track>>,
}

/// La station : playlists en rotation + machine à états + publication
///
/// Toutes les opérations de contrôle sont bornées, en mémoire, et
/// sérialisées par le verrou d'état. Aucune I/O sous le verrou.
pub struct Station {
    catalog: Arc<Catalog>,
    state: RwLock<PlaybackState>,
    rng: Mutex<StdRng>,
    options: StationOptions,
    fallback: Fallback,
    event_tx: broadcast::Sender<StationEventEnvelope>,
}

impl Station {
    /// Crée une station (graine tirée de l'entropie système)
    pub fn new(catalog: Arc<Catalog>, options: StationOptions) -> Self {
        Self::with_rng(catalog, options, StdRng::from_os_rng())
    }

    /// Crée une station avec une graine explicite (tests reproductibles)
    pub fn with_seed(catalog: Arc<Catalog>, options: StationOptions, seed: u64) -> Self {
        Self::with_rng(catalog, options, StdRng::seed_from_u64(seed))
    }

    fn with_rng(catalog: Arc<Catalog>, options: StationOptions, rng: StdRng) -> Self {
        let fallback = Fallback::new(options.idle_track_url.clone());
        Self {
            catalog,
            state: RwLock::new(PlaybackState {
                run_state: RunState::Stopped,
                rotation: RotationSet::new(options.rotation_depth),
                index: 0,
                requests: VecDeque::new(),
            }),
            rng: Mutex::new(rng),
            options,
            fallback,
            event_tx: broadcast::channel(256).0,
        }
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn options(&self) -> &StationOptions {
        &self.options
    }

    /// Souscrit au flux d'évènements de la station
    pub fn subscribe_events(&self) -> broadcast::Receiver<StationEventEnvelope> {
        self.event_tx.subscribe()
    }

    fn emit(&self, kind: StationEventKind) {
        let envelope = StationEventEnvelope {
            event: StationEvent { kind },
            timestamp: std::time::SystemTime::now(),
        };
        // Ignoré si aucun abonné
        let _ = self.event_tx.send(envelope);
    }

    fn next_seed(&self) -> u64 {
        self.rng.lock().unwrap().next_u64()
    }

    /// Démarre la diffusion
    ///
    /// Idempotent : appeler `start()` en cours de lecture est un succès sans
    /// effet. Échoue avec [`Error::CatalogEmpty`] si le catalogue est vide ;
    /// la station reste alors arrêtée.
    pub async fn start(&self) -> Result<()> {
        let mut state = self.state.write().await;

        if state.run_state == RunState::Playing {
            tracing::debug!("start() while already playing, no-op");
            return Ok(());
        }

        let snapshot = self.catalog.snapshot();
        if snapshot.is_empty() {
            return Err(Error::CatalogEmpty);
        }

        state.run_state = RunState::Starting;
        {
            let mut rng = self.rng.lock().unwrap();
            state.rotation.regenerate(&snapshot, || rng.next_u64());
        }
        state.index = 0;
        state.run_state = RunState::Playing;
        let generation = state.rotation.current().map(|p| p.generation);
        drop(state);

        tracing::info!(?generation, tracks = snapshot.len(), "Station started");
        self.emit(StationEventKind::Started);
        Ok(())
    }

    /// Arrête la diffusion
    ///
    /// Idempotent. La publication dégrade ensuite vers la référence idle,
    /// jamais vers une erreur ni un corps vide.
    pub async fn stop(&self) {
        let mut state = self.state.write().await;
        if state.run_state == RunState::Stopped {
            return;
        }
        state.run_state = RunState::Stopped;
        drop(state);

        tracing::info!("Station stopped");
        self.emit(StationEventKind::Stopped);
    }

    /// Saute le morceau courant
    ///
    /// Sans effet (succès) si la station est arrêtée. Promeut la rotation si
    /// la playlist courante est épuisée.
    pub async fn skip(&self) -> Result<()> {
        let mut state = self.state.write().await;

        if state.run_state != RunState::Playing {
            tracing::debug!("skip() while stopped, no-op");
            return Ok(());
        }

        let mut promoted_generation = None;
        let skipped = if let Some(requested) = state.requests.pop_front() {
            Some(requested.id.clone())
        } else {
            let current_len = state.rotation.current().map(|p| p.len()).unwrap_or(0);
            let skipped = state
                .rotation
                .current()
                .and_then(|p| p.get(state.index))
                .map(|t| t.id.clone());

            state.index += 1;
            if state.index >= current_len {
                let snapshot = self.catalog.snapshot();
                let seed = self.next_seed();
                let promoted = state.rotation.promote(&snapshot, seed);
                state.index = 0;
                promoted_generation = promoted.map(|p| p.generation);
            }
            skipped
        };
        drop(state);

        if let Some(generation) = promoted_generation {
            tracing::info!(generation, "Rotation member promoted");
            self.emit(StationEventKind::RotationPromoted { generation });
        }
        self.emit(StationEventKind::Skipped { track_id: skipped });
        Ok(())
    }

    /// Demande un morceau précis en tête de séquence
    ///
    /// Le morceau devient la prochaine entrée publiée sans déplacer le
    /// curseur de la rotation : la rotation reprend exactement où elle en
    /// était une fois le morceau joué.
    pub async fn play_next(&self, track_id: &str) -> Result<Arc<Track>> {
        let track = self
            .catalog
            .get(track_id)
            .ok_or_else(|| Error::TrackNotFound(track_id.to_string()))?;

        let mut state = self.state.write().await;
        state.requests.push_front(track.clone());
        drop(state);

        tracing::info!(track_id = %track.id, title = %track.title, "Track requested");
        self.emit(StationEventKind::TrackRequested {
            track_id: track.id.clone(),
        });
        Ok(track)
    }

    /// Regénère l'intégralité de l'anneau de rotation
    ///
    /// Échoue avec [`Error::NotPlaying`] si la station est arrêtée. Un poll
    /// concurrent pendant la regénération reçoit toujours une liste valide
    /// (éventuellement l'ancienne), jamais une erreur ni un corps vide.
    pub async fn reshuffle(&self) -> Result<u64> {
        let mut state = self.state.write().await;

        if state.run_state != RunState::Playing {
            return Err(Error::NotPlaying);
        }

        let snapshot = self.catalog.snapshot();
        if snapshot.is_empty() {
            // Catalogue vidé en cours de route : la station reste en lecture
            // dégradée, la publication bascule sur la référence idle.
            return Err(Error::CatalogEmpty);
        }

        state.run_state = RunState::Reloading;
        {
            let mut rng = self.rng.lock().unwrap();
            state.rotation.regenerate(&snapshot, || rng.next_u64());
        }
        state.index = 0;
        state.run_state = RunState::Playing;
        let generation = state
            .rotation
            .current()
            .map(|p| p.generation)
            .unwrap_or_default();
        drop(state);

        tracing::info!(generation, "Rotation set reshuffled");
        self.emit(StationEventKind::Reshuffled { generation });
        Ok(generation)
    }

    /// État courant : fonction pure de l'état, ne mute jamais rien
    pub async fn status(&self) -> StationStatus {
        let state = self.state.read().await;

        if state.run_state == RunState::Stopped {
            return StationStatus {
                run_state: state.run_state,
                current: None,
                upcoming: Vec::new(),
                generation: None,
            };
        }

        let snapshot = self.catalog.snapshot();
        let mut sequence =
            Self::effective_sequence(&state, &snapshot, self.options.status_lookahead + 1);
        let current = if sequence.is_empty() {
            None
        } else {
            Some(sequence.remove(0))
        };

        StationStatus {
            run_state: state.run_state,
            current,
            upcoming: sequence,
            generation: state.rotation.current().map(|p| p.generation),
        }
    }

    /// Remplace le catalogue d'un bloc (appelé par l'ingestion hors-bande)
    pub fn replace_catalog(&self, tracks: Vec<Track>) {
        let count = tracks.len();
        self.catalog.replace_all(tracks);
        self.emit(StationEventKind::CatalogReplaced { tracks: count });
    }

    /// Calcule ce qui doit être publié au prochain poll du moteur audio
    ///
    /// File de requêtes, puis playlist courante depuis la position courante,
    /// puis tête du membre suivant ; borné par `publish_window`. Les entrées
    /// retirées du catalogue sont filtrées. Jamais vide : le coordinateur de
    /// repli substitue la référence idle.
    pub async fn publish_plan(&self) -> PublishPlan {
        let state = self.state.read().await;

        if state.run_state == RunState::Stopped {
            drop(state);
            let reason = FallbackReason::Stopped;
            self.emit(StationEventKind::FallbackEngaged { reason });
            return self.fallback.engage(reason);
        }

        let snapshot = self.catalog.snapshot();

        if state.rotation.is_empty() {
            let reason = if snapshot.is_empty() {
                FallbackReason::CatalogDrained
            } else {
                FallbackReason::RotationEmptyWhilePlaying
            };
            drop(state);
            self.emit(StationEventKind::FallbackEngaged { reason });
            return self.fallback.engage(reason);
        }

        if state.rotation.peek_next().is_none() {
            // Sous-alimentation : on publie la queue valide restante sans
            // bloquer le chemin de publication.
            tracing::warn!("Rotation underrun: no ready replacement, publishing remaining tail");
        }

        let entries = Self::effective_sequence(&state, &snapshot, self.options.publish_window);
        drop(state);

        if entries.is_empty() {
            let reason = FallbackReason::CatalogDrained;
            self.emit(StationEventKind::FallbackEngaged { reason });
            return self.fallback.engage(reason);
        }

        PublishPlan::Normal(entries)
    }

    /// Séquence effective à venir, bornée et filtrée par le catalogue courant
    fn effective_sequence(
        state: &PlaybackState,
        snapshot: &CatalogSnapshot,
        cap: usize,
    ) -> Vec<Arc<Track>> {
        let mut out: Vec<Arc<Track>> = Vec::with_capacity(cap.min(64));

        for track in &state.requests {
            if out.len() >= cap {
                return out;
            }
            if snapshot.contains(&track.id) {
                out.push(track.clone());
            }
        }

        if let Some(current) = state.rotation.current() {
            for track in current.entries().iter().skip(state.index) {
                if out.len() >= cap {
                    return out;
                }
                if snapshot.contains(&track.id) {
                    out.push(track.clone());
                }
            }
        }

        if let Some(next) = state.rotation.peek_next() {
            for track in next.entries() {
                if out.len() >= cap {
                    return out;
                }
                if snapshot.contains(&track.id) {
                    out.push(track.clone());
                }
            }
        }

        out
    }
}
