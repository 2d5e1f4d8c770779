//! Tests d'intégration du cycle de vie complet de la station :
//! démarrage, publication, skip, demandes explicites, reshuffle, repli.

use std::sync::Arc;

use pfmcatalog::{Catalog, Track};
use pfmstation::{PublishPlan, RunState, Station, StationOptions};

fn make_track(i: usize) -> Track {
    let url = format!("https://cdn.example.com/album/{i:02}_track.mp3");
    Track {
        id: Track::id_for_url(&url),
        url,
        title: format!("Track {i}"),
        artist: "The Example Band".to_string(),
        album: "Album".to_string(),
        duration_secs: Some(200),
        unreleased: false,
        cover_url: None,
    }
}

fn make_catalog(n: usize) -> Arc<Catalog> {
    Arc::new(Catalog::with_tracks((0..n).map(make_track).collect()))
}

fn make_station(n: usize, seed: u64) -> Station {
    Station::with_seed(make_catalog(n), StationOptions::default(), seed)
}

fn plan_urls(plan: &PublishPlan) -> Vec<String> {
    plan.render().lines().map(|l| l.to_string()).collect()
}

#[tokio::test]
async fn test_stopped_station_publishes_idle_reference() {
    let station = make_station(10, 1);

    let plan = station.publish_plan().await;
    assert!(plan.is_idle());

    let rendered = plan.render();
    assert!(rendered.ends_with('\n'));
    assert_eq!(rendered.lines().count(), 1);
}

#[tokio::test]
async fn test_start_publishes_status_head_first() {
    let station = make_station(10, 7);
    station.start().await.unwrap();

    let status = station.status().await;
    assert_eq!(status.run_state, RunState::Playing);
    let current = status.current.expect("playing station has a current track");

    let plan = station.publish_plan().await;
    assert!(!plan.is_idle());
    let urls = plan_urls(&plan);
    assert_eq!(urls[0], current.url);

    // La publication prolonge exactement le status
    let status_urls: Vec<String> = std::iter::once(current.url.clone())
        .chain(status.upcoming.iter().map(|t| t.url.clone()))
        .collect();
    assert_eq!(&urls[..status_urls.len()], &status_urls[..]);
}

#[tokio::test]
async fn test_skip_advances_published_head() {
    let station = make_station(10, 7);
    station.start().await.unwrap();

    let before = plan_urls(&station.publish_plan().await);
    station.skip().await.unwrap();
    let after = plan_urls(&station.publish_plan().await);

    assert_eq!(after[0], before[1]);
    let current = station.status().await.current.unwrap();
    assert_eq!(current.url, after[0]);
}

#[tokio::test]
async fn test_play_next_takes_publication_head() {
    let station = make_station(10, 7);
    station.start().await.unwrap();

    let head_before = station.status().await.current.unwrap();
    let wanted = station
        .catalog()
        .tracks()
        .iter()
        .find(|t| t.id != head_before.id)
        .cloned()
        .unwrap();

    let requested = station.play_next(&wanted.id).await.unwrap();
    assert_eq!(requested.id, wanted.id);

    let urls = plan_urls(&station.publish_plan().await);
    assert_eq!(urls[0], wanted.url);
    // Le morceau interrompu reste le suivant
    assert_eq!(urls[1], head_before.url);

    // Un skip consomme la demande et restaure la séquence de rotation
    station.skip().await.unwrap();
    let urls = plan_urls(&station.publish_plan().await);
    assert_eq!(urls[0], head_before.url);
}

#[tokio::test]
async fn test_latest_request_takes_publication_head() {
    let station = make_station(10, 3);
    station.start().await.unwrap();

    let tracks = station.catalog().tracks();
    let first = tracks[4].clone();
    let second = tracks[7].clone();

    station.play_next(&first.id).await.unwrap();
    station.play_next(&second.id).await.unwrap();

    let urls = plan_urls(&station.publish_plan().await);
    assert_eq!(urls[0], second.url);
    assert_eq!(urls[1], first.url);
}

#[tokio::test]
async fn test_exhausted_playlist_promotes_next_member() {
    let station = make_station(4, 11);
    station.start().await.unwrap();

    let first_generation = station.status().await.generation.unwrap();

    // Épuise le membre courant : la promotion doit être transparente
    for _ in 0..4 {
        station.skip().await.unwrap();
    }

    let status = station.status().await;
    assert_eq!(status.run_state, RunState::Playing);
    assert!(status.generation.unwrap() > first_generation);

    let plan = station.publish_plan().await;
    assert!(!plan.is_idle());
}

#[tokio::test]
async fn test_publication_never_repeats_across_boundary() {
    let station = make_station(6, 19);
    station.start().await.unwrap();

    let mut previous: Option<String> = None;
    for _ in 0..60 {
        let head = station.status().await.current.unwrap().id.clone();
        if let Some(prev) = &previous {
            assert_ne!(prev, &head, "same track published twice in a row");
        }
        previous = Some(head);
        station.skip().await.unwrap();
    }
}

#[tokio::test]
async fn test_reshuffle_changes_generation_and_stays_playing() {
    let station = make_station(10, 5);
    station.start().await.unwrap();

    let before = station.status().await.generation.unwrap();
    let generation = station.reshuffle().await.unwrap();
    assert!(generation > before);

    let status = station.status().await;
    assert_eq!(status.run_state, RunState::Playing);
    assert_eq!(status.generation, Some(generation));
    assert!(!station.publish_plan().await.is_idle());
}

#[tokio::test]
async fn test_stop_without_start_then_full_cycle() {
    let station = make_station(10, 2);

    // stop sur une station déjà arrêtée : sans effet
    station.stop().await;
    assert_eq!(station.status().await.run_state, RunState::Stopped);

    station.start().await.unwrap();
    station.stop().await;

    let status = station.status().await;
    assert_eq!(status.run_state, RunState::Stopped);
    assert!(status.current.is_none());
    assert!(status.upcoming.is_empty());
    assert!(station.publish_plan().await.is_idle());
}

#[tokio::test]
async fn test_retracted_tracks_disappear_from_publication() {
    let station = make_station(10, 13);
    station.start().await.unwrap();

    let head = station.status().await.current.unwrap();

    // Nouveau catalogue sans le morceau en tête
    let remaining: Vec<Track> = station
        .catalog()
        .tracks()
        .iter()
        .filter(|t| t.id != head.id)
        .map(|t| t.as_ref().clone())
        .collect();
    station.replace_catalog(remaining);

    let urls = plan_urls(&station.publish_plan().await);
    assert!(!urls.contains(&head.url));
    assert!(!urls.is_empty());
}

#[tokio::test]
async fn test_catalog_drained_while_playing_degrades_to_idle() {
    let station = make_station(5, 23);
    station.start().await.unwrap();

    station.replace_catalog(Vec::new());

    // La station reste en lecture mais publie la référence idle
    let plan = station.publish_plan().await;
    assert!(plan.is_idle());
    assert_eq!(station.status().await.run_state, RunState::Playing);

    // Un reshuffle explicite signale le catalogue vide
    let err = station.reshuffle().await.unwrap_err();
    assert!(matches!(err, pfmstation::Error::CatalogEmpty));
}

#[tokio::test]
async fn test_same_seed_same_sequence() {
    let a = make_station(10, 99);
    let b = make_station(10, 99);
    a.start().await.unwrap();
    b.start().await.unwrap();

    assert_eq!(
        plan_urls(&a.publish_plan().await),
        plan_urls(&b.publish_plan().await)
    );
}

#[tokio::test]
async fn test_publication_is_bounded_by_window() {
    let options = StationOptions {
        publish_window: 8,
        ..StationOptions::default()
    };
    let station = Station::with_seed(make_catalog(30), options, 31);
    station.start().await.unwrap();

    let urls = plan_urls(&station.publish_plan().await);
    assert_eq!(urls.len(), 8);
}

#[tokio::test]
async fn test_status_lookahead_is_bounded() {
    let options = StationOptions {
        status_lookahead: 5,
        ..StationOptions::default()
    };
    let station = Station::with_seed(make_catalog(30), options, 37);
    station.start().await.unwrap();

    let status = station.status().await;
    assert!(status.current.is_some());
    assert_eq!(status.upcoming.len(), 5);
}
