//! PublishPlan : rendu de l'état courant pour le moteur audio
//!
//! Le moteur audio externe vient relire la ressource texte à son propre
//! rythme (intégration pull, sans canal retour). Le rendu est une fonction
//! pure de l'état : une URL jouable par ligne, jamais de corps vide.

use pfmcatalog::Track;
use std::sync::Arc;

/// Ce qui doit être publié au prochain poll
///
/// Variante taguée plutôt que liste potentiellement vide : le repli vers la
/// référence silence est explicite, pas un cas limite dispersé dans le rendu.
#[derive(Debug, Clone)]
pub enum PublishPlan {
    /// Séquence effective à venir (non vide par construction)
    Normal(Vec<Arc<Track>>),
    /// Référence idle/silence configurée
    Idle(String),
}

impl PublishPlan {
    /// Rend la ressource ligne-par-ligne consommée par le moteur audio
    ///
    /// Toujours non vide : la variante `Idle` rend la référence silence.
    pub fn render(&self) -> String {
        match self {
            PublishPlan::Normal(tracks) => {
                let mut body = String::new();
                for track in tracks {
                    body.push_str(&track.url);
                    body.push('\n');
                }
                body
            }
            PublishPlan::Idle(url) => format!("{url}\n"),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, PublishPlan::Idle(_))
    }

    /// Morceaux de la séquence normale (vide pour `Idle`)
    pub fn tracks(&self) -> &[Arc<Track>] {
        match self {
            PublishPlan::Normal(tracks) => tracks,
            PublishPlan::Idle(_) => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pfmcatalog::Catalog;

    fn track(id: &str) -> Track {
        Track {
            id: id.to_string(),
            url: format!("https://cdn.example.com/{id}.mp3"),
            title: id.to_string(),
            artist: "Artist".to_string(),
            album: "Album".to_string(),
            duration_secs: None,
            unreleased: false,
            cover_url: None,
        }
    }

    #[test]
    fn test_render_one_url_per_line() {
        let plan = PublishPlan::Normal(vec![Arc::new(track("a")), Arc::new(track("b"))]);
        assert_eq!(
            plan.render(),
            "https://cdn.example.com/a.mp3\nhttps://cdn.example.com/b.mp3\n"
        );
    }

    #[test]
    fn test_render_idle() {
        let plan = PublishPlan::Idle("file:///silence.mp3".to_string());
        assert_eq!(plan.render(), "file:///silence.mp3\n");
        assert!(plan.is_idle());
    }

    #[test]
    fn test_render_round_trips_through_catalog() {
        // Chaque ligne publiée doit se résoudre vers le même morceau via le
        // catalogue : aucune transformation avec perte.
        let tracks = vec![track("a"), track("b"), track("c")];
        let catalog = Catalog::with_tracks(tracks.clone());

        let plan = PublishPlan::Normal(
            tracks
                .iter()
                .map(|t| catalog.get(&t.id).unwrap())
                .collect(),
        );

        let rendered = plan.render();
        let resolved: Vec<_> = rendered
            .lines()
            .map(|line| {
                catalog
                    .tracks()
                    .into_iter()
                    .find(|t| t.url == line)
                    .expect("published line resolves to a catalog track")
            })
            .collect();

        let expected: Vec<_> = plan.tracks().iter().map(|t| t.id.clone()).collect();
        let recovered: Vec<_> = resolved.iter().map(|t| t.id.clone()).collect();
        assert_eq!(expected, recovered);
    }
}
