//! Coordination du repli : garantir qu'une ressource valide est toujours publiable

use crate::publish::PublishPlan;

/// Motif d'engagement du repli
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    /// La station est arrêtée : la référence idle remplace la séquence
    Stopped,
    /// Tous les morceaux du catalogue sont devenus injouables
    CatalogDrained,
    /// Anneau de rotation vide alors que la station joue (violation interne)
    RotationEmptyWhilePlaying,
}

impl FallbackReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FallbackReason::Stopped => "stopped",
            FallbackReason::CatalogDrained => "catalog_drained",
            FallbackReason::RotationEmptyWhilePlaying => "rotation_empty_while_playing",
        }
    }
}

/// Coordinateur de repli
///
/// Détient la référence audio sûre (silence) et produit le plan de
/// substitution. Un arrêt explicite est un repli attendu ; les autres motifs
/// signalent un mode dégradé et sont remontés au niveau de log approprié.
#[derive(Debug, Clone)]
pub struct Fallback {
    idle_url: String,
}

impl Fallback {
    pub fn new(idle_url: String) -> Self {
        Self { idle_url }
    }

    pub fn idle_url(&self) -> &str {
        &self.idle_url
    }

    /// Produit le plan de substitution pour le motif donné
    pub fn engage(&self, reason: FallbackReason) -> PublishPlan {
        match reason {
            FallbackReason::Stopped => {
                tracing::debug!("Station stopped, publishing idle reference");
            }
            FallbackReason::CatalogDrained => {
                tracing::warn!(
                    idle_url = %self.idle_url,
                    "No playable track left in catalog, publishing idle reference"
                );
            }
            FallbackReason::RotationEmptyWhilePlaying => {
                // Violation d'invariant interne : jamais avalée en silence
                tracing::error!(
                    idle_url = %self.idle_url,
                    "Rotation set empty while playing, publishing idle reference"
                );
            }
        }
        PublishPlan::Idle(self.idle_url.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engage_always_yields_idle_plan() {
        let fallback = Fallback::new("file:///idle.mp3".to_string());
        for reason in [
            FallbackReason::Stopped,
            FallbackReason::CatalogDrained,
            FallbackReason::RotationEmptyWhilePlaying,
        ] {
            let plan = fallback.engage(reason);
            assert!(plan.is_idle());
            assert_eq!(plan.render(), "file:///idle.mp3\n");
        }
    }
}
