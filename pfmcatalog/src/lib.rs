//! # pfmcatalog - Catalogue de morceaux diffusables
//!
//! Cette crate fournit le magasin canonique des morceaux disponibles pour la
//! station :
//! - Modèle `Track` immuable (identifiant stable, URL jouable, métadonnées)
//! - Snapshots atomiques : le catalogue est remplacé d'un bloc, jamais
//!   partiellement mis à jour
//! - Chargement d'un manifeste JSON écrit par le collaborateur d'ingestion
//!
//! Le catalogue est en lecture seule pour le reste du système ; la seule
//! mutation est `replace_all()`, appelée hors-bande lors d'une ré-ingestion.
//!
//! # Exemple d'utilisation
//!
//! ```no_run
//! use pfmcatalog::{Catalog, manifest};
//!
//! # fn main() -> pfmcatalog::Result<()> {
//! let catalog = Catalog::new();
//! let tracks = manifest::load("catalog.json")?;
//! catalog.replace_all(tracks);
//!
//! for track in catalog.tracks() {
//!     println!("{} - {}", track.artist, track.title);
//! }
//! # Ok(())
//! # }
//! ```

mod error;
pub mod manifest;
mod store;
mod track;

#[cfg(feature = "pfmconfig")]
mod config_ext;

// Réexports publics
pub use error::{Error, Result};
pub use store::{Catalog, CatalogSnapshot};
pub use track::Track;

#[cfg(feature = "pfmconfig")]
pub use config_ext::CatalogConfigExt;
