//! Chargement du manifeste JSON d'ingestion
//!
//! Le collaborateur d'ingestion (hors de ce coeur) dépose un manifeste JSON
//! listant les morceaux disponibles. Les métadonnées absentes sont dérivées
//! de l'URL : titre depuis le nom de fichier, album depuis le répertoire
//! parent, drapeau « unreleased » depuis le nom.

use crate::error::{Error, Result};
use crate::track::Track;
use percent_encoding::percent_decode_str;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Manifeste complet
#[derive(Debug, Deserialize)]
pub struct Manifest {
    /// Artiste par défaut pour les entrées qui n'en précisent pas
    #[serde(default)]
    pub artist: Option<String>,
    pub tracks: Vec<ManifestEntry>,
}

/// Une entrée du manifeste
///
/// Seule l'URL est obligatoire ; tout le reste est dérivable.
#[derive(Debug, Deserialize)]
pub struct ManifestEntry {
    pub url: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub album: Option<String>,
    #[serde(default)]
    pub duration_secs: Option<u32>,
    #[serde(default)]
    pub unreleased: Option<bool>,
    #[serde(default)]
    pub cover_url: Option<String>,
}

/// Charge un manifeste depuis un fichier et le résout en morceaux
pub fn load<P: AsRef<Path>>(path: P) -> Result<Vec<Track>> {
    let data = fs::read_to_string(path.as_ref())?;
    parse(&data)
}

/// Parse et résout un manifeste JSON
pub fn parse(json: &str) -> Result<Vec<Track>> {
    let manifest: Manifest = serde_json::from_str(json)?;
    let default_artist = manifest.artist.unwrap_or_else(|| "Unknown Artist".to_string());

    let mut tracks = Vec::with_capacity(manifest.tracks.len());
    for entry in manifest.tracks {
        if entry.url.trim().is_empty() {
            return Err(Error::ManifestError("entry with empty url".to_string()));
        }
        tracks.push(resolve_entry(entry, &default_artist));
    }
    Ok(tracks)
}

fn resolve_entry(entry: ManifestEntry, default_artist: &str) -> Track {
    let unreleased = entry
        .unreleased
        .unwrap_or_else(|| entry.url.to_lowercase().contains("unreleased"));

    let album = entry.album.unwrap_or_else(|| {
        if unreleased {
            "UNRELEASED".to_string()
        } else {
            album_from_url(&entry.url)
        }
    });

    Track {
        id: entry.id.unwrap_or_else(|| Track::id_for_url(&entry.url)),
        title: entry.title.unwrap_or_else(|| clean_title(&entry.url)),
        artist: entry.artist.unwrap_or_else(|| default_artist.to_string()),
        album,
        duration_secs: entry.duration_secs,
        unreleased,
        cover_url: entry.cover_url,
        url: entry.url,
    }
}

/// Album dérivé de l'avant-dernier segment du chemin
pub fn album_from_url(url: &str) -> String {
    let mut segments: Vec<&str> = url.split('/').filter(|s| !s.is_empty()).collect();
    segments.pop(); // nom de fichier
    match segments.last() {
        Some(dir) => decode(dir),
        None => "Unknown Album".to_string(),
    }
}

/// Titre dérivé du nom de fichier
///
/// Décode les échappements URL, retire l'extension, les numéros de piste en
/// tête ("01 ", "02 "), remplace `_`/`-` par des espaces et retire le tag
/// « unreleased ».
pub fn clean_title(url: &str) -> String {
    let filename = url.rsplit('/').next().unwrap_or(url);
    let decoded = decode(filename);

    // Retirer l'extension
    let mut title = match decoded.rsplit_once('.') {
        Some((stem, _ext)) if !stem.is_empty() => stem.to_string(),
        _ => decoded,
    };

    // Retirer un numéro de piste en tête (ex: "01 ", "02 ")
    if let Some((first, rest)) = title.split_once(' ') {
        if first.len() <= 2 && first.chars().all(|c| c.is_ascii_digit()) && !rest.is_empty() {
            title = rest.to_string();
        }
    }

    title = title.replace(['_', '-'], " ");

    // Retirer le tag unreleased
    if let Some((start, end)) = find_ascii_case_insensitive(&title, "unreleased") {
        title.replace_range(start..end, "");
    }

    title.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cherche `needle` (ASCII) dans `haystack` sans tenir compte de la casse
///
/// Retourne des bornes en octets valides dans `haystack` : la recherche se
/// fait caractère par caractère sur la chaîne d'origine, jamais via les
/// offsets d'une copie en minuscules (les minuscules de certains caractères
/// non-ASCII changent de longueur en octets).
fn find_ascii_case_insensitive(haystack: &str, needle: &str) -> Option<(usize, usize)> {
    for (start, _) in haystack.char_indices() {
        let mut end = start;
        let mut needle_chars = needle.chars();
        let mut hay_chars = haystack[start..].chars();
        loop {
            let Some(nc) = needle_chars.next() else {
                return Some((start, end));
            };
            match hay_chars.next() {
                Some(hc) if hc.eq_ignore_ascii_case(&nc) => end += hc.len_utf8(),
                _ => break,
            }
        }
    }
    None
}

fn decode(s: &str) -> String {
    percent_decode_str(s).decode_utf8_lossy().to_string()
}
