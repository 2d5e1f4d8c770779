//! Extension de pfmconfig pour la station

use crate::station::StationOptions;
use serde_yaml::Value;

/// Trait d'extension pour pfmconfig::Config
pub trait StationConfigExt {
    /// Profondeur de l'anneau de rotation
    fn rotation_depth(&self) -> usize;
    /// Nombre de morceaux à venir dans /status
    fn status_lookahead(&self) -> usize;
    /// Nombre maximum de lignes publiées dans playlist.txt
    fn publish_window(&self) -> usize;
    /// Référence audio sûre publiée en repli
    fn idle_track_url(&self) -> String;
    /// Démarrage automatique de la diffusion au boot
    fn autostart(&self) -> bool;
    /// Options de station assemblées depuis la configuration
    fn station_options(&self) -> StationOptions;
}

fn usize_at(config: &pfmconfig::Config, path: &[&str], default: usize) -> usize {
    match config.get_value(path) {
        Ok(Value::Number(n)) if n.is_u64() => n.as_u64().unwrap() as usize,
        Ok(Value::Number(n)) if n.is_i64() => n.as_i64().unwrap().max(0) as usize,
        _ => default,
    }
}

impl StationConfigExt for pfmconfig::Config {
    fn rotation_depth(&self) -> usize {
        usize_at(self, &["station", "rotation_depth"], 3)
    }

    fn status_lookahead(&self) -> usize {
        usize_at(self, &["station", "status_lookahead"], 25)
    }

    fn publish_window(&self) -> usize {
        usize_at(self, &["station", "publish_window"], 50)
    }

    fn idle_track_url(&self) -> String {
        match self.get_value(&["station", "idle_track_url"]) {
            Ok(Value::String(s)) if !s.is_empty() => s,
            _ => StationOptions::default().idle_track_url,
        }
    }

    fn autostart(&self) -> bool {
        match self.get_value(&["station", "autostart"]) {
            Ok(Value::Bool(b)) => b,
            _ => true,
        }
    }

    fn station_options(&self) -> StationOptions {
        StationOptions {
            rotation_depth: self.rotation_depth(),
            status_lookahead: self.status_lookahead(),
            publish_window: self.publish_window(),
            idle_track_url: self.idle_track_url(),
        }
    }
}
