//! Extension de pfmconfig pour le catalogue

/// Trait d'extension pour pfmconfig::Config
pub trait CatalogConfigExt {
    /// Retourne le chemin absolu du manifeste de catalogue
    fn catalog_manifest_path(&self) -> String;
}

impl CatalogConfigExt for pfmconfig::Config {
    fn catalog_manifest_path(&self) -> String {
        let configured = match self.get_value(&["station", "catalog_manifest"]) {
            Ok(serde_yaml::Value::String(s)) if !s.is_empty() => s,
            _ => "catalog.json".to_string(),
        };
        self.resolve_path(&configured)
    }
}
