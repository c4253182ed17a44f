//! # Settings
//!
//! Runtime configuration, resolved in this order (later wins):
//!
//! 1. [`Settings::default`]
//! 2. An optional JSON settings file
//! 3. Environment variables (`GEOM_STORE_PATH`, `GEOM_USER`,
//!    `GEOM_DEFAULT_MATERIAL`, `GEOM_ROOT_PRECISION`)
//!
//! ## Example
//!
//! ```rust
//! use geom_core::config::Settings;
//!
//! let settings = Settings::default();
//! assert_eq!(settings.store_path.to_str(), Some("geometry_calculations.json"));
//! assert_eq!(settings.root_precision, 1e-10);
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::arithmetic::DEFAULT_PRECISION;
use crate::errors::{GeomError, GeomResult};
use crate::materials::{self, Material};

pub const ENV_STORE_PATH: &str = "GEOM_STORE_PATH";
pub const ENV_USER: &str = "GEOM_USER";
pub const ENV_DEFAULT_MATERIAL: &str = "GEOM_DEFAULT_MATERIAL";
pub const ENV_ROOT_PRECISION: &str = "GEOM_ROOT_PRECISION";

/// Default store file name, relative to the working directory
pub const DEFAULT_STORE_FILE: &str = "geometry_calculations.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Record store file
    pub store_path: PathBuf,

    /// Identity written into store lock files
    pub user_id: String,

    /// Convergence threshold for Newton root finding
    pub root_precision: f64,

    /// Built-in material attached to new shapes when none is given
    pub default_material: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            store_path: PathBuf::from(DEFAULT_STORE_FILE),
            user_id: std::env::var("USER")
                .or_else(|_| std::env::var("USERNAME"))
                .unwrap_or_else(|_| "unknown".to_string()),
            root_precision: DEFAULT_PRECISION,
            default_material: None,
        }
    }
}

impl Settings {
    /// Defaults, then `file` (if given), then the process environment.
    pub fn load(file: Option<&Path>) -> GeomResult<Self> {
        let settings = match file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        settings.with_overrides(|key| std::env::var(key).ok())
    }

    /// Read settings from a JSON file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> GeomResult<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| GeomError::file_error("read settings", path.display().to_string(), e.to_string()))?;
        serde_json::from_str(&contents).map_err(|e| GeomError::SerializationError {
            reason: format!("Invalid settings in {}: {}", path.display(), e),
        })
    }

    /// Apply overrides from `lookup` (normally the environment).
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> GeomResult<Self> {
        if let Some(path) = lookup(ENV_STORE_PATH) {
            self.store_path = PathBuf::from(path);
        }
        if let Some(user) = lookup(ENV_USER) {
            self.user_id = user;
        }
        if let Some(material) = lookup(ENV_DEFAULT_MATERIAL) {
            self.default_material = Some(material);
        }
        if let Some(raw) = lookup(ENV_ROOT_PRECISION) {
            self.root_precision = raw.trim().parse().map_err(|_| {
                GeomError::invalid_input(ENV_ROOT_PRECISION, raw.clone(), "Expected a floating-point number")
            })?;
        }
        Ok(self)
    }

    /// Resolve `default_material` against the built-in catalog.
    pub fn default_material(&self) -> GeomResult<Option<Material>> {
        self.default_material
            .as_deref()
            .map(materials::find_builtin)
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_overrides() {
        let settings = Settings::default()
            .with_overrides(lookup_from(&[
                (ENV_STORE_PATH, "/tmp/other.json"),
                (ENV_USER, "alice"),
                (ENV_DEFAULT_MATERIAL, "copper"),
                (ENV_ROOT_PRECISION, "1e-6"),
            ]))
            .unwrap();

        assert_eq!(settings.store_path, PathBuf::from("/tmp/other.json"));
        assert_eq!(settings.user_id, "alice");
        assert_eq!(settings.root_precision, 1e-6);
        assert_eq!(settings.default_material().unwrap(), Some(Material::copper()));
    }

    #[test]
    fn test_bad_precision_override() {
        let err = Settings::default()
            .with_overrides(lookup_from(&[(ENV_ROOT_PRECISION, "tiny")]))
            .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_unknown_default_material() {
        let settings = Settings {
            default_material: Some("Mithril".to_string()),
            ..Settings::default()
        };
        assert!(settings.default_material().is_err());
    }

    #[test]
    fn test_from_file_partial() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "store_path": "calcs.json" }"#).unwrap();

        let settings = Settings::from_file(&path).unwrap();
        assert_eq!(settings.store_path, PathBuf::from("calcs.json"));
        assert_eq!(settings.root_precision, DEFAULT_PRECISION);
        assert_eq!(settings.default_material, None);
    }
}
