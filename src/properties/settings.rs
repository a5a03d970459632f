//! Bootstrap settings loaded from a TOML file.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::builder::{Bootstrap, DEFAULT_SUFFIX};
use super::{PropertiesError, PropertyStore};

/// Where and how to load properties from.
///
/// ```toml
/// root = "etc/config"
/// hierarchy = ["defaults", "site", "local"]
/// suffix = ".properties"
/// debug = false
/// ```
///
/// `hierarchy` is optional in the file so that its absence surfaces as
/// [`PropertiesError::MissingHierarchy`] when loading.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BootstrapSettings {
    pub root: PathBuf,
    #[serde(default)]
    pub hierarchy: Option<Vec<String>>,
    #[serde(default = "default_suffix")]
    pub suffix: String,
    #[serde(default)]
    pub debug: bool,
}

fn default_suffix() -> String {
    DEFAULT_SUFFIX.to_string()
}

impl BootstrapSettings {
    /// Reads settings from a TOML file.
    ///
    /// A relative `root` is resolved against the settings file's directory.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, PropertiesError> {
        let path = path.as_ref();
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(PropertiesError::SettingsNotFound(path.to_path_buf()));
            }
            Err(e) => {
                return Err(PropertiesError::SettingsRead {
                    path: path.to_path_buf(),
                    source: e,
                });
            }
        };

        let mut settings: Self =
            toml::from_str(&contents).map_err(|e| PropertiesError::SettingsParse {
                path: path.to_path_buf(),
                source: e,
            })?;
        if settings.root.is_relative() {
            if let Some(parent) = path.parent() {
                settings.root = parent.join(&settings.root);
            }
        }
        Ok(settings)
    }

    /// Loads the store these settings describe.
    pub fn load(&self) -> Result<PropertyStore, PropertiesError> {
        Bootstrap::from_settings(self).load(&self.root)
    }
}
