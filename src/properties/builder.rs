use std::path::Path;

use tracing::{debug, info};

use super::chain::ChainBuilder;
use super::hierarchy::Hierarchy;
use super::scan::scan_directory;
use super::settings::BootstrapSettings;
use super::{PropertiesError, PropertyStore};

/// Default suffix of layer files.
pub const DEFAULT_SUFFIX: &str = ".properties";

/// Builder for loading a [`PropertyStore`] from a directory of layer files.
///
/// Every file below the directory whose name ends in the suffix is a layer
/// candidate. Its name (without the suffix, with parent directories joined by
/// `.`) must read `<key>.<source>[.<fragment>]`, where `<source>` is one of
/// the hierarchy's sources; anything else is ignored.
///
/// Later sources in the hierarchy are more specific: when several layers of
/// one key define the same property, the latest source wins. Files sharing a
/// key and source are merged into one layer.
///
/// ## Example
///
/// ```no_run
/// use layered_props::Bootstrap;
///
/// // etc/config/c++.defaults.properties
/// // etc/config/c++.local.properties
/// let store = Bootstrap::builder()
///     .with_hierarchy(["defaults", "local"])
///     .load("etc/config")?;
///
/// let timeout: i64 = store.get("c++", "compileTimeoutMs", 7500);
/// # Ok::<(), layered_props::PropertiesError>(())
/// ```
#[derive(Debug)]
#[must_use = "builders do nothing until .load() is called"]
pub struct Bootstrap {
    hierarchy: Option<Hierarchy>,
    suffix: String,
    debug: bool,
}

impl Default for Bootstrap {
    fn default() -> Self {
        Self {
            hierarchy: None,
            suffix: DEFAULT_SUFFIX.to_string(),
            debug: false,
        }
    }
}

impl Bootstrap {
    /// Creates a new bootstrap builder.
    pub fn builder() -> Self {
        Self::default()
    }

    /// Creates a builder from loaded settings.
    pub fn from_settings(settings: &BootstrapSettings) -> Self {
        let mut builder = Self::builder()
            .with_suffix(settings.suffix.clone())
            .with_debug(settings.debug);
        if let Some(hierarchy) = &settings.hierarchy {
            builder = builder.with_hierarchy(hierarchy);
        }
        builder
    }

    /// Sets the source hierarchy, least specific first.
    ///
    /// Source ids are lower-cased. A hierarchy is required; loading without
    /// one fails.
    pub fn with_hierarchy<I, S>(mut self, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.hierarchy = Some(Hierarchy::new(sources));
        self
    }

    /// Sets the file suffix that marks layer files.
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Enables per-lookup trace diagnostics on the loaded store.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Scans `directory` and builds the store.
    ///
    /// Fails immediately with [`PropertiesError::MissingHierarchy`] if no
    /// hierarchy was set.
    pub fn load(self, directory: impl AsRef<Path>) -> Result<PropertyStore, PropertiesError> {
        let hierarchy = self.hierarchy.ok_or(PropertiesError::MissingHierarchy)?;
        let directory = directory.as_ref();
        info!(
            "Reading properties from {} with hierarchy {}",
            directory.display(),
            hierarchy
        );

        let mut builder = ChainBuilder::new();
        scan_directory(&mut builder, &hierarchy, directory, &self.suffix)?;

        let store = PropertyStore::new(hierarchy, builder.finish(), self.debug);
        debug!("Loaded {:?}", store);
        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, contents: &str) {
        fs::write(dir.join(name), contents).unwrap();
    }

    #[test]
    fn test_load_without_hierarchy_fails() {
        let dir = TempDir::new().unwrap();
        let result = Bootstrap::builder().load(dir.path());
        assert!(matches!(result, Err(PropertiesError::MissingHierarchy)));
    }

    #[test]
    fn test_hierarchy_is_case_insensitive_on_entry() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "cpp.local.properties", "a=1\n");

        let store = Bootstrap::builder()
            .with_hierarchy(["Defaults", "LOCAL"])
            .load(dir.path())
            .unwrap();
        assert_eq!(store.hierarchy().sources(), ["defaults", "local"]);
        assert_eq!(store.get("cpp", "a", 0), 1);
    }

    #[test]
    fn test_custom_suffix() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "cpp.defaults.props", "a=1\n");
        write(dir.path(), "cpp.local.properties", "a=2\n");

        let store = Bootstrap::builder()
            .with_hierarchy(["defaults", "local"])
            .with_suffix(".props")
            .load(dir.path())
            .unwrap();
        assert_eq!(store.get("cpp", "a", 0), 1);
    }

    #[test]
    fn test_empty_hierarchy_loads_nothing() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "cpp.defaults.properties", "a=1\n");

        let store = Bootstrap::builder()
            .with_hierarchy(Vec::<String>::new())
            .load(dir.path())
            .unwrap();
        assert_eq!(store.bases().count(), 0);
        assert_eq!(store.get("cpp", "a", 0), 0);
    }

    #[test]
    fn test_fragments_merge_into_one_layer() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "cpp.local.properties", "a=1\nb=1\n");
        write(dir.path(), "cpp.local.msvc.properties", "b=2\n");

        let store = Bootstrap::builder()
            .with_hierarchy(["defaults", "local"])
            .load(dir.path())
            .unwrap();
        let layers = store.layers("cpp");
        assert_eq!(layers.len(), 1);
        assert_eq!(layers[0].name, "cpp.local");
        assert!(layers[0].fragments.contains("msvc"));
        // Sorted walk visits cpp.local.msvc before cpp.local.properties
        assert_eq!(store.get("cpp", "b", 0), 1);
    }

    #[test]
    fn test_debug_flag_carries_to_store() {
        let dir = TempDir::new().unwrap();
        let store = Bootstrap::builder()
            .with_hierarchy(["defaults"])
            .with_debug(true)
            .load(dir.path())
            .unwrap();
        assert!(store.debug_enabled());
    }
}
