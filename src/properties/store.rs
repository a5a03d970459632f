//! The finished chain forest and its query API.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwap;
use tracing::{debug, trace};

use super::hierarchy::Hierarchy;
use super::layer::Layer;
use super::value::{FromProperty, PropertyValue};

/// Resolved properties for every base key found during bootstrap.
///
/// A store is immutable once built; it can be shared across threads behind
/// an `Arc` and queried without locking. Only the lookup-trace toggle can
/// change after construction.
pub struct PropertyStore {
    hierarchy: Hierarchy,
    chains: HashMap<String, Layer>,
    verbose: AtomicBool,
}

/// A read-only description of one layer in a chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerInfo {
    pub name: String,
    pub ordinal: usize,
    pub fragments: BTreeSet<String>,
}

impl PropertyStore {
    pub(crate) fn new(hierarchy: Hierarchy, chains: HashMap<String, Layer>, verbose: bool) -> Self {
        Self {
            hierarchy,
            chains,
            verbose: AtomicBool::new(verbose),
        }
    }

    /// Turns per-lookup trace diagnostics on or off.
    pub fn set_debug(&self, enabled: bool) {
        self.verbose.store(enabled, Ordering::Relaxed);
    }

    pub fn debug_enabled(&self) -> bool {
        self.verbose.load(Ordering::Relaxed)
    }

    pub fn hierarchy(&self) -> &Hierarchy {
        &self.hierarchy
    }

    /// Base keys that have at least one layer.
    pub fn bases(&self) -> impl Iterator<Item = &str> {
        self.chains.keys().map(String::as_str)
    }

    /// The layers of `base`'s chain, most specific first.
    pub fn layers(&self, base: &str) -> Vec<LayerInfo> {
        self.chains
            .get(base)
            .map(|chain| {
                chain
                    .iter()
                    .map(|layer| LayerInfo {
                        name: layer.name.clone(),
                        ordinal: layer.ordinal,
                        fragments: layer.fragments.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn has(&self, base: &str, property: &str) -> bool {
        self.chains
            .get(base)
            .is_some_and(|chain| chain.has(property))
    }

    /// The raw value of `property` for `base`, if any layer defines it.
    pub fn lookup(&self, base: &str, property: &str) -> Option<&PropertyValue> {
        let verbose = self.debug_enabled();
        match self.chains.get(base) {
            Some(chain) => chain.lookup(base, property, verbose),
            None => {
                if verbose {
                    trace!("{}.{}: no config found, returning default value", base, property);
                }
                None
            }
        }
    }

    /// Resolves `property` for `base`, falling back to `default` when it is
    /// undefined or not readable as `T`.
    pub fn get<T: FromProperty>(&self, base: &str, property: &str, default: T) -> T {
        read_or_default(self.lookup(base, property), base, property, default)
    }

    /// An accessor bound to one base key.
    pub fn props_for<'a>(&'a self, base: &'a str) -> BaseProps<'a> {
        BaseProps { store: self, base }
    }
}

impl fmt::Debug for PropertyStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyStore")
            .field("hierarchy", &self.hierarchy)
            .field("bases", &self.chains.len())
            .field("debug", &self.debug_enabled())
            .finish()
    }
}

fn read_or_default<T: FromProperty>(
    value: Option<&PropertyValue>,
    base: &str,
    property: &str,
    default: T,
) -> T {
    match value {
        Some(value) => T::from_property(value).unwrap_or_else(|| {
            debug!(
                "{}.{}: value {} has the wrong type, using default",
                base, property, value
            );
            default
        }),
        None => default,
    }
}

/// Read access to a flat set of properties.
pub trait PropertyLookup {
    fn lookup(&self, property: &str) -> Option<&PropertyValue>;

    /// Resolves `property`, falling back to `default` when it is undefined or
    /// not readable as `T`.
    fn get<T: FromProperty>(&self, property: &str, default: T) -> T {
        read_or_default(self.lookup(property), "", property, default)
    }
}

/// Properties of a single base key; see [`PropertyStore::props_for`].
#[derive(Debug, Clone, Copy)]
pub struct BaseProps<'a> {
    store: &'a PropertyStore,
    base: &'a str,
}

impl BaseProps<'_> {
    pub fn base(&self) -> &str {
        self.base
    }
}

impl PropertyLookup for BaseProps<'_> {
    fn lookup(&self, property: &str) -> Option<&PropertyValue> {
        self.store.lookup(self.base, property)
    }

    fn get<T: FromProperty>(&self, property: &str, default: T) -> T {
        self.store.get(self.base, property, default)
    }
}

/// A fixed in-memory property set, for standing in for a loaded store.
#[derive(Debug, Clone, Default)]
pub struct FixedProps {
    properties: HashMap<String, PropertyValue>,
}

impl FixedProps {
    pub fn new<I, K, V>(properties: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<PropertyValue>,
    {
        Self {
            properties: properties
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl PropertyLookup for FixedProps {
    fn lookup(&self, property: &str) -> Option<&PropertyValue> {
        self.properties.get(property)
    }
}

/// A published store that can be replaced wholesale.
///
/// Readers get a snapshot `Arc`; publishing a new store never touches the
/// one readers already hold.
#[derive(Debug, Clone)]
pub struct SharedStore {
    inner: Arc<ArcSwap<PropertyStore>>,
}

impl SharedStore {
    pub fn new(store: PropertyStore) -> Self {
        Self {
            inner: Arc::new(ArcSwap::from_pointee(store)),
        }
    }

    /// The currently published store.
    pub fn load(&self) -> Arc<PropertyStore> {
        self.inner.load_full()
    }

    /// Atomically replaces the published store.
    pub fn publish(&self, store: PropertyStore) {
        debug!("Publishing property store with {} bases", store.chains.len());
        self.inner.store(Arc::new(store));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::properties::testing::capture_logs;
    use crate::properties::chain::ChainBuilder;

    fn store() -> PropertyStore {
        let hierarchy = Hierarchy::new(["defaults", "local"]);
        let mut builder = ChainBuilder::new();
        for (name, text) in [
            ("cpp.defaults", "timeout=30\nratio=0.5\n"),
            ("cpp.local", "timeout=60\n#comment\nname=foo"),
            ("rust.defaults", "timeout=10\n"),
        ] {
            let layer = hierarchy.match_layer(name).unwrap();
            builder.insert(&layer, name, text);
        }
        let chains = builder.finish();
        PropertyStore::new(hierarchy, chains, true)
    }

    #[test]
    fn test_get_resolves_typed_values() {
        let store = store();
        assert_eq!(store.get("cpp", "timeout", 0), 60);
        assert_eq!(store.get("cpp", "name", String::new()), "foo");
        assert_eq!(store.get("cpp", "missing", 99), 99);
        assert_eq!(store.get("unknown_base", "x", 5), 5);
        assert_eq!(store.get("cpp", "ratio", 1.0), 0.5);
    }

    #[test]
    fn test_get_type_mismatch_returns_default() {
        let store = store();
        assert!(!store.get("cpp", "name", false));
        assert_eq!(store.get("cpp", "timeout", String::from("n/a")), "n/a");
    }

    #[test]
    fn test_has_and_lookup() {
        let store = store();
        assert!(store.has("cpp", "ratio"));
        assert!(!store.has("rust", "ratio"));
        assert!(!store.has("go", "timeout"));
        assert_eq!(store.lookup("rust", "timeout"), Some(&PropertyValue::Int(10)));
    }

    #[test]
    fn test_props_for_binds_base() {
        let store = store();
        let cpp = store.props_for("cpp");
        assert_eq!(cpp.base(), "cpp");
        assert_eq!(cpp.get("timeout", 0i64), 60);
        assert_eq!(cpp.lookup("missing"), None);
    }

    #[test]
    fn test_layers_are_ordinal_descending() {
        let store = store();
        let layers = store.layers("cpp");
        assert_eq!(layers.len(), 2);
        assert_eq!(layers[0].name, "cpp.local");
        assert_eq!(layers[0].ordinal, 1);
        assert_eq!(layers[1].name, "cpp.defaults");
        assert!(store.layers("go").is_empty());

        let mut bases: Vec<&str> = store.bases().collect();
        bases.sort_unstable();
        assert_eq!(bases, vec!["cpp", "rust"]);
    }

    #[test]
    fn test_debug_toggle() {
        let store = store();
        assert!(store.debug_enabled());
        store.set_debug(false);
        assert!(!store.debug_enabled());
        assert_eq!(store.get("cpp", "timeout", 0), 60);
    }

    #[test]
    fn test_fixed_props() {
        let props = FixedProps::new([("port", PropertyValue::Int(8080)), ("host", "localhost".into())]);
        assert_eq!(props.get("port", 0u16), 8080);
        assert_eq!(props.get("host", String::new()), "localhost");
        assert_eq!(props.get("missing", 7), 7);
    }

    #[test]
    fn test_shared_store_publish() {
        let shared = SharedStore::new(store());
        let before = shared.load();

        let hierarchy = Hierarchy::new(["defaults"]);
        shared.publish(PropertyStore::new(hierarchy, HashMap::new(), false));

        // Earlier snapshots are unaffected
        assert_eq!(before.get("cpp", "timeout", 0), 60);
        assert_eq!(shared.load().get("cpp", "timeout", 0), 0);
    }

    #[test]
    fn test_debug_toggle_controls_lookup_traces() {
        let store = store();

        let (value, logs) = capture_logs(|| store.get("cpp", "timeout", 0));
        assert_eq!(value, 60);
        assert!(
            logs.contains("cpp.timeout: cpp.local overriding parent value (30) with 60"),
            "{logs}"
        );
        assert!(logs.contains("cpp.timeout: returning 60 (from cpp.local)"), "{logs}");

        let (_, logs) = capture_logs(|| store.get("go", "timeout", 0));
        assert!(logs.contains("go.timeout: no config found"), "{logs}");

        store.set_debug(false);
        let (value, logs) = capture_logs(|| store.get("cpp", "timeout", 0));
        assert_eq!(value, 60);
        assert!(!logs.contains("overriding parent value"), "{logs}");
    }
}
