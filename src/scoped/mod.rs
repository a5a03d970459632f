//! Property queries spanning several base keys.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::error;

use crate::properties::{FromProperty, PropertyStore};
use crate::Error;

/// Base key used for unscoped lookups unless another is configured.
pub const DEFAULT_GLOBAL_BASE: &str = "global";

/// Which bases a [`ScopedProps::get`] query covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bases<'a> {
    /// Only the global base.
    None,
    /// A single base id. An empty id means the global base.
    One(&'a str),
    /// Every id in the set, answered per id. An empty set means the global base.
    Set(&'a [&'a str]),
}

/// Result of a [`ScopedProps::get`] query.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved<U> {
    One(U),
    PerBase(HashMap<String, U>),
}

impl<U> Resolved<U> {
    /// The single value, if this was not a per-base query.
    pub fn into_one(self) -> Option<U> {
        match self {
            Self::One(value) => Some(value),
            Self::PerBase(_) => None,
        }
    }

    /// The per-base map, if this was a per-base query.
    pub fn into_per_base(self) -> Option<HashMap<String, U>> {
        match self {
            Self::One(_) => None,
            Self::PerBase(map) => Some(map),
        }
    }
}

/// Lookups scoped to a known set of bases, with a global fallback.
///
/// A base's own chain is consulted first; when it does not define the
/// property (or defines it with another type), the global base answers.
///
/// ## Example
///
/// ```no_run
/// use std::sync::Arc;
/// use layered_props::{Bases, Bootstrap, ScopedProps};
///
/// let store = Bootstrap::builder()
///     .with_hierarchy(["defaults", "local"])
///     .load("etc/config")?;
///
/// let props = ScopedProps::builder()
///     .with_store(Arc::new(store))
///     .with_global_base("compiler-explorer")
///     .with_bases(["c++", "rust"])
///     .build()?;
///
/// let timeouts = props.get(Bases::Set(&["c++", "rust"]), "timeout", 0i64, |t| t * 1000);
/// # Ok::<(), layered_props::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct ScopedProps {
    store: Arc<PropertyStore>,
    global: String,
    bases: HashSet<String>,
}

impl ScopedProps {
    /// Creates a new builder for constructing a `ScopedProps`.
    pub fn builder() -> ScopedPropsBuilder {
        ScopedPropsBuilder {
            store: None,
            global: DEFAULT_GLOBAL_BASE.to_string(),
            bases: HashSet::new(),
        }
    }

    pub fn store(&self) -> &Arc<PropertyStore> {
        &self.store
    }

    pub fn is_known(&self, base: &str) -> bool {
        self.bases.contains(base)
    }

    /// Resolves `key` for the requested bases and maps each result through
    /// `transform`.
    pub fn get<T, U, F>(&self, bases: Bases<'_>, key: &str, default: T, transform: F) -> Resolved<U>
    where
        T: FromProperty + Clone,
        F: Fn(T) -> U,
    {
        match bases {
            Bases::None | Bases::One("") => {
                Resolved::One(transform(self.get_global(key, default)))
            }
            Bases::Set(bases) if bases.is_empty() => {
                Resolved::One(transform(self.get_global(key, default)))
            }
            Bases::One(base) => Resolved::One(self.resolve_one(base, key, default, &transform)),
            Bases::Set(bases) => Resolved::PerBase(
                bases
                    .iter()
                    .map(|base| {
                        let value = self.resolve_one(base, key, default.clone(), &transform);
                        (base.to_string(), value)
                    })
                    .collect(),
            ),
        }
    }

    /// Resolves `key` from the global base only.
    pub fn get_global<T: FromProperty>(&self, key: &str, default: T) -> T {
        self.store.get(&self.global, key, default)
    }

    /// Resolves `key` for one base, falling back to the global base.
    ///
    /// An unknown base is logged and yields `default`.
    pub fn get_for<T: FromProperty>(&self, base: &str, key: &str, default: T) -> T {
        self.resolve_one(base, key, default, &|value| value)
    }

    /// Resolves `key` for each of `bases`.
    pub fn get_for_each<T>(&self, bases: &[&str], key: &str, default: T) -> HashMap<String, T>
    where
        T: FromProperty + Clone,
    {
        self.get(Bases::Set(bases), key, default, |value| value)
            .into_per_base()
            .unwrap_or_default()
    }

    fn resolve_one<T, U, F>(&self, base: &str, key: &str, default: T, transform: &F) -> U
    where
        T: FromProperty,
        F: Fn(T) -> U,
    {
        if !self.is_known(base) {
            error!("Tried to pass {} as a base id", base);
            return transform(default);
        }
        let own = self.store.lookup(base, key).and_then(T::from_property);
        match own {
            Some(value) => transform(value),
            None => transform(self.get_global(key, default)),
        }
    }
}

/// Builder for constructing a [`ScopedProps`].
#[derive(Debug)]
#[must_use = "builders do nothing until .build() is called"]
pub struct ScopedPropsBuilder {
    store: Option<Arc<PropertyStore>>,
    global: String,
    bases: HashSet<String>,
}

impl ScopedPropsBuilder {
    /// Attaches the store queries are answered from.
    pub fn with_store(mut self, store: Arc<PropertyStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Sets the base key consulted for unscoped lookups and as fallback.
    pub fn with_global_base(mut self, base: impl Into<String>) -> Self {
        self.global = base.into();
        self
    }

    /// Adds base ids that queries may name.
    pub fn with_bases<I, S>(mut self, bases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.bases.extend(bases.into_iter().map(Into::into));
        self
    }

    /// Builds the `ScopedProps`.
    ///
    /// Returns an error if no store was provided.
    pub fn build(self) -> Result<ScopedProps, Error> {
        Ok(ScopedProps {
            store: self.store.ok_or(Error::MissingStore)?,
            global: self.global,
            bases: self.bases,
        })
    }
}
