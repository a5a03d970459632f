//! Layered `key=value` property files resolved per base key.
//!
//! Files named `<key>.<source>[.<fragment>].properties` are collected into
//! one chain per key, ordered by the position of `<source>` in a caller
//! supplied hierarchy. Lookups walk the chain from the most specific source
//! down and fall back to the caller's default.

pub mod properties;
pub mod scoped;
mod error;

pub use error::Error;
pub use properties::{
    Bootstrap, BootstrapSettings, PropertiesError, PropertyLookup, PropertyStore, PropertyValue,
    SharedStore,
};
pub use scoped::{Bases, Resolved, ScopedProps};
