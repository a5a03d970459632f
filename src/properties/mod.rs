//! Layered property loading and resolution.

mod builder;
mod chain;
mod error;
mod hierarchy;
mod layer;
mod parse;
mod scan;
mod settings;
mod store;
mod value;

#[cfg(test)]
pub(crate) mod testing;

pub use builder::{Bootstrap, DEFAULT_SUFFIX};
pub use error::PropertiesError;
pub use hierarchy::{Hierarchy, LayerMatch};
pub use parse::{parse_properties, PropertySink};
pub use settings::BootstrapSettings;
pub use store::{BaseProps, FixedProps, LayerInfo, PropertyLookup, PropertyStore, SharedStore};
pub use value::{coerce_value, FromProperty, PropertyValue};
