//! Chain nodes and property resolution.
//!
//! A chain is a singly linked list of [`PropertiesLayer`]s, most specific
//! first, ending in [`Layer::Root`]. Ordinals strictly decrease from the head
//! towards the root.

use std::collections::{BTreeSet, HashMap};

use tracing::{trace, warn};

use super::parse::{parse_properties, PropertySink};
use super::value::PropertyValue;

/// A link in a chain: either a layer or the terminal root.
#[derive(Debug, Default)]
pub(crate) enum Layer {
    Node(Box<PropertiesLayer>),
    #[default]
    Root,
}

/// One source's properties for one base key.
#[derive(Debug)]
pub(crate) struct PropertiesLayer {
    pub(crate) name: String,
    pub(crate) ordinal: usize,
    pub(crate) properties: HashMap<String, PropertyValue>,
    pub(crate) fragments: BTreeSet<String>,
    pub(crate) parent: Layer,
}

impl PropertiesLayer {
    /// Creates a layer holding the properties parsed from `text`.
    pub(crate) fn parse(
        name: String,
        ordinal: usize,
        fragment: &str,
        parent: Layer,
        origin: &str,
        text: &str,
    ) -> Self {
        let mut properties = HashMap::new();
        parse_properties(&mut properties, text, origin);
        Self {
            name,
            ordinal,
            properties,
            fragments: BTreeSet::from([fragment.to_string()]),
            parent,
        }
    }

    /// Merges another file of the same ordinal into this layer. Later values
    /// overwrite earlier ones.
    pub(crate) fn merge(&mut self, fragment: &str, origin: &str, text: &str) {
        if self.fragments.contains(fragment) {
            warn!("{} adds already existing fragment {}", origin, fragment);
        }
        let mut sink = MergeSink {
            layer: &self.name,
            origin,
            properties: &mut self.properties,
        };
        parse_properties(&mut sink, text, origin);
        self.fragments.insert(fragment.to_string());
    }
}

struct MergeSink<'a> {
    layer: &'a str,
    origin: &'a str,
    properties: &'a mut HashMap<String, PropertyValue>,
}

impl PropertySink for MergeSink<'_> {
    fn add(&mut self, property: String, value: PropertyValue) {
        if self.properties.contains_key(&property) {
            warn!(
                "{} overwrites existing {}.{}",
                self.origin, self.layer, property
            );
        }
        self.properties.insert(property, value);
    }
}

impl Layer {
    pub(crate) fn has(&self, property: &str) -> bool {
        match self {
            Self::Node(node) => {
                node.properties.contains_key(property) || node.parent.has(property)
            }
            Self::Root => false,
        }
    }

    /// Resolves `property` from the most specific layer that defines it.
    ///
    /// With `verbose` set, each step is reported at trace level under `key`.
    pub(crate) fn lookup(&self, key: &str, property: &str, verbose: bool) -> Option<&PropertyValue> {
        match self {
            Self::Node(node) => match node.properties.get(property) {
                Some(value) => {
                    if verbose {
                        if let Some(prior) = node.parent.lookup(key, property, false) {
                            trace!(
                                "{}.{}: {} overriding parent value ({}) with {}",
                                key, property, node.name, prior, value
                            );
                        }
                        trace!(
                            "{}.{}: returning {} (from {})",
                            key, property, value, node.name
                        );
                    }
                    Some(value)
                }
                None => node.parent.lookup(key, property, verbose),
            },
            Self::Root => {
                if verbose {
                    trace!("{}.{}: no override found, using default", key, property);
                }
                None
            }
        }
    }

    /// Iterates over the layers of this chain, most specific first.
    pub(crate) fn iter(&self) -> LayerIter<'_> {
        LayerIter { next: self }
    }
}

pub(crate) struct LayerIter<'a> {
    next: &'a Layer,
}

impl<'a> Iterator for LayerIter<'a> {
    type Item = &'a PropertiesLayer;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next {
            Layer::Node(node) => {
                self.next = &node.parent;
                Some(node)
            }
            Layer::Root => None,
        }
    }
}
