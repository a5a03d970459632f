//! Per-key chain construction.

use std::collections::HashMap;
use std::path::Path;

use tracing::debug;

use super::hierarchy::LayerMatch;
use super::layer::{Layer, PropertiesLayer};
use super::PropertiesError;

/// Builds one chain per base key from matched layer files.
///
/// Files may arrive in any order. Each insertion keeps the chain sorted by
/// strictly decreasing ordinal, and files sharing an ordinal are merged into
/// a single layer.
#[derive(Debug, Default)]
pub(crate) struct ChainBuilder {
    chains: HashMap<String, Layer>,
}

impl ChainBuilder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Reads `path` and inserts its properties as the layer described by `layer`.
    pub(crate) fn insert_file(
        &mut self,
        layer: &LayerMatch<'_>,
        path: &Path,
    ) -> Result<(), PropertiesError> {
        debug!("Adding config from {}", path.display());
        let text = std::fs::read_to_string(path).map_err(|e| PropertiesError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;
        self.insert(layer, &path.display().to_string(), &text);
        Ok(())
    }

    /// Inserts already-read layer text. `origin` names the text in diagnostics.
    pub(crate) fn insert(&mut self, layer: &LayerMatch<'_>, origin: &str, text: &str) {
        let head = self.chains.entry(layer.key.to_string()).or_default();
        insert_layer(head, layer, origin, text);
    }

    pub(crate) fn finish(self) -> HashMap<String, Layer> {
        self.chains
    }
}

/// Places the layer at `slot` or further down the chain.
///
/// A slot holding a less specific layer (or the root) gets the new layer
/// spliced in front of it; an equal ordinal merges; a more specific layer
/// passes the insertion on to its parent.
fn insert_layer(slot: &mut Layer, layer: &LayerMatch<'_>, origin: &str, text: &str) {
    match slot {
        Layer::Node(node) if node.ordinal == layer.ordinal => {
            node.merge(layer.fragment, origin, text);
        }
        Layer::Node(node) if node.ordinal > layer.ordinal => {
            insert_layer(&mut node.parent, layer, origin, text);
        }
        _ => {
            let parent = std::mem::take(slot);
            *slot = Layer::Node(Box::new(PropertiesLayer::parse(
                format!("{}.{}", layer.key, layer.source),
                layer.ordinal,
                layer.fragment,
                parent,
                origin,
                text,
            )));
        }
    }
}
