//! Source hierarchy and layer-name matching.

use std::fmt;

/// Ordered specificity sources. A source's index is its ordinal; later
/// sources are more specific and win on conflict.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Hierarchy {
    sources: Vec<String>,
}

/// A layer name accepted by [`Hierarchy::match_layer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerMatch<'a> {
    pub key: &'a str,
    pub source: &'a str,
    pub ordinal: usize,
    pub fragment: &'a str,
}

impl Hierarchy {
    /// Builds a hierarchy, lower-casing every source id.
    pub fn new<I, S>(sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            sources: sources
                .into_iter()
                .map(|s| s.as_ref().to_lowercase())
                .collect(),
        }
    }

    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Splits a `<key>.<source>[.<fragment>]` layer name.
    ///
    /// Sources are tried in hierarchy order and the first one that prefixes
    /// the text after the key, followed by the end or a `.`, is taken. This is
    /// first match, not longest match: with `["local", "local.host"]`,
    /// `cpp.local.host` matches `local` with fragment `host`.
    pub fn match_layer<'a>(&'a self, layer: &'a str) -> Option<LayerMatch<'a>> {
        let (key, source_part) = layer.split_once('.')?;

        self.sources
            .iter()
            .enumerate()
            .find_map(|(ordinal, source)| {
                let rest = source_part.strip_prefix(source.as_str())?;
                let fragment = if rest.is_empty() {
                    ""
                } else {
                    rest.strip_prefix('.')?
                };
                Some(LayerMatch {
                    key,
                    source,
                    ordinal,
                    fragment,
                })
            })
    }
}

impl fmt::Display for Hierarchy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sources.join(","))
    }
}
