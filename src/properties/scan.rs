//! Recursive discovery of layer files.

use std::path::Path;

use tracing::warn;
use walkdir::WalkDir;

use super::chain::ChainBuilder;
use super::hierarchy::Hierarchy;
use super::PropertiesError;

/// Walks `root` and feeds every file whose layer name matches `hierarchy`
/// into `builder`.
///
/// The layer name of `a/b/cpp.local.properties` is `a.b.cpp.local`: each
/// directory below the root contributes a dotted prefix. Entries are visited
/// in file-name order so that merges within one layer are reproducible.
pub(crate) fn scan_directory(
    builder: &mut ChainBuilder,
    hierarchy: &Hierarchy,
    root: &Path,
    suffix: &str,
) -> Result<(), PropertiesError> {
    if !root.exists() {
        return Err(PropertiesError::RootNotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(PropertiesError::RootNotADirectory(root.to_path_buf()));
    }

    let walker = WalkDir::new(root)
        .min_depth(1)
        .follow_links(true)
        .sort_by_file_name();

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => {
                return Err(PropertiesError::WalkError {
                    path: root.to_path_buf(),
                    source: e,
                });
            }
            Err(e) => {
                let path = e.path().map(Path::to_path_buf).unwrap_or_default();
                warn!("Skipping unreadable entry {}: {}", path.display(), e);
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }
        let Some(name) = layer_name(root, entry.path(), suffix) else {
            continue;
        };
        if let Some(layer) = hierarchy.match_layer(&name) {
            builder.insert_file(&layer, entry.path())?;
        }
    }

    Ok(())
}

/// Derives the dotted layer name for a file, or `None` if it lacks `suffix`.
fn layer_name(root: &Path, path: &Path, suffix: &str) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let file_name = relative.file_name()?.to_str()?;
    let stem = file_name.strip_suffix(suffix).filter(|s| !s.is_empty())?;

    let mut name = String::new();
    if let Some(parent) = relative.parent() {
        for component in parent.components() {
            name.push_str(component.as_os_str().to_str()?);
            name.push('.');
        }
    }
    name.push_str(stem);
    Some(name)
}
