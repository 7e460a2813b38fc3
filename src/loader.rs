//! Discovery and loading of fragment files from a documentation output tree.

use crate::error::Result;
use crate::fragment::{decode_json, decode_script, decode_trait_script};
use crate::page::PageContext;
use crate::types::{Batch, TraitId};
use anyhow::{Context, bail};
use ignore::WalkBuilder;
use std::path::{Component, Path, PathBuf};

/// Extensions recognized as fragments.
pub const FRAGMENT_EXTENSIONS: &[&str] = &["js", "json"];

/// Outcome of [`load_fragments`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    /// Fragments decoded and contributed.
    pub loaded: usize,
    /// Fragments that could not be read or decoded.
    pub skipped: usize,
    /// Records contributed across all loaded fragments.
    pub records: usize,
}

/// Find every fragment file under `root`, sorted by path.
///
/// Generated output is usually git-ignored, so ignore files are not honored.
pub fn discover_fragments(root: &Path) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        bail!("Fragment directory not found: {}", root.display());
    }

    let mut fragments: Vec<PathBuf> = WalkBuilder::new(root)
        .standard_filters(false)
        .build()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_some_and(|ft| ft.is_file()))
        .map(ignore::DirEntry::into_path)
        .filter(|path| is_fragment(path))
        .collect();

    fragments.sort();

    tracing::debug!(
        "Discovered {} fragments under {}",
        fragments.len(),
        root.display()
    );

    Ok(fragments)
}

/// Decode every fragment under `root` and contribute it to `page`, in path order.
///
/// A fragment that cannot be read or decoded is logged and skipped; it never
/// stops the remaining fragments from loading.
pub fn load_fragments(page: &mut PageContext, root: &Path) -> Result<LoadSummary> {
    let mut summary = LoadSummary::default();

    for path in discover_fragments(root)? {
        match read_fragment(root, &path) {
            Ok(batch) => {
                summary.loaded += 1;
                summary.records += batch.values().map(Vec::len).sum::<usize>();
                page.contribute(batch);
            }
            Err(e) => {
                tracing::warn!("Skipping fragment {}: {:#}", path.display(), e);
                summary.skipped += 1;
            }
        }
    }

    tracing::info!(
        loaded = summary.loaded,
        skipped = summary.skipped,
        records = summary.records,
        "Loaded implementor fragments from {}",
        root.display()
    );

    Ok(summary)
}

/// Read and decode a single fragment file found under `root`.
///
/// JSON fragments keep their explicit trait keys. Script fragments are keyed by
/// crate, so their trait comes from the file's location (see
/// [`trait_id_from_path`]); a script outside that layout keeps its assignment keys.
pub fn read_fragment(root: &Path, path: &Path) -> Result<Batch> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read fragment at {}", path.display()))?;

    let is_json = has_extension(path, "json")
        || matches!(source.trim_start().chars().next(), Some('{' | '['));
    if is_json {
        return decode_json(&source)
            .with_context(|| format!("Failed to decode fragment at {}", path.display()));
    }

    let trait_id = path
        .strip_prefix(root)
        .ok()
        .and_then(trait_id_from_path);

    match trait_id {
        Some(trait_id) => Ok(decode_trait_script(trait_id, &source)),
        None => {
            tracing::debug!(
                "No trait in fragment path {}, keeping assignment keys",
                path.display()
            );
            Ok(decode_script(&source))
        }
    }
}

/// Trait named by a fragment's path relative to the output tree.
///
/// `core/ops/drop/trait.Drop.js` becomes `core::ops::drop::Drop`. A leading
/// `implementors` directory is skipped. `None` if the file name is not
/// `trait.<Name>.<ext>`.
pub fn trait_id_from_path(relative: &Path) -> Option<TraitId> {
    let name = relative.file_stem()?.to_str()?.strip_prefix("trait.")?;
    if name.is_empty() {
        return None;
    }

    let mut segments: Vec<&str> = relative
        .parent()
        .into_iter()
        .flat_map(Path::components)
        .filter_map(|component| match component {
            Component::Normal(segment) => segment.to_str(),
            _ => None,
        })
        .collect();
    if segments.first() == Some(&"implementors") {
        segments.remove(0);
    }
    segments.push(name);

    Some(TraitId::new(segments.join("::")))
}

fn is_fragment(path: &Path) -> bool {
    FRAGMENT_EXTENSIONS
        .iter()
        .any(|ext| has_extension(path, ext))
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e == ext)
}
