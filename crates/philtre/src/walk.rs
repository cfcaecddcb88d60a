//! Template discovery under the source root.
//!
//! Traversal is delegated to the `ignore` walker, which handles symlink
//! cycles when links are followed. Standard ignore filters are disabled:
//! templates can legitimately be dotfiles or live in otherwise-ignored
//! trees. Non-template files are skipped here; copying them is the
//! bundler's concern, not ours.

use camino::{Utf8Path, Utf8PathBuf};
use eyre::{Result, eyre};
use ignore::WalkBuilder;

use crate::config::ResolvedConfig;

/// A discovered template: absolute source path plus its path relative to
/// the source root, used to mirror it under the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub source: Utf8PathBuf,
    pub relative: Utf8PathBuf,
}

/// Discover template files according to `config`.
///
/// A source path that is itself a file yields exactly that file (still
/// subject to the extension filter). Unreadable entries are logged and
/// skipped; only a missing source root is fatal.
pub fn discover(config: &ResolvedConfig) -> Result<Vec<Template>> {
    let source = &config.source;
    if !source.as_std_path().exists() {
        return Err(eyre!("Source path does not exist: {}", source));
    }

    if source.as_std_path().is_file() {
        let name = source
            .file_name()
            .ok_or_else(|| eyre!("Source file has no name: {}", source))?;
        if !matches_template(name, config) {
            return Ok(Vec::new());
        }
        return Ok(vec![Template {
            source: source.clone(),
            relative: Utf8PathBuf::from(name),
        }]);
    }

    let mut walker = WalkBuilder::new(source.as_std_path());
    walker.standard_filters(false).follow_links(true);
    if !config.recursive {
        walker.max_depth(Some(1));
    }

    let mut templates = Vec::new();
    for entry in walker.build() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Skipping unreadable entry: {e}");
                continue;
            }
        };
        if entry.file_type().is_none_or(|ft| ft.is_dir()) {
            continue;
        }
        let path = match Utf8Path::from_path(entry.path()) {
            Some(path) => path.to_owned(),
            None => {
                tracing::warn!("Skipping non-UTF-8 path: {}", entry.path().display());
                continue;
            }
        };
        let Some(name) = path.file_name() else {
            continue;
        };
        if !matches_template(name, config) {
            continue;
        }
        let relative = path
            .strip_prefix(source)
            .map_err(|_| eyre!("Walked outside source root: {}", path))?
            .to_owned();
        templates.push(Template {
            source: path,
            relative,
        });
    }

    // The walker's order is platform-dependent; sort so reports are stable.
    templates.sort_by(|a, b| a.relative.cmp(&b.relative));
    Ok(templates)
}

/// Case-insensitive extension match plus the exclusion list.
fn matches_template(name: &str, config: &ResolvedConfig) -> bool {
    if config.exclude.iter().any(|ex| ex == name) {
        return false;
    }
    let suffix = format!(".{}", config.ext);
    name.len() > suffix.len() && name.to_ascii_lowercase().ends_with(&suffix.to_ascii_lowercase())
}
