//! Configuration file discovery and parsing
//!
//! Searches for `.config/philtre.yaml` walking up from the current
//! directory. The project root is the parent of `.config/`. CLI flags
//! override file values; the merged result is an immutable
//! [`ResolvedConfig`] built once per run, before any file is touched.

use camino::{Utf8Path, Utf8PathBuf};
use eyre::{Result, eyre};
use philtre_minify::MinifyOptions;
use serde::Deserialize;
use std::env;
use std::fs;

const CONFIG_DIR: &str = ".config";
const CONFIG_FILE: &str = "philtre.yaml";

/// Philtre configuration from `.config/philtre.yaml`.
///
/// Unknown keys are rejected at parse time so a typo fails the run before
/// any template is processed.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "snake_case")]
pub struct PhiltreConfig {
    /// Template source directory, relative to the project root.
    pub source: Option<String>,

    /// Build output directory, relative to the project root.
    pub output: Option<String>,

    /// Template file extension, matched case-insensitively (default `php`).
    pub ext: Option<String>,

    /// Descend into subdirectories of the source root (default `true`).
    pub recursive: Option<bool>,

    /// File names to skip during discovery.
    pub exclude: Option<Vec<String>>,

    /// Enable the PHP-preserving minification pass (default `false`).
    pub minify: Option<bool>,

    /// Markup minifier toggles.
    pub minifier: Option<MinifierConfig>,

    /// Asset manifest filename referenced by the prepended include
    /// directive (default `assetsMap.php`).
    pub manifest_file: Option<String>,

    /// Allow-list of file names that receive the script-insertion helper.
    /// When absent, every template receives it.
    pub insertion: Option<Vec<String>>,

    /// Where the insertion helper goes relative to the template content.
    pub insertion_placement: Option<InsertionPlacement>,
}

/// Minifier toggles as they appear in the config file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "snake_case")]
pub struct MinifierConfig {
    pub remove_comments: Option<bool>,
    pub keep_closing_tags: Option<bool>,
    pub minify_css: Option<bool>,
    pub minify_js: Option<bool>,
}

impl MinifierConfig {
    fn into_options(self) -> MinifyOptions {
        let defaults = MinifyOptions::default();
        MinifyOptions {
            remove_comments: self.remove_comments.unwrap_or(defaults.remove_comments),
            keep_closing_tags: self
                .keep_closing_tags
                .unwrap_or(defaults.keep_closing_tags),
            minify_css: self.minify_css.unwrap_or(defaults.minify_css),
            minify_js: self.minify_js.unwrap_or(defaults.minify_js),
        }
    }
}

/// Placement of the insertion-helper node within a processed file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsertionPlacement {
    /// After the template content (the default).
    #[default]
    Append,
    /// Before the template content, right after the manifest include.
    Prepend,
}

/// CLI-level overrides applied on top of the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub source: Option<Utf8PathBuf>,
    pub output: Option<Utf8PathBuf>,
    pub minify: Option<bool>,
    pub manifest_file: Option<String>,
}

/// Fully-defaulted configuration with resolved absolute paths.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Absolute path to the template source root (directory or single file).
    pub source: Utf8PathBuf,
    /// Absolute path to the build output directory.
    pub output_dir: Utf8PathBuf,
    /// Template extension without the dot.
    pub ext: String,
    /// Whether discovery descends into subdirectories.
    pub recursive: bool,
    /// File names skipped during discovery.
    pub exclude: Vec<String>,
    /// Whether the minification pass runs.
    pub minify: bool,
    /// Markup minifier toggles.
    pub minify_options: MinifyOptions,
    /// Asset manifest filename.
    pub manifest_file: String,
    /// Allow-list for the insertion helper; `None` means every file.
    pub insertion: Option<Vec<String>>,
    /// Placement of the insertion helper.
    pub insertion_placement: InsertionPlacement,
}

impl ResolvedConfig {
    /// Discover `.config/philtre.yaml` walking up from the current
    /// directory and resolve it with `overrides` applied. Falls back to
    /// pure defaults (rooted at the current directory) when no config file
    /// exists.
    pub fn discover(overrides: Overrides) -> Result<Self> {
        let cwd = current_dir_utf8()?;
        match find_config_file(&cwd) {
            Some(path) => Self::load(&path, overrides),
            None => resolve(PhiltreConfig::default(), &cwd, overrides),
        }
    }

    /// Load and resolve a specific config file.
    pub fn load(config_path: &Utf8Path, overrides: Overrides) -> Result<Self> {
        let content = fs::read_to_string(config_path)
            .map_err(|e| eyre!("Failed to read {}: {}", config_path, e))?;
        let config: PhiltreConfig = serde_yaml::from_str(&content)
            .map_err(|e| eyre!("Failed to parse {}: {}", config_path, e))?;

        let root = project_root(config_path)?;
        resolve(config, &root, overrides)
    }
}

/// Search for `.config/philtre.yaml` walking up from `start`.
fn find_config_file(start: &Utf8Path) -> Option<Utf8PathBuf> {
    let mut current = start;
    loop {
        let candidate = current.join(CONFIG_DIR).join(CONFIG_FILE);
        if candidate.exists() {
            return Some(candidate);
        }
        match current.parent() {
            Some(parent) => current = parent,
            None => return None,
        }
    }
}

/// The project root is the parent of `.config/`; for a config file living
/// elsewhere (explicit `--config`), it is the file's own directory.
fn project_root(config_path: &Utf8Path) -> Result<Utf8PathBuf> {
    let dir = config_path
        .parent()
        .ok_or_else(|| eyre!("Config file has no parent directory"))?;
    if dir.file_name() == Some(CONFIG_DIR) {
        Ok(dir
            .parent()
            .ok_or_else(|| eyre!(".config directory has no parent"))?
            .to_owned())
    } else {
        Ok(dir.to_owned())
    }
}

fn current_dir_utf8() -> Result<Utf8PathBuf> {
    let cwd = env::current_dir()?;
    Utf8PathBuf::try_from(cwd).map_err(|e| {
        eyre!(
            "Current directory is not valid UTF-8: {}",
            e.as_path().display()
        )
    })
}

fn resolve(config: PhiltreConfig, root: &Utf8Path, overrides: Overrides) -> Result<ResolvedConfig> {
    let source = overrides
        .source
        .unwrap_or_else(|| root.join(config.source.as_deref().unwrap_or("php")));
    let output_dir = overrides
        .output
        .unwrap_or_else(|| root.join(config.output.as_deref().unwrap_or("dist")));

    let ext = config.ext.unwrap_or_else(|| "php".to_string());
    if ext.is_empty() || ext.starts_with('.') {
        return Err(eyre!(
            "Invalid `ext` value {:?}: expected an extension without the leading dot",
            ext
        ));
    }

    Ok(ResolvedConfig {
        source: absolutize(source, root),
        output_dir: absolutize(output_dir, root),
        ext,
        recursive: config.recursive.unwrap_or(true),
        exclude: config.exclude.unwrap_or_default(),
        minify: overrides.minify.or(config.minify).unwrap_or(false),
        minify_options: config.minifier.unwrap_or_default().into_options(),
        manifest_file: overrides
            .manifest_file
            .or(config.manifest_file)
            .unwrap_or_else(|| "assetsMap.php".to_string()),
        insertion: config.insertion,
        insertion_placement: config.insertion_placement.unwrap_or_default(),
    })
}

fn absolutize(path: Utf8PathBuf, root: &Utf8Path) -> Utf8PathBuf {
    if path.is_absolute() {
        path
    } else {
        root.join(path)
    }
}
