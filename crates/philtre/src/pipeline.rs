//! Per-file processing pipeline.
//!
//! Each template runs through read → parse → minify → attach → render →
//! write as one sequential unit; files are independent and processed on a
//! rayon worker pool. The output string is fully rendered before anything
//! touches the output path, so a failed file never leaves a partial write.

use std::fs;

use camino::Utf8PathBuf;
use eyre::Result;
use philtre_minify::{MinifyError, NodeSequence, TagPattern, minify_preserving};
use rayon::prelude::*;

use crate::config::ResolvedConfig;
use crate::manifest;
use crate::walk::{self, Template};

/// A file-scoped processing failure. One bad file never aborts the run;
/// I/O and minification failures are reported distinctly.
#[derive(Debug, thiserror::Error)]
pub enum FileError {
    /// Unreadable input or unwritable output path.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The minification pass rejected the file (tag count mismatch,
    /// invalid UTF-8 output).
    #[error(transparent)]
    Minify(#[from] MinifyError),
}

/// Outcome of one run over the source tree.
#[derive(Debug, Default)]
pub struct BuildReport {
    /// Output paths written, in relative-path order.
    pub written: Vec<Utf8PathBuf>,
    /// Relative path and error for each failed file.
    pub failed: Vec<(Utf8PathBuf, FileError)>,
}

impl BuildReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Process every discovered template. This is the single entry point into
/// the core; the CLI calls it once per build-finished invocation.
pub fn run(config: &ResolvedConfig) -> Result<BuildReport> {
    let templates = walk::discover(config)?;
    tracing::info!(
        count = templates.len(),
        source = %config.source,
        output = %config.output_dir,
        minify = config.minify,
        "processing templates"
    );

    let pattern = TagPattern::php();
    let outcomes: Vec<(Utf8PathBuf, Result<Utf8PathBuf, FileError>)> = templates
        .par_iter()
        .map(|template| {
            let outcome = process_file(config, &pattern, template);
            if let Err(e) = &outcome {
                tracing::warn!(file = %template.relative, error = %e, "template failed");
            }
            (template.relative.clone(), outcome)
        })
        .collect();

    let mut report = BuildReport::default();
    for (relative, outcome) in outcomes {
        match outcome {
            Ok(written) => report.written.push(written),
            Err(e) => report.failed.push((relative, e)),
        }
    }
    Ok(report)
}

/// Process one template and write it under the output directory. Returns
/// the path written.
fn process_file(
    config: &ResolvedConfig,
    pattern: &TagPattern,
    template: &Template,
) -> Result<Utf8PathBuf, FileError> {
    let raw = fs::read_to_string(&template.source)?;

    let processed = if config.minify {
        minify_preserving(&raw, pattern, &config.minify_options)?
    } else {
        raw
    };

    // Attach manifest/insertion nodes after minification so they are never
    // subject to splice-back.
    let mut sequence = NodeSequence::parse(&processed, pattern);
    let file_name = template.relative.file_name().unwrap_or(template.relative.as_str());
    manifest::attach(&mut sequence, config, file_name);
    let rendered = sequence.render();

    let out_path = config.output_dir.join(&template.relative);
    if let Some(parent) = out_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&out_path, rendered)?;
    tracing::debug!(file = %template.relative, "written");
    Ok(out_path)
}
