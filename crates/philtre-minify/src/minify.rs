//! Selective minification: compact the markup, keep embedded PHP verbatim.
//!
//! `minify-html` treats `<?php ... ?>` as a processing instruction and leaves
//! it alone as long as `remove_processing_instructions` stays off, so the
//! single minifier pass over the raw text already preserves embedded regions
//! in the common case. The splice-back pass afterwards restores every
//! embedded payload from the pre-minification parse anyway, guarded by a
//! strict count check, so a minifier that tokenized into a region can never
//! leak mangled PHP into the output.

use crate::error::MinifyError;
use crate::node::{Node, NodeSequence, TagPattern};

/// Options for the markup portion of the minification pass.
///
/// `minify-html` collapses whitespace unconditionally and never fails on
/// malformed markup (unparseable spans pass through locally), so there are
/// no toggles for either.
#[derive(Debug, Clone)]
pub struct MinifyOptions {
    /// Strip `<!-- ... -->` comments.
    pub remove_comments: bool,
    /// Keep optional closing tags such as `</p>`. On by default: PHP
    /// templates are often partial documents whose structure the minifier
    /// cannot see across an embedded block.
    pub keep_closing_tags: bool,
    /// Minify the contents of `<style>` tags and style attributes.
    pub minify_css: bool,
    /// Minify the contents of `<script>` tags.
    pub minify_js: bool,
}

impl Default for MinifyOptions {
    fn default() -> Self {
        Self {
            remove_comments: true,
            keep_closing_tags: true,
            minify_css: false,
            minify_js: false,
        }
    }
}

impl MinifyOptions {
    fn to_cfg(&self) -> minify_html::Cfg {
        minify_html::Cfg {
            keep_comments: !self.remove_comments,
            keep_closing_tags: self.keep_closing_tags,
            minify_css: self.minify_css,
            minify_js: self.minify_js,
            // PHP blocks are processing instructions to the minifier;
            // removing them would defeat the whole tool.
            remove_processing_instructions: false,
            ..minify_html::Cfg::default()
        }
    }
}

/// Minify `text`, leaving every embedded region byte-identical to the input.
///
/// Parses the input, minifies the full raw text, re-parses the minified
/// output with the same pattern, then reassigns each placeholder the
/// original payload at the same ordinal position (FIFO). Fails with
/// [`MinifyError::TagCountMismatch`] if the minifier changed the number of
/// embedded regions.
pub fn minify_preserving(
    text: &str,
    pattern: &TagPattern,
    options: &MinifyOptions,
) -> Result<String, MinifyError> {
    let original = NodeSequence::parse(text, pattern);

    let minified_bytes = minify_html::minify(text.as_bytes(), &options.to_cfg());
    let minified =
        String::from_utf8(minified_bytes).map_err(|_| MinifyError::InvalidUtf8)?;

    let mut spliced = NodeSequence::parse(&minified, pattern);
    splice_back(&original, &mut spliced)?;
    Ok(spliced.render())
}

/// Assign each embedded placeholder in `minified` the payload of the
/// corresponding embedded node in `original`, consuming `original`'s nodes
/// strictly left to right. A no-op when the minifier already preserved every
/// region verbatim.
fn splice_back(original: &NodeSequence, minified: &mut NodeSequence) -> Result<(), MinifyError> {
    let expected = original.embedded_count();
    let found = minified.embedded_count();
    if expected != found {
        return Err(MinifyError::TagCountMismatch { expected, found });
    }

    let mut payloads = original.embedded_payloads();
    for node in minified.nodes_mut() {
        if let Node::Embedded(text) = node {
            // The count check above guarantees one payload per placeholder.
            if let Some(payload) = payloads.next() {
                payload.clone_into(text);
            }
        }
    }
    Ok(())
}
