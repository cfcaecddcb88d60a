//! PHP-preserving HTML minification.
//!
//! Splits template text into markup and embedded `<?php ... ?>` nodes,
//! delegates markup compaction to `minify-html`, and guarantees that every
//! embedded region comes out byte-identical to the input.

pub mod error;
pub mod minify;
pub mod node;

pub use error::MinifyError;
pub use minify::{MinifyOptions, minify_preserving};
pub use node::{Node, NodeSequence, TagPattern};
