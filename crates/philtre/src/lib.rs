//! Philtre - post-build processor for PHP templates
//!
//! Walks a directory of PHP templates after a bundler run, minifies the
//! HTML portions while keeping embedded PHP byte-identical, prepends an
//! asset-manifest include and attaches the script-insertion helper, then
//! mirrors each file into the build output directory.

pub mod config;
pub mod manifest;
pub mod pipeline;
pub mod walk;

pub use config::{Overrides, ResolvedConfig};
pub use pipeline::{BuildReport, FileError, run};
