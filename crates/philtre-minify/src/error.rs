//! Error types for selective minification.

/// Errors that can occur while minifying a template.
#[derive(Debug, thiserror::Error)]
pub enum MinifyError {
    /// Minification produced a different number of embedded-region
    /// placeholders than the input contained. Splicing original payloads
    /// back by position would corrupt the output, so the file is rejected.
    #[error(
        "embedded tag count changed during minification: input had {expected}, output has {found}"
    )]
    TagCountMismatch {
        /// Embedded regions in the input.
        expected: usize,
        /// Embedded regions after minification.
        found: usize,
    },

    /// The minifier emitted bytes that are not valid UTF-8.
    #[error("minification produced invalid UTF-8")]
    InvalidUtf8,

    /// A delimiter pattern failed to compile.
    #[error("invalid delimiter pattern: {0}")]
    Pattern(#[from] regex::Error),
}
