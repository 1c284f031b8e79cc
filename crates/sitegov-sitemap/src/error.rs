//! Error types for sitemap assembly.
//!
//! Only structural faults are errors. Data-quality findings go into the
//! validation report instead.

#[derive(Debug, thiserror::Error)]
pub enum SitemapError {
    /// A `<loc>` survived deduplication. This is a pipeline bug, not bad
    /// input.
    #[error(
        "Duplicate <loc> in sitemap output: {loc} ({occurrences} occurrences). \
         Deduplication must ensure each URL is emitted at most once."
    )]
    DuplicateLoc { loc: String, occurrences: usize },

    /// Chunk size of zero.
    #[error("invalid chunk size: {0}")]
    InvalidChunkSize(usize),

    /// The assembled set failed validation.
    #[error("sitemap validation failed with {count} error(s); first: {first}")]
    Invalid { count: usize, first: String },
}
