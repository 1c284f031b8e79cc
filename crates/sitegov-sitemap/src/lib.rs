//! # Sitegov Sitemap
//!
//! Turns governance decisions into sitemap artifacts.
//!
//! ```text
//!   SiteCatalog ──► SitemapGenerator ──► per-category entries
//!                    (engine decides         │
//!                     every page)            ▼
//!                                   dedup ─► chunk ─► SitemapSet
//!                                                        │
//!                                        validate ◄──────┤
//!                                                        ▼
//!                                              render_index / render_urlset
//! ```
//!
//! Only pages whose directives carry `inSitemap` are emitted, always under
//! their canonical URL. Lastmod dates come from [`lastmod::LastmodTable`],
//! never from the build clock.

pub mod catalog;
pub mod chunk;
pub mod dedup;
pub mod entry;
pub mod error;
pub mod generators;
pub mod index;
pub mod lastmod;
pub mod pipeline;
pub mod validation;
pub mod xml;

pub use catalog::{BlogPost, IndustryServicePage, SiteCatalog};
pub use chunk::{MAX_URLS_PER_CHUNK, chunk_entries, chunk_file_name};
pub use dedup::{assert_no_duplicate_locs, dedup};
pub use entry::{ChangeFrequency, SitemapCategory, SitemapEntry};
pub use error::SitemapError;
pub use generators::SitemapGenerator;
pub use index::{SitemapFile, SitemapIndexEntry, SitemapSet, assemble, newest_lastmod};
pub use lastmod::{Lastmod, LastmodDistribution, LastmodSource, LastmodTable, distribution};
pub use pipeline::{INDEX_FILE_NAME, SitemapArtifacts, build_sitemaps};
pub use validation::{
    IssueCode, IssueSeverity, ValidationIssue, ValidationReport, ValidationStats,
    validate_sitemaps,
};
pub use xml::{render_index, render_urlset};
