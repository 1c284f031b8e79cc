//! Sitemap index assembly.
//!
//! Takes per-category entry lists in index order, deduplicates across
//! categories (earlier categories win), chunks each category and builds the
//! `<sitemapindex>` rows. The assembled set is checked for duplicate locs
//! before it is returned.

use crate::chunk::{chunk_entries, chunk_file_name};
use crate::dedup::{assert_no_duplicate_locs, dedup};
use crate::entry::{SitemapCategory, SitemapEntry};
use crate::error::SitemapError;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, info};

/// One child sitemap document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SitemapFile {
    pub name: String,
    pub category: SitemapCategory,
    pub entries: Vec<SitemapEntry>,
}

/// One `<sitemap>` row of the index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SitemapIndexEntry {
    pub name: String,
    pub loc: String,
    pub lastmod: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SitemapSet {
    pub files: Vec<SitemapFile>,
    pub index: Vec<SitemapIndexEntry>,
}

impl SitemapSet {
    pub fn total_urls(&self) -> usize {
        self.files.iter().map(|file| file.entries.len()).sum()
    }

    pub fn file(&self, name: &str) -> Option<&SitemapFile> {
        self.files.iter().find(|file| file.name == name)
    }

    pub fn entries(&self) -> impl Iterator<Item = &SitemapEntry> {
        self.files.iter().flat_map(|file| file.entries.iter())
    }
}

/// Newest lastmod in `entries`, or `fallback` when none is dated.
pub fn newest_lastmod(entries: &[SitemapEntry], fallback: NaiveDate) -> NaiveDate {
    entries
        .iter()
        .filter_map(|entry| entry.last_modified)
        .max()
        .unwrap_or(fallback)
}

pub fn assemble(
    categories: Vec<(SitemapCategory, Vec<SitemapEntry>)>,
    base_url: &str,
    fallback: NaiveDate,
    max_per_chunk: usize,
) -> Result<SitemapSet, SitemapError> {
    let base = base_url.trim_end_matches('/');
    let mut seen: HashSet<String> = HashSet::new();
    let mut files = Vec::new();
    let mut index = Vec::new();

    for (category, entries) in categories {
        let before = entries.len();
        let unique: Vec<SitemapEntry> = dedup(entries)
            .into_iter()
            .filter(|entry| seen.insert(entry.url.clone()))
            .collect();
        if unique.len() != before {
            debug!(
                category = %category,
                dropped = before - unique.len(),
                "dropped duplicate entries"
            );
        }

        for (i, chunk) in chunk_entries(unique, max_per_chunk)?.into_iter().enumerate() {
            let name = chunk_file_name(category, i + 1);
            index.push(SitemapIndexEntry {
                loc: format!("{base}/{name}"),
                lastmod: newest_lastmod(&chunk, fallback),
                name: name.clone(),
            });
            files.push(SitemapFile {
                name,
                category,
                entries: chunk,
            });
        }
    }

    let set = SitemapSet { files, index };
    assert_no_duplicate_locs(set.entries())?;
    info!(
        files = set.files.len(),
        urls = set.total_urls(),
        "assembled sitemap index"
    );
    Ok(set)
}
