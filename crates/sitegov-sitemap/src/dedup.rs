//! Deduplication by `<loc>`.

use crate::entry::SitemapEntry;
use crate::error::SitemapError;
use std::collections::{BTreeMap, HashSet};

/// Drop every entry whose URL was already seen. The first occurrence keeps
/// its position and metadata.
pub fn dedup(entries: Vec<SitemapEntry>) -> Vec<SitemapEntry> {
    let mut seen: HashSet<String> = HashSet::with_capacity(entries.len());
    entries
        .into_iter()
        .filter(|entry| seen.insert(entry.url.clone()))
        .collect()
}

/// Fail when any `<loc>` occurs more than once.
///
/// Runs after dedup. A hit means the pipeline itself is broken, so the
/// caller should stop rather than publish.
pub fn assert_no_duplicate_locs<'a>(
    entries: impl IntoIterator<Item = &'a SitemapEntry>,
) -> Result<(), SitemapError> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for entry in entries {
        *counts.entry(entry.url.as_str()).or_default() += 1;
    }
    match counts.into_iter().find(|(_, count)| *count > 1) {
        Some((loc, occurrences)) => Err(SitemapError::DuplicateLoc {
            loc: loc.to_string(),
            occurrences,
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(url: &str, day: u32) -> SitemapEntry {
        SitemapEntry::new(url).with_lastmod(NaiveDate::from_ymd_opt(2025, 1, day).expect("date"))
    }

    #[test]
    fn first_occurrence_wins() {
        let out = dedup(vec![at("/a", 1), at("/b", 2), at("/a", 3)]);
        assert_eq!(out, vec![at("/a", 1), at("/b", 2)]);
    }

    #[test]
    fn dedup_is_idempotent() {
        let input = vec![at("/c", 4), at("/a", 1), at("/c", 9), at("/b", 2), at("/a", 3)];
        let once = dedup(input);
        assert_eq!(dedup(once.clone()), once);
        assert!(assert_no_duplicate_locs(&once).is_ok());
    }

    #[test]
    fn duplicate_loc_is_an_error() {
        let entries = vec![at("/a", 1), at("/b", 2), at("/a", 3), at("/a", 4)];
        let err = assert_no_duplicate_locs(&entries).expect_err("duplicate must fail");
        assert!(matches!(
            err,
            SitemapError::DuplicateLoc { ref loc, occurrences: 3 } if loc == "/a"
        ));
        assert!(err.to_string().starts_with("Duplicate <loc> in sitemap output: /a"));
    }
}
