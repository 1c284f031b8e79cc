//! Splitting oversized categories into bounded sitemap files.

use crate::entry::{SitemapCategory, SitemapEntry};
use crate::error::SitemapError;

/// URLs per sitemap file. The protocol ceiling is 50,000.
pub const MAX_URLS_PER_CHUNK: usize = 45_000;

/// Split `entries` into ordered chunks of at most `max` entries.
///
/// An empty category still yields one (empty) chunk so its file exists.
pub fn chunk_entries(
    entries: Vec<SitemapEntry>,
    max: usize,
) -> Result<Vec<Vec<SitemapEntry>>, SitemapError> {
    if max == 0 {
        return Err(SitemapError::InvalidChunkSize(max));
    }
    if entries.len() <= max {
        return Ok(vec![entries]);
    }
    let mut chunks = Vec::with_capacity(entries.len().div_ceil(max));
    let mut rest = entries;
    while rest.len() > max {
        let tail = rest.split_off(max);
        chunks.push(rest);
        rest = tail;
    }
    chunks.push(rest);
    Ok(chunks)
}

/// File name of chunk `n` (1-indexed). The first chunk is unsuffixed.
pub fn chunk_file_name(category: SitemapCategory, n: usize) -> String {
    if n <= 1 {
        format!("sitemap-{category}.xml")
    } else {
        format!("sitemap-{category}-{n}.xml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(n: usize) -> Vec<SitemapEntry> {
        (0..n)
            .map(|i| SitemapEntry::new(format!("https://www.example.com/p/{i}")))
            .collect()
    }

    #[test]
    fn max_plus_one_makes_two_chunks() {
        let chunks = chunk_entries(entries(MAX_URLS_PER_CHUNK + 1), MAX_URLS_PER_CHUNK)
            .expect("chunking");
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].len(), MAX_URLS_PER_CHUNK);
        assert_eq!(chunks[1].len(), 1);
        assert_eq!(chunks[1][0].url, format!("https://www.example.com/p/{MAX_URLS_PER_CHUNK}"));
    }

    #[test]
    fn small_and_empty_categories_stay_whole() {
        assert_eq!(chunk_entries(entries(3), 3).expect("chunking").len(), 1);
        let empty = chunk_entries(Vec::new(), 3).expect("chunking");
        assert_eq!(empty.len(), 1);
        assert!(empty[0].is_empty());
    }

    #[test]
    fn order_is_preserved_across_chunks() {
        let chunks = chunk_entries(entries(7), 3).expect("chunking");
        let sizes: Vec<usize> = chunks.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![3, 3, 1]);
        let flat: Vec<SitemapEntry> = chunks.into_iter().flatten().collect();
        assert_eq!(flat, entries(7));
    }

    #[test]
    fn zero_chunk_size_is_rejected() {
        assert!(matches!(
            chunk_entries(entries(1), 0),
            Err(SitemapError::InvalidChunkSize(0))
        ));
    }

    #[test]
    fn file_names() {
        assert_eq!(chunk_file_name(SitemapCategory::Locations, 1), "sitemap-locations.xml");
        assert_eq!(chunk_file_name(SitemapCategory::Locations, 2), "sitemap-locations-2.xml");
    }
}
