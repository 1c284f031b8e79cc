//! Generate, assemble, validate and render in one pass.

use crate::chunk::MAX_URLS_PER_CHUNK;
use crate::error::SitemapError;
use crate::generators::SitemapGenerator;
use crate::index::{SitemapSet, assemble};
use crate::validation::{ValidationReport, validate_sitemaps};
use crate::xml::{render_index, render_urlset};
use chrono::NaiveDate;
use tracing::warn;

/// File name of the top-level index document.
pub const INDEX_FILE_NAME: &str = "sitemap.xml";

#[derive(Debug, Clone)]
pub struct SitemapArtifacts {
    pub set: SitemapSet,
    pub report: ValidationReport,
}

impl SitemapArtifacts {
    /// `(file name, XML)` for the index followed by every child sitemap.
    pub fn documents(&self) -> Vec<(String, String)> {
        std::iter::once((INDEX_FILE_NAME.to_string(), render_index(&self.set.index)))
            .chain(
                self.set
                    .files
                    .iter()
                    .map(|file| (file.name.clone(), render_urlset(&file.entries))),
            )
            .collect()
    }
}

/// Run every generator and assemble the result.
///
/// Structural faults (duplicate locs, bad chunk size) are errors. The
/// validation report is returned as-is so callers decide how strict to be.
pub fn build_sitemaps(
    generator: &SitemapGenerator<'_>,
    base_url: &str,
    fallback: NaiveDate,
    today: NaiveDate,
) -> Result<SitemapArtifacts, SitemapError> {
    let set = assemble(generator.generate_all(), base_url, fallback, MAX_URLS_PER_CHUNK)?;
    let report = validate_sitemaps(&set, today);
    for warning in &report.warnings {
        warn!(code = ?warning.code, "{}", warning.message);
    }
    Ok(SitemapArtifacts { set, report })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::tests::{BASE, catalog, city_service_blocks, clock, engine};
    use crate::lastmod::LastmodTable;

    #[test]
    fn pipeline_produces_index_and_children() {
        let engine = engine();
        let blocks = city_service_blocks();
        let catalog = catalog();
        let lastmod = LastmodTable::default();
        let clock = clock();
        let generator = SitemapGenerator::new(&engine, &blocks, &catalog, &lastmod, &clock);

        let today = NaiveDate::from_ymd_opt(2025, 3, 1).expect("date");
        let artifacts = build_sitemaps(&generator, BASE, lastmod.fallback, today).expect("build");
        assert!(artifacts.report.valid, "{:?}", artifacts.report.errors);

        let names: Vec<String> = artifacts.documents().into_iter().map(|(name, _)| name).collect();
        assert_eq!(
            names,
            vec![
                "sitemap.xml",
                "sitemap-core.xml",
                "sitemap-services.xml",
                "sitemap-blog.xml",
                "sitemap-locations.xml",
            ]
        );
        let (_, index_xml) = &artifacts.documents()[0];
        assert!(index_xml.contains("<loc>https://www.example.com/sitemap-locations.xml</loc>"));
    }
}
