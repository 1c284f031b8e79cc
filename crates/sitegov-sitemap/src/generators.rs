//! Category generators.
//!
//! Every candidate goes through the index policy engine; only directives
//! with `inSitemap` produce an entry, and the entry's `<loc>` is the
//! decision's canonical. Each generator deduplicates its own output.

use crate::catalog::SiteCatalog;
use crate::dedup::dedup;
use crate::entry::{ChangeFrequency, SitemapCategory, SitemapEntry};
use crate::lastmod::{Lastmod, LastmodTable};
use sitegov_kernel::{Clock, IndexPolicyEngine, RouteContent, RouteDescriptor, SeoDirectives};
use tracing::{debug, info};

pub struct SitemapGenerator<'a> {
    engine: &'a IndexPolicyEngine,
    content: &'a dyn RouteContent,
    catalog: &'a SiteCatalog,
    lastmod: &'a LastmodTable,
    clock: &'a dyn Clock,
}

impl<'a> SitemapGenerator<'a> {
    pub fn new(
        engine: &'a IndexPolicyEngine,
        content: &'a dyn RouteContent,
        catalog: &'a SiteCatalog,
        lastmod: &'a LastmodTable,
        clock: &'a dyn Clock,
    ) -> Self {
        Self {
            engine,
            content,
            catalog,
            lastmod,
            clock,
        }
    }

    /// Directives for `route` when it belongs in a sitemap.
    fn admit(&self, route: &RouteDescriptor) -> Option<SeoDirectives> {
        let url = route.relative_path();
        let directives = self.engine.decide_from(&url, route, self.content);
        if directives.in_sitemap {
            Some(directives)
        } else {
            debug!(url = %url, reasons = %directives.reason_codes, "excluded from sitemap");
            None
        }
    }

    fn entry(
        &self,
        route: &RouteDescriptor,
        lastmod: Lastmod,
        freq: ChangeFrequency,
        priority: f64,
    ) -> Option<SitemapEntry> {
        self.admit(route).map(|directives| {
            SitemapEntry::new(directives.canonical)
                .with_lastmod(lastmod.date)
                .with_changefreq(freq)
                .with_priority(priority)
        })
    }

    /// Homepage, landing pages, legal pages and section hubs.
    pub fn core_entries(&self) -> Vec<SitemapEntry> {
        let entries = self
            .catalog
            .core_pages
            .iter()
            .chain(&self.catalog.hub_pages)
            .filter_map(|path| {
                let (priority, freq) = match path.as_str() {
                    "" => (1.0, ChangeFrequency::Weekly),
                    "pricing" => (0.8, ChangeFrequency::Monthly),
                    "privacy" | "terms" => (0.5, ChangeFrequency::Yearly),
                    "blog" => (0.7, ChangeFrequency::Weekly),
                    _ => (0.7, ChangeFrequency::Monthly),
                };
                self.entry(
                    &RouteDescriptor::core(path.as_str()),
                    self.lastmod.core_page(path),
                    freq,
                    priority,
                )
            })
            .collect();
        dedup(entries)
    }

    /// Tools, solution pages and `/services/*`.
    ///
    /// Service aliases such as `/services/seo-austin` canonicalize to a
    /// programmatic page and are left to the sitemap that owns that page.
    pub fn services_entries(&self) -> Vec<SitemapEntry> {
        let mut entries = Vec::new();

        for path in &self.catalog.tool_pages {
            entries.extend(self.entry(
                &RouteDescriptor::core(path.as_str()),
                self.lastmod.core_page(path),
                ChangeFrequency::Monthly,
                0.7,
            ));
        }

        for solution in &self.catalog.solution_pages {
            let path = format!("solutions/{solution}");
            entries.extend(self.entry(
                &RouteDescriptor::core(path.as_str()),
                self.lastmod.core_page(&path),
                ChangeFrequency::Monthly,
                0.7,
            ));
        }

        let services_prefix = format!("{}/services/", self.engine.base_url());
        for service in &self.catalog.standalone_services {
            let Some(directives) = self.admit(&RouteDescriptor::service(service.as_str())) else {
                continue;
            };
            if !directives.canonical.starts_with(&services_prefix) {
                debug!(service = %service, canonical = %directives.canonical, "service canonical outside /services/");
                continue;
            }
            entries.push(
                SitemapEntry::new(directives.canonical)
                    .with_lastmod(self.lastmod.service_page().date)
                    .with_changefreq(ChangeFrequency::Monthly)
                    .with_priority(0.8),
            );
        }

        dedup(entries)
    }

    /// Individual posts under `/blog/`. The blog landing page is core.
    pub fn blog_entries(&self) -> Vec<SitemapEntry> {
        let now = self.clock.now();
        let entries = self
            .catalog
            .blog_posts
            .iter()
            .filter_map(|post| {
                let path = format!("blog/{}", post.slug);
                self.entry(
                    &RouteDescriptor::core(path),
                    self.lastmod.blog_post(post.date.as_deref(), now),
                    ChangeFrequency::Yearly,
                    0.6,
                )
            })
            .collect();
        dedup(entries)
    }

    /// Location hubs, city hubs, city-service and city-industry-service
    /// pages.
    pub fn locations_entries(&self) -> Vec<SitemapEntry> {
        let mut entries = Vec::new();
        let registry = self.engine.registry();

        for path in &self.catalog.location_hubs {
            entries.extend(self.entry(
                &RouteDescriptor::core(path.as_str()),
                self.lastmod.core_page(path),
                ChangeFrequency::Monthly,
                0.7,
            ));
        }

        for city in registry.cities() {
            entries.extend(self.entry(
                &RouteDescriptor::city(city),
                self.lastmod.city_page(),
                ChangeFrequency::Monthly,
                0.6,
            ));
        }

        for city in registry.cities() {
            for service in &self.catalog.key_services {
                entries.extend(self.entry(
                    &RouteDescriptor::city_service(city, service.as_str()),
                    self.lastmod.city_service_page(),
                    ChangeFrequency::Monthly,
                    0.5,
                ));
            }
        }

        for page in &self.catalog.industry_service_pages {
            entries.extend(self.entry(
                &RouteDescriptor::city_industry_service(
                    page.city.as_str(),
                    page.industry.as_str(),
                    page.service.as_str(),
                ),
                self.lastmod.city_service_page(),
                ChangeFrequency::Monthly,
                0.4,
            ));
        }

        dedup(entries)
    }

    pub fn category(&self, category: SitemapCategory) -> Vec<SitemapEntry> {
        match category {
            SitemapCategory::Core => self.core_entries(),
            SitemapCategory::Services => self.services_entries(),
            SitemapCategory::Blog => self.blog_entries(),
            SitemapCategory::Locations => self.locations_entries(),
        }
    }

    /// Every category in index order.
    pub fn generate_all(&self) -> Vec<(SitemapCategory, Vec<SitemapEntry>)> {
        SitemapCategory::ALL
            .into_iter()
            .map(|category| {
                let entries = self.category(category);
                info!(category = %category, urls = entries.len(), "generated sitemap entries");
                (category, entries)
            })
            .collect()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::catalog::{BlogPost, IndustryServicePage};
    use chrono::NaiveDate;
    use sitegov_kernel::{BlockSet, FixedClock, PageSignals, PolicyTable, SlugRegistry};
    use std::sync::Arc;

    pub(crate) const BASE: &str = "https://www.example.com";

    /// Valid local data and proof, dated inside the freshness window.
    pub(crate) fn city_service_blocks() -> BlockSet {
        serde_json::from_value(serde_json::json!({
            "localDataCard": {
                "serp_data": {"avg_competitor_count": 12.0},
                "market_data": {"market_size": 1800000.0},
                "review_data": {"avg_rating_range": "4.1-4.8"},
                "competitor_data": {"competitor_categories": ["agency"]},
                "data_sources": [{"name": "Census ACS"}],
                "last_updated": "2025-01-10"
            },
            "proofSlot": {
                "type": "aggregate",
                "aggregate_metrics": [{"metric": "avg_traffic_lift", "value": 0.38}],
                "last_updated": "2025-01-10"
            }
        }))
        .expect("blocks parse")
    }

    /// Blocks only for Austin pages; every other route gets none.
    struct AustinOnly(BlockSet);

    impl RouteContent for AustinOnly {
        fn blocks(&self, route: &RouteDescriptor) -> BlockSet {
            if route.city.as_deref() == Some("austin-tx") {
                self.0.clone()
            } else {
                BlockSet::new()
            }
        }

        fn signals(&self, route: &RouteDescriptor) -> PageSignals {
            PageSignals {
                manual_noindex: route.path.as_deref() == Some("founder"),
                ..PageSignals::default()
            }
        }
    }

    pub(crate) fn clock() -> FixedClock {
        FixedClock::parse("2025-03-01").expect("clock")
    }

    pub(crate) fn engine() -> IndexPolicyEngine {
        let registry = SlugRegistry::new(
            ["austin-tx", "boston-ma"],
            ["seo", "web-development", "local-seo", "plumbing-marketing"],
            ["healthcare"],
        );
        IndexPolicyEngine::new(Arc::new(registry), PolicyTable::default(), BASE)
            .expect("policy")
            .with_clock(Arc::new(clock()))
    }

    pub(crate) fn catalog() -> SiteCatalog {
        SiteCatalog {
            core_pages: vec!["".into(), "about".into(), "founder".into(), "pricing".into(), "privacy".into()],
            hub_pages: vec!["blog".into(), "about".into()],
            tool_pages: vec!["seo-audit".into()],
            solution_pages: vec!["website-roi".into()],
            standalone_services: vec!["seo".into(), "not-registered".into()],
            location_hubs: vec!["locations".into()],
            key_services: vec!["seo".into(), "plumbing-marketing".into()],
            industry_service_pages: vec![IndustryServicePage {
                city: "boston-ma".into(),
                industry: "healthcare".into(),
                service: "seo".into(),
            }],
            blog_posts: vec![
                BlogPost {
                    slug: "governed-indexing".into(),
                    date: Some("2025-02-10".into()),
                },
                BlogPost {
                    slug: "undated".into(),
                    date: None,
                },
            ],
        }
    }

    fn urls(entries: &[SitemapEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.url.as_str()).collect()
    }

    fn with_generator<T>(run: impl FnOnce(&SitemapGenerator<'_>) -> T) -> T {
        let engine = engine();
        let content = AustinOnly(city_service_blocks());
        let catalog = catalog();
        let lastmod = LastmodTable::default();
        let clock = clock();
        let generator = SitemapGenerator::new(&engine, &content, &catalog, &lastmod, &clock);
        run(&generator)
    }

    #[test]
    fn core_entries_skip_noindex_and_dedup() {
        let entries = with_generator(|g| g.core_entries());
        assert_eq!(
            urls(&entries),
            vec![
                "https://www.example.com",
                "https://www.example.com/about",
                "https://www.example.com/pricing",
                "https://www.example.com/privacy",
                "https://www.example.com/blog",
            ]
        );
        assert_eq!(entries[0].priority, Some(1.0));
        assert_eq!(entries[0].change_frequency, Some(ChangeFrequency::Weekly));
        assert_eq!(entries[3].change_frequency, Some(ChangeFrequency::Yearly));
        assert_eq!(entries[4].change_frequency, Some(ChangeFrequency::Weekly));
        assert_eq!(
            entries[2].last_modified,
            NaiveDate::from_ymd_opt(2025, 1, 12)
        );
    }

    #[test]
    fn services_entries_require_registered_services() {
        let entries = with_generator(|g| g.services_entries());
        assert_eq!(
            urls(&entries),
            vec![
                "https://www.example.com/seo-audit",
                "https://www.example.com/solutions/website-roi",
                "https://www.example.com/services/seo",
            ]
        );
        assert_eq!(entries[2].priority, Some(0.8));
        assert_eq!(
            entries[2].last_modified,
            NaiveDate::from_ymd_opt(2025, 1, 10)
        );
    }

    #[test]
    fn service_aliases_are_left_to_their_canonical_sitemap() {
        let registry = SlugRegistry::new(
            ["austin-tx"],
            ["seo", "seo-austin", "geo-austin"],
            ["healthcare"],
        );
        let engine = IndexPolicyEngine::new(Arc::new(registry), PolicyTable::default(), BASE)
            .expect("policy")
            .with_clock(Arc::new(clock()));
        let content = AustinOnly(city_service_blocks());
        let catalog = SiteCatalog {
            tool_pages: Vec::new(),
            solution_pages: Vec::new(),
            standalone_services: vec!["seo".into(), "seo-austin".into(), "geo-austin".into()],
            ..catalog()
        };
        let lastmod = LastmodTable::default();
        let clock = clock();
        let generator = SitemapGenerator::new(&engine, &content, &catalog, &lastmod, &clock);

        assert_eq!(
            urls(&generator.services_entries()),
            vec!["https://www.example.com/services/seo"]
        );
    }

    #[test]
    fn blog_entries_use_cms_dates() {
        let entries = with_generator(|g| g.blog_entries());
        assert_eq!(
            urls(&entries),
            vec![
                "https://www.example.com/blog/governed-indexing",
                "https://www.example.com/blog/undated",
            ]
        );
        assert_eq!(entries[0].last_modified, NaiveDate::from_ymd_opt(2025, 2, 10));
        assert_eq!(entries[1].last_modified, NaiveDate::from_ymd_opt(2024, 12, 1));
    }

    #[test]
    fn locations_entries_follow_governance() {
        let entries = with_generator(|g| g.locations_entries());
        // boston-ma/seo has no blocks; plumbing-marketing is not Tier-1;
        // the Boston industry page has no blocks either.
        assert_eq!(
            urls(&entries),
            vec![
                "https://www.example.com/locations",
                "https://www.example.com/austin-tx",
                "https://www.example.com/boston-ma",
                "https://www.example.com/austin-tx/seo",
            ]
        );
        assert_eq!(entries[3].priority, Some(0.5));
    }

    #[test]
    fn generate_all_keeps_category_order() {
        let all = with_generator(|g| g.generate_all());
        let order: Vec<SitemapCategory> = all.iter().map(|(c, _)| *c).collect();
        assert_eq!(order, SitemapCategory::ALL.to_vec());
    }
}
