//! The page inventory the sitemap generators enumerate.
//!
//! City slugs come from the kernel's slug registry; everything else is
//! listed here. Paths carry no leading slash and the homepage is `""`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogPost {
    pub slug: String,
    /// Frontmatter date, raw. Unparseable dates fall back to the baseline.
    #[serde(default)]
    pub date: Option<String>,
}

/// One `/{city}/industry/{industry}/{service}` page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndustryServicePage {
    pub city: String,
    pub industry: String,
    pub service: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteCatalog {
    /// Homepage, legal and landing pages (core sitemap).
    pub core_pages: Vec<String>,
    /// Section hubs such as `resources` or `blog` (core sitemap).
    pub hub_pages: Vec<String>,
    /// Interactive tools (services sitemap).
    pub tool_pages: Vec<String>,
    /// Slugs under `/solutions/` (services sitemap).
    pub solution_pages: Vec<String>,
    /// Slugs under `/services/` (services sitemap).
    pub standalone_services: Vec<String>,
    /// Paths under `/locations` (locations sitemap).
    pub location_hubs: Vec<String>,
    /// Services enumerated against every registry city.
    pub key_services: Vec<String>,
    pub industry_service_pages: Vec<IndustryServicePage>,
    pub blog_posts: Vec<BlogPost>,
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for SiteCatalog {
    fn default() -> Self {
        Self {
            core_pages: owned(&[
                "",
                "about",
                "founder",
                "contact",
                "pricing",
                "privacy",
                "terms",
                "ai-search-optimization",
                "entity-seo",
                "programmatic-seo",
                "index-governance",
            ]),
            hub_pages: owned(&["resources", "case-studies", "industries", "solutions", "blog"]),
            tool_pages: owned(&["seo-audit", "website-speed-test", "enhanced-demo"]),
            solution_pages: owned(&[
                "agency-results",
                "declining-traffic",
                "google-visibility",
                "website-conversion",
                "website-leads",
                "website-roi",
            ]),
            standalone_services: owned(&[
                "website-design",
                "web-development",
                "ui-ux-design",
                "ai-consulting",
                "ai-seo",
                "seo",
                "local-seo",
                "digital-marketing",
            ]),
            location_hubs: owned(&[
                "locations",
                "locations/hawaii",
                "locations/hawaii/kona",
                "locations/hawaii/honolulu",
            ]),
            key_services: owned(&[
                "website-design",
                "web-development",
                "seo",
                "local-seo",
                "digital-marketing",
                "ai-seo",
                "ai-consulting",
                "ui-ux-design",
            ]),
            industry_service_pages: Vec::new(),
            blog_posts: Vec::new(),
        }
    }
}
