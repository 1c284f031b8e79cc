//! Pre-collected blocks for a batch run.

use crate::supplier::{BlockSupplier, collect_blocks};
use sitegov_kernel::{BlockSet, PageSignals, RouteContent, RouteDescriptor, SlugRegistry};
use sitegov_sitemap::SiteCatalog;
use std::collections::HashMap;
use tracing::info;

/// Blocks and signals keyed by route, collected before the engine runs so
/// decisions stay synchronous. Unknown routes have no blocks and default
/// signals.
#[derive(Debug, Clone, Default)]
pub struct BlockCatalog {
    blocks: HashMap<RouteDescriptor, BlockSet>,
    signals: HashMap<RouteDescriptor, PageSignals>,
}

impl BlockCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, route: RouteDescriptor, blocks: BlockSet) {
        self.blocks.insert(route, blocks);
    }

    pub fn set_signals(&mut self, route: RouteDescriptor, signals: PageSignals) {
        self.signals.insert(route, signals);
    }

    /// Replace per-route signals wholesale, as loaded by
    /// [`load_page_signals`](crate::signals::load_page_signals).
    pub fn with_signals(
        mut self,
        signals: impl IntoIterator<Item = (RouteDescriptor, PageSignals)>,
    ) -> Self {
        self.signals = signals.into_iter().collect();
        self
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Collect blocks for every route in `routes`.
    pub async fn collect(
        supplier: &dyn BlockSupplier,
        routes: impl IntoIterator<Item = RouteDescriptor>,
    ) -> Self {
        let mut catalog = Self::new();
        for route in routes {
            let blocks = collect_blocks(supplier, &route).await;
            catalog.insert(route, blocks);
        }
        catalog
    }

    /// Collect blocks for every programmatic page the sitemap generators
    /// will ask about.
    pub async fn for_site(
        supplier: &dyn BlockSupplier,
        registry: &SlugRegistry,
        site: &SiteCatalog,
    ) -> Self {
        let catalog = Self::collect(supplier, programmatic_routes(registry, site)).await;
        info!(routes = catalog.len(), "collected uniqueness blocks");
        catalog
    }
}

/// City-service pages for every registry city and key service, then the
/// listed city-industry-service pages.
pub fn programmatic_routes(registry: &SlugRegistry, site: &SiteCatalog) -> Vec<RouteDescriptor> {
    let mut routes: Vec<RouteDescriptor> = registry
        .cities()
        .flat_map(|city| {
            site.key_services
                .iter()
                .map(move |service| RouteDescriptor::city_service(city, service.as_str()))
        })
        .collect();
    routes.extend(site.industry_service_pages.iter().map(|page| {
        RouteDescriptor::city_industry_service(
            page.city.as_str(),
            page.industry.as_str(),
            page.service.as_str(),
        )
    }));
    routes
}

impl RouteContent for BlockCatalog {
    fn blocks(&self, route: &RouteDescriptor) -> BlockSet {
        self.blocks.get(route).cloned().unwrap_or_default()
    }

    fn signals(&self, route: &RouteDescriptor) -> PageSignals {
        self.signals.get(route).cloned().unwrap_or_default()
    }
}
