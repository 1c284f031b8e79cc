use crate::support::{
    block_catalog, clock_or_exit, engine_or_exit, exit_with, load_config_or_exit, monitor_for,
    print_json,
};
use serde_json::json;
use sitegov_kernel::{GovernanceViolation, RouteDescriptor, Severity, SlugRegistry, ViolationKind};
use sitegov_sitemap::SiteCatalog;
use std::collections::BTreeSet;
use std::process;
use tracing::info;

/// Every route the site publishes, including the city-industry hubs the
/// sitemaps never list.
fn audit_routes(registry: &SlugRegistry, site: &SiteCatalog) -> Vec<RouteDescriptor> {
    let mut routes: Vec<RouteDescriptor> = site
        .core_pages
        .iter()
        .chain(&site.hub_pages)
        .chain(&site.tool_pages)
        .chain(&site.location_hubs)
        .map(|path| RouteDescriptor::core(path.as_str()))
        .collect();
    routes.extend(
        site.solution_pages
            .iter()
            .map(|slug| RouteDescriptor::core(format!("solutions/{slug}"))),
    );
    routes.extend(
        site.blog_posts
            .iter()
            .map(|post| RouteDescriptor::core(format!("blog/{}", post.slug))),
    );
    routes.extend(
        site.standalone_services
            .iter()
            .map(|slug| RouteDescriptor::service(slug.as_str())),
    );
    for city in registry.cities() {
        routes.push(RouteDescriptor::city(city));
        routes.extend(
            site.key_services
                .iter()
                .map(|service| RouteDescriptor::city_service(city, service.as_str())),
        );
    }
    let hubs: BTreeSet<(&str, &str)> = site
        .industry_service_pages
        .iter()
        .map(|page| (page.city.as_str(), page.industry.as_str()))
        .collect();
    routes.extend(
        hubs.into_iter()
            .map(|(city, industry)| RouteDescriptor::city_industry(city, industry)),
    );
    routes.extend(site.industry_service_pages.iter().map(|page| {
        RouteDescriptor::city_industry_service(
            page.city.as_str(),
            page.industry.as_str(),
            page.service.as_str(),
        )
    }));
    routes
}

pub fn run(
    config_path: &str,
    severity: Option<String>,
    kind: Option<String>,
    now: Option<String>,
    json_output: bool,
) {
    let severity: Option<Severity> = severity
        .map(|raw| raw.parse().unwrap_or_else(|e| exit_with(e)));
    let kind: Option<ViolationKind> = kind.map(|raw| raw.parse().unwrap_or_else(|e| exit_with(e)));

    let config = load_config_or_exit(config_path);
    let clock = clock_or_exit(now.as_deref());
    let monitor = monitor_for(&config, clock.clone());
    let engine = engine_or_exit(&config, clock, Some(monitor.clone()));
    let content = block_catalog(&config);

    let routes = audit_routes(&config.registry, &config.catalog);
    let mut indexable = 0usize;
    for route in &routes {
        let directives = engine.decide_from(&route.relative_path(), route, &content);
        if directives.index {
            indexable += 1;
        }
    }
    let stats = monitor.stats();
    info!(routes = routes.len(), violations = stats.total, "audit complete");

    let violations: Vec<GovernanceViolation> = monitor
        .violations()
        .into_iter()
        .filter(|v| severity.is_none_or(|s| v.severity == s))
        .filter(|v| kind.is_none_or(|k| v.violation_type == k))
        .collect();
    let critical = stats
        .by_severity
        .get(&Severity::Critical)
        .copied()
        .unwrap_or(0);

    if json_output {
        print_json(&json!({
            "routes": routes.len(),
            "indexable": indexable,
            "stats": stats,
            "violations": violations,
        }));
    } else {
        println!("sitegov audit");
        println!("  Routes: {} ({indexable} indexable)", routes.len());
        println!("  Violations: {}", stats.total);
        for (level, count) in &stats.by_severity {
            println!("    {level}: {count}");
        }
        for violation in &violations {
            println!(
                "  [{}] {} {}: {}",
                violation.severity, violation.violation_type, violation.url, violation.message
            );
        }
    }
    if critical > 0 {
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitegov_kernel::RouteType;
    use sitegov_sitemap::IndustryServicePage;

    #[test]
    fn audit_routes_include_each_hub_once() {
        let registry = SlugRegistry::new(["austin-tx"], ["seo"], ["healthcare"]);
        let page = |service: &str| IndustryServicePage {
            city: "austin-tx".into(),
            industry: "healthcare".into(),
            service: service.into(),
        };
        let site = SiteCatalog {
            core_pages: vec!["".into()],
            hub_pages: Vec::new(),
            tool_pages: Vec::new(),
            solution_pages: Vec::new(),
            standalone_services: vec!["seo".into()],
            location_hubs: Vec::new(),
            key_services: vec!["seo".into()],
            industry_service_pages: vec![page("seo"), page("local-seo")],
            blog_posts: Vec::new(),
        };
        let routes = audit_routes(&registry, &site);
        let count = |ty: RouteType| routes.iter().filter(|r| r.route_type == ty).count();
        assert_eq!(count(RouteType::CityIndustry), 1);
        assert_eq!(count(RouteType::CityIndustryService), 2);
        assert_eq!(count(RouteType::CityService), 1);
        assert_eq!(count(RouteType::City), 1);
        assert_eq!(count(RouteType::Service), 1);
        assert_eq!(routes.len(), 7);
    }
}
