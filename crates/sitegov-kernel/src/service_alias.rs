//! Service-page aliases.
//!
//! Some `/services/{slug}` pages restate a programmatic page under another
//! path. Their canonical is the programmatic page:
//!
//! ```text
//! /services/geo-{city}          → /{city}
//! /services/{service}-{city}    → /{city}/{service}
//! /services/{city}-{service}    → /{city}/{service}
//! ```
//!
//! `{city}` is a registered city slug, with or without its trailing state
//! segment (`austin` and `austin-tx` both name `austin-tx`). Nothing maps
//! unless every target slug is registered, and `geo-{industry}` pages stay
//! self-canonical.

use crate::registry::SlugRegistry;
use crate::route::{RouteDescriptor, RouteType, canonical_url};
use std::cmp::Reverse;

const GEO_PREFIX: &str = "geo-";

/// The programmatic page a service route restates, if any.
pub fn alias_target(registry: &SlugRegistry, route: &RouteDescriptor) -> Option<RouteDescriptor> {
    if route.route_type != RouteType::Service {
        return None;
    }
    let slug = route.service_slug().trim().to_ascii_lowercase();

    if let Some(place) = slug.strip_prefix(GEO_PREFIX) {
        if registry.is_industry(place) {
            return None;
        }
        return resolve_city(registry, place).map(RouteDescriptor::city);
    }

    service_then_city(registry, &slug)
        .or_else(|| city_then_service(registry, &slug))
        .map(|(city, service)| RouteDescriptor::city_service(city, service))
}

/// Whether canonicalizing `source` to `target` would loop back to `source`.
pub fn is_circular(registry: &SlugRegistry, source: &RouteDescriptor, target: &RouteDescriptor) -> bool {
    let source_path = source.relative_path();
    target.relative_path() == source_path
        || alias_target(registry, target).is_some_and(|back| back.relative_path() == source_path)
}

/// Canonical URL for `route`, following a service alias unless that would
/// loop.
pub fn resolve_canonical(base_url: &str, registry: &SlugRegistry, route: &RouteDescriptor) -> String {
    match alias_target(registry, route) {
        Some(target) if !is_circular(registry, route, &target) => canonical_url(base_url, &target),
        _ => canonical_url(base_url, route),
    }
}

fn resolve_city<'r>(registry: &'r SlugRegistry, place: &str) -> Option<&'r str> {
    registry
        .cities()
        .find(|city| *city == place)
        .or_else(|| registry.cities().find(|city| city_name(city) == Some(place)))
}

/// `austin-tx` → `austin`.
fn city_name(city: &str) -> Option<&str> {
    city.rsplit_once('-').map(|(name, _)| name)
}

/// `seo-austin` → (`austin-tx`, `seo`). The longest matching service wins.
fn service_then_city<'r>(registry: &'r SlugRegistry, slug: &str) -> Option<(&'r str, &'r str)> {
    let mut services: Vec<&str> = registry.services().collect();
    services.sort_by_key(|service| Reverse(service.len()));
    services.into_iter().find_map(|service| {
        let place = slug.strip_prefix(service)?.strip_prefix('-')?;
        resolve_city(registry, place).map(|city| (city, service))
    })
}

/// `austin-seo` → (`austin-tx`, `seo`).
fn city_then_service<'r>(registry: &'r SlugRegistry, slug: &str) -> Option<(&'r str, &'r str)> {
    registry.cities().find_map(|city| {
        [Some(city), city_name(city)]
            .into_iter()
            .flatten()
            .find_map(|prefix| {
                let rest = slug.strip_prefix(prefix)?.strip_prefix('-')?;
                registry
                    .services()
                    .find(|service| *service == rest)
                    .map(|service| (city, service))
            })
    })
}
