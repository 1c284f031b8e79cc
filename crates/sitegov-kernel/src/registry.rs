//! Authoritative slug sets. Read-only once built.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Services that may be indexed as city-service pages.
pub const DEFAULT_TIER1_SERVICES: &[&str] = &[
    "web-development",
    "seo",
    "website-design",
    "local-seo",
    "digital-marketing",
    "ai-seo",
    "ai-consulting",
    "ui-ux-design",
];

fn default_tier1_services() -> BTreeSet<String> {
    DEFAULT_TIER1_SERVICES.iter().map(|s| s.to_string()).collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlugRegistry {
    #[serde(default)]
    cities: BTreeSet<String>,
    #[serde(default)]
    services: BTreeSet<String>,
    #[serde(default)]
    industries: BTreeSet<String>,
    #[serde(default = "default_tier1_services")]
    tier1_services: BTreeSet<String>,
}

impl Default for SlugRegistry {
    fn default() -> Self {
        Self {
            cities: BTreeSet::new(),
            services: BTreeSet::new(),
            industries: BTreeSet::new(),
            tier1_services: default_tier1_services(),
        }
    }
}

impl SlugRegistry {
    pub fn new<C, S, I>(cities: C, services: S, industries: I) -> Self
    where
        C: IntoIterator,
        C::Item: Into<String>,
        S: IntoIterator,
        S::Item: Into<String>,
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self {
            cities: cities.into_iter().map(Into::into).collect(),
            services: services.into_iter().map(Into::into).collect(),
            industries: industries.into_iter().map(Into::into).collect(),
            tier1_services: default_tier1_services(),
        }
    }

    pub fn with_tier1_services<T>(mut self, tier1: T) -> Self
    where
        T: IntoIterator,
        T::Item: Into<String>,
    {
        self.tier1_services = tier1.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_city(&self, slug: &str) -> bool {
        self.cities.contains(slug)
    }

    pub fn is_service(&self, slug: &str) -> bool {
        self.services.contains(slug)
    }

    pub fn is_industry(&self, slug: &str) -> bool {
        self.industries.contains(slug)
    }

    pub fn is_tier1_service(&self, slug: &str) -> bool {
        self.tier1_services.contains(slug)
    }

    pub fn cities(&self) -> impl Iterator<Item = &str> {
        self.cities.iter().map(String::as_str)
    }

    pub fn services(&self) -> impl Iterator<Item = &str> {
        self.services.iter().map(String::as_str)
    }

    pub fn industries(&self) -> impl Iterator<Item = &str> {
        self.industries.iter().map(String::as_str)
    }

    pub fn tier1_services(&self) -> impl Iterator<Item = &str> {
        self.tier1_services.iter().map(String::as_str)
    }
}
