//! Canonical governance for city-industry hubs.
//!
//! A hub (`/{city}/industry/{industry}`) sits above its city-industry-service
//! pages. Using precomputed overlap statistics, the resolver decides whether
//! the hub keeps its own canonical or collapses into the city hub, the
//! industry hub, or its only indexable service page.
//!
//! Decisions are memoized per hub for the resolver's lifetime. Overlap data
//! only changes on reload, so the cache has no expiry.

use crate::error::GovernanceError;
use crate::monitor::{GovernanceMonitor, ViolationKind};
use crate::policy::PolicyTable;
use crate::route::RouteType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, error, warn};

/// Precomputed overlap between a hub and its parent dimensions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlapRecord {
    pub city_overlap: f64,
    pub industry_overlap: f64,
    pub downstream_pages: i64,
    pub computed_at: DateTime<Utc>,
}

impl OverlapRecord {
    pub fn is_well_formed(&self) -> bool {
        (0.0..=1.0).contains(&self.city_overlap)
            && (0.0..=1.0).contains(&self.industry_overlap)
            && self.downstream_pages >= 0
    }
}

/// Read-only map from hub path to overlap record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OverlapStore {
    records: BTreeMap<String, OverlapRecord>,
}

impl OverlapStore {
    pub fn from_records<I, K>(records: I) -> Self
    where
        I: IntoIterator<Item = (K, OverlapRecord)>,
        K: Into<String>,
    {
        Self {
            records: records
                .into_iter()
                .map(|(key, record)| (normalize_hub_key(&key.into()), record))
                .collect(),
        }
    }

    /// The record for `hub_path`, if present and well formed. Malformed
    /// records count as missing.
    pub fn get(&self, hub_path: &str) -> Option<&OverlapRecord> {
        let record = self.records.get(&normalize_hub_key(hub_path))?;
        if record.is_well_formed() {
            Some(record)
        } else {
            warn!(hub = hub_path, ?record, "ignoring malformed overlap record");
            None
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn hub_paths(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }
}

fn normalize_hub_key(raw: &str) -> String {
    format!("/{}", raw.trim().trim_matches('/'))
}

pub fn hub_path(city: &str, industry: &str) -> String {
    format!("/{city}/industry/{industry}")
}

/// A city-industry-service page below a hub.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownstreamPage {
    /// Site-relative path or absolute URL.
    pub url: String,
    pub indexable: bool,
}

impl DownstreamPage {
    pub fn new(url: impl Into<String>, indexable: bool) -> Self {
        Self {
            url: url.into(),
            indexable,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CanonicalReason {
    SingleServicePage,
    NoDownstreamPages,
    NoOverlapData,
    RedundantWithBoth,
    RedundantWithCity,
    RedundantWithIndustry,
    UniqueNavigation,
    DefaultSelf,
    InvalidCanonicalTarget,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlapScores {
    pub city_overlap: f64,
    pub industry_overlap: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalDecision {
    pub canonical: String,
    pub reason_code: CanonicalReason,
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overlap_scores: Option<OverlapScores>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub downstream_pages: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub size: usize,
    pub entries: Vec<String>,
}

/// The legal canonical targets for one hub.
struct HubTargets {
    own: String,
    city_hub: String,
    industry_hub: String,
    service_prefix: String,
}

impl HubTargets {
    fn new(base_url: &str, city: &str, industry: &str) -> Self {
        let own = format!("{base_url}{}", hub_path(city, industry));
        Self {
            service_prefix: format!("{own}/"),
            own,
            city_hub: format!("{base_url}/{city}"),
            industry_hub: format!("{base_url}/industries/{industry}"),
        }
    }

    fn admits(&self, canonical: &str) -> bool {
        canonical == self.own
            || canonical == self.city_hub
            || canonical == self.industry_hub
            || canonical
                .strip_prefix(&self.service_prefix)
                .is_some_and(|service| !service.is_empty() && !service.contains('/'))
    }
}

/// Fail unless `canonical` is one of the hub's legal targets: itself, the
/// city hub, the industry hub, or one of its service pages.
pub fn assert_canonical_shape(
    base_url: &str,
    city: &str,
    industry: &str,
    canonical: &str,
) -> Result<(), GovernanceError> {
    let base_url = base_url.trim_end_matches('/');
    if HubTargets::new(base_url, city, industry).admits(canonical) {
        Ok(())
    } else {
        Err(GovernanceError::InvalidCanonicalTarget {
            hub: hub_path(city, industry),
            canonical: canonical.to_string(),
        })
    }
}

#[derive(Debug)]
pub struct CanonicalResolver {
    base_url: String,
    overlap: Arc<OverlapStore>,
    redundancy_threshold: f64,
    unique_navigation_min_downstream: usize,
    monitor: Option<Arc<GovernanceMonitor>>,
    cache: RwLock<HashMap<String, CanonicalDecision>>,
}

impl CanonicalResolver {
    pub fn new(base_url: impl Into<String>, overlap: Arc<OverlapStore>, policy: &PolicyTable) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            overlap,
            redundancy_threshold: policy.hub_redundancy_threshold,
            unique_navigation_min_downstream: policy.unique_navigation_min_downstream,
            monitor: None,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Report rejected canonical targets to `monitor`.
    pub fn with_monitor(mut self, monitor: Arc<GovernanceMonitor>) -> Self {
        self.monitor = Some(monitor);
        self
    }

    /// Canonical for the hub `/{city}/industry/{industry}`.
    ///
    /// A cached decision is returned as-is; `downstream` is only consulted
    /// the first time a hub is resolved.
    pub fn resolve_hub(
        &self,
        city: &str,
        industry: &str,
        downstream: &[DownstreamPage],
    ) -> CanonicalDecision {
        let key = hub_path(city, industry);
        if let Some(cached) = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            debug!(hub = %key, "canonical decision from cache");
            return cached.clone();
        }

        let decision = self.compute(city, industry, downstream);
        debug!(
            hub = %key,
            canonical = %decision.canonical,
            reason = ?decision.reason_code,
            "canonical decision"
        );
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(key)
            .or_insert(decision)
            .clone()
    }

    /// Uncached decision. Pure given the overlap store.
    pub fn compute(
        &self,
        city: &str,
        industry: &str,
        downstream: &[DownstreamPage],
    ) -> CanonicalDecision {
        let hub = hub_path(city, industry);
        let targets = HubTargets::new(&self.base_url, city, industry);
        let decision = self.select(&hub, &targets, downstream);

        if targets.admits(&decision.canonical) {
            return decision;
        }

        error!(
            hub = %hub,
            canonical = %decision.canonical,
            "invalid canonical target, falling back to self"
        );
        if let Some(monitor) = &self.monitor {
            monitor.report(
                &hub,
                RouteType::CityIndustry,
                ViolationKind::InvalidCanonicalTarget,
                format!("rejected canonical target {}", decision.canonical),
            );
        }
        CanonicalDecision {
            canonical: targets.own,
            reason_code: CanonicalReason::InvalidCanonicalTarget,
            reason: "computed canonical is not a legal target for this hub; using self".to_string(),
            ..decision
        }
    }

    fn select(
        &self,
        hub: &str,
        targets: &HubTargets,
        downstream: &[DownstreamPage],
    ) -> CanonicalDecision {
        let decision = |canonical: &str, reason_code, reason: &str| CanonicalDecision {
            canonical: canonical.to_string(),
            reason_code,
            reason: reason.to_string(),
            overlap_scores: None,
            downstream_pages: Some(downstream.len()),
        };

        let indexable: Vec<&DownstreamPage> = downstream.iter().filter(|p| p.indexable).collect();
        if let [only] = indexable.as_slice() {
            return decision(
                &self.absolute(&only.url),
                CanonicalReason::SingleServicePage,
                "only one indexable city-industry-service page exists",
            );
        }

        if downstream.is_empty() {
            return decision(
                &targets.own,
                CanonicalReason::NoDownstreamPages,
                "no downstream pages yet; hub is preserved",
            );
        }

        let Some(record) = self.overlap.get(hub) else {
            return decision(
                &targets.own,
                CanonicalReason::NoOverlapData,
                "overlap scores unavailable; defaulting to self",
            );
        };

        // The precomputed count covers pages the caller may not have listed.
        let downstream_count = usize::try_from(record.downstream_pages)
            .unwrap_or(0)
            .max(downstream.len());
        let scored = |canonical: &str, reason_code, reason: &str| CanonicalDecision {
            overlap_scores: Some(OverlapScores {
                city_overlap: record.city_overlap,
                industry_overlap: record.industry_overlap,
            }),
            downstream_pages: Some(downstream_count),
            ..decision(canonical, reason_code, reason)
        };
        let city_redundant = record.city_overlap >= self.redundancy_threshold;
        let industry_redundant = record.industry_overlap >= self.redundancy_threshold;

        match (city_redundant, industry_redundant) {
            (true, true) => scored(
                &targets.city_hub,
                CanonicalReason::RedundantWithBoth,
                "redundant with both city and industry hubs; preferring the city",
            ),
            (true, false) => scored(
                &targets.city_hub,
                CanonicalReason::RedundantWithCity,
                "redundant with the city hub",
            ),
            (false, true) => scored(
                &targets.industry_hub,
                CanonicalReason::RedundantWithIndustry,
                "redundant with the industry hub",
            ),
            (false, false) if downstream_count >= self.unique_navigation_min_downstream => scored(
                &targets.own,
                CanonicalReason::UniqueNavigation,
                "unique navigational function across several downstream pages",
            ),
            (false, false) => scored(
                &targets.own,
                CanonicalReason::DefaultSelf,
                "no redundancy detected; keeping self",
            ),
        }
    }

    fn absolute(&self, url: &str) -> String {
        if url.starts_with("https://") || url.starts_with("http://") {
            url.to_string()
        } else {
            format!("{}/{}", self.base_url, url.trim_start_matches('/'))
        }
    }

    pub fn cache_stats(&self) -> CacheStats {
        let cache = self.cache.read().unwrap_or_else(PoisonError::into_inner);
        let mut entries: Vec<String> = cache.keys().cloned().collect();
        entries.sort();
        CacheStats {
            size: entries.len(),
            entries,
        }
    }

    pub fn clear_cache(&self) {
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}
