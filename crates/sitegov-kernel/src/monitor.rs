//! Governance monitor: a bounded log of invariant and data-quality
//! violations for dashboards and alerting.
//!
//! The log is a ring buffer. Once `capacity` entries are held, each new
//! record evicts the oldest. Writers from several threads are safe; no
//! ordering is promised between unrelated URLs.

use crate::blocks::BlockSet;
use crate::clock::{Clock, SystemClock};
use crate::directives::SeoDirectives;
use crate::error::Severity;
use crate::gate::stage_a;
use crate::reason::ReasonCode;
use crate::route::RouteType;
use crate::score::Score;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, warn};

pub const DEFAULT_CAPACITY: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViolationKind {
    MissingRequiredBlocks,
    StaleData,
    LowQualityScore,
    CityIndustryHubIndexed,
    CityIndustryHubInSitemap,
    InvalidCanonicalTarget,
}

impl ViolationKind {
    pub const ALL: [ViolationKind; 6] = [
        ViolationKind::MissingRequiredBlocks,
        ViolationKind::StaleData,
        ViolationKind::LowQualityScore,
        ViolationKind::CityIndustryHubIndexed,
        ViolationKind::CityIndustryHubInSitemap,
        ViolationKind::InvalidCanonicalTarget,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::MissingRequiredBlocks => "MISSING_REQUIRED_BLOCKS",
            Self::StaleData => "STALE_DATA",
            Self::LowQualityScore => "LOW_QUALITY_SCORE",
            Self::CityIndustryHubIndexed => "CITY_INDUSTRY_HUB_INDEXED",
            Self::CityIndustryHubInSitemap => "CITY_INDUSTRY_HUB_IN_SITEMAP",
            Self::InvalidCanonicalTarget => "INVALID_CANONICAL_TARGET",
        }
    }

    pub fn severity(self) -> Severity {
        match self {
            Self::CityIndustryHubIndexed | Self::CityIndustryHubInSitemap => Severity::Critical,
            Self::MissingRequiredBlocks | Self::InvalidCanonicalTarget => Severity::High,
            Self::StaleData | Self::LowQualityScore => Severity::Medium,
        }
    }
}

impl std::fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ViolationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown violation type `{s}`"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GovernanceViolation {
    pub url: String,
    pub route_type: RouteType,
    pub violation_type: ViolationKind,
    pub severity: Severity,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Aggregate counts over the retained log.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViolationStats {
    pub total: usize,
    pub evicted: u64,
    pub by_severity: BTreeMap<Severity, usize>,
    pub by_route_type: BTreeMap<RouteType, usize>,
    pub by_violation_type: BTreeMap<ViolationKind, usize>,
}

#[derive(Debug, Default)]
struct Ring {
    entries: VecDeque<GovernanceViolation>,
    evicted: u64,
}

#[derive(Debug)]
pub struct GovernanceMonitor {
    capacity: usize,
    low_score_alert: Score,
    clock: Arc<dyn Clock>,
    ring: Mutex<Ring>,
}

impl Default for GovernanceMonitor {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl GovernanceMonitor {
    /// A capacity of zero is treated as one.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            low_score_alert: Score::from_fraction(0.5),
            clock: Arc::new(SystemClock),
            ring: Mutex::new(Ring::default()),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_low_score_alert(mut self, threshold: Score) -> Self {
        self.low_score_alert = threshold;
        self
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn ring(&self) -> MutexGuard<'_, Ring> {
        self.ring.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn record(&self, violation: GovernanceViolation) {
        match violation.severity {
            Severity::High | Severity::Critical => warn!(
                url = %violation.url,
                route_type = %violation.route_type,
                violation = %violation.violation_type,
                severity = %violation.severity,
                "{}",
                violation.message
            ),
            Severity::Low | Severity::Medium => debug!(
                url = %violation.url,
                violation = %violation.violation_type,
                "{}",
                violation.message
            ),
        }

        let mut ring = self.ring();
        while ring.entries.len() >= self.capacity {
            ring.entries.pop_front();
            ring.evicted += 1;
        }
        ring.entries.push_back(violation);
    }

    /// Record a violation of `kind` at its standard severity, stamped now.
    pub fn report(
        &self,
        url: &str,
        route_type: RouteType,
        kind: ViolationKind,
        message: impl Into<String>,
    ) -> GovernanceViolation {
        let violation = GovernanceViolation {
            url: url.to_string(),
            route_type,
            violation_type: kind,
            severity: kind.severity(),
            message: message.into(),
            timestamp: self.clock.now(),
        };
        self.record(violation.clone());
        violation
    }

    /// Inspect one decision and record every expectation it violates.
    ///
    /// `blocks` enables the required-block check against the actual block
    /// set; without it only the reason codes are consulted.
    pub fn check_directives(
        &self,
        url: &str,
        route_type: RouteType,
        blocks: Option<&BlockSet>,
        directives: &SeoDirectives,
    ) -> Vec<GovernanceViolation> {
        let mut found = Vec::new();

        if directives.index && route_type.is_programmatic() {
            let incomplete = match blocks {
                Some(blocks) => !stage_a(route_type.required_blocks(), blocks).passed,
                None => directives
                    .reason_codes
                    .contains(ReasonCode::MissingRequiredBlocks),
            };
            if incomplete {
                found.push(self.report(
                    url,
                    route_type,
                    ViolationKind::MissingRequiredBlocks,
                    "indexed page is missing required uniqueness blocks",
                ));
            }
        }

        if directives.reason_codes.contains(ReasonCode::StaleData) {
            found.push(self.report(
                url,
                route_type,
                ViolationKind::StaleData,
                "local data card is older than the freshness window",
            ));
        }

        let gated = route_type.is_programmatic() || route_type == RouteType::CityIndustry;
        if directives.index && gated && directives.score < self.low_score_alert {
            found.push(self.report(
                url,
                route_type,
                ViolationKind::LowQualityScore,
                format!(
                    "indexed with score {} below alert threshold {}",
                    directives.score, self.low_score_alert
                ),
            ));
        }

        if route_type == RouteType::CityIndustry {
            if directives.index {
                found.push(self.report(
                    url,
                    route_type,
                    ViolationKind::CityIndustryHubIndexed,
                    "city-industry hub is marked indexable",
                ));
            }
            if directives.in_sitemap {
                found.push(self.report(
                    url,
                    route_type,
                    ViolationKind::CityIndustryHubInSitemap,
                    "city-industry hub is included in the sitemap",
                ));
            }
        }

        found
    }

    /// Retained violations, oldest first.
    pub fn violations(&self) -> Vec<GovernanceViolation> {
        self.ring().entries.iter().cloned().collect()
    }

    fn filtered(&self, keep: impl Fn(&GovernanceViolation) -> bool) -> Vec<GovernanceViolation> {
        self.ring()
            .entries
            .iter()
            .filter(|v| keep(v))
            .cloned()
            .collect()
    }

    pub fn by_severity(&self, severity: Severity) -> Vec<GovernanceViolation> {
        self.filtered(|v| v.severity == severity)
    }

    pub fn by_route_type(&self, route_type: RouteType) -> Vec<GovernanceViolation> {
        self.filtered(|v| v.route_type == route_type)
    }

    pub fn by_kind(&self, kind: ViolationKind) -> Vec<GovernanceViolation> {
        self.filtered(|v| v.violation_type == kind)
    }

    pub fn stats(&self) -> ViolationStats {
        let ring = self.ring();
        let mut stats = ViolationStats {
            total: ring.entries.len(),
            evicted: ring.evicted,
            ..ViolationStats::default()
        };
        for violation in &ring.entries {
            *stats.by_severity.entry(violation.severity).or_default() += 1;
            *stats.by_route_type.entry(violation.route_type).or_default() += 1;
            *stats
                .by_violation_type
                .entry(violation.violation_type)
                .or_default() += 1;
        }
        stats
    }

    pub fn len(&self) -> usize {
        self.ring().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every retained violation and reset the eviction counter.
    pub fn clear(&self) {
        let mut ring = self.ring();
        ring.entries.clear();
        ring.evicted = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::directives::Verdict;
    use crate::route::RouteDescriptor;

    fn monitor(capacity: usize) -> GovernanceMonitor {
        let clock = FixedClock::parse("2025-03-01T12:00:00Z").expect("fixed clock");
        GovernanceMonitor::new(capacity).with_clock(Arc::new(clock))
    }

    fn bind(route: &RouteDescriptor, verdict: Verdict) -> SeoDirectives {
        SeoDirectives::bind("/x", route, "https://www.example.com/x".into(), verdict)
    }

    #[test]
    fn ring_evicts_oldest_first() {
        let monitor = monitor(3);
        for i in 0..5 {
            monitor.report(
                &format!("/page-{i}"),
                RouteType::CityService,
                ViolationKind::StaleData,
                "stale",
            );
        }
        let urls: Vec<String> = monitor.violations().into_iter().map(|v| v.url).collect();
        assert_eq!(urls, vec!["/page-2", "/page-3", "/page-4"]);
        assert_eq!(monitor.stats().evicted, 2);

        monitor.clear();
        assert!(monitor.is_empty());
        assert_eq!(monitor.stats(), ViolationStats::default());
    }

    #[test]
    fn forged_hub_directives_are_critical() {
        let monitor = monitor(DEFAULT_CAPACITY);
        let route = RouteDescriptor::city_industry("boston-ma", "healthcare");
        let found = monitor.check_directives(
            "/boston-ma/industry/healthcare",
            RouteType::CityIndustry,
            None,
            &bind(&route, Verdict::hard_pass(ReasonCode::ManualIndex)),
        );
        let kinds: Vec<ViolationKind> = found.iter().map(|v| v.violation_type).collect();
        assert_eq!(
            kinds,
            vec![
                ViolationKind::CityIndustryHubIndexed,
                ViolationKind::CityIndustryHubInSitemap
            ]
        );
        assert_eq!(monitor.by_severity(Severity::Critical).len(), 2);

        let clean = monitor.check_directives(
            "/boston-ma/industry/healthcare",
            RouteType::CityIndustry,
            None,
            &bind(&route, Verdict::hub()),
        );
        assert!(clean.is_empty());
    }

    #[test]
    fn indexed_page_without_blocks_is_flagged() {
        let monitor = monitor(DEFAULT_CAPACITY);
        let route = RouteDescriptor::city_service("austin-tx", "seo");
        let found = monitor.check_directives(
            "/austin-tx/seo",
            RouteType::CityService,
            Some(&BlockSet::new()),
            &bind(&route, Verdict::hard_pass(ReasonCode::ManualIndex)),
        );
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].violation_type, ViolationKind::MissingRequiredBlocks);
        assert_eq!(found[0].severity, Severity::High);
        assert_eq!(found[0].timestamp.to_rfc3339(), "2025-03-01T12:00:00+00:00");
    }

    #[test]
    fn stale_and_low_score_are_medium() {
        let monitor = monitor(DEFAULT_CAPACITY);
        let route = RouteDescriptor::city_service("austin-tx", "seo");
        monitor.check_directives(
            "/austin-tx/seo",
            RouteType::CityService,
            None,
            &bind(&route, Verdict::hard_fail(ReasonCode::StaleData)),
        );
        monitor.check_directives(
            "/austin-tx/seo",
            RouteType::CityService,
            None,
            &bind(
                &route,
                Verdict::scored(Score::from_basis_points(4_000), Score::ZERO),
            ),
        );

        let stats = monitor.stats();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.by_severity.get(&Severity::Medium), Some(&2));
        assert_eq!(stats.by_route_type.get(&RouteType::CityService), Some(&2));
        assert_eq!(monitor.by_kind(ViolationKind::LowQualityScore).len(), 1);
        assert_eq!(monitor.by_route_type(RouteType::City).len(), 0);

        let json = serde_json::to_value(&stats).expect("stats serialize");
        assert_eq!(json["byViolationType"]["STALE_DATA"], 1);
        assert_eq!(json["bySeverity"]["medium"], 2);
        assert_eq!(json["byRouteType"]["city-service"], 2);
    }

    #[test]
    fn concurrent_writers_respect_capacity() {
        let monitor = monitor(50);
        std::thread::scope(|scope| {
            for t in 0..8 {
                let monitor = &monitor;
                scope.spawn(move || {
                    for i in 0..20 {
                        monitor.report(
                            &format!("/t{t}/{i}"),
                            RouteType::CityService,
                            ViolationKind::StaleData,
                            "stale",
                        );
                    }
                });
            }
        });
        let stats = monitor.stats();
        assert_eq!(stats.total, 50);
        assert_eq!(stats.evicted, 110);
    }
}
