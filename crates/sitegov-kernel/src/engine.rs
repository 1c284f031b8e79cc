//! The index policy engine.
//!
//! One call per URL. Evaluation runs in a fixed order and stops at the
//! first rule that decides:
//!
//! 1. hard-fail triggers
//! 2. the city-industry hub rule
//! 3. hard-pass triggers
//! 4. Tier-1 routes
//! 5. the two-stage quality gate for city-service and
//!    city-industry-service routes
//!
//! Every verdict is then checked against the directive invariants before
//! it leaves the engine.

use crate::blocks::{BlockKind, BlockSet};
use crate::clock::{Clock, SystemClock};
use crate::content::RouteContent;
use crate::directives::{SeoDirectives, Verdict};
use crate::error::GovernanceError;
use crate::gate::{stage_a, stage_b};
use crate::invariants;
use crate::monitor::GovernanceMonitor;
use crate::policy::PolicyTable;
use crate::reason::ReasonCode;
use crate::registry::SlugRegistry;
use crate::route::{RouteDescriptor, RouteType};
use crate::service_alias;
use crate::signals::PageSignals;
use chrono::Duration;
use std::sync::Arc;
use tracing::{debug, error};

#[derive(Debug, Clone)]
pub struct IndexPolicyEngine {
    registry: Arc<SlugRegistry>,
    policy: PolicyTable,
    base_url: String,
    clock: Arc<dyn Clock>,
    monitor: Option<Arc<GovernanceMonitor>>,
}

impl IndexPolicyEngine {
    /// Build an engine over `registry`. Fails if the policy table is out of
    /// range.
    pub fn new(
        registry: Arc<SlugRegistry>,
        policy: PolicyTable,
        base_url: impl Into<String>,
    ) -> Result<Self, GovernanceError> {
        policy.validate()?;
        Ok(Self {
            registry,
            policy,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            clock: Arc::new(SystemClock),
            monitor: None,
        })
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Feed every decision through `monitor`.
    pub fn with_monitor(mut self, monitor: Arc<GovernanceMonitor>) -> Self {
        self.monitor = Some(monitor);
        self
    }

    pub fn registry(&self) -> &SlugRegistry {
        &self.registry
    }

    pub fn policy(&self) -> &PolicyTable {
        &self.policy
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn monitor(&self) -> Option<&Arc<GovernanceMonitor>> {
        self.monitor.as_ref()
    }

    /// Canonical URL for `route`. Service aliases point at the programmatic
    /// page they restate unless that would loop.
    pub fn canonical_for(&self, route: &RouteDescriptor) -> String {
        service_alias::resolve_canonical(&self.base_url, &self.registry, route)
    }

    /// Decide directives for `url`.
    pub fn decide(
        &self,
        url: &str,
        route: &RouteDescriptor,
        blocks: &BlockSet,
        signals: &PageSignals,
    ) -> SeoDirectives {
        let verdict = self.evaluate(route, blocks, signals);
        self.finalize(url, route, Some(blocks), verdict)
    }

    /// Decide directives with blocks and signals pulled from `content`.
    pub fn decide_from(
        &self,
        url: &str,
        route: &RouteDescriptor,
        content: &dyn RouteContent,
    ) -> SeoDirectives {
        self.decide(url, route, &content.blocks(route), &content.signals(route))
    }

    /// Bind a verdict, run it past the monitor, and enforce invariants.
    ///
    /// A breached verdict is corrected to noindex and carries
    /// `INVARIANT_CORRECTED`; the monitor has already seen the breach.
    pub fn finalize(
        &self,
        url: &str,
        route: &RouteDescriptor,
        blocks: Option<&BlockSet>,
        verdict: Verdict,
    ) -> SeoDirectives {
        let canonical = self.canonical_for(route);
        let directives = SeoDirectives::bind(url, route, canonical.clone(), verdict);

        if let Some(monitor) = &self.monitor {
            monitor.check_directives(url, route.route_type, blocks, &directives);
        }

        let directives = match invariants::check_directives(url, route.route_type, &directives) {
            Ok(()) => directives,
            Err(breach) => {
                error!(url, route_type = %route.route_type, "{breach}");
                let corrected = invariants::correct(directives.verdict());
                SeoDirectives::bind(url, route, canonical, corrected)
            }
        };

        debug!(
            url,
            route_type = %route.route_type,
            index = directives.index,
            in_sitemap = directives.in_sitemap,
            score = %directives.score,
            reasons = %directives.reason_codes,
            decision_id = %directives.decision_id,
            "decision"
        );
        directives
    }

    /// The verdict for a route, before binding.
    pub fn evaluate(
        &self,
        route: &RouteDescriptor,
        blocks: &BlockSet,
        signals: &PageSignals,
    ) -> Verdict {
        if let Some(verdict) = self.hard_fail(route, blocks, signals) {
            return verdict;
        }
        if invariants::hub_is_resolved(route.route_type) {
            return Verdict::hub();
        }
        if route.route_type == RouteType::Unknown {
            return Verdict::unknown_route();
        }
        if let Some(trigger) = self.hard_pass(route.route_type, blocks, signals) {
            return Verdict::hard_pass(trigger);
        }
        if route.route_type.is_tier1() {
            return Verdict::tier1();
        }

        if route.route_type == RouteType::CityService
            && !self.registry.is_tier1_service(route.service_slug())
        {
            return Verdict::not_tier1_service();
        }

        let Some(threshold) = self.policy.threshold_for(route.route_type) else {
            return Verdict::unknown_route();
        };
        if !stage_a(route.route_type.required_blocks(), blocks).passed {
            return Verdict::stage_a_failed();
        }
        let breakdown = stage_b(route.route_type, blocks, signals, &self.policy);
        Verdict::scored(breakdown.total, threshold)
    }

    fn hard_fail(
        &self,
        route: &RouteDescriptor,
        blocks: &BlockSet,
        signals: &PageSignals,
    ) -> Option<Verdict> {
        let route_type = route.route_type;
        if route.validate_shape().is_err() {
            return Some(Verdict::hard_fail(ReasonCode::InvalidRouteShape));
        }

        let carries_city = matches!(
            route_type,
            RouteType::City
                | RouteType::CityService
                | RouteType::CityIndustry
                | RouteType::CityIndustryService
        );
        let carries_service = matches!(
            route_type,
            RouteType::Service | RouteType::CityService | RouteType::CityIndustryService
        );
        let carries_industry = matches!(
            route_type,
            RouteType::CityIndustry | RouteType::CityIndustryService
        );
        if carries_city && !self.registry.is_city(route.city_slug()) {
            return Some(Verdict::hard_fail(ReasonCode::InvalidCitySlug));
        }
        if carries_service && !self.registry.is_service(route.service_slug()) {
            return Some(Verdict::hard_fail(ReasonCode::InvalidServiceSlug));
        }
        if carries_industry && !self.registry.is_industry(route.industry_slug()) {
            return Some(Verdict::hard_fail(ReasonCode::InvalidIndustrySlug));
        }

        if signals.duplicate_content {
            return Some(Verdict::hard_fail(ReasonCode::DuplicateContent));
        }

        if route_type.is_programmatic()
            && route_type
                .required_blocks()
                .iter()
                .any(|kind| !blocks.is_present(*kind))
        {
            return Some(Verdict::missing_required_blocks());
        }

        for kind in BlockKind::ALL {
            if blocks.is_present(kind) && !blocks.is_valid(kind) {
                return Some(Verdict::hard_fail(invalid_block_code(kind)));
            }
        }

        if route_type.is_programmatic() && self.is_stale(blocks) {
            return Some(Verdict::hard_fail(ReasonCode::StaleData));
        }

        if signals.manual_noindex {
            return Some(Verdict::hard_fail(ReasonCode::ManualNoindex));
        }
        None
    }

    fn is_stale(&self, blocks: &BlockSet) -> bool {
        let window = Duration::days(self.policy.stale_after_days);
        blocks
            .last_updated(BlockKind::LocalDataCard)
            .is_some_and(|updated| self.clock.now() - updated > window)
    }

    fn hard_pass(
        &self,
        route_type: RouteType,
        blocks: &BlockSet,
        signals: &PageSignals,
    ) -> Option<ReasonCode> {
        let policy = &self.policy;
        let industry_page = route_type == RouteType::CityIndustryService;

        if signals.has_cms_content {
            return Some(ReasonCode::CmsContentPresent);
        }
        if industry_page
            && policy.hard_pass_on_complete_blocks
            && stage_a(route_type.required_blocks(), blocks).passed
        {
            return Some(ReasonCode::AllBlocksValid);
        }
        if blocks.is_valid(BlockKind::ProofSlot)
            && blocks
                .proof_slot
                .as_ref()
                .is_some_and(|slot| slot.is_verified_case_study())
        {
            return Some(ReasonCode::VerifiedCaseStudy);
        }
        if blocks.is_valid(BlockKind::LocalDataCard)
            && blocks.local_data_card.as_ref().is_some_and(|card| {
                card.has_all_categories()
                    && card.distinct_source_count() >= policy.high_quality_min_sources
            })
        {
            return Some(ReasonCode::HighQualityLocalData);
        }
        if blocks.is_valid(BlockKind::IndustryKpiMap)
            && blocks
                .industry_kpi_map
                .as_ref()
                .is_some_and(|map| map.kpis.len() >= policy.comprehensive_kpi_count)
        {
            return Some(ReasonCode::ComprehensiveKpiMap);
        }
        if industry_page && self.is_recent(blocks) {
            return Some(ReasonCode::RecentDataUpdates);
        }
        if signals.manual_index {
            return Some(ReasonCode::ManualIndex);
        }
        if signals.is_featured() {
            return Some(ReasonCode::FeaturedPage);
        }
        if signals.engagement_at_least(policy.engagement_threshold) {
            return Some(ReasonCode::HighEngagement);
        }
        if signals.citations_at_least(policy.external_citation_threshold) {
            return Some(ReasonCode::ExternalCitations);
        }
        None
    }

    /// Every present block was updated inside the recency window.
    fn is_recent(&self, blocks: &BlockSet) -> bool {
        let present = blocks.present_kinds();
        let window = Duration::days(self.policy.recent_within_days);
        let now = self.clock.now();
        !present.is_empty()
            && present.into_iter().all(|kind| {
                blocks
                    .last_updated(kind)
                    .is_some_and(|updated| now - updated <= window)
            })
    }
}

fn invalid_block_code(kind: BlockKind) -> ReasonCode {
    match kind {
        BlockKind::LocalDataCard => ReasonCode::LocalDataCardInvalid,
        BlockKind::IndustryKpiMap => ReasonCode::IndustryKpiMapInvalid,
        BlockKind::ProofSlot => ReasonCode::ProofSlotInvalid,
    }
}
