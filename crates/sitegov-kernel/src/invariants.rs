//! Invariant assertions over directive sets.
//!
//! The engine's branch order already makes these states unreachable. The
//! checks run anyway after every decision, and a breach is corrected
//! rather than trusted.

use crate::directives::{SeoDirectives, Verdict};
use crate::error::GovernanceError;
use crate::reason::ReasonCode;
use crate::route::RouteType;

/// True when the route is a city-industry hub, whose directives are fixed
/// before any hard-pass trigger is consulted.
pub fn hub_is_resolved(route_type: RouteType) -> bool {
    route_type == RouteType::CityIndustry
}

/// Check one directive set against every invariant.
///
/// - city-industry hubs are never indexed and never in a sitemap
/// - a hard-failed page is never indexed
/// - a page is in the sitemap only if it is indexed
pub fn check_directives(
    url: &str,
    route_type: RouteType,
    directives: &SeoDirectives,
) -> Result<(), GovernanceError> {
    check_verdict(url, route_type, &directives.verdict())
}

pub fn check_verdict(
    url: &str,
    route_type: RouteType,
    verdict: &Verdict,
) -> Result<(), GovernanceError> {
    let breach = |detail: &str| GovernanceError::InvariantBreach {
        url: url.to_string(),
        route_type,
        detail: detail.to_string(),
    };

    if hub_is_resolved(route_type) && verdict.index {
        return Err(breach("city-industry hub marked indexable"));
    }
    if hub_is_resolved(route_type) && verdict.in_sitemap {
        return Err(breach("city-industry hub placed in sitemap"));
    }
    if verdict.gates.hard_fail && verdict.index {
        return Err(breach("hard-failed page marked indexable"));
    }
    if verdict.in_sitemap && !verdict.index {
        return Err(breach("noindex page placed in sitemap"));
    }
    Ok(())
}

/// Force a breached verdict back into the safe state: not indexed, not in
/// the sitemap, with `INVARIANT_CORRECTED` appended to its audit trail.
pub fn correct(verdict: Verdict) -> Verdict {
    let mut reason_codes = verdict.reason_codes;
    reason_codes.push(ReasonCode::InvariantCorrected);
    Verdict {
        index: false,
        in_sitemap: false,
        reason_codes,
        ..verdict
    }
}
