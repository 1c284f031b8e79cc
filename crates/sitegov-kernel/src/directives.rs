//! Engine output: robots, canonical and sitemap directives for one URL.

use crate::digest::decision_id;
use crate::reason::{ReasonCode, ReasonCodes};
use crate::route::RouteDescriptor;
use crate::score::Score;
use serde::{Deserialize, Serialize};

/// Which gates a decision passed through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gates {
    pub two_of_three: bool,
    pub score_pass: bool,
    pub hard_fail: bool,
    pub hard_pass: bool,
}

/// The outcome of evaluation before it is bound to a URL and canonical.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub index: bool,
    pub in_sitemap: bool,
    pub score: Score,
    pub reason_codes: ReasonCodes,
    pub gates: Gates,
}

impl Verdict {
    fn noindex(reason_codes: ReasonCodes, score: Score, gates: Gates) -> Self {
        Self {
            index: false,
            in_sitemap: false,
            score,
            reason_codes,
            gates,
        }
    }

    fn indexed(reason_codes: ReasonCodes, score: Score, gates: Gates) -> Self {
        Self {
            index: true,
            in_sitemap: true,
            score,
            reason_codes,
            gates,
        }
    }

    pub fn hard_fail(trigger: ReasonCode) -> Self {
        Self::noindex(
            ReasonCodes::single(trigger),
            Score::ZERO,
            Gates {
                hard_fail: true,
                ..Gates::default()
            },
        )
    }

    /// A hard-fail that is also a Stage A failure: the required set is
    /// incomplete, so the audit trail names both.
    pub fn missing_required_blocks() -> Self {
        Self::noindex(
            ReasonCodes::single(ReasonCode::MissingRequiredBlocks).with(ReasonCode::StageAFailed),
            Score::ZERO,
            Gates {
                hard_fail: true,
                ..Gates::default()
            },
        )
    }

    pub fn hub() -> Self {
        Self::noindex(
            ReasonCodes::single(ReasonCode::CityIndustryHubAlwaysNoindex),
            Score::ZERO,
            Gates::default(),
        )
    }

    pub fn hard_pass(trigger: ReasonCode) -> Self {
        Self::indexed(
            ReasonCodes::single(trigger),
            Score::FULL,
            Gates {
                two_of_three: true,
                score_pass: true,
                hard_fail: false,
                hard_pass: true,
            },
        )
    }

    pub fn tier1() -> Self {
        Self::indexed(
            ReasonCodes::single(ReasonCode::Tier1AlwaysIndex),
            Score::FULL,
            Gates {
                two_of_three: true,
                score_pass: true,
                ..Gates::default()
            },
        )
    }

    pub fn not_tier1_service() -> Self {
        Self::noindex(
            ReasonCodes::single(ReasonCode::NotTier1Service),
            Score::ZERO,
            Gates::default(),
        )
    }

    pub fn stage_a_failed() -> Self {
        Self::noindex(
            ReasonCodes::single(ReasonCode::StageAFailed),
            Score::ZERO,
            Gates::default(),
        )
    }

    /// Stage B outcome for a page that passed Stage A.
    pub fn scored(score: Score, threshold: Score) -> Self {
        let gates = Gates {
            two_of_three: true,
            score_pass: score >= threshold,
            ..Gates::default()
        };
        if gates.score_pass {
            Self::indexed(
                ReasonCodes::single(ReasonCode::PassedQualityGates)
                    .with(ReasonCode::Score(score)),
                score,
                gates,
            )
        } else {
            Self::noindex(
                ReasonCodes::single(ReasonCode::StageBFailed).with(ReasonCode::Score(score)),
                score,
                gates,
            )
        }
    }

    pub fn unknown_route() -> Self {
        Self::noindex(
            ReasonCodes::single(ReasonCode::UnknownRouteType),
            Score::ZERO,
            Gates::default(),
        )
    }
}

/// Immutable directives for one URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoDirectives {
    pub index: bool,
    pub follow: bool,
    pub canonical: String,
    pub in_sitemap: bool,
    pub score: Score,
    pub reason_codes: ReasonCodes,
    pub gates: Gates,
    pub decision_id: String,
}

impl SeoDirectives {
    /// Bind a verdict to its URL and canonical, stamping the decision id.
    pub fn bind(url: &str, route: &RouteDescriptor, canonical: String, verdict: Verdict) -> Self {
        let decision_id = decision_id(url, route, &canonical, &verdict);
        Self {
            index: verdict.index,
            follow: true,
            canonical,
            in_sitemap: verdict.in_sitemap,
            score: verdict.score,
            reason_codes: verdict.reason_codes,
            gates: verdict.gates,
            decision_id,
        }
    }

    pub fn verdict(&self) -> Verdict {
        Verdict {
            index: self.index,
            in_sitemap: self.in_sitemap,
            score: self.score,
            reason_codes: self.reason_codes.clone(),
            gates: self.gates,
        }
    }

    /// Content for `<meta name="robots">`.
    pub fn robots_content(&self) -> &'static str {
        match (self.index, self.follow) {
            (true, true) => "index, follow",
            (true, false) => "index, nofollow",
            (false, true) => "noindex, follow",
            (false, false) => "noindex, nofollow",
        }
    }
}
