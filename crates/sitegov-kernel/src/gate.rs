//! The two-stage quality gate for conditional route types.
//!
//! - Stage A: every block in the route's required set is present and valid.
//! - Stage B: a capped weighted score compared against the route threshold.
//!
//! Stage A is monotone: removing a block can only turn a pass into a fail.

use crate::blocks::{BlockKind, BlockSet};
use crate::policy::PolicyTable;
use crate::route::RouteType;
use crate::score::Score;
use crate::signals::PageSignals;
use serde::Serialize;

/// Stage A result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageA {
    pub passed: bool,
    pub missing: Vec<BlockKind>,
    pub invalid: Vec<BlockKind>,
}

pub fn stage_a(required: &[BlockKind], blocks: &BlockSet) -> StageA {
    let missing: Vec<BlockKind> = required
        .iter()
        .copied()
        .filter(|kind| !blocks.is_present(*kind))
        .collect();
    let invalid: Vec<BlockKind> = required
        .iter()
        .copied()
        .filter(|kind| blocks.is_present(*kind) && !blocks.is_valid(*kind))
        .collect();
    StageA {
        passed: missing.is_empty() && invalid.is_empty(),
        missing,
        invalid,
    }
}

/// Stage B contributions, each already including its bonus.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub local_data: Score,
    pub industry_logic: Score,
    pub proof: Score,
    pub serp_intent: Score,
    pub technical_quality: Score,
    pub trust: Score,
    pub word_count: Score,
    pub total: Score,
}

pub fn stage_b(
    route_type: RouteType,
    blocks: &BlockSet,
    signals: &PageSignals,
    policy: &PolicyTable,
) -> ScoreBreakdown {
    let weight = Score::from_fraction;

    let local_data = match &blocks.local_data_card {
        Some(card) if blocks.is_valid(BlockKind::LocalDataCard) => {
            let mut parts = vec![weight(policy.local_data_weight)];
            if card.distinct_source_count() >= policy.source_bonus_min_sources {
                parts.push(weight(policy.local_data_source_bonus));
            }
            Score::sum(parts)
        }
        _ => Score::ZERO,
    };

    // Industry logic only differentiates industry pages; elsewhere the
    // weight is credited unconditionally.
    let industry_logic = if route_type == RouteType::CityIndustryService {
        match &blocks.industry_kpi_map {
            Some(map) if blocks.is_valid(BlockKind::IndustryKpiMap) => {
                let mut parts = vec![weight(policy.industry_logic_weight)];
                if map.kpis.len() >= policy.comprehensive_kpi_count {
                    parts.push(weight(policy.industry_kpi_bonus));
                }
                Score::sum(parts)
            }
            _ => Score::ZERO,
        }
    } else {
        weight(policy.industry_logic_weight)
    };

    let proof = match &blocks.proof_slot {
        Some(slot) if blocks.is_valid(BlockKind::ProofSlot) => {
            let mut parts = vec![weight(policy.proof_weight)];
            if slot.is_verified_case_study() {
                parts.push(weight(policy.verified_case_study_bonus));
            }
            Score::sum(parts)
        }
        _ => Score::ZERO,
    };

    let serp_intent = flag(signals.has_unique_content, policy.serp_intent_weight);
    let technical_quality = flag(signals.has_cms_content, policy.technical_quality_weight);
    let trust = Score::sum([
        flag(signals.is_featured(), policy.featured_trust_weight),
        flag(
            signals.engagement_at_least(policy.engagement_threshold),
            policy.engagement_trust_weight,
        ),
    ]);
    let word_count = match signals.word_count {
        Some(words) if words >= policy.long_form_words => weight(policy.long_form_bonus),
        Some(words) if words >= policy.mid_form_words => weight(policy.mid_form_bonus),
        _ => Score::ZERO,
    };

    let total = Score::sum([
        local_data,
        industry_logic,
        proof,
        serp_intent,
        technical_quality,
        trust,
        word_count,
    ]);
    ScoreBreakdown {
        local_data,
        industry_logic,
        proof,
        serp_intent,
        technical_quality,
        trust,
        word_count,
        total,
    }
}

fn flag(on: bool, weight: f64) -> Score {
    if on {
        Score::from_fraction(weight)
    } else {
        Score::ZERO
    }
}
