//! The scoring policy table.
//!
//! Weights, thresholds and windows are configuration, not constants. The
//! defaults reproduce the production numbers; nothing claims they are
//! optimal.

use crate::error::GovernanceError;
use crate::route::RouteType;
use crate::score::Score;
use serde::{Deserialize, Serialize};

/// Longest freshness window a policy may configure, in days.
pub const MAX_WINDOW_DAYS: i64 = 36_500;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyTable {
    pub local_data_weight: f64,
    pub local_data_source_bonus: f64,
    pub source_bonus_min_sources: usize,
    pub industry_logic_weight: f64,
    pub industry_kpi_bonus: f64,
    pub comprehensive_kpi_count: usize,
    pub proof_weight: f64,
    pub verified_case_study_bonus: f64,
    pub serp_intent_weight: f64,
    pub technical_quality_weight: f64,
    pub featured_trust_weight: f64,
    pub engagement_trust_weight: f64,
    pub engagement_threshold: f64,
    pub long_form_words: u32,
    pub long_form_bonus: f64,
    pub mid_form_words: u32,
    pub mid_form_bonus: f64,

    pub city_service_threshold: f64,
    pub city_industry_service_threshold: f64,

    pub stale_after_days: i64,
    pub recent_within_days: i64,
    pub high_quality_min_sources: usize,
    pub external_citation_threshold: u32,
    /// When false, complete block sets go through the scored gate instead
    /// of hard-passing city-industry-service pages.
    pub hard_pass_on_complete_blocks: bool,

    pub hub_redundancy_threshold: f64,
    pub unique_navigation_min_downstream: usize,

    /// Indexed programmatic pages scoring below this are flagged.
    pub low_score_alert: f64,
}

impl Default for PolicyTable {
    fn default() -> Self {
        Self {
            local_data_weight: 0.25,
            local_data_source_bonus: 0.02,
            source_bonus_min_sources: 2,
            industry_logic_weight: 0.20,
            industry_kpi_bonus: 0.02,
            comprehensive_kpi_count: 8,
            proof_weight: 0.25,
            verified_case_study_bonus: 0.02,
            serp_intent_weight: 0.10,
            technical_quality_weight: 0.10,
            featured_trust_weight: 0.05,
            engagement_trust_weight: 0.05,
            engagement_threshold: 0.8,
            long_form_words: 2000,
            long_form_bonus: 0.05,
            mid_form_words: 1200,
            mid_form_bonus: 0.03,
            city_service_threshold: 0.65,
            city_industry_service_threshold: 0.75,
            stale_after_days: 90,
            recent_within_days: 30,
            high_quality_min_sources: 2,
            external_citation_threshold: 3,
            hard_pass_on_complete_blocks: true,
            hub_redundancy_threshold: 0.80,
            unique_navigation_min_downstream: 3,
            low_score_alert: 0.5,
        }
    }
}

impl PolicyTable {
    /// Score threshold for route types that run the two-stage gate.
    pub fn threshold_for(&self, route_type: RouteType) -> Option<Score> {
        match route_type {
            RouteType::CityService => Some(Score::from_fraction(self.city_service_threshold)),
            RouteType::CityIndustryService => {
                Some(Score::from_fraction(self.city_industry_service_threshold))
            }
            _ => None,
        }
    }

    pub fn validate(&self) -> Result<(), GovernanceError> {
        let weights = [
            ("local_data_weight", self.local_data_weight),
            ("local_data_source_bonus", self.local_data_source_bonus),
            ("industry_logic_weight", self.industry_logic_weight),
            ("industry_kpi_bonus", self.industry_kpi_bonus),
            ("proof_weight", self.proof_weight),
            ("verified_case_study_bonus", self.verified_case_study_bonus),
            ("serp_intent_weight", self.serp_intent_weight),
            ("technical_quality_weight", self.technical_quality_weight),
            ("featured_trust_weight", self.featured_trust_weight),
            ("engagement_trust_weight", self.engagement_trust_weight),
            ("long_form_bonus", self.long_form_bonus),
            ("mid_form_bonus", self.mid_form_bonus),
        ];
        for (name, weight) in weights {
            if !weight.is_finite() || weight < 0.0 {
                return Err(GovernanceError::InvalidPolicy(format!(
                    "{name} must be a non-negative number, got {weight}"
                )));
            }
        }

        let ratios = [
            ("engagement_threshold", self.engagement_threshold),
            ("city_service_threshold", self.city_service_threshold),
            (
                "city_industry_service_threshold",
                self.city_industry_service_threshold,
            ),
            ("hub_redundancy_threshold", self.hub_redundancy_threshold),
            ("low_score_alert", self.low_score_alert),
        ];
        for (name, ratio) in ratios {
            if !(0.0..=1.0).contains(&ratio) {
                return Err(GovernanceError::InvalidPolicy(format!(
                    "{name} must lie in [0, 1], got {ratio}"
                )));
            }
        }

        let windows = [
            ("stale_after_days", self.stale_after_days),
            ("recent_within_days", self.recent_within_days),
        ];
        for (name, days) in windows {
            if !(1..=MAX_WINDOW_DAYS).contains(&days) {
                return Err(GovernanceError::InvalidPolicy(format!(
                    "{name} must lie in [1, {MAX_WINDOW_DAYS}] days, got {days}"
                )));
            }
        }
        if self.mid_form_words > self.long_form_words {
            return Err(GovernanceError::InvalidPolicy(format!(
                "mid_form_words ({}) exceeds long_form_words ({})",
                self.mid_form_words, self.long_form_words
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let policy = PolicyTable::default();
        assert!(policy.validate().is_ok());
        assert_eq!(
            policy.threshold_for(RouteType::CityService),
            Some(Score::from_basis_points(6_500))
        );
        assert_eq!(
            policy.threshold_for(RouteType::CityIndustryService),
            Some(Score::from_basis_points(7_500))
        );
        assert_eq!(policy.threshold_for(RouteType::City), None);
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let policy: PolicyTable = serde_json::from_value(serde_json::json!({
            "city_service_threshold": 0.6
        }))
        .expect("partial policy should parse");
        assert_eq!(policy.city_service_threshold, 0.6);
        assert_eq!(policy.proof_weight, 0.25);
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let negative = PolicyTable {
            proof_weight: -0.1,
            ..PolicyTable::default()
        };
        assert!(negative.validate().is_err());

        let threshold = PolicyTable {
            city_industry_service_threshold: 1.5,
            ..PolicyTable::default()
        };
        let err = threshold.validate().expect_err("threshold above 1");
        assert!(err.to_string().contains("city_industry_service_threshold"));

        let windows = PolicyTable {
            stale_after_days: 0,
            ..PolicyTable::default()
        };
        assert!(windows.validate().is_err());
    }

    #[test]
    fn freshness_windows_are_bounded() {
        let huge = PolicyTable {
            recent_within_days: i64::MAX,
            ..PolicyTable::default()
        };
        let err = huge.validate().expect_err("window beyond the bound");
        assert!(err.to_string().contains("recent_within_days"));

        let century = PolicyTable {
            stale_after_days: MAX_WINDOW_DAYS,
            ..PolicyTable::default()
        };
        assert!(century.validate().is_ok());
    }
}
