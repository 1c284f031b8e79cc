//! IndustryKpiMap: industry-specific metrics, constraints and buyer journey.

use super::{BlockValidation, IssueSink, is_blank, issue_code};
use serde::{Deserialize, Serialize};

pub const MIN_KPIS: usize = 5;
pub const MAX_KPIS: usize = 10;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndustryKpiMap {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    #[serde(default)]
    pub kpis: Vec<Kpi>,
    #[serde(default)]
    pub constraints: Vec<IndustryConstraint>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub compliance: Vec<ComplianceNote>,
    #[serde(default)]
    pub buyer_journey: Option<BuyerJourney>,
    #[serde(default)]
    pub last_updated: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Kpi {
    #[serde(default)]
    pub metric: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub benchmark: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndustryConstraint {
    #[serde(rename = "type", default)]
    pub constraint_type: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComplianceNote {
    #[serde(default)]
    pub regulation: Option<String>,
    #[serde(default)]
    pub requirement: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuyerJourney {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub awareness: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub consideration: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub decision: Vec<String>,
}

impl IndustryKpiMap {
    pub fn validate(&self) -> BlockValidation {
        let mut sink = IssueSink::default();

        match self.kpis.len() {
            0 => sink.push(issue_code::MISSING_KPIS, "kpis", "KPIs are required"),
            n if n < MIN_KPIS => sink.push(
                issue_code::INSUFFICIENT_KPIS,
                "kpis",
                format!("at least {MIN_KPIS} KPIs are required, found {n}"),
            ),
            n if n > MAX_KPIS => sink.push(
                issue_code::TOO_MANY_KPIS,
                "kpis",
                format!("at most {MAX_KPIS} KPIs are allowed, found {n}"),
            ),
            _ => {}
        }
        for (index, kpi) in self.kpis.iter().enumerate() {
            if is_blank(kpi.metric.as_deref()) {
                sink.push(
                    issue_code::MISSING_KPI_METRIC,
                    format!("kpis[{index}].metric"),
                    format!("KPI {index} is missing its metric"),
                );
            }
        }

        if self.constraints.is_empty() {
            sink.push(
                issue_code::MISSING_CONSTRAINTS,
                "constraints",
                "at least one constraint is required",
            );
        }
        for (index, constraint) in self.constraints.iter().enumerate() {
            if is_blank(constraint.constraint_type.as_deref()) {
                sink.push(
                    issue_code::MISSING_CONSTRAINT_TYPE,
                    format!("constraints[{index}].type"),
                    format!("constraint {index} is missing its type"),
                );
            }
            if is_blank(constraint.description.as_deref()) {
                sink.push(
                    issue_code::MISSING_CONSTRAINT_DESC,
                    format!("constraints[{index}].description"),
                    format!("constraint {index} is missing its description"),
                );
            }
        }

        if self.buyer_journey.is_none() {
            sink.push(
                issue_code::MISSING_BUYER_JOURNEY,
                "buyer_journey",
                "buyer journey is required",
            );
        }

        sink.check_last_updated(self.last_updated.as_deref());
        sink.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::industry_kpi_map;
    use super::*;

    #[test]
    fn kpi_count_bounds() {
        for (count, expected) in [
            (0, Some(issue_code::MISSING_KPIS)),
            (4, Some(issue_code::INSUFFICIENT_KPIS)),
            (5, None),
            (10, None),
            (11, Some(issue_code::TOO_MANY_KPIS)),
        ] {
            let validation = industry_kpi_map(count, "2025-01-10").validate();
            match expected {
                None => assert!(validation.valid, "{count} KPIs: {:?}", validation.issues),
                Some(code) => assert_eq!(validation.codes(), vec![code], "{count} KPIs"),
            }
        }
    }

    #[test]
    fn blank_kpi_metric_is_indexed_by_position() {
        let mut map = industry_kpi_map(6, "2025-01-10");
        map.kpis[3].metric = Some(String::new());
        let validation = map.validate();
        assert_eq!(validation.codes(), vec![issue_code::MISSING_KPI_METRIC]);
        assert_eq!(validation.issues[0].field.as_deref(), Some("kpis[3].metric"));
    }

    #[test]
    fn constraints_and_journey_required() {
        let mut map = industry_kpi_map(6, "2025-01-10");
        map.constraints = vec![IndustryConstraint::default()];
        map.buyer_journey = None;
        assert_eq!(
            map.validate().codes(),
            vec![
                issue_code::MISSING_CONSTRAINT_TYPE,
                issue_code::MISSING_CONSTRAINT_DESC,
                issue_code::MISSING_BUYER_JOURNEY,
            ]
        );

        map.constraints.clear();
        assert!(map.validate().has_code(issue_code::MISSING_CONSTRAINTS));
    }

    #[test]
    fn compliance_is_optional() {
        let map = industry_kpi_map(8, "2025-01-10");
        assert!(map.compliance.is_empty());
        assert!(map.validate().valid);
    }
}
