//! ProofSlot: social proof backing a page (case study, aggregate, team).

use super::{BlockValidation, IssueSink, is_blank, issue_code};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProofKind {
    CaseStudy,
    Aggregate,
    Team,
}

impl ProofKind {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "case_study" => Some(Self::CaseStudy),
            "aggregate" => Some(Self::Aggregate),
            "team" => Some(Self::Team),
            _ => None,
        }
    }
}

/// The proof type is kept as raw text so an unrecognized type still
/// deserializes and fails validation instead of failing the whole parse.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProofSlot {
    #[serde(rename = "type", default)]
    pub proof_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_study_ref: Option<CaseStudyRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aggregate_metrics: Vec<AggregateMetric>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub team_proof: Vec<TeamProof>,
    #[serde(default)]
    pub last_updated: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CaseStudyRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_study_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_study_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_study_verified: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub testimonial: Option<Testimonial>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Testimonial {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_verified: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateMetric {
    #[serde(default)]
    pub metric: Option<String>,
    /// Numbers and strings are both accepted.
    #[serde(default)]
    pub value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamProof {
    #[serde(default)]
    pub member: Option<String>,
    #[serde(default)]
    pub credential: Option<String>,
    #[serde(default)]
    pub attribution: Option<String>,
}

impl ProofSlot {
    pub fn kind(&self) -> Option<ProofKind> {
        self.proof_type.as_deref().and_then(ProofKind::parse)
    }

    pub fn validate(&self) -> BlockValidation {
        let mut sink = IssueSink::default();

        match self.kind() {
            None => sink.push(
                issue_code::INVALID_TYPE,
                "type",
                "type must be case_study, aggregate, or team",
            ),
            Some(ProofKind::CaseStudy) => match &self.case_study_ref {
                None => sink.push(
                    issue_code::MISSING_CASE_STUDY_REF,
                    "case_study_ref",
                    "case study reference is required for case_study proof",
                ),
                Some(reference)
                    if is_blank(reference.case_study_id.as_deref())
                        && is_blank(reference.case_study_url.as_deref()) =>
                {
                    sink.push(
                        issue_code::MISSING_CASE_STUDY_ID,
                        "case_study_ref.case_study_id",
                        "case study id or url is required",
                    )
                }
                Some(_) => {}
            },
            Some(ProofKind::Aggregate) => {
                if self.aggregate_metrics.is_empty() {
                    sink.push(
                        issue_code::MISSING_AGGREGATE_METRICS,
                        "aggregate_metrics",
                        "aggregate metrics are required for aggregate proof",
                    );
                }
                for (index, metric) in self.aggregate_metrics.iter().enumerate() {
                    if is_blank(metric.metric.as_deref()) {
                        sink.push(
                            issue_code::MISSING_METRIC_NAME,
                            format!("aggregate_metrics[{index}].metric"),
                            format!("metric {index} is missing its name"),
                        );
                    }
                    if !has_metric_value(metric.value.as_ref()) {
                        sink.push(
                            issue_code::MISSING_METRIC_VALUE,
                            format!("aggregate_metrics[{index}].value"),
                            format!("metric {index} is missing its value"),
                        );
                    }
                }
            }
            Some(ProofKind::Team) => {
                if self.team_proof.is_empty() {
                    sink.push(
                        issue_code::MISSING_TEAM_PROOF,
                        "team_proof",
                        "team proof is required for team proof",
                    );
                }
                for (index, member) in self.team_proof.iter().enumerate() {
                    let checks = [
                        (&member.member, issue_code::MISSING_MEMBER, "member"),
                        (&member.credential, issue_code::MISSING_CREDENTIAL, "credential"),
                        (&member.attribution, issue_code::MISSING_ATTRIBUTION, "attribution"),
                    ];
                    for (value, code, field) in checks {
                        if is_blank(value.as_deref()) {
                            sink.push(
                                code,
                                format!("team_proof[{index}].{field}"),
                                format!("team proof {index} is missing its {field}"),
                            );
                        }
                    }
                }
            }
        }

        sink.check_last_updated(self.last_updated.as_deref());
        sink.finish()
    }

    /// A case study that is verified and carries a verified client testimonial.
    pub fn is_verified_case_study(&self) -> bool {
        self.kind() == Some(ProofKind::CaseStudy)
            && self.case_study_ref.as_ref().is_some_and(|reference| {
                reference.case_study_verified == Some(true)
                    && reference
                        .testimonial
                        .as_ref()
                        .is_some_and(|t| t.client_verified == Some(true))
            })
    }
}

fn has_metric_value(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(_) => true,
    }
}
