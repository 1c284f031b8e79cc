//! Uniqueness blocks: the per-page data fragments that justify a
//! programmatic page's existence.
//!
//! Validators are pure and total. Absent, malformed and invalid blocks are
//! all reported through [`BlockValidation`]; nothing here reads a clock, so
//! freshness windows are the engine's concern.

mod industry_kpi;
mod local_data;
mod proof;

pub use industry_kpi::{BuyerJourney, ComplianceNote, IndustryConstraint, IndustryKpiMap, Kpi};
pub use local_data::{
    CompetitorData, DataSource, LocalDataCard, MarketData, RankingEnvironment, ReviewData,
    SerpData,
};
pub use proof::{
    AggregateMetric, CaseStudyRef, ProofKind, ProofSlot, TeamProof, Testimonial,
};

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// The three uniqueness block variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    LocalDataCard,
    IndustryKpiMap,
    ProofSlot,
}

impl BlockKind {
    pub const ALL: [BlockKind; 3] = [
        BlockKind::LocalDataCard,
        BlockKind::IndustryKpiMap,
        BlockKind::ProofSlot,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::LocalDataCard => "local_data_card",
            Self::IndustryKpiMap => "industry_kpi_map",
            Self::ProofSlot => "proof_slot",
        }
    }
}

impl std::fmt::Display for BlockKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tagged uniqueness block as supplied by a content collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "block", rename_all = "snake_case")]
pub enum UniquenessBlock {
    LocalDataCard(LocalDataCard),
    IndustryKpiMap(IndustryKpiMap),
    ProofSlot(ProofSlot),
}

impl UniquenessBlock {
    pub fn kind(&self) -> BlockKind {
        match self {
            Self::LocalDataCard(_) => BlockKind::LocalDataCard,
            Self::IndustryKpiMap(_) => BlockKind::IndustryKpiMap,
            Self::ProofSlot(_) => BlockKind::ProofSlot,
        }
    }

    pub fn validate(&self) -> BlockValidation {
        match self {
            Self::LocalDataCard(card) => card.validate(),
            Self::IndustryKpiMap(map) => map.validate(),
            Self::ProofSlot(slot) => slot.validate(),
        }
    }
}

/// Blocks available for one page. Each slot may be empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_data_card: Option<LocalDataCard>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry_kpi_map: Option<IndustryKpiMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proof_slot: Option<ProofSlot>,
}

impl BlockSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a block in its slot, replacing whatever was there.
    pub fn insert(&mut self, block: UniquenessBlock) {
        match block {
            UniquenessBlock::LocalDataCard(card) => self.local_data_card = Some(card),
            UniquenessBlock::IndustryKpiMap(map) => self.industry_kpi_map = Some(map),
            UniquenessBlock::ProofSlot(slot) => self.proof_slot = Some(slot),
        }
    }

    pub fn with(mut self, block: UniquenessBlock) -> Self {
        self.insert(block);
        self
    }

    pub fn is_present(&self, kind: BlockKind) -> bool {
        match kind {
            BlockKind::LocalDataCard => self.local_data_card.is_some(),
            BlockKind::IndustryKpiMap => self.industry_kpi_map.is_some(),
            BlockKind::ProofSlot => self.proof_slot.is_some(),
        }
    }

    /// Validation of the block in `kind`'s slot, `None` when the slot is empty.
    pub fn validation(&self, kind: BlockKind) -> Option<BlockValidation> {
        match kind {
            BlockKind::LocalDataCard => self.local_data_card.as_ref().map(LocalDataCard::validate),
            BlockKind::IndustryKpiMap => {
                self.industry_kpi_map.as_ref().map(IndustryKpiMap::validate)
            }
            BlockKind::ProofSlot => self.proof_slot.as_ref().map(ProofSlot::validate),
        }
    }

    /// Present and structurally valid. Absent and invalid are the same to
    /// every gate.
    pub fn is_valid(&self, kind: BlockKind) -> bool {
        self.validation(kind).is_some_and(|v| v.valid)
    }

    pub fn present_kinds(&self) -> Vec<BlockKind> {
        BlockKind::ALL
            .into_iter()
            .filter(|kind| self.is_present(*kind))
            .collect()
    }

    pub fn last_updated(&self, kind: BlockKind) -> Option<DateTime<Utc>> {
        let raw = match kind {
            BlockKind::LocalDataCard => self.local_data_card.as_ref()?.last_updated.as_deref(),
            BlockKind::IndustryKpiMap => self.industry_kpi_map.as_ref()?.last_updated.as_deref(),
            BlockKind::ProofSlot => self.proof_slot.as_ref()?.last_updated.as_deref(),
        };
        raw.and_then(parse_timestamp)
    }

    /// Most recent `last_updated` across present blocks.
    pub fn newest_update(&self) -> Option<DateTime<Utc>> {
        BlockKind::ALL
            .into_iter()
            .filter_map(|kind| self.last_updated(kind))
            .max()
    }
}

/// One structural problem found by a validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockIssue {
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub message: String,
}

/// Validator output. `valid` is true exactly when `issues` is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockValidation {
    pub valid: bool,
    pub issues: Vec<BlockIssue>,
}

impl BlockValidation {
    pub(crate) fn from_issues(issues: Vec<BlockIssue>) -> Self {
        Self {
            valid: issues.is_empty(),
            issues,
        }
    }

    pub fn codes(&self) -> Vec<&str> {
        self.issues.iter().map(|issue| issue.code.as_str()).collect()
    }

    pub fn has_code(&self, code: &str) -> bool {
        self.issues.iter().any(|issue| issue.code == code)
    }
}

#[derive(Default)]
pub(crate) struct IssueSink {
    issues: Vec<BlockIssue>,
}

impl IssueSink {
    pub(crate) fn push(&mut self, code: &str, field: impl Into<String>, message: impl Into<String>) {
        self.issues.push(BlockIssue {
            code: code.to_string(),
            field: Some(field.into()),
            message: message.into(),
        });
    }

    pub(crate) fn check_last_updated(&mut self, raw: Option<&str>) {
        match raw.map(str::trim) {
            None | Some("") => self.push(
                issue_code::MISSING_LAST_UPDATED,
                "last_updated",
                "last updated timestamp is required",
            ),
            Some(raw) if parse_timestamp(raw).is_none() => self.push(
                issue_code::INVALID_LAST_UPDATED,
                "last_updated",
                format!("last updated `{raw}` is not an ISO 8601 timestamp"),
            ),
            Some(_) => {}
        }
    }

    pub(crate) fn finish(self) -> BlockValidation {
        BlockValidation::from_issues(self.issues)
    }
}

pub(crate) fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|s| s.trim().is_empty())
}

/// Parse a block timestamp: RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS`, or a
/// bare `YYYY-MM-DD` (midnight UTC).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Validator issue codes.
pub mod issue_code {
    pub const MISSING_SERP_DATA: &str = "MISSING_SERP_DATA";
    pub const MISSING_COMPETITOR_COUNT: &str = "MISSING_COMPETITOR_COUNT";
    pub const MISSING_MARKET_DATA: &str = "MISSING_MARKET_DATA";
    pub const MISSING_MARKET_SIZE: &str = "MISSING_MARKET_SIZE";
    pub const MISSING_REVIEW_DATA: &str = "MISSING_REVIEW_DATA";
    pub const MISSING_RATING_RANGE: &str = "MISSING_RATING_RANGE";
    pub const MISSING_COMPETITOR_DATA: &str = "MISSING_COMPETITOR_DATA";
    pub const MISSING_COMPETITOR_CATEGORIES: &str = "MISSING_COMPETITOR_CATEGORIES";
    pub const MISSING_DATA_SOURCES: &str = "MISSING_DATA_SOURCES";

    pub const MISSING_KPIS: &str = "MISSING_KPIS";
    pub const INSUFFICIENT_KPIS: &str = "INSUFFICIENT_KPIS";
    pub const TOO_MANY_KPIS: &str = "TOO_MANY_KPIS";
    pub const MISSING_KPI_METRIC: &str = "MISSING_KPI_METRIC";
    pub const MISSING_CONSTRAINTS: &str = "MISSING_CONSTRAINTS";
    pub const MISSING_CONSTRAINT_TYPE: &str = "MISSING_CONSTRAINT_TYPE";
    pub const MISSING_CONSTRAINT_DESC: &str = "MISSING_CONSTRAINT_DESC";
    pub const MISSING_BUYER_JOURNEY: &str = "MISSING_BUYER_JOURNEY";

    pub const INVALID_TYPE: &str = "INVALID_TYPE";
    pub const MISSING_CASE_STUDY_REF: &str = "MISSING_CASE_STUDY_REF";
    pub const MISSING_CASE_STUDY_ID: &str = "MISSING_CASE_STUDY_ID";
    pub const MISSING_AGGREGATE_METRICS: &str = "MISSING_AGGREGATE_METRICS";
    pub const MISSING_METRIC_NAME: &str = "MISSING_METRIC_NAME";
    pub const MISSING_METRIC_VALUE: &str = "MISSING_METRIC_VALUE";
    pub const MISSING_TEAM_PROOF: &str = "MISSING_TEAM_PROOF";
    pub const MISSING_MEMBER: &str = "MISSING_MEMBER";
    pub const MISSING_CREDENTIAL: &str = "MISSING_CREDENTIAL";
    pub const MISSING_ATTRIBUTION: &str = "MISSING_ATTRIBUTION";

    pub const MISSING_LAST_UPDATED: &str = "MISSING_LAST_UPDATED";
    pub const INVALID_LAST_UPDATED: &str = "INVALID_LAST_UPDATED";
}
