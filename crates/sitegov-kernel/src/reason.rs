//! Reason codes: the audit trail attached to every decision.

use crate::score::Score;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// One tag explaining a decision. Serialized as its SCREAMING_SNAKE code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReasonCode {
    // Hard-fail triggers, in evaluation order.
    InvalidRouteShape,
    InvalidCitySlug,
    InvalidServiceSlug,
    InvalidIndustrySlug,
    DuplicateContent,
    MissingRequiredBlocks,
    LocalDataCardInvalid,
    IndustryKpiMapInvalid,
    ProofSlotInvalid,
    StaleData,
    ManualNoindex,

    CityIndustryHubAlwaysNoindex,

    // Hard-pass triggers, in evaluation order.
    CmsContentPresent,
    AllBlocksValid,
    VerifiedCaseStudy,
    HighQualityLocalData,
    ComprehensiveKpiMap,
    RecentDataUpdates,
    ManualIndex,
    FeaturedPage,
    HighEngagement,
    ExternalCitations,

    Tier1AlwaysIndex,
    NotTier1Service,

    StageAFailed,
    StageBFailed,
    PassedQualityGates,
    Score(Score),

    UnknownRouteType,
    InvariantCorrected,
}

const FIXED_CODES: &[(ReasonCode, &str)] = &[
    (ReasonCode::InvalidRouteShape, "INVALID_ROUTE_SHAPE"),
    (ReasonCode::InvalidCitySlug, "INVALID_CITY_SLUG"),
    (ReasonCode::InvalidServiceSlug, "INVALID_SERVICE_SLUG"),
    (ReasonCode::InvalidIndustrySlug, "INVALID_INDUSTRY_SLUG"),
    (ReasonCode::DuplicateContent, "DUPLICATE_CONTENT"),
    (ReasonCode::MissingRequiredBlocks, "MISSING_REQUIRED_BLOCKS"),
    (ReasonCode::LocalDataCardInvalid, "LOCAL_DATA_CARD_INVALID"),
    (ReasonCode::IndustryKpiMapInvalid, "INDUSTRY_KPI_MAP_INVALID"),
    (ReasonCode::ProofSlotInvalid, "PROOF_SLOT_INVALID"),
    (ReasonCode::StaleData, "STALE_DATA"),
    (ReasonCode::ManualNoindex, "MANUAL_NOINDEX"),
    (
        ReasonCode::CityIndustryHubAlwaysNoindex,
        "CITY_INDUSTRY_HUB_ALWAYS_NOINDEX",
    ),
    (ReasonCode::CmsContentPresent, "CMS_CONTENT_PRESENT"),
    (ReasonCode::AllBlocksValid, "ALL_BLOCKS_VALID"),
    (ReasonCode::VerifiedCaseStudy, "VERIFIED_CASE_STUDY"),
    (ReasonCode::HighQualityLocalData, "HIGH_QUALITY_LOCAL_DATA"),
    (ReasonCode::ComprehensiveKpiMap, "COMPREHENSIVE_KPI_MAP"),
    (ReasonCode::RecentDataUpdates, "RECENT_DATA_UPDATES"),
    (ReasonCode::ManualIndex, "MANUAL_INDEX"),
    (ReasonCode::FeaturedPage, "FEATURED_PAGE"),
    (ReasonCode::HighEngagement, "HIGH_ENGAGEMENT"),
    (ReasonCode::ExternalCitations, "EXTERNAL_CITATIONS"),
    (ReasonCode::Tier1AlwaysIndex, "TIER1_ALWAYS_INDEX"),
    (ReasonCode::NotTier1Service, "NOT_TIER1_SERVICE"),
    (ReasonCode::StageAFailed, "STAGE_A_FAILED"),
    (ReasonCode::StageBFailed, "STAGE_B_FAILED"),
    (ReasonCode::PassedQualityGates, "PASSED_QUALITY_GATES"),
    (ReasonCode::UnknownRouteType, "UNKNOWN_ROUTE_TYPE"),
    (ReasonCode::InvariantCorrected, "INVARIANT_CORRECTED"),
];

const SCORE_PREFIX: &str = "SCORE_";

impl ReasonCode {
    pub fn is_hard_fail(self) -> bool {
        matches!(
            self,
            Self::InvalidRouteShape
                | Self::InvalidCitySlug
                | Self::InvalidServiceSlug
                | Self::InvalidIndustrySlug
                | Self::DuplicateContent
                | Self::MissingRequiredBlocks
                | Self::LocalDataCardInvalid
                | Self::IndustryKpiMapInvalid
                | Self::ProofSlotInvalid
                | Self::StaleData
                | Self::ManualNoindex
        )
    }

    pub fn is_hard_pass(self) -> bool {
        matches!(
            self,
            Self::CmsContentPresent
                | Self::AllBlocksValid
                | Self::VerifiedCaseStudy
                | Self::HighQualityLocalData
                | Self::ComprehensiveKpiMap
                | Self::RecentDataUpdates
                | Self::ManualIndex
                | Self::FeaturedPage
                | Self::HighEngagement
                | Self::ExternalCitations
        )
    }
}

impl fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Self::Score(score) = self {
            return write!(f, "{SCORE_PREFIX}{score}");
        }
        let code = FIXED_CODES
            .iter()
            .find(|(code, _)| code == self)
            .map(|(_, text)| *text)
            .unwrap_or("UNKNOWN");
        f.write_str(code)
    }
}

impl FromStr for ReasonCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(value) = s.strip_prefix(SCORE_PREFIX) {
            let fraction: f64 = value
                .parse()
                .map_err(|_| format!("malformed score reason code `{s}`"))?;
            return Ok(Self::Score(Score::from_fraction(fraction)));
        }
        FIXED_CODES
            .iter()
            .find(|(_, text)| *text == s)
            .map(|(code, _)| *code)
            .ok_or_else(|| format!("unknown reason code `{s}`"))
    }
}

impl Serialize for ReasonCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ReasonCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Ordered, append-only list of reason codes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReasonCodes(Vec<ReasonCode>);

impl ReasonCodes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(code: ReasonCode) -> Self {
        Self(vec![code])
    }

    pub fn push(&mut self, code: ReasonCode) {
        self.0.push(code);
    }

    pub fn with(mut self, code: ReasonCode) -> Self {
        self.push(code);
        self
    }

    pub fn contains(&self, code: ReasonCode) -> bool {
        self.0.contains(&code)
    }

    pub fn first(&self) -> Option<ReasonCode> {
        self.0.first().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = ReasonCode> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_strings(&self) -> Vec<String> {
        self.0.iter().map(ToString::to_string).collect()
    }
}

impl fmt::Display for ReasonCodes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_strings().join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_fixed_code_round_trips_through_text() {
        for (code, text) in FIXED_CODES {
            assert_eq!(code.to_string(), *text);
            assert_eq!(text.parse::<ReasonCode>().ok(), Some(*code));
        }
    }

    #[test]
    fn score_codes_carry_two_decimals() {
        let code = ReasonCode::Score(Score::from_basis_points(7_000));
        assert_eq!(code.to_string(), "SCORE_0.70");
        assert_eq!("SCORE_0.70".parse::<ReasonCode>().ok(), Some(code));
        assert!("SCORE_high".parse::<ReasonCode>().is_err());
    }

    #[test]
    fn codes_serialize_as_strings_in_order() {
        let codes = ReasonCodes::single(ReasonCode::MissingRequiredBlocks)
            .with(ReasonCode::StageAFailed);
        assert_eq!(
            serde_json::to_value(&codes).expect("codes serialize"),
            serde_json::json!(["MISSING_REQUIRED_BLOCKS", "STAGE_A_FAILED"])
        );
        assert_eq!(codes.first(), Some(ReasonCode::MissingRequiredBlocks));
        assert!(codes.contains(ReasonCode::StageAFailed));
    }

    #[test]
    fn trigger_families_are_disjoint() {
        for (code, _) in FIXED_CODES {
            assert!(!(code.is_hard_fail() && code.is_hard_pass()), "{code}");
        }
        assert!(ReasonCode::StaleData.is_hard_fail());
        assert!(ReasonCode::ExternalCitations.is_hard_pass());
    }
}
