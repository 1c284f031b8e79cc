//! LocalDataCard: local market facts for a city × service page.

use super::{BlockValidation, IssueSink, is_blank, issue_code};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocalDataCard {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    #[serde(default)]
    pub serp_data: Option<SerpData>,
    #[serde(default)]
    pub market_data: Option<MarketData>,
    #[serde(default)]
    pub review_data: Option<ReviewData>,
    #[serde(default)]
    pub competitor_data: Option<CompetitorData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ranking_environment: Option<RankingEnvironment>,
    #[serde(default)]
    pub data_sources: Vec<DataSource>,
    #[serde(default)]
    pub last_updated: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SerpData {
    #[serde(default)]
    pub avg_competitor_count: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_pack_present: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured_snippet_present: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketData {
    #[serde(default)]
    pub market_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub growth_rate: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewData {
    #[serde(default)]
    pub avg_rating_range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_review_count_range: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompetitorData {
    #[serde(default)]
    pub competitor_categories: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub top_competitors: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankingEnvironment {
    #[serde(default)]
    pub local_seo_importance: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub competition_level: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataSource {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub source_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_date: Option<String>,
}

impl LocalDataCard {
    pub fn validate(&self) -> BlockValidation {
        let mut sink = IssueSink::default();

        match &self.serp_data {
            None => sink.push(
                issue_code::MISSING_SERP_DATA,
                "serp_data",
                "SERP data is required",
            ),
            Some(serp) if serp.avg_competitor_count.is_none() => sink.push(
                issue_code::MISSING_COMPETITOR_COUNT,
                "serp_data.avg_competitor_count",
                "average competitor count is required",
            ),
            Some(_) => {}
        }

        match &self.market_data {
            None => sink.push(
                issue_code::MISSING_MARKET_DATA,
                "market_data",
                "market data is required",
            ),
            Some(market) if market.market_size.is_none() => sink.push(
                issue_code::MISSING_MARKET_SIZE,
                "market_data.market_size",
                "market size is required",
            ),
            Some(_) => {}
        }

        match &self.review_data {
            None => sink.push(
                issue_code::MISSING_REVIEW_DATA,
                "review_data",
                "review data is required",
            ),
            Some(review) if is_blank(review.avg_rating_range.as_deref()) => sink.push(
                issue_code::MISSING_RATING_RANGE,
                "review_data.avg_rating_range",
                "average rating range is required",
            ),
            Some(_) => {}
        }

        match &self.competitor_data {
            None => sink.push(
                issue_code::MISSING_COMPETITOR_DATA,
                "competitor_data",
                "competitor data is required",
            ),
            Some(competitors) if competitors.competitor_categories.is_empty() => sink.push(
                issue_code::MISSING_COMPETITOR_CATEGORIES,
                "competitor_data.competitor_categories",
                "competitor categories are required",
            ),
            Some(_) => {}
        }

        if self.data_sources.is_empty() {
            sink.push(
                issue_code::MISSING_DATA_SOURCES,
                "data_sources",
                "at least one data source is required",
            );
        }

        sink.check_last_updated(self.last_updated.as_deref());
        sink.finish()
    }

    /// SERP, market, review and competitor data are all present.
    pub fn has_all_categories(&self) -> bool {
        self.serp_data.is_some()
            && self.market_data.is_some()
            && self.review_data.is_some()
            && self.competitor_data.is_some()
    }

    /// Data sources counted by case-insensitive name; unnamed sources are
    /// counted by URL.
    pub fn distinct_source_count(&self) -> usize {
        self.data_sources
            .iter()
            .filter_map(|source| {
                source
                    .name
                    .as_deref()
                    .or(source.url.as_deref())
                    .map(|key| key.trim().to_ascii_lowercase())
            })
            .filter(|key| !key.is_empty())
            .collect::<BTreeSet<_>>()
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::local_data_card;
    use super::*;

    #[test]
    fn complete_card_is_valid() {
        let validation = local_data_card("2025-01-10").validate();
        assert!(validation.valid, "{:?}", validation.issues);
    }

    #[test]
    fn missing_categories_are_reported_by_code() {
        let cases: [(fn(&mut LocalDataCard), &str); 9] = [
            (|c| c.serp_data = None, issue_code::MISSING_SERP_DATA),
            (
                |c| {
                    if let Some(serp) = c.serp_data.as_mut() {
                        serp.avg_competitor_count = None;
                    }
                },
                issue_code::MISSING_COMPETITOR_COUNT,
            ),
            (|c| c.market_data = None, issue_code::MISSING_MARKET_DATA),
            (|c| c.review_data = None, issue_code::MISSING_REVIEW_DATA),
            (
                |c| {
                    if let Some(review) = c.review_data.as_mut() {
                        review.avg_rating_range = Some("  ".into());
                    }
                },
                issue_code::MISSING_RATING_RANGE,
            ),
            (
                |c| c.competitor_data = Some(CompetitorData::default()),
                issue_code::MISSING_COMPETITOR_CATEGORIES,
            ),
            (|c| c.data_sources.clear(), issue_code::MISSING_DATA_SOURCES),
            (|c| c.last_updated = None, issue_code::MISSING_LAST_UPDATED),
            (
                |c| c.last_updated = Some("soon".into()),
                issue_code::INVALID_LAST_UPDATED,
            ),
        ];

        for (mutate, code) in cases {
            let mut card = local_data_card("2025-01-10");
            mutate(&mut card);
            let validation = card.validate();
            assert!(!validation.valid, "{code} should invalidate the card");
            assert_eq!(validation.codes(), vec![code]);
        }
    }

    #[test]
    fn empty_card_lists_every_problem() {
        let validation = LocalDataCard::default().validate();
        assert_eq!(
            validation.codes(),
            vec![
                issue_code::MISSING_SERP_DATA,
                issue_code::MISSING_MARKET_DATA,
                issue_code::MISSING_REVIEW_DATA,
                issue_code::MISSING_COMPETITOR_DATA,
                issue_code::MISSING_DATA_SOURCES,
                issue_code::MISSING_LAST_UPDATED,
            ]
        );
    }

    #[test]
    fn distinct_sources_ignore_case_and_repeats() {
        let mut card = local_data_card("2025-01-10");
        card.data_sources.push(DataSource {
            name: Some("census acs".into()),
            ..DataSource::default()
        });
        assert_eq!(card.distinct_source_count(), 1);

        card.data_sources.push(DataSource {
            name: None,
            url: Some("https://data.austintexas.gov".into()),
            ..DataSource::default()
        });
        assert_eq!(card.distinct_source_count(), 2);
        assert!(card.has_all_categories());
    }
}
