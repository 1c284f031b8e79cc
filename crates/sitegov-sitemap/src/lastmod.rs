//! Lastmod resolution.
//!
//! Precedence per URL:
//!
//! 1. CMS / frontmatter date, unless implausibly far in the future
//! 2. the per-path timestamp map for static core pages
//! 3. the category baseline
//! 4. the fallback baseline
//!
//! "Now" is never a lastmod. Stamping every URL with the build time makes
//! them indistinguishable to crawlers, so [`distribution`] flags feeds where
//! one date dominates.

use crate::entry::SitemapEntry;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sitegov_kernel::blocks::parse_timestamp;
use std::collections::BTreeMap;

/// Share of entries (percent) one date may hold before a warning.
pub const CONCENTRATION_THRESHOLD_PERCENT: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LastmodSource {
    Cms,
    ContentMap,
    ServiceBaseline,
    CityBaseline,
    CityServiceBaseline,
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lastmod {
    pub date: NaiveDate,
    pub source: LastmodSource,
}

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

/// Timestamp sources. Keys of `core_pages` are paths without a leading
/// slash; the homepage is the empty string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LastmodTable {
    pub core_pages: BTreeMap<String, NaiveDate>,
    pub service_baseline: NaiveDate,
    pub city_baseline: NaiveDate,
    pub city_service_baseline: NaiveDate,
    pub fallback: NaiveDate,
}

impl Default for LastmodTable {
    fn default() -> Self {
        let core_pages = [
            ("", ymd(2025, 1, 15)),
            ("about", ymd(2025, 1, 10)),
            ("contact", ymd(2025, 1, 10)),
            ("pricing", ymd(2025, 1, 12)),
            ("privacy", ymd(2024, 12, 1)),
            ("terms", ymd(2024, 12, 1)),
            ("resources", ymd(2025, 1, 8)),
            ("case-studies", ymd(2025, 1, 5)),
            ("industries", ymd(2025, 1, 6)),
            ("locations", ymd(2025, 1, 10)),
            ("locations/hawaii", ymd(2025, 1, 10)),
            ("locations/hawaii/kona", ymd(2025, 1, 10)),
            ("locations/hawaii/honolulu", ymd(2025, 1, 10)),
            ("solutions", ymd(2025, 1, 8)),
            ("solutions/agency-results", ymd(2025, 1, 8)),
            ("solutions/declining-traffic", ymd(2025, 1, 8)),
            ("solutions/google-visibility", ymd(2025, 1, 8)),
            ("solutions/website-conversion", ymd(2025, 1, 8)),
            ("solutions/website-leads", ymd(2025, 1, 8)),
            ("solutions/website-roi", ymd(2025, 1, 8)),
            ("blog", ymd(2025, 1, 20)),
            ("seo-audit", ymd(2025, 1, 15)),
            ("website-speed-test", ymd(2025, 1, 15)),
            ("enhanced-demo", ymd(2025, 1, 10)),
        ]
        .into_iter()
        .map(|(path, date)| (path.to_string(), date))
        .collect();

        Self {
            core_pages,
            service_baseline: ymd(2025, 1, 10),
            city_baseline: ymd(2025, 1, 15),
            city_service_baseline: ymd(2025, 1, 15),
            fallback: ymd(2024, 12, 1),
        }
    }
}

impl LastmodTable {
    pub fn core_page(&self, path: &str) -> Lastmod {
        let key = path.trim_start_matches('/');
        match self.core_pages.get(key) {
            Some(date) => Lastmod {
                date: *date,
                source: LastmodSource::ContentMap,
            },
            None => self.fallback(),
        }
    }

    pub fn service_page(&self) -> Lastmod {
        Lastmod {
            date: self.service_baseline,
            source: LastmodSource::ServiceBaseline,
        }
    }

    pub fn city_page(&self) -> Lastmod {
        Lastmod {
            date: self.city_baseline,
            source: LastmodSource::CityBaseline,
        }
    }

    /// City-service and city-industry-service pages share one template
    /// baseline.
    pub fn city_service_page(&self) -> Lastmod {
        Lastmod {
            date: self.city_service_baseline,
            source: LastmodSource::CityServiceBaseline,
        }
    }

    /// A CMS date is trusted unless it cannot be parsed or lies more than a
    /// day past `now`. Dates inside that day of slack are clamped to today.
    pub fn blog_post(&self, cms_date: Option<&str>, now: DateTime<Utc>) -> Lastmod {
        match cms_date.and_then(parse_timestamp) {
            Some(published) if published < now + Duration::days(1) => Lastmod {
                date: published.date_naive().min(now.date_naive()),
                source: LastmodSource::Cms,
            },
            _ => self.fallback(),
        }
    }

    pub fn fallback(&self) -> Lastmod {
        Lastmod {
            date: self.fallback,
            source: LastmodSource::Fallback,
        }
    }
}

/// How lastmod dates spread across a feed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LastmodDistribution {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    pub dated_entries: usize,
    pub counts: BTreeMap<NaiveDate, usize>,
}

/// Count entries per lastmod date and warn when one date holds more than
/// [`CONCENTRATION_THRESHOLD_PERCENT`] of the dated entries.
pub fn distribution<'a>(entries: impl IntoIterator<Item = &'a SitemapEntry>) -> LastmodDistribution {
    let mut counts: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for date in entries.into_iter().filter_map(|entry| entry.last_modified) {
        *counts.entry(date).or_default() += 1;
    }
    let dated_entries: usize = counts.values().sum();

    // Earliest date wins ties.
    let top = counts
        .iter()
        .fold(None, |best: Option<(&NaiveDate, &usize)>, (date, count)| match best {
            Some((_, best_count)) if best_count >= count => best,
            _ => Some((date, count)),
        });

    let warning = top.and_then(|(date, count)| {
        let percentage = *count as f64 / dated_entries as f64 * 100.0;
        (percentage > CONCENTRATION_THRESHOLD_PERCENT).then(|| {
            format!(
                "{percentage:.1}% of URLs ({count}/{dated_entries}) share lastmod={date}; \
                 this exceeds the {CONCENTRATION_THRESHOLD_PERCENT:.0}% threshold"
            )
        })
    });

    LastmodDistribution {
        valid: warning.is_none(),
        warning,
        dated_entries,
        counts,
    }
}
