//! Sitemap entries and categories.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// `<changefreq>` values defined by the sitemap protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFrequency {
    Always,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Never,
}

impl ChangeFrequency {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Always => "always",
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
            Self::Never => "never",
        }
    }
}

impl fmt::Display for ChangeFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `<url>` element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SitemapEntry {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_frequency: Option<ChangeFrequency>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<f64>,
}

impl SitemapEntry {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            last_modified: None,
            change_frequency: None,
            priority: None,
        }
    }

    pub fn with_lastmod(mut self, date: NaiveDate) -> Self {
        self.last_modified = Some(date);
        self
    }

    pub fn with_changefreq(mut self, freq: ChangeFrequency) -> Self {
        self.change_frequency = Some(freq);
        self
    }

    pub fn with_priority(mut self, priority: f64) -> Self {
        self.priority = Some(priority);
        self
    }
}

/// Child sitemap families, in index order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SitemapCategory {
    Core,
    Services,
    Blog,
    Locations,
}

impl SitemapCategory {
    pub const ALL: [SitemapCategory; 4] = [
        SitemapCategory::Core,
        SitemapCategory::Services,
        SitemapCategory::Blog,
        SitemapCategory::Locations,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Core => "core",
            Self::Services => "services",
            Self::Blog => "blog",
            Self::Locations => "locations",
        }
    }
}

impl fmt::Display for SitemapCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SitemapCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| format!("unknown sitemap category `{s}` (expected core, services, blog, locations)"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_serializes_camel_case_without_empty_fields() {
        let entry = SitemapEntry::new("https://www.example.com/about")
            .with_lastmod(NaiveDate::from_ymd_opt(2025, 1, 10).expect("date"))
            .with_changefreq(ChangeFrequency::Monthly);
        let json = serde_json::to_value(&entry).expect("entry serializes");
        assert_eq!(
            json,
            serde_json::json!({
                "url": "https://www.example.com/about",
                "lastModified": "2025-01-10",
                "changeFrequency": "monthly",
            })
        );
    }

    #[test]
    fn category_parse() {
        assert_eq!("blog".parse::<SitemapCategory>(), Ok(SitemapCategory::Blog));
        assert!("news".parse::<SitemapCategory>().is_err());
    }
}
