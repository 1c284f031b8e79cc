//! Validation report for an assembled sitemap set.
//!
//! Errors make the report invalid; warnings are advisory. Structural
//! duplicates are already rejected by assembly, but a set built elsewhere
//! (or edited by hand) is checked again here.

use crate::entry::SitemapEntry;
use crate::error::SitemapError;
use crate::index::SitemapSet;
use crate::lastmod::distribution;
use chrono::NaiveDate;
use regex::Regex;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::OnceLock;

/// Protocol ceiling on URLs per sitemap file.
pub const MAX_URLS_PER_SITEMAP: usize = 50_000;
/// Protocol ceiling on uncompressed sitemap size.
pub const MAX_SITEMAP_BYTES: usize = 50 * 1024 * 1024;
/// Size estimate per `<url>` element.
pub const ESTIMATED_BYTES_PER_URL: usize = 500;

fn https_url_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^https://[a-zA-Z0-9][a-zA-Z0-9-]*(\.[a-zA-Z0-9][a-zA-Z0-9-]*)+(/[^\s]*)?$")
            .expect("https url regex must compile")
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    Error,
    Warning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueCode {
    InvalidUrl,
    InvalidLastmod,
    InvalidPriority,
    DuplicateUrl,
    ExceededUrlLimit,
    ExceededSizeLimit,
    MissingChildSitemap,
    UnreferencedSitemap,
    LastmodConcentration,
    InconsistentTrailingSlash,
}

impl IssueCode {
    pub fn severity(self) -> IssueSeverity {
        match self {
            Self::LastmodConcentration | Self::InconsistentTrailingSlash => IssueSeverity::Warning,
            _ => IssueSeverity::Error,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationIssue {
    pub code: IssueCode,
    pub severity: IssueSeverity,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sitemap: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationStats {
    pub total_urls: usize,
    pub urls_by_sitemap: BTreeMap<String, usize>,
    pub duplicates_found: usize,
    pub invalid_urls: usize,
    pub invalid_lastmods: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
    pub stats: ValidationStats,
}

impl ValidationReport {
    /// Turn an invalid report into an error carrying the first finding.
    pub fn into_result(self) -> Result<Self, SitemapError> {
        match self.errors.first() {
            Some(first) => Err(SitemapError::Invalid {
                count: self.errors.len(),
                first: first.message.clone(),
            }),
            None => Ok(self),
        }
    }

    pub fn has_code(&self, code: IssueCode) -> bool {
        self.errors
            .iter()
            .chain(&self.warnings)
            .any(|issue| issue.code == code)
    }
}

#[derive(Default)]
struct Findings {
    errors: Vec<ValidationIssue>,
    warnings: Vec<ValidationIssue>,
}

impl Findings {
    fn push(&mut self, code: IssueCode, message: String, sitemap: Option<&str>, url: Option<&str>) {
        let issue = ValidationIssue {
            code,
            severity: code.severity(),
            message,
            sitemap: sitemap.map(str::to_string),
            url: url.map(str::to_string),
        };
        match issue.severity {
            IssueSeverity::Error => self.errors.push(issue),
            IssueSeverity::Warning => self.warnings.push(issue),
        }
    }
}

/// `true` for `https://host` and `https://host/`.
fn is_root_url(url: &str) -> bool {
    let rest = url.strip_prefix("https://").unwrap_or(url);
    match rest.split_once('/') {
        None => true,
        Some((_, path)) => path.is_empty(),
    }
}

/// Validate every file of `set` and its index. Lastmod dates after `today`
/// are invalid.
pub fn validate_sitemaps(set: &SitemapSet, today: NaiveDate) -> ValidationReport {
    let mut findings = Findings::default();
    let mut stats = ValidationStats::default();
    let mut first_seen: HashMap<&str, &str> = HashMap::new();

    for file in &set.files {
        let name = file.name.as_str();
        stats.urls_by_sitemap.insert(file.name.clone(), file.entries.len());
        stats.total_urls += file.entries.len();

        if file.entries.len() > MAX_URLS_PER_SITEMAP {
            findings.push(
                IssueCode::ExceededUrlLimit,
                format!(
                    "{name} has {} URLs; the limit is {MAX_URLS_PER_SITEMAP}",
                    file.entries.len()
                ),
                Some(name),
                None,
            );
        }
        let estimated = file.entries.len() * ESTIMATED_BYTES_PER_URL;
        if estimated > MAX_SITEMAP_BYTES {
            findings.push(
                IssueCode::ExceededSizeLimit,
                format!("{name} is an estimated {estimated} bytes; the limit is {MAX_SITEMAP_BYTES}"),
                Some(name),
                None,
            );
        }

        for entry in &file.entries {
            check_entry(entry, name, today, &mut findings, &mut stats);
            if let Some(previous) = first_seen.get(entry.url.as_str()).copied() {
                stats.duplicates_found += 1;
                findings.push(
                    IssueCode::DuplicateUrl,
                    format!("{} appears in {name} and {previous}", entry.url),
                    Some(name),
                    Some(entry.url.as_str()),
                );
            } else {
                first_seen.insert(entry.url.as_str(), name);
            }
        }
    }

    let generated: BTreeSet<&str> = set.files.iter().map(|file| file.name.as_str()).collect();
    let referenced: BTreeSet<&str> = set.index.iter().map(|row| row.name.as_str()).collect();
    for missing in referenced.difference(&generated) {
        findings.push(
            IssueCode::MissingChildSitemap,
            format!("index references {missing}, which was not generated"),
            Some(*missing),
            None,
        );
    }
    for orphan in generated.difference(&referenced) {
        findings.push(
            IssueCode::UnreferencedSitemap,
            format!("{orphan} is not listed in the sitemap index"),
            Some(*orphan),
            None,
        );
    }

    if let Some(warning) = distribution(set.entries()).warning {
        findings.push(IssueCode::LastmodConcentration, warning, None, None);
    }

    let paths: Vec<&SitemapEntry> = set.entries().filter(|entry| !is_root_url(&entry.url)).collect();
    if paths.len() >= 2 {
        let slashed = paths.iter().filter(|entry| entry.url.ends_with('/')).count();
        if slashed > 0 && slashed < paths.len() {
            findings.push(
                IssueCode::InconsistentTrailingSlash,
                format!(
                    "{slashed} of {} URLs end with a trailing slash; pick one style",
                    paths.len()
                ),
                None,
                None,
            );
        }
    }

    ValidationReport {
        valid: findings.errors.is_empty(),
        errors: findings.errors,
        warnings: findings.warnings,
        stats,
    }
}

fn check_entry(
    entry: &SitemapEntry,
    sitemap: &str,
    today: NaiveDate,
    findings: &mut Findings,
    stats: &mut ValidationStats,
) {
    let url = entry.url.as_str();
    if !https_url_re().is_match(url) {
        stats.invalid_urls += 1;
        findings.push(
            IssueCode::InvalidUrl,
            format!("{url} is not an absolute https URL"),
            Some(sitemap),
            Some(url),
        );
    }
    if let Some(date) = entry.last_modified.filter(|date| *date > today) {
        stats.invalid_lastmods += 1;
        findings.push(
            IssueCode::InvalidLastmod,
            format!("{url} has lastmod {date}, after {today}"),
            Some(sitemap),
            Some(url),
        );
    }
    if let Some(priority) = entry.priority.filter(|p| !(0.0..=1.0).contains(p)) {
        findings.push(
            IssueCode::InvalidPriority,
            format!("{url} has priority {priority}; expected 0.0 to 1.0"),
            Some(sitemap),
            Some(url),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::SitemapCategory;
    use crate::index::{SitemapFile, SitemapIndexEntry, assemble};

    fn day(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, d).expect("date")
    }

    fn today() -> NaiveDate {
        day(3, 1)
    }

    fn spread(prefix: &str, n: u32) -> Vec<SitemapEntry> {
        (1..=n)
            .map(|i| SitemapEntry::new(format!("https://www.example.com/{prefix}/{i}")).with_lastmod(day(1, i)))
            .collect()
    }

    #[test]
    fn clean_set_is_valid() {
        let set = assemble(
            vec![
                (SitemapCategory::Core, spread("core", 4)),
                (SitemapCategory::Blog, spread("blog", 4)),
            ],
            "https://www.example.com",
            day(1, 1),
            100,
        )
        .expect("assemble");
        let report = validate_sitemaps(&set, today());
        assert!(report.valid, "{:?}", report.errors);
        assert!(report.warnings.is_empty());
        assert_eq!(report.stats.total_urls, 8);
        assert_eq!(report.stats.urls_by_sitemap["sitemap-blog.xml"], 4);
        assert!(report.into_result().is_ok());
    }

    #[test]
    fn bad_entries_are_reported() {
        let mut entries = spread("core", 4);
        entries.push(SitemapEntry::new("http://www.example.com/insecure"));
        entries.push(SitemapEntry::new("/relative"));
        entries.push(SitemapEntry::new("https://www.example.com/future").with_lastmod(day(6, 1)));
        entries.push(SitemapEntry::new("https://www.example.com/loud").with_priority(1.5));
        let set = SitemapSet {
            files: vec![SitemapFile {
                name: "sitemap-core.xml".into(),
                category: SitemapCategory::Core,
                entries,
            }],
            index: vec![SitemapIndexEntry {
                name: "sitemap-core.xml".into(),
                loc: "https://www.example.com/sitemap-core.xml".into(),
                lastmod: day(1, 4),
            }],
        };

        let report = validate_sitemaps(&set, today());
        assert!(!report.valid);
        assert_eq!(report.stats.invalid_urls, 2);
        assert_eq!(report.stats.invalid_lastmods, 1);
        assert!(report.has_code(IssueCode::InvalidPriority));
        assert!(matches!(
            report.into_result(),
            Err(SitemapError::Invalid { count: 4, .. })
        ));
    }

    #[test]
    fn duplicates_and_index_mismatch() {
        let shared = SitemapEntry::new("https://www.example.com/shared");
        let set = SitemapSet {
            files: vec![
                SitemapFile {
                    name: "sitemap-core.xml".into(),
                    category: SitemapCategory::Core,
                    entries: vec![shared.clone()],
                },
                SitemapFile {
                    name: "sitemap-services.xml".into(),
                    category: SitemapCategory::Services,
                    entries: vec![shared],
                },
            ],
            index: vec![
                SitemapIndexEntry {
                    name: "sitemap-core.xml".into(),
                    loc: "https://www.example.com/sitemap-core.xml".into(),
                    lastmod: day(1, 1),
                },
                SitemapIndexEntry {
                    name: "sitemap-blog.xml".into(),
                    loc: "https://www.example.com/sitemap-blog.xml".into(),
                    lastmod: day(1, 1),
                },
            ],
        };

        let report = validate_sitemaps(&set, today());
        assert_eq!(report.stats.duplicates_found, 1);
        assert!(report.has_code(IssueCode::DuplicateUrl));
        assert!(report.has_code(IssueCode::MissingChildSitemap));
        assert!(report.has_code(IssueCode::UnreferencedSitemap));
    }

    #[test]
    fn warnings_do_not_invalidate() {
        let mut entries: Vec<SitemapEntry> = (1..=4)
            .map(|i| SitemapEntry::new(format!("https://www.example.com/p/{i}")).with_lastmod(day(1, 1)))
            .collect();
        entries.push(SitemapEntry::new("https://www.example.com/q/").with_lastmod(day(1, 2)));
        entries.push(SitemapEntry::new("https://www.example.com/").with_lastmod(day(1, 3)));
        let set = assemble(
            vec![(SitemapCategory::Core, entries)],
            "https://www.example.com",
            day(1, 1),
            100,
        )
        .expect("assemble");

        let report = validate_sitemaps(&set, today());
        assert!(report.valid);
        let codes: Vec<IssueCode> = report.warnings.iter().map(|w| w.code).collect();
        assert_eq!(
            codes,
            vec![IssueCode::LastmodConcentration, IssueCode::InconsistentTrailingSlash]
        );
        assert_eq!(report.warnings[1].message, "1 of 5 URLs end with a trailing slash; pick one style");
    }

    #[test]
    fn root_urls() {
        assert!(is_root_url("https://www.example.com"));
        assert!(is_root_url("https://www.example.com/"));
        assert!(!is_root_url("https://www.example.com/about"));
    }
}
