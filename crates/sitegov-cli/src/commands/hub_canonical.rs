use crate::support::{
    absolute_url, clock_or_exit, exit_with, load_config_or_exit, monitor_for, print_json,
};
use serde_json::json;
use sitegov_kernel::{CanonicalResolver, DownstreamPage};
use std::sync::Arc;

/// `URL` or `URL:noindex`.
fn parse_downstream(raw: &str, base_url: &str) -> DownstreamPage {
    match raw.strip_suffix(":noindex") {
        Some(url) => DownstreamPage::new(absolute_url(url, base_url), false),
        None => DownstreamPage::new(absolute_url(raw, base_url), true),
    }
}

pub fn run(
    config_path: &str,
    city: String,
    industry: String,
    downstream: Vec<String>,
    json_output: bool,
) {
    let config = load_config_or_exit(config_path);
    let base_url = config.base_url();
    let overlap = config.overlap_store().unwrap_or_else(|e| exit_with(e));
    let monitor = monitor_for(&config, clock_or_exit(None));
    let resolver = CanonicalResolver::new(base_url, Arc::new(overlap), &config.policy)
        .with_monitor(monitor.clone());

    let pages: Vec<DownstreamPage> = downstream
        .iter()
        .map(|raw| parse_downstream(raw, base_url))
        .collect();
    let decision = resolver.resolve_hub(&city, &industry, &pages);
    let violations = monitor.violations();

    if json_output {
        print_json(&json!({
            "hub": absolute_url(&format!("/{city}/industry/{industry}"), base_url),
            "decision": decision,
            "violations": violations,
        }));
    } else {
        println!("sitegov hub-canonical /{city}/industry/{industry}");
        println!("  Canonical: {}", decision.canonical);
        println!("  Reason: {:?} ({})", decision.reason_code, decision.reason);
        if let Some(scores) = decision.overlap_scores {
            println!(
                "  Overlap: city {:.2}, industry {:.2}",
                scores.city_overlap, scores.industry_overlap
            );
        }
        if let Some(count) = decision.downstream_pages {
            println!("  Downstream pages: {count}");
        }
        for violation in &violations {
            println!("  Violation [{}] {}", violation.severity, violation.message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn downstream_suffix_marks_noindex() {
        let base = "https://www.example.com";
        let page = parse_downstream("/austin-tx/industry/healthcare/seo:noindex", base);
        assert_eq!(
            page,
            DownstreamPage::new(
                "https://www.example.com/austin-tx/industry/healthcare/seo",
                false
            )
        );
        let page = parse_downstream("https://www.example.com/austin-tx/seo", base);
        assert!(page.indexable);
    }
}
