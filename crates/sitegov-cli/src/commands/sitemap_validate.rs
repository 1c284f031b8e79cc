use crate::commands::sitemap_build::generate_or_exit;
use crate::support::{load_config_or_exit, print_json, yes_no};
use std::process;

pub fn run(config_path: &str, now: Option<String>, json_output: bool) {
    let config = load_config_or_exit(config_path);
    let report = generate_or_exit(&config, now.as_deref()).report;

    if json_output {
        print_json(&report);
    } else {
        println!("sitegov sitemap validate");
        println!("  Valid: {}", yes_no(report.valid));
        println!("  Total URLs: {}", report.stats.total_urls);
        for (sitemap, count) in &report.stats.urls_by_sitemap {
            println!("  {sitemap}: {count}");
        }
        for issue in report.errors.iter().chain(&report.warnings) {
            println!("  [{:?}] {:?}: {}", issue.severity, issue.code, issue.message);
        }
    }
    if !report.valid {
        process::exit(1);
    }
}
