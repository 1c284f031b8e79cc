use crate::cli::DecideArgs;
use crate::support::{
    absolute_url, clock_or_exit, engine_or_exit, exit_with, load_config_or_exit, monitor_for,
    print_json, runtime_or_exit, site_path, supplier_for, yes_no,
};
use serde_json::json;
use sitegov_kernel::{BlockSet, PageSignals, RouteDescriptor};
use sitegov_store::{BlockSupplier, GovernanceConfig, collect_blocks};
use std::fs;

fn signals_from(args: &DecideArgs) -> PageSignals {
    PageSignals {
        has_unique_content: args.unique_content,
        has_cms_content: args.cms_content,
        word_count: args.word_count,
        duplicate_content: args.duplicate_content,
        manual_noindex: args.manual_noindex,
        manual_index: args.manual_index,
        featured: args.featured,
        priority: None,
        engagement_score: args.engagement,
        external_citations: args.citations,
    }
}

fn blocks_for(config: &GovernanceConfig, args: &DecideArgs, route: &RouteDescriptor) -> BlockSet {
    if let Some(path) = &args.blocks {
        let raw = fs::read_to_string(path)
            .unwrap_or_else(|e| exit_with(format!("failed to read {path}: {e}")));
        return serde_json::from_str(&raw)
            .unwrap_or_else(|e| exit_with(format!("failed to parse {path}: {e}")));
    }
    match supplier_for(config) {
        Some(supplier) => runtime_or_exit().block_on(async {
            let supplier: &dyn BlockSupplier = &supplier;
            collect_blocks(supplier, route).await
        }),
        None => BlockSet::new(),
    }
}

pub fn run(config_path: &str, args: DecideArgs) {
    let config = load_config_or_exit(config_path);
    let clock = clock_or_exit(args.now.as_deref());
    let monitor = monitor_for(&config, clock.clone());
    let engine = engine_or_exit(&config, clock, Some(monitor.clone()));

    let path = site_path(&args.url, engine.base_url());
    let route = RouteDescriptor::from_path(&path);
    let url = absolute_url(&path, engine.base_url());
    let blocks = blocks_for(&config, &args, &route);
    let signals = signals_from(&args);
    let directives = engine.decide(&url, &route, &blocks, &signals);
    let violations = monitor.violations();

    if args.json {
        print_json(&json!({
            "url": url,
            "route": route,
            "directives": directives,
            "robots": directives.robots_content(),
            "violations": violations,
        }));
    } else {
        println!("sitegov decide {url}");
        println!("  Route type: {}", route.route_type);
        println!("  Robots: {}", directives.robots_content());
        println!("  Canonical: {}", directives.canonical);
        println!("  In sitemap: {}", yes_no(directives.in_sitemap));
        println!("  Score: {}", directives.score);
        println!("  Reasons: {}", directives.reason_codes);
        println!("  Decision: {}", directives.decision_id);
        for violation in &violations {
            println!(
                "  Violation [{}] {}: {}",
                violation.severity, violation.violation_type, violation.message
            );
        }
    }
}
