use crate::support::{
    block_catalog, clock_or_exit, engine_or_exit, exit_with, load_config_or_exit, print_json,
};
use serde_json::json;
use sitegov_sitemap::{SitemapArtifacts, SitemapGenerator, build_sitemaps};
use sitegov_store::{GovernanceConfig, atomic_write};
use std::fs;
use std::path::Path;
use tracing::info;

/// Generate and validate. Exits non-zero on structural faults or an
/// invalid report; warnings pass through.
pub fn generate_or_exit(config: &GovernanceConfig, now: Option<&str>) -> SitemapArtifacts {
    let clock = clock_or_exit(now);
    let engine = engine_or_exit(config, clock.clone(), None);
    let content = block_catalog(config);
    let generator = SitemapGenerator::new(
        &engine,
        &content,
        &config.catalog,
        &config.lastmod,
        clock.as_ref(),
    );
    let today = clock.now().date_naive();
    build_sitemaps(&generator, engine.base_url(), config.lastmod.fallback, today)
        .unwrap_or_else(|e| exit_with(e))
}

pub fn run(config_path: &str, out: String, now: Option<String>, json_output: bool) {
    let config = load_config_or_exit(config_path);
    let artifacts = generate_or_exit(&config, now.as_deref());
    if !artifacts.report.valid {
        for issue in &artifacts.report.errors {
            eprintln!("  [{:?}] {}", issue.code, issue.message);
        }
        exit_with(format!(
            "sitemap validation failed with {} error(s); nothing written",
            artifacts.report.errors.len()
        ));
    }

    let out_dir = Path::new(&out);
    fs::create_dir_all(out_dir)
        .unwrap_or_else(|e| exit_with(format!("failed to create {}: {e}", out_dir.display())));
    let documents = artifacts.documents();
    for (name, xml) in &documents {
        atomic_write(&out_dir.join(name), xml.as_bytes()).unwrap_or_else(|e| exit_with(e));
    }
    let run_id = uuid::Uuid::new_v4().to_string();
    info!(
        run_id = %run_id,
        files = documents.len(),
        urls = artifacts.set.total_urls(),
        "wrote sitemaps"
    );

    if json_output {
        let files: Vec<_> = artifacts
            .set
            .files
            .iter()
            .map(|file| json!({ "name": file.name, "urls": file.entries.len() }))
            .collect();
        print_json(&json!({
            "runId": run_id,
            "outDir": out,
            "files": files,
            "totalUrls": artifacts.set.total_urls(),
            "warnings": artifacts.report.warnings,
        }));
    } else {
        println!("sitegov sitemap build");
        println!("  Output: {out}");
        for file in &artifacts.set.files {
            println!("  {} ({} urls)", file.name, file.entries.len());
        }
        println!("  Total URLs: {}", artifacts.set.total_urls());
        println!("  Warnings: {}", artifacts.report.warnings.len());
    }
}
