use serde::Serialize;
use sitegov_kernel::{Clock, FixedClock, GovernanceMonitor, IndexPolicyEngine, SystemClock};
use sitegov_store::{
    BlockCatalog, BlockSupplier, DEFAULT_CONFIG_FILE, GovernanceConfig, JsonlBlockSupplier,
};
use std::path::Path;
use std::process;
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the stderr subscriber. Bad filters fall back to `warn`.
pub fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

pub fn exit_with(message: impl std::fmt::Display) -> ! {
    eprintln!("error: {message}");
    process::exit(1);
}

/// Load the config. A missing file at the default path means defaults.
pub fn load_config_or_exit(path: &str) -> GovernanceConfig {
    if path == DEFAULT_CONFIG_FILE && !Path::new(path).exists() {
        debug!("no {DEFAULT_CONFIG_FILE}; using built-in defaults");
        return GovernanceConfig::default();
    }
    GovernanceConfig::from_file(path).unwrap_or_else(|e| exit_with(e))
}

pub fn clock_or_exit(now: Option<&str>) -> Arc<dyn Clock> {
    match now {
        Some(raw) => match FixedClock::parse(raw) {
            Some(clock) => Arc::new(clock),
            None => exit_with(format!("invalid --now `{raw}` (expected YYYY-MM-DD or RFC 3339)")),
        },
        None => Arc::new(SystemClock),
    }
}

pub fn runtime_or_exit() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .unwrap_or_else(|e| exit_with(format!("failed to create tokio runtime: {e}")))
}

pub fn engine_or_exit(
    config: &GovernanceConfig,
    clock: Arc<dyn Clock>,
    monitor: Option<Arc<GovernanceMonitor>>,
) -> IndexPolicyEngine {
    let engine = IndexPolicyEngine::new(
        Arc::new(config.registry.clone()),
        config.policy.clone(),
        config.base_url(),
    )
    .unwrap_or_else(|e| exit_with(e))
    .with_clock(clock);
    match monitor {
        Some(monitor) => engine.with_monitor(monitor),
        None => engine,
    }
}

pub fn monitor_for(config: &GovernanceConfig, clock: Arc<dyn Clock>) -> Arc<GovernanceMonitor> {
    Arc::new(GovernanceMonitor::new(config.monitor.capacity).with_clock(clock))
}

/// The configured block supplier, if a block file is set.
pub fn supplier_for(config: &GovernanceConfig) -> Option<JsonlBlockSupplier> {
    config.data.blocks.as_ref().map(JsonlBlockSupplier::new)
}

/// Blocks for every programmatic catalog page, plus configured page signals.
pub fn block_catalog(config: &GovernanceConfig) -> BlockCatalog {
    let signals = config.page_signals().unwrap_or_else(|e| exit_with(e));
    let Some(supplier) = supplier_for(config) else {
        return BlockCatalog::new().with_signals(signals);
    };
    let runtime = runtime_or_exit();
    let catalog = runtime.block_on(async {
        let supplier: &dyn BlockSupplier = &supplier;
        BlockCatalog::for_site(supplier, &config.registry, &config.catalog).await
    });
    catalog.with_signals(signals)
}

/// Site-relative path for `url`, accepting paths and absolute URLs on the
/// configured host.
pub fn site_path(url: &str, base_url: &str) -> String {
    match url.strip_prefix(base_url) {
        Some("") => "/".to_string(),
        Some(rest) if rest.starts_with('/') => rest.to_string(),
        _ if url.starts_with('/') => url.to_string(),
        _ if url.contains("://") => exit_with(format!("{url} is not under {base_url}")),
        _ => format!("/{url}"),
    }
}

/// Absolute URL for a path or URL argument.
pub fn absolute_url(url: &str, base_url: &str) -> String {
    if url.contains("://") {
        url.to_string()
    } else {
        format!("{base_url}/{}", url.trim_start_matches('/'))
    }
}

pub fn print_json(value: &impl Serialize) {
    println!(
        "{}",
        serde_json::to_string_pretty(value).expect("json serialization")
    );
}

pub fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://www.example.com";

    #[test]
    fn site_path_accepts_paths_and_urls() {
        assert_eq!(site_path("https://www.example.com", BASE), "/");
        assert_eq!(site_path("https://www.example.com/austin-tx/seo", BASE), "/austin-tx/seo");
        assert_eq!(site_path("/austin-tx/seo", BASE), "/austin-tx/seo");
        assert_eq!(site_path("pricing", BASE), "/pricing");
    }

    #[test]
    fn absolute_url_prefixes_paths() {
        assert_eq!(absolute_url("/austin-tx", BASE), "https://www.example.com/austin-tx");
        assert_eq!(
            absolute_url("https://www.example.com/austin-tx", BASE),
            "https://www.example.com/austin-tx"
        );
    }
}
