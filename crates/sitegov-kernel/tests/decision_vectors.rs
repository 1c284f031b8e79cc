//! Integration tests: run the decision vectors.
//!
//! Each fixture in tests/fixtures/ has:
//! - case.json: registry, clock, URL, blocks and signals
//! - expect.json: the classified route and the expected directives
//!
//! The URL is classified, decided, and the serialized directives are
//! compared in full, including the exact decision id.

use serde_json::Value;
use sitegov_kernel::{
    BlockSet, CanonicalReason, CanonicalResolver, DownstreamPage, FixedClock, IndexPolicyEngine,
    OverlapStore, PageSignals, PolicyTable, RouteDescriptor, SlugRegistry,
};
use std::path::PathBuf;
use std::sync::Arc;

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn read_json(path: PathBuf) -> Value {
    let raw = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("failed to read {}: {e}", path.display()));
    serde_json::from_str(&raw).unwrap_or_else(|e| panic!("failed to parse {}: {e}", path.display()))
}

fn run_fixture(name: &str) {
    let dir = fixtures_dir().join(name);
    let case = read_json(dir.join("case.json"));
    let expected = read_json(dir.join("expect.json"));

    let registry: SlugRegistry =
        serde_json::from_value(case["registry"].clone()).expect("registry parses");
    let now = case["now"].as_str().expect("missing now field");
    let clock = FixedClock::parse(now).unwrap_or_else(|| panic!("bad clock: {now}"));
    let base_url = case["baseUrl"].as_str().expect("missing baseUrl field");
    let url = case["url"].as_str().expect("missing url field");
    let blocks: BlockSet = serde_json::from_value(case["blocks"].clone()).expect("blocks parse");
    let signals: PageSignals =
        serde_json::from_value(case["signals"].clone()).expect("signals parse");

    let engine = IndexPolicyEngine::new(Arc::new(registry), PolicyTable::default(), base_url)
        .expect("default policy")
        .with_clock(Arc::new(clock));

    let route = RouteDescriptor::from_path(url);
    let directives = engine.decide(url, &route, &blocks, &signals);

    let got = serde_json::json!({
        "route": route,
        "directives": directives,
    });
    assert_eq!(
        got,
        expected,
        "\n\nFixture: {name}\n\nGot:\n{}\n\nExpected:\n{}\n",
        serde_json::to_string_pretty(&got).expect("json"),
        serde_json::to_string_pretty(&expected).expect("json"),
    );
}

#[test]
fn scored_city_service() {
    run_fixture("scored_city_service");
}

#[test]
fn missing_proof_fails_stage_a() {
    run_fixture("missing_proof_fails_stage_a");
}

#[test]
fn hub_ignores_manual_index() {
    run_fixture("hub_ignores_manual_index");
}

#[test]
fn tier1_core_page() {
    run_fixture("tier1_core_page");
}

#[test]
fn stale_local_data() {
    run_fixture("stale_local_data");
}

#[test]
fn single_indexable_downstream_page_becomes_hub_canonical() {
    let resolver = CanonicalResolver::new(
        "https://www.example.com",
        Arc::new(OverlapStore::default()),
        &PolicyTable::default(),
    );
    let decision = resolver.resolve_hub(
        "boston-ma",
        "healthcare",
        &[DownstreamPage::new("/boston-ma/industry/healthcare/seo", true)],
    );
    assert_eq!(decision.reason_code, CanonicalReason::SingleServicePage);
    assert_eq!(
        decision.canonical,
        "https://www.example.com/boston-ma/industry/healthcare/seo"
    );

    let json = serde_json::to_value(&decision).expect("decision serializes");
    assert_eq!(json["reasonCode"], "SINGLE_SERVICE_PAGE");
    assert_eq!(json["downstreamPages"], 1);
}
