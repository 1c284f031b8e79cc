//! # sitegov-store
//!
//! Filesystem and supplier adapters around the kernel.
//!
//! This crate provides:
//! - `GovernanceConfig` (the `sitegov.toml` surface)
//! - overlap record and page signal loading
//! - JSONL block records and async block suppliers
//! - `BlockCatalog`, the pre-collected `RouteContent` for batch runs
//! - `atomic_write` for sitemap artifacts
//!
//! ## Data flow
//!
//! ```text
//! blocks.jsonl ──► JsonlBlockSupplier ──► collect_blocks ──► BlockCatalog ──► engine
//! signals.json ─────────────────────────────────────────────► BlockCatalog
//! overlap.json ──► OverlapStore ─────────────────────────────────────────► resolver
//! ```

pub mod atomic;
pub mod catalog;
pub mod config;
pub mod error;
pub mod jsonl;
pub mod overlap;
pub mod signals;
pub mod supplier;

pub use atomic::atomic_write;
pub use catalog::{BlockCatalog, programmatic_routes};
pub use config::{DEFAULT_BASE_URL, DEFAULT_CONFIG_FILE, DataPaths, GovernanceConfig, MonitorConfig};
pub use error::StoreError;
pub use jsonl::{
    BlockRecord, JsonlError, read_block_records, read_block_records_from_path,
    write_block_records, write_block_records_to_path,
};
pub use overlap::{load_overlap_store, parse_overlap_store};
pub use signals::{load_page_signals, parse_page_signals};
pub use supplier::{BlockSupplier, JsonlBlockSupplier, StaticBlockSupplier, collect_blocks};
