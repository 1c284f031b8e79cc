//! Loading per-page signals for batch runs.
//!
//! The file is a JSON object keyed by site path:
//!
//! ```json
//! { "/austin-tx/seo": { "featured": true, "wordCount": 1800 },
//!   "/pricing": { "manualNoindex": true } }
//! ```
//!
//! Pages without an entry get default signals.

use crate::error::StoreError;
use sitegov_kernel::{PageSignals, RouteDescriptor};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use tracing::info;

pub fn parse_page_signals(
    path: &Path,
    raw: &str,
) -> Result<HashMap<RouteDescriptor, PageSignals>, StoreError> {
    let entries: BTreeMap<String, PageSignals> =
        serde_json::from_str(raw).map_err(|e| StoreError::Json {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
    Ok(entries
        .into_iter()
        .map(|(page, signals)| (RouteDescriptor::from_path(&page), signals))
        .collect())
}

pub fn load_page_signals(
    path: impl AsRef<Path>,
) -> Result<HashMap<RouteDescriptor, PageSignals>, StoreError> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|e| StoreError::io(path, e))?;
    let signals = parse_page_signals(path, &raw)?;
    info!(path = %path.display(), pages = signals.len(), "loaded page signals");
    Ok(signals)
}
