//! Loading the offline overlap records.
//!
//! The file is a JSON object keyed by hub path:
//!
//! ```json
//! { "/austin-tx/industry/healthcare": {
//!     "cityOverlap": 0.42, "industryOverlap": 0.31,
//!     "downstreamPages": 6, "computedAt": "2025-01-20T00:00:00Z" } }
//! ```

use crate::error::StoreError;
use sitegov_kernel::{OverlapRecord, OverlapStore};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

pub fn parse_overlap_store(path: &Path, raw: &str) -> Result<OverlapStore, StoreError> {
    let records: BTreeMap<String, OverlapRecord> =
        serde_json::from_str(raw).map_err(|e| StoreError::Json {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
    let malformed = records.values().filter(|r| !r.is_well_formed()).count();
    if malformed > 0 {
        warn!(path = %path.display(), malformed, "overlap records outside [0,1] will be ignored");
    }
    Ok(OverlapStore::from_records(records))
}

/// Load the overlap store once at startup.
pub fn load_overlap_store(path: impl AsRef<Path>) -> Result<OverlapStore, StoreError> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|e| StoreError::io(path, e))?;
    let store = parse_overlap_store(path, &raw)?;
    info!(path = %path.display(), hubs = store.len(), "loaded overlap records");
    Ok(store)
}
