//! JSONL block records: one uniqueness block per line.
//!
//! ```text
//! {"kind":"local_data_card","city":"austin-tx","service":"seo","block":{...}}
//! {"kind":"industry_kpi_map","industry":"healthcare","service":"seo","block":{...}}
//! ```
//!
//! The slug fields a record carries are its lookup key; omitted fields
//! match any route. Blank lines and `#` comments are skipped.

use crate::atomic::atomic_write;
use crate::error::StoreError;
use serde::{Deserialize, Serialize};
use sitegov_kernel::{BlockKind, RouteDescriptor, UniquenessBlock};
use std::fs;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockRecord {
    pub kind: BlockKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    pub block: serde_json::Value,
}

impl BlockRecord {
    pub fn new(block: &UniquenessBlock) -> Result<Self, JsonlError> {
        let block_json = match block {
            UniquenessBlock::LocalDataCard(card) => serde_json::to_value(card),
            UniquenessBlock::IndustryKpiMap(map) => serde_json::to_value(map),
            UniquenessBlock::ProofSlot(slot) => serde_json::to_value(slot),
        }
        .map_err(|e| JsonlError::Serialize(e.to_string()))?;
        Ok(Self {
            kind: block.kind(),
            city: None,
            service: None,
            industry: None,
            block: block_json,
        })
    }

    pub fn for_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    pub fn for_service(mut self, service: impl Into<String>) -> Self {
        self.service = Some(service.into());
        self
    }

    pub fn for_industry(mut self, industry: impl Into<String>) -> Self {
        self.industry = Some(industry.into());
        self
    }

    /// Decode the payload into the block its `kind` names.
    pub fn to_block(&self) -> Result<UniquenessBlock, serde_json::Error> {
        let payload = self.block.clone();
        Ok(match self.kind {
            BlockKind::LocalDataCard => UniquenessBlock::LocalDataCard(serde_json::from_value(payload)?),
            BlockKind::IndustryKpiMap => UniquenessBlock::IndustryKpiMap(serde_json::from_value(payload)?),
            BlockKind::ProofSlot => UniquenessBlock::ProofSlot(serde_json::from_value(payload)?),
        })
    }

    /// Number of key fields that match `route`, or `None` when any set
    /// field disagrees.
    pub fn specificity(&self, route: &RouteDescriptor) -> Option<usize> {
        let pairs = [
            (&self.city, &route.city),
            (&self.service, &route.service),
            (&self.industry, &route.industry),
        ];
        let mut matched = 0;
        for (key, slug) in pairs {
            if let Some(key) = key {
                if slug.as_deref() != Some(key.as_str()) {
                    return None;
                }
                matched += 1;
            }
        }
        Some(matched)
    }
}

/// Read block records from a JSONL reader.
///
/// Each payload is decoded once here. A line that is not a record, or whose
/// payload does not decode for its kind, is logged with its line number and
/// skipped so the remaining records still load.
pub fn read_block_records(reader: impl BufRead) -> Result<Vec<BlockRecord>, JsonlError> {
    let mut records = Vec::new();
    for (line_no, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| JsonlError::Io(line_no + 1, e.to_string()))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let record: BlockRecord = match serde_json::from_str(trimmed) {
            Ok(record) => record,
            Err(e) => {
                warn!(line = line_no + 1, error = %e, "skipping malformed block record");
                continue;
            }
        };
        if let Err(e) = record.to_block() {
            warn!(line = line_no + 1, kind = %record.kind, error = %e, "skipping block record with invalid payload");
            continue;
        }
        records.push(record);
    }
    Ok(records)
}

pub fn write_block_records(writer: &mut impl Write, records: &[BlockRecord]) -> Result<(), JsonlError> {
    for record in records {
        let line =
            serde_json::to_string(record).map_err(|e| JsonlError::Serialize(e.to_string()))?;
        writeln!(writer, "{line}").map_err(|e| JsonlError::Io(0, e.to_string()))?;
    }
    Ok(())
}

/// Parse raw file bytes after rejecting NUL and non-UTF-8 content.
pub fn parse_block_records(path: &Path, bytes: &[u8]) -> Result<Vec<BlockRecord>, JsonlError> {
    validate_bytes(path, bytes)?;
    read_block_records(BufReader::new(bytes))
}

pub fn read_block_records_from_path(path: impl AsRef<Path>) -> Result<Vec<BlockRecord>, StoreError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|e| StoreError::io(path, e))?;
    Ok(parse_block_records(path, &bytes)?)
}

pub fn write_block_records_to_path(
    path: impl AsRef<Path>,
    records: &[BlockRecord],
) -> Result<(), StoreError> {
    let mut buf = Vec::new();
    write_block_records(&mut buf, records)?;
    atomic_write(path, &buf)
}

fn validate_bytes(path: &Path, bytes: &[u8]) -> Result<(), JsonlError> {
    if bytes.contains(&0) {
        return Err(JsonlError::Corrupt(format!(
            "{}: contains NUL byte(s)",
            path.display()
        )));
    }
    if std::str::from_utf8(bytes).is_err() {
        return Err(JsonlError::Corrupt(format!(
            "{}: contains non-UTF-8 byte sequence(s)",
            path.display()
        )));
    }
    Ok(())
}

/// Errors from JSONL operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum JsonlError {
    #[error("line {0}: I/O error: {1}")]
    Io(usize, String),

    #[error("serialization error: {0}")]
    Serialize(String),

    #[error("corrupted file: {0}")]
    Corrupt(String),
}
