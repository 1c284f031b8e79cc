//! Asynchronous block suppliers.
//!
//! Suppliers may fail; [`collect_blocks`] absorbs every failure as an
//! absent block so the engine never sees a supplier error.

use crate::error::StoreError;
use crate::jsonl::{BlockRecord, parse_block_records};
use async_trait::async_trait;
use sitegov_kernel::blocks::{IndustryKpiMap, LocalDataCard, ProofSlot};
use sitegov_kernel::{BlockKind, BlockSet, RouteDescriptor, UniquenessBlock};
use std::path::PathBuf;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

#[async_trait]
pub trait BlockSupplier: Send + Sync {
    /// The record of `kind` best matching `route`, if any.
    async fn lookup(
        &self,
        kind: BlockKind,
        route: &RouteDescriptor,
    ) -> Result<Option<UniquenessBlock>, StoreError>;

    async fn local_data_card(
        &self,
        route: &RouteDescriptor,
    ) -> Result<Option<LocalDataCard>, StoreError> {
        Ok(match self.lookup(BlockKind::LocalDataCard, route).await? {
            Some(UniquenessBlock::LocalDataCard(card)) => Some(card),
            _ => None,
        })
    }

    async fn industry_kpi_map(
        &self,
        route: &RouteDescriptor,
    ) -> Result<Option<IndustryKpiMap>, StoreError> {
        Ok(match self.lookup(BlockKind::IndustryKpiMap, route).await? {
            Some(UniquenessBlock::IndustryKpiMap(map)) => Some(map),
            _ => None,
        })
    }

    async fn proof_slot(&self, route: &RouteDescriptor) -> Result<Option<ProofSlot>, StoreError> {
        Ok(match self.lookup(BlockKind::ProofSlot, route).await? {
            Some(UniquenessBlock::ProofSlot(slot)) => Some(slot),
            _ => None,
        })
    }
}

/// In-memory records. The most specific match wins; ties go to the
/// earlier record.
#[derive(Debug, Clone, Default)]
pub struct StaticBlockSupplier {
    records: Vec<BlockRecord>,
}

impl StaticBlockSupplier {
    pub fn new(records: Vec<BlockRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn best_match(&self, kind: BlockKind, route: &RouteDescriptor) -> Option<&BlockRecord> {
        let mut best: Option<(usize, &BlockRecord)> = None;
        for record in self.records.iter().filter(|r| r.kind == kind) {
            let Some(score) = record.specificity(route) else {
                continue;
            };
            if best.is_none_or(|(top, _)| score > top) {
                best = Some((score, record));
            }
        }
        best.map(|(_, record)| record)
    }
}

#[async_trait]
impl BlockSupplier for StaticBlockSupplier {
    async fn lookup(
        &self,
        kind: BlockKind,
        route: &RouteDescriptor,
    ) -> Result<Option<UniquenessBlock>, StoreError> {
        match self.best_match(kind, route) {
            Some(record) => record
                .to_block()
                .map(Some)
                .map_err(|e| StoreError::Supplier(format!("{kind} for {}: {e}", route.relative_path()))),
            None => Ok(None),
        }
    }
}

/// Records read from a JSONL file on first use.
///
/// The load outcome is cached either way: a missing or corrupt file is read
/// once and every later lookup reports the same error.
#[derive(Debug)]
pub struct JsonlBlockSupplier {
    path: PathBuf,
    loaded: OnceCell<Result<StaticBlockSupplier, StoreError>>,
}

impl JsonlBlockSupplier {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            loaded: OnceCell::new(),
        }
    }

    async fn records(&self) -> Result<&StaticBlockSupplier, StoreError> {
        self.loaded
            .get_or_init(|| async {
                let loaded = self.load().await;
                match &loaded {
                    Ok(records) => {
                        debug!(path = %self.path.display(), records = records.len(), "loaded block records")
                    }
                    Err(e) => warn!(path = %self.path.display(), error = %e, "block records unavailable"),
                }
                loaded
            })
            .await
            .as_ref()
            .map_err(Clone::clone)
    }

    async fn load(&self) -> Result<StaticBlockSupplier, StoreError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|e| StoreError::io(&self.path, e))?;
        let records = parse_block_records(&self.path, &bytes)?;
        Ok(StaticBlockSupplier::new(records))
    }
}

#[async_trait]
impl BlockSupplier for JsonlBlockSupplier {
    async fn lookup(
        &self,
        kind: BlockKind,
        route: &RouteDescriptor,
    ) -> Result<Option<UniquenessBlock>, StoreError> {
        self.records().await?.lookup(kind, route).await
    }
}

fn absorb<T>(kind: BlockKind, route: &RouteDescriptor, result: Result<Option<T>, StoreError>) -> Option<T> {
    match result {
        Ok(block) => block,
        Err(err) => {
            warn!(
                kind = %kind,
                route = %route.relative_path(),
                error = %err,
                "block supplier failed; treating block as absent"
            );
            None
        }
    }
}

/// Fetch the blocks `route` requires, concurrently. Failures become
/// absent blocks.
pub async fn collect_blocks(supplier: &dyn BlockSupplier, route: &RouteDescriptor) -> BlockSet {
    let wanted = route.route_type.required_blocks();
    let wants = |kind: BlockKind| wanted.contains(&kind);

    let (local, kpi, proof) = tokio::join!(
        async {
            if wants(BlockKind::LocalDataCard) {
                supplier.local_data_card(route).await
            } else {
                Ok(None)
            }
        },
        async {
            if wants(BlockKind::IndustryKpiMap) {
                supplier.industry_kpi_map(route).await
            } else {
                Ok(None)
            }
        },
        async {
            if wants(BlockKind::ProofSlot) {
                supplier.proof_slot(route).await
            } else {
                Ok(None)
            }
        },
    );

    BlockSet {
        local_data_card: absorb(BlockKind::LocalDataCard, route, local),
        industry_kpi_map: absorb(BlockKind::IndustryKpiMap, route, kpi),
        proof_slot: absorb(BlockKind::ProofSlot, route, proof),
    }
}
