//! # Sitegov Kernel
//!
//! Index governance for a programmatic site: for every candidate URL,
//! decide whether it is indexed, whether it is followed, what its canonical
//! is, and whether it belongs in the sitemap. Every decision carries an
//! ordered audit trail of reason codes and a content-addressed id.
//!
//! The kernel is pure. Slug registries, overlap statistics, policy tables
//! and clocks are injected at construction; nothing here touches disk or
//! network.
//!
//! ## Architecture
//!
//! ```text
//! RouteDescriptor        ← Classified pathname (core, service, city, …)
//!     │
//! BlockSet + PageSignals ← Uniqueness blocks and page metadata
//!     │
//! IndexPolicyEngine      ← hard-fail → hub → hard-pass → tier-1 → gates
//!     │
//! Verdict                ← index / inSitemap / score / reasons / gates
//!     │
//! invariants             ← Breaches corrected to noindex
//!     │
//! SeoDirectives          ← Bound to URL + canonical, stamped with d1_ id
//!
//! CanonicalResolver      ← Hub canonical from overlap records (memoized)
//! GovernanceMonitor      ← Bounded ring of violations, queryable
//! ```

pub mod blocks;
pub mod canonical;
pub mod clock;
pub mod content;
pub mod digest;
pub mod directives;
pub mod engine;
pub mod error;
pub mod gate;
pub mod invariants;
pub mod monitor;
pub mod policy;
pub mod reason;
pub mod registry;
pub mod route;
pub mod score;
pub mod service_alias;
pub mod signals;

pub use blocks::{BlockKind, BlockSet, BlockValidation, UniquenessBlock};
pub use canonical::{
    CacheStats, CanonicalDecision, CanonicalReason, CanonicalResolver, DownstreamPage,
    OverlapRecord, OverlapStore,
};
pub use clock::{Clock, FixedClock, SystemClock};
pub use content::RouteContent;
pub use directives::{Gates, SeoDirectives, Verdict};
pub use engine::IndexPolicyEngine;
pub use error::{GovernanceError, Severity};
pub use gate::{ScoreBreakdown, StageA};
pub use monitor::{GovernanceMonitor, GovernanceViolation, ViolationKind, ViolationStats};
pub use policy::PolicyTable;
pub use reason::{ReasonCode, ReasonCodes};
pub use registry::SlugRegistry;
pub use route::{RouteDescriptor, RouteType, canonical_url};
pub use score::Score;
pub use signals::{PagePriority, PageSignals};
