//! Error types for sitegov kernel operations.
//!
//! Decisions never fail: bad input becomes a reason code. These errors are
//! reserved for structural problems a caller chooses to assert on.

use crate::route::RouteType;

/// Errors raised by kernel assertions and configuration checks.
#[derive(Debug, Clone, thiserror::Error)]
pub enum GovernanceError {
    /// A route descriptor is missing identifiers its route type requires.
    #[error("invalid route shape for {route_type}: {detail}")]
    InvalidRouteShape {
        route_type: RouteType,
        detail: String,
    },

    /// A route type string did not name a known route type.
    #[error("unknown route type: {0}")]
    UnknownRouteType(String),

    /// A hub canonical resolved to a URL outside the legal shapes.
    #[error("invalid canonical target for hub {hub}: {canonical}")]
    InvalidCanonicalTarget { hub: String, canonical: String },

    /// A directive set breaks an engine invariant.
    #[error("invariant breach on {route_type} ({url}): {detail}")]
    InvariantBreach {
        url: String,
        route_type: RouteType,
        detail: String,
    },

    /// The scoring policy table is out of range.
    #[error("invalid policy: {0}")]
    InvalidPolicy(String),
}

/// Severity of a governance violation.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Low,
        Severity::Medium,
        Severity::High,
        Severity::Critical,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|severity| severity.as_str() == s)
            .ok_or_else(|| format!("unknown severity `{s}` (expected low, medium, high, critical)"))
    }
}
