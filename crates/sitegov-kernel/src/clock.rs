//! Time source for freshness windows and plausibility checks.
//!
//! Decisions read the clock only through this trait so batch runs and
//! tests can pin "now".

use crate::blocks::parse_timestamp;
use chrono::{DateTime, Utc};
use std::fmt::Debug;

pub trait Clock: Debug + Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(DateTime<Utc>);

impl FixedClock {
    pub fn at(instant: DateTime<Utc>) -> Self {
        Self(instant)
    }

    /// Parse the same timestamp forms block `last_updated` fields accept.
    pub fn parse(raw: &str) -> Option<Self> {
        parse_timestamp(raw).map(Self)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
