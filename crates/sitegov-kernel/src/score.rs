//! Quality scores in exact basis points.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A score in [0, 1], stored as basis points (1.0 == 10_000).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Score(u32);

impl Score {
    pub const ZERO: Score = Score(0);
    pub const FULL: Score = Score(10_000);

    /// Clamped to [0, FULL].
    pub fn from_basis_points(bp: u32) -> Self {
        Self(bp.min(Self::FULL.0))
    }

    /// Round a fraction to the nearest basis point, clamped to [0, 1].
    pub fn from_fraction(fraction: f64) -> Self {
        if !fraction.is_finite() || fraction <= 0.0 {
            return Self::ZERO;
        }
        Self::from_basis_points((fraction.min(1.0) * 10_000.0).round() as u32)
    }

    pub fn basis_points(self) -> u32 {
        self.0
    }

    pub fn value(self) -> f64 {
        f64::from(self.0) / 10_000.0
    }

    /// Sum of contributions, capped at 1.0.
    pub fn sum<I: IntoIterator<Item = Score>>(parts: I) -> Self {
        Self::from_basis_points(parts.into_iter().map(|s| s.0).sum())
    }
}

/// Two decimal places, rounded half up.
impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hundredths = (self.0 + 50) / 100;
        write!(f, "{}.{:02}", hundredths / 100, hundredths % 100)
    }
}

impl Serialize for Score {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.value())
    }
}

impl<'de> Deserialize<'de> for Score {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        if !(0.0..=1.0).contains(&value) {
            return Err(serde::de::Error::custom(format!(
                "score {value} outside [0, 1]"
            )));
        }
        Ok(Self::from_fraction(value))
    }
}
