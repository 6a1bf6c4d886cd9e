#![forbid(unsafe_code)]

//! Pans and placed factor instances.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::catalog::{Category, Factor};

/// One side of the scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// The category this pan accepts. Everything else is silently rejected.
    #[inline]
    #[must_use]
    pub const fn accepts(self) -> Category {
        match self {
            Self::Left => Category::ProductionForces,
            Self::Right => Category::ProductionRelations,
        }
    }

    #[inline]
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string does not name a side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSideError(String);

impl fmt::Display for ParseSideError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown side {:?} (expected left or right)", self.0)
    }
}

impl std::error::Error for ParseSideError {}

impl FromStr for Side {
    type Err = ParseSideError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" | "l" | "llsx" | "forces" => Ok(Self::Left),
            "right" | "r" | "qhsx" | "relations" => Ok(Self::Right),
            _ => Err(ParseSideError(s.to_string())),
        }
    }
}

/// Identity of one placement, distinct from the catalog id.
///
/// The same catalog factor can sit on a pan several times; each copy gets
/// its own `InstanceId`. Ids are handed out by the engine and never reused.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct InstanceId(u64);

impl InstanceId {
    /// Wrap a raw id, e.g. one read back from a script or a snapshot.
    #[inline]
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A catalog factor sitting on a pan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlacedFactor {
    pub instance: InstanceId,
    pub factor: &'static Factor,
}

impl PlacedFactor {
    #[inline]
    #[must_use]
    pub fn weight(&self) -> i32 {
        self.factor.weight
    }
}

/// Ordered contents of one pan, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Pan {
    items: Vec<PlacedFactor>,
}

impl Pan {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, placed: PlacedFactor) {
        self.items.push(placed);
    }

    /// Remove the first placement with this instance id.
    pub(crate) fn remove(&mut self, instance: InstanceId) -> Option<PlacedFactor> {
        let idx = self.items.iter().position(|p| p.instance == instance)?;
        Some(self.items.remove(idx))
    }

    pub(crate) fn clear(&mut self) {
        self.items.clear();
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PlacedFactor> {
        self.items.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[PlacedFactor] {
        &self.items
    }

    #[must_use]
    pub fn contains(&self, instance: InstanceId) -> bool {
        self.items.iter().any(|p| p.instance == instance)
    }

    /// Raw sum of weights; negative totals are kept as-is.
    #[must_use]
    pub fn total_weight(&self) -> i32 {
        self.items.iter().map(PlacedFactor::weight).sum()
    }
}

impl<'a> IntoIterator for &'a Pan {
    type Item = &'a PlacedFactor;
    type IntoIter = std::slice::Iter<'a, PlacedFactor>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
