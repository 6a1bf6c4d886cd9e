#![forbid(unsafe_code)]

//! Discrete classification of the scale's imbalance.

use serde::Serialize;

use crate::pan::Side;

/// Difference magnitude beyond which the scale is in conflict.
///
/// Both comparisons are strict: a difference of exactly ±15 is balanced.
pub const IMBALANCE_THRESHOLD: i32 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Balanced,
    /// Forces outweigh relations: the relations are obsolete.
    RelationsLagging,
    /// Relations outweigh forces: the relations are mere formality.
    RelationsFormalistic,
}

impl Status {
    #[must_use]
    pub const fn classify(difference: i32) -> Self {
        if difference > IMBALANCE_THRESHOLD {
            Self::RelationsLagging
        } else if difference < -IMBALANCE_THRESHOLD {
            Self::RelationsFormalistic
        } else {
            Self::Balanced
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_balanced(self) -> bool {
        matches!(self, Self::Balanced)
    }

    /// The pan that is too heavy, if any.
    #[must_use]
    pub const fn overweight_side(self) -> Option<Side> {
        match self {
            Self::Balanced => None,
            Self::RelationsLagging => Some(Side::Left),
            Self::RelationsFormalistic => Some(Side::Right),
        }
    }

    /// Status badge text.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Balanced => "CÂN BẰNG TỐI ƯU",
            Self::RelationsLagging => "QHSX LẠC HẬU",
            Self::RelationsFormalistic => "QHSX HÌNH THỨC",
        }
    }
}
