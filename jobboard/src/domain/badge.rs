//! Badge tones shared by the enum label mappings.
//!
//! Views turn a [`BadgeTone`] into whatever colour scheme they use. Every
//! domain enum that renders as a badge ([`crate::domain::Role`],
//! [`crate::domain::JobType`], [`crate::domain::ApplicationStatus`]) exposes
//! a total `tone()` mapping onto this type.

use serde::{Deserialize, Serialize};

/// Semantic colour family for a status or category badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeTone {
    Green,
    Blue,
    Purple,
    Orange,
    Yellow,
    Red,
    Gray,
}

impl BadgeTone {
    /// Stable lowercase name, usable as a style hook.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Green => "green",
            Self::Blue => "blue",
            Self::Purple => "purple",
            Self::Orange => "orange",
            Self::Yellow => "yellow",
            Self::Red => "red",
            Self::Gray => "gray",
        }
    }
}

impl std::fmt::Display for BadgeTone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
