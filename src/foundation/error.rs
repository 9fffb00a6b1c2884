use std::{fmt, path::PathBuf};

use crate::{cards::Face, select::Role};

/// Result alias used across the crate.
pub type TreasureResult<T> = Result<T, TreasureError>;

/// One requested item that could not be resolved to a file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MissingFace {
    /// Requested item number as entered.
    pub item: u32,
    /// Face that was required first.
    pub face: Face,
    /// Layout slot the item was requested for.
    pub role: Role,
}

impl fmt::Display for MissingFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: item {} ({})",
            self.role,
            self.item,
            self.face.name().to_ascii_lowercase()
        )
    }
}

fn join_missing(missing: &[MissingFace]) -> String {
    missing
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Every failure the library reports.
#[derive(thiserror::Error, Debug)]
pub enum TreasureError {
    /// The deck is too small for a random draw.
    #[error(
        "not enough cards: need at least 4 backs and 1 front, found {backs} backs and {fronts} fronts"
    )]
    InsufficientCards {
        /// Backs found in the folder.
        backs: usize,
        /// Fronts found in the folder.
        fronts: usize,
    },

    /// Requested items with no file for either face.
    #[error("missing cards: {}", join_missing(.0))]
    MissingCard(Vec<MissingFace>),

    /// A card file could not be opened or decoded.
    #[error("failed to load image '{}'", .path.display())]
    ImageLoad {
        /// File that failed.
        path: PathBuf,
        /// Decoder or I/O error.
        #[source]
        source: image::ImageError,
    },

    /// User-supplied values that cannot be used.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Internal rasterization failure.
    #[error("render error: {0}")]
    Render(String),

    /// Filesystem plumbing failures, as from [`save_png`](crate::save_png), and
    /// caller errors built on `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TreasureError {
    /// Build a [`TreasureError::InvalidInput`].
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Build a [`TreasureError::Render`].
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`TreasureError::ImageLoad`] for `path`.
    pub fn image_load(path: impl Into<PathBuf>, source: image::ImageError) -> Self {
        Self::ImageLoad {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
