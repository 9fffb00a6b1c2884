//! Endless Treasure turns a folder of numbered card scans into a single
//! "treasure" image.
//!
//! - Scan a folder into a [`Deck`] (random draws) and a [`CardIndex`] (browsing)
//! - Choose five cards with [`pick_random`] or [`resolve_items`]
//! - Render them with a [`Compositor`] into one RGBA canvas
//!
//! [`TreasureSession`] ties these together for interactive front ends.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod foundation;

/// Card numbers, faces, items and folder scanning.
pub mod cards;
/// Layout geometry and compositing.
pub mod render;
/// Selection policies.
pub mod select;
/// Controller context.
pub mod session;
/// Display fitting and resize debouncing.
pub mod view;

pub use crate::foundation::core::{PxPoint, PxRect, PxSize, Rgba8};
pub use crate::foundation::error::{MissingFace, TreasureError, TreasureResult};

pub use crate::assets::{decode::load_card, encode::save_png};
pub use crate::cards::{
    CardFile, CardIndex, Deck, DeckSummary, Face, FolderScan, scan_deck, scan_folder, scan_index,
};
pub use crate::render::{
    CardLabel, ComposeOpts, Compositor, LayoutPlan, LayoutSpec, compose, compose_with,
};
pub use crate::select::{
    ItemRequest, Role, Selection, parse_item_entry, parse_item_list, pick_random, resolve_items,
};
pub use crate::session::{DrawOpts, Rendered, TreasureSession};
pub use crate::view::{ResizeDebouncer, fit_for_display, fit_size};
