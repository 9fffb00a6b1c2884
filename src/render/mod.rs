//! Treasure layout geometry and the CPU compositor.

/// Final canvas assembly.
pub mod compose;
/// Front card corner badge.
pub mod label;
/// Layout constants and resolved placements.
pub mod layout;
/// Blurred rounded-rectangle drop shadows.
pub mod shadow;
/// Premultiplied RGBA8 paint target.
pub mod surface;

pub use compose::{ComposeOpts, Compositor, compose, compose_with};
pub use label::{CardLabel, LabelRenderer};
pub use layout::{LabelStyle, LayoutPlan, LayoutSpec, ShadowStyle};
