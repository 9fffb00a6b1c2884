//! Shared pixel geometry, colors and the crate error type.

/// Integer pixel geometry and colors.
pub mod core;
/// Error taxonomy.
pub mod error;
