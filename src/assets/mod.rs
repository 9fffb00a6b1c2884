//! Loading card images from disk and writing treasures back.

/// Decoding, size normalization and cropping.
pub mod decode;
/// PNG output.
pub mod encode;
