//! Decoded RGBA8 rasters and fitting them onto a shared canvas.

/// Straight-alpha RGBA8 pixel buffer.
pub mod buffer;
/// Image decoding and aspect-preserving letterboxing.
pub mod fit;
