//! Turning rasters into particles and pairing them by brightness rank.

/// Rank pairing and sweep ordering.
pub mod matcher;
/// Particle and particle-field types.
pub mod model;
/// Grid sampling of rasters into particles.
pub mod sampler;
