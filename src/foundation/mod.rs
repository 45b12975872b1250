//! Shared primitives: geometry and color types, configuration, errors, and seeded randomness.

/// Configuration schema and validation.
pub mod config;
/// Canvas, color, and frame-rate primitives.
pub mod core;
/// Crate error type.
pub mod error;
/// Deterministic random sources.
pub mod random;
