//! The diagonal sweep: easing, per-cell motion, and the tick-driven controller.

/// Lifecycle state machine and tick scheduling.
pub mod controller;
/// Easing curves.
pub mod ease;
/// Per-cell state and flight path.
pub mod motion;
