//! Per-particle timing rules for the diagonal sweep.
//!
//! A particle's scan key is the diagonal rank of its *target* cell. As the global scan progress
//! passes that key the particle leaves its source cell, flies for `transition_window` scan units,
//! and then rests on its target cell.

use std::f64::consts::PI;

use crate::animation::ease::Ease;
use crate::foundation::config::MorphConfig;
use crate::foundation::core::{Point, Vec2};
use crate::particles::model::PairedParticle;

/// Timing subset of [`MorphConfig`] used by the motion rules.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionParams {
    /// Span over which `ease` goes from 0 to 1.
    pub ease_duration: f64,
    /// Easing curve.
    pub ease: Ease,
    /// Flight duration in scan units.
    pub transition_window: f64,
    /// Leading flash span in scan units.
    pub flash_window: f64,
    /// Mid-flight perturbation amplitude.
    pub chaos: f64,
}

impl From<&MorphConfig> for MotionParams {
    fn from(cfg: &MorphConfig) -> Self {
        Self {
            ease_duration: cfg.ease_duration,
            ease: cfg.ease,
            transition_window: cfg.transition_window,
            flash_window: cfg.flash_window,
            chaos: cfg.chaos,
        }
    }
}

/// Where a particle is in its lifecycle for a given scan progress.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CellState {
    /// The sweep has not reached the particle; it sits on its source cell.
    Pending,
    /// In flight between source and target.
    Transitioning {
        /// Scan units elapsed since the particle was reached.
        dist: f64,
        /// Eased flight progress in `[0, 1]`.
        ease: f64,
        /// Whether the particle is still inside the flash span.
        flash: bool,
    },
    /// Resting on its target cell.
    Settled,
}

/// Classify a particle with scan key `scan_key` at global scan `progress`.
pub fn cell_state(progress: f64, scan_key: f64, params: &MotionParams) -> CellState {
    let dist = progress - scan_key;
    if dist < 0.0 {
        return CellState::Pending;
    }
    if dist >= params.transition_window {
        return CellState::Settled;
    }
    let t = (dist / params.ease_duration).min(1.0);
    CellState::Transitioning {
        dist,
        ease: params.ease.apply(t),
        flash: dist < params.flash_window,
    }
}

/// Sine envelope that is zero at both ends of the flight and peaks halfway through it.
pub fn chaos_envelope(dist: f64, transition_window: f64) -> f64 {
    let t = (dist / transition_window).clamp(0.0, 1.0);
    (PI * t).sin()
}

/// In-flight draw position.
///
/// `noise` is a per-frame random offset in `[-0.5, 0.5)` per axis; it is scaled by the chaos
/// envelope so it vanishes at both ends of the flight. The pairing-time jitter fades as `ease`
/// approaches 1.
pub fn flight_position(
    p: &PairedParticle,
    dist: f64,
    ease: f64,
    noise: Vec2,
    params: &MotionParams,
) -> Point {
    let base = p.source.lerp(p.target, ease);
    let drift = p.jitter * (1.0 - ease);
    let chaos = noise * (params.chaos * chaos_envelope(dist, params.transition_window));
    base + drift + chaos
}

#[cfg(test)]
#[path = "../../tests/unit/animation/motion.rs"]
mod tests;
