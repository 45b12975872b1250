use crate::animation::motion::{CellState, MotionParams, cell_state, flight_position};
use crate::foundation::config::MorphConfig;
use crate::foundation::core::{Point, Vec2};
use crate::foundation::random::{RandomSource, Rng64};
use crate::particles::model::ParticleField;

/// Whether a cell op paints the particle itself or its flash highlight.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellKind {
    /// The particle in its own color.
    Body,
    /// Oversized highlight drawn beneath a particle that was just reached.
    Flash,
}

/// One axis-aligned square to fill.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellOp {
    /// Top-left corner in canvas pixels.
    pub origin: Point,
    /// Edge length in pixels.
    pub size: f64,
    /// Straight RGBA8 fill color.
    pub rgba: [u8; 4],
    /// What the op draws.
    pub kind: CellKind,
}

/// Everything needed to paint one frame: a full clear followed by cell fills in order.
#[derive(Clone, Debug, PartialEq)]
pub struct FramePlan {
    /// Clear color (straight RGBA8).
    pub clear: [u8; 4],
    /// Fills in paint order.
    pub ops: Vec<CellOp>,
}

/// Turns a [`ParticleField`] and a scan progress into a [`FramePlan`].
pub struct FrameRenderer {
    params: MotionParams,
    tail_margin: f64,
    background: [u8; 4],
    highlight: [u8; 4],
    rng: Box<dyn RandomSource>,
}

impl std::fmt::Debug for FrameRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameRenderer")
            .field("params", &self.params)
            .field("tail_margin", &self.tail_margin)
            .finish_non_exhaustive()
    }
}

impl FrameRenderer {
    /// Renderer seeded from `cfg.seed`.
    pub fn new(cfg: &MorphConfig) -> Self {
        Self::with_random(cfg, Box::new(Rng64::with_stream(cfg.seed, 1)))
    }

    /// Renderer drawing its per-frame chaos from `rng`.
    pub fn with_random(cfg: &MorphConfig, rng: Box<dyn RandomSource>) -> Self {
        Self {
            params: MotionParams::from(cfg),
            tail_margin: cfg.tail_margin,
            background: cfg.background,
            highlight: cfg.highlight,
            rng,
        }
    }

    /// Build the frame for `progress`.
    ///
    /// Pending particles sit on their source cell and settled ones on their target cell, both in
    /// the particle's own color. Only in-flight particles consume randomness.
    pub fn plan_frame(&mut self, field: &ParticleField, progress: f64) -> FramePlan {
        let size = f64::from(field.cell_size());
        let mut ops = Vec::with_capacity(field.len() + field.len() / 8);

        for p in field.particles() {
            let rgba = p.color.to_rgba();
            match cell_state(progress, p.scan_key, &self.params) {
                CellState::Pending => ops.push(body(p.source, size, rgba)),
                CellState::Settled => ops.push(body(p.target, size, rgba)),
                CellState::Transitioning { dist, ease, flash } => {
                    let noise = Vec2::new(self.rng.next_centered(), self.rng.next_centered());
                    let pos = flight_position(p, dist, ease, noise, &self.params);
                    if flash {
                        ops.push(CellOp {
                            origin: pos - Vec2::new(1.0, 1.0),
                            size: size + 2.0,
                            rgba: self.highlight,
                            kind: CellKind::Flash,
                        });
                    }
                    ops.push(body(pos, size, rgba));
                }
            }
        }

        FramePlan {
            clear: self.background,
            ops,
        }
    }

    /// `true` once the sweep is `tail_margin` past the far corner.
    pub fn is_complete(&self, progress: f64, max_scan: f64) -> bool {
        progress > max_scan + self.tail_margin
    }
}

fn body(origin: Point, size: f64, rgba: [u8; 4]) -> CellOp {
    CellOp {
        origin,
        size,
        rgba,
        kind: CellKind::Body,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/frame.rs"]
mod tests;
