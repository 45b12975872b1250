use crate::foundation::core::{Canvas, Point, Rgb8, Vec2};

/// One sampled grid cell, before pairing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    /// Cell origin x in pixels.
    pub x: u32,
    /// Cell origin y in pixels.
    pub y: u32,
    /// Representative cell color.
    pub color: Rgb8,
    /// Luma of `color`, the pairing key.
    pub luminance: f64,
}

impl Particle {
    /// Build a particle at `(x, y)`, deriving its luminance from `color`.
    pub fn new(x: u32, y: u32, color: Rgb8) -> Self {
        Self {
            x,
            y,
            color,
            luminance: color.luminance(),
        }
    }

    /// Cell origin as a point.
    pub fn origin(&self) -> Point {
        Point::new(f64::from(self.x), f64::from(self.y))
    }
}

/// A source cell bound to the target cell it travels to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PairedParticle {
    /// Start position (source cell origin).
    pub source: Point,
    /// End position (target cell origin).
    pub target: Point,
    /// Source cell color, drawn unchanged for the whole run.
    pub color: Rgb8,
    /// Diagonal rank of the target position (`tx + ty`).
    pub scan_key: f64,
    /// Drift offset drawn once at pairing time; fades out while settling.
    pub jitter: Vec2,
}

/// The immutable, sweep-ordered result of pairing two rasters.
#[derive(Clone, Debug, PartialEq)]
pub struct ParticleField {
    canvas: Canvas,
    cell_size: u32,
    particles: Vec<PairedParticle>,
}

impl ParticleField {
    pub(crate) fn new(canvas: Canvas, cell_size: u32, particles: Vec<PairedParticle>) -> Self {
        Self {
            canvas,
            cell_size,
            particles,
        }
    }

    /// Shared pixel space of both rasters.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Cell edge length the field was sampled with.
    pub fn cell_size(&self) -> u32 {
        self.cell_size
    }

    /// Particles in ascending scan-key order.
    pub fn particles(&self) -> &[PairedParticle] {
        &self.particles
    }

    /// Number of paired particles.
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Return `true` when nothing was paired.
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Scan bound the sweep has to cross (`width + height`).
    pub fn max_scan(&self) -> f64 {
        self.canvas.max_scan()
    }
}
