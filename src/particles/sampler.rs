use crate::foundation::config::ColorMode;
use crate::foundation::core::Rgb8;
use crate::particles::model::Particle;
use crate::raster::buffer::Raster;

/// Lazy row-major walk over the cells of a [`Raster`].
///
/// Trailing cells that overhang the right or bottom edge are clamped to the raster bounds. A
/// raster smaller than one cell along either axis yields nothing.
#[derive(Debug)]
pub struct CellSampler<'a> {
    raster: &'a Raster,
    cell_size: u32,
    cols: u32,
    rows: u32,
    next: u64,
    alpha_threshold: u8,
    mode: ColorMode,
}

impl<'a> CellSampler<'a> {
    /// Start sampling `raster` with square cells of `cell_size` pixels.
    pub fn new(raster: &'a Raster, cell_size: u32, alpha_threshold: u8, mode: ColorMode) -> Self {
        let fits = cell_size > 0 && cell_size <= raster.width() && cell_size <= raster.height();
        let (cols, rows) = if fits {
            (
                raster.width().div_ceil(cell_size),
                raster.height().div_ceil(cell_size),
            )
        } else {
            (0, 0)
        };
        Self {
            raster,
            cell_size,
            cols,
            rows,
            next: 0,
            alpha_threshold,
            mode,
        }
    }

    /// Total number of grid cells visited (visible or not).
    pub fn cell_count(&self) -> u64 {
        u64::from(self.cols) * u64::from(self.rows)
    }

    fn sample_cell(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        match self.mode {
            ColorMode::Origin => self.raster.pixel(x, y),
            ColorMode::Average => {
                let x1 = x.saturating_add(self.cell_size).min(self.raster.width());
                let y1 = y.saturating_add(self.cell_size).min(self.raster.height());
                let mut sum = [0u64; 4];
                let mut n = 0u64;
                for py in y..y1 {
                    for px in x..x1 {
                        let p = self.raster.pixel(px, py)?;
                        for (acc, c) in sum.iter_mut().zip(p) {
                            *acc += u64::from(c);
                        }
                        n += 1;
                    }
                }
                if n == 0 {
                    return None;
                }
                let avg = |v: u64| ((v + n / 2) / n) as u8;
                Some([avg(sum[0]), avg(sum[1]), avg(sum[2]), avg(sum[3])])
            }
        }
    }
}

impl Iterator for CellSampler<'_> {
    type Item = Particle;

    fn next(&mut self) -> Option<Particle> {
        while self.next < self.cell_count() {
            let i = self.next;
            self.next += 1;
            let col = (i % u64::from(self.cols)) as u32;
            let row = (i / u64::from(self.cols)) as u32;
            let (x, y) = (col * self.cell_size, row * self.cell_size);
            let Some([r, g, b, a]) = self.sample_cell(x, y) else {
                continue;
            };
            if a < self.alpha_threshold {
                continue;
            }
            return Some(Particle::new(x, y, Rgb8::new(r, g, b)));
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.cell_count().saturating_sub(self.next);
        (0, usize::try_from(left).ok())
    }
}

/// Sample every visible cell of `raster` into a vector.
#[tracing::instrument(skip(raster), fields(w = raster.width(), h = raster.height()))]
pub fn sample_raster(
    raster: &Raster,
    cell_size: u32,
    alpha_threshold: u8,
    mode: ColorMode,
) -> Vec<Particle> {
    let out: Vec<Particle> = CellSampler::new(raster, cell_size, alpha_threshold, mode).collect();
    tracing::debug!(particles = out.len(), "sampled raster");
    out
}

#[cfg(test)]
#[path = "../../tests/unit/particles/sampler.rs"]
mod tests;
