use rayon::prelude::*;

use crate::foundation::config::MorphConfig;
use crate::foundation::core::Vec2;
use crate::foundation::error::{PixmorphError, PixmorphResult};
use crate::foundation::random::{RandomSource, Rng64};
use crate::particles::model::{PairedParticle, Particle, ParticleField};
use crate::particles::sampler::sample_raster;
use crate::raster::buffer::Raster;

/// Pair source and target particles by brightness rank.
///
/// Both sides are sorted by ascending luminance and zipped, so when the counts differ the
/// brightest excess particles of the longer side are dropped. The result is ordered by
/// ascending scan key (target `x + y`), which is the sweep's visitation order.
pub fn pair_particles(
    mut source: Vec<Particle>,
    mut target: Vec<Particle>,
    drift: f64,
    rng: &mut dyn RandomSource,
) -> Vec<PairedParticle> {
    source.par_sort_by(|a, b| a.luminance.total_cmp(&b.luminance));
    target.par_sort_by(|a, b| a.luminance.total_cmp(&b.luminance));

    // `zip` stops at the shorter side, dropping the brightest excess.
    let mut out: Vec<PairedParticle> = source
        .iter()
        .zip(target.iter())
        .map(|(s, t)| PairedParticle {
            source: s.origin(),
            target: t.origin(),
            color: s.color,
            scan_key: f64::from(t.x) + f64::from(t.y),
            jitter: Vec2::new(rng.next_centered() * drift, rng.next_centered() * drift),
        })
        .collect();

    out.par_sort_by(|a, b| a.scan_key.total_cmp(&b.scan_key));
    out
}

/// Sample both rasters and pair them into a sweep-ordered [`ParticleField`].
///
/// Both rasters must already share one canvas.
#[tracing::instrument(skip_all, fields(cell_size = cfg.cell_size))]
pub fn build_field(
    source: &Raster,
    target: &Raster,
    cfg: &MorphConfig,
) -> PixmorphResult<ParticleField> {
    let (src, dst) = sample_pair(source, target, cfg)?;
    Ok(pair_samples(source, src, dst, cfg))
}

pub(crate) fn sample_pair(
    source: &Raster,
    target: &Raster,
    cfg: &MorphConfig,
) -> PixmorphResult<(Vec<Particle>, Vec<Particle>)> {
    cfg.validate()
        .map_err(|e| PixmorphError::computation(format!("invalid pairing config: {e}")))?;
    if source.canvas() != target.canvas() {
        return Err(PixmorphError::computation(format!(
            "source {}x{} and target {}x{} rasters differ in size",
            source.width(),
            source.height(),
            target.width(),
            target.height()
        )));
    }

    let (src, dst) = rayon::join(
        || sample_raster(source, cfg.cell_size, cfg.alpha_threshold, cfg.color_mode),
        || sample_raster(target, cfg.cell_size, cfg.alpha_threshold, cfg.color_mode),
    );
    Ok((src, dst))
}

pub(crate) fn pair_samples(
    source: &Raster,
    src: Vec<Particle>,
    dst: Vec<Particle>,
    cfg: &MorphConfig,
) -> ParticleField {
    let (src_n, dst_n) = (src.len(), dst.len());
    let mut rng = Rng64::with_stream(cfg.seed, 0);
    let particles = pair_particles(src, dst, cfg.drift, &mut rng);
    tracing::debug!(
        source = src_n,
        target = dst_n,
        paired = particles.len(),
        "paired particles"
    );
    ParticleField::new(source.canvas(), cfg.cell_size, particles)
}

#[cfg(test)]
#[path = "../../tests/unit/particles/matcher.rs"]
mod tests;
