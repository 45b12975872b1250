//! Pixmorph rebuilds one image out of the pixels of another.
//!
//! Both images are cut into square cells on a shared canvas. Each visible cell becomes a particle
//! carrying its color; particles are paired with the cells of the reference image by brightness
//! rank, and a diagonal sweep flies every particle from where it was to where its partner sits.
//!
//! # Pipeline overview
//!
//! 1. **Fit**: decode both images and letterbox them onto one [`Canvas`]
//! 2. **Sample + pair** (off-thread): `Raster x 2 -> ParticleField` on a [`PairingWorker`]
//! 3. **Tick**: the [`AnimationController`] advances the sweep and paints each frame onto a
//!    [`CpuSurface`]
//! 4. **Sink**: frames stream into any [`FrameSink`] (memory, PNG sequence)
//!
//! [`MorphSession`] wires these together. Everything is deterministic for a given
//! [`MorphConfig::seed`], and surfaces hold premultiplied RGBA8.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Sweep timing, easing, and the tick-driven lifecycle.
pub mod animation;
/// Frame sinks.
pub mod encode;
/// Cell sampling and rank pairing.
pub mod particles;
/// Decoded rasters and canvas fitting.
pub mod raster;
/// Frame planning and the CPU surface.
pub mod render;
/// Session-oriented morph API.
pub mod session;
/// Background sampling and pairing.
pub mod worker;

pub use crate::foundation::config::{ColorMode, MorphConfig};
pub use crate::foundation::core::{Canvas, Fps, Point, Rgb8, Vec2};
pub use crate::foundation::error::{PixmorphError, PixmorphResult};
pub use crate::foundation::random::{RandomSource, Rng64};

pub use crate::animation::controller::{
    AnimationController, Phase, RunSummary, TickOutcome, TickToken,
};
pub use crate::animation::ease::Ease;
pub use crate::encode::sink::{
    FrameSink, InMemorySink, NullSink, PngSequenceSink, SinkConfig, save_png,
};
pub use crate::particles::matcher::{build_field, pair_particles};
pub use crate::particles::model::{PairedParticle, Particle, ParticleField};
pub use crate::particles::sampler::{CellSampler, sample_raster};
pub use crate::raster::buffer::Raster;
pub use crate::raster::fit::{decode_image, fit_into, load_image};
pub use crate::render::backend::FrameRGBA;
pub use crate::render::cpu::CpuSurface;
pub use crate::render::frame::{CellKind, CellOp, FramePlan, FrameRenderer};
pub use crate::session::morph_session::MorphSession;
pub use crate::worker::pairing::{JobId, PairingEvent, PairingRequest, PairingWorker};
