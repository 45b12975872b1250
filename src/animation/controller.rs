use std::sync::Arc;

use crate::foundation::config::MorphConfig;
use crate::foundation::error::{PixmorphError, PixmorphResult};
use crate::particles::model::ParticleField;
use crate::render::cpu::CpuSurface;
use crate::render::frame::FrameRenderer;

/// Lifecycle of one morph.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Nothing loaded.
    Idle,
    /// Rasters are being sampled off-thread.
    Sampling,
    /// Samples are being paired off-thread, or a paired field is waiting for `start`.
    Pairing,
    /// The sweep is in progress (possibly stopped).
    Running,
    /// The sweep has fully crossed the canvas.
    Done,
}

/// Handle for the one tick the controller currently expects.
///
/// Tokens are invalidated by `stop`, `reset`, and by the tick that consumes them, so a callback
/// scheduled before any of those becomes a harmless no-op.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickToken {
    generation: u64,
    seq: u64,
}

/// Summary handed to the completion callback.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RunSummary {
    /// 1-based run number; replays count up.
    pub run: u64,
    /// Ticks executed in this run.
    pub ticks: u64,
    /// Paired particles animated.
    pub particles: usize,
    /// Scan progress at completion.
    pub final_progress: f64,
}

/// Result of delivering a tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TickOutcome {
    /// A frame was painted and another tick is scheduled.
    Continue {
        /// Scan progress after this tick.
        progress: f64,
        /// The next expected tick.
        next: TickToken,
    },
    /// A frame was painted and the run is complete.
    Completed(RunSummary),
    /// No surface is attached; nothing happened and the same token stays valid.
    SurfaceUnavailable,
    /// The token was cancelled or already consumed; nothing happened.
    Stale,
}

type CompletionCallback = Box<dyn FnMut(&RunSummary) + Send>;

/// Owns the sweep timeline and drives the [`FrameRenderer`] onto a [`CpuSurface`].
///
/// Ticks are delivered one at a time by the host; the controller never runs two concurrently
/// because every tick needs `&mut self`.
pub struct AnimationController {
    cfg: MorphConfig,
    renderer: FrameRenderer,
    phase: Phase,
    field: Option<Arc<ParticleField>>,
    surface: Option<CpuSurface>,
    progress: f64,
    running: bool,
    ticks: u64,
    run: u64,
    generation: u64,
    pending: Option<TickToken>,
    last_summary: Option<RunSummary>,
    on_complete: Option<CompletionCallback>,
}

impl std::fmt::Debug for AnimationController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationController")
            .field("phase", &self.phase)
            .field("progress", &self.progress)
            .field("running", &self.running)
            .field("ticks", &self.ticks)
            .field("run", &self.run)
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}

impl AnimationController {
    /// Create an idle controller.
    pub fn new(cfg: MorphConfig) -> PixmorphResult<Self> {
        let renderer = FrameRenderer::new(&cfg);
        Self::with_renderer(cfg, renderer)
    }

    /// Create an idle controller with a custom renderer (e.g. a fixed random source).
    pub fn with_renderer(cfg: MorphConfig, renderer: FrameRenderer) -> PixmorphResult<Self> {
        cfg.validate()?;
        Ok(Self {
            cfg,
            renderer,
            phase: Phase::Idle,
            field: None,
            surface: None,
            progress: 0.0,
            running: false,
            ticks: 0,
            run: 0,
            generation: 0,
            pending: None,
            last_summary: None,
            on_complete: None,
        })
    }

    /// Register the callback fired once each time a run reaches [`Phase::Done`].
    pub fn on_complete(&mut self, cb: impl FnMut(&RunSummary) + Send + 'static) {
        self.on_complete = Some(Box::new(cb));
    }

    /// Configuration in use.
    pub fn config(&self) -> &MorphConfig {
        &self.cfg
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Current scan progress.
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Whether ticks currently advance the timeline.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Ticks executed in the current run.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// 1-based number of the current or last run; zero before the first start.
    pub fn run(&self) -> u64 {
        self.run
    }

    /// The paired field, once installed.
    pub fn field(&self) -> Option<&Arc<ParticleField>> {
        self.field.as_ref()
    }

    /// Summary of the most recently completed run.
    pub fn last_summary(&self) -> Option<RunSummary> {
        self.last_summary
    }

    /// The tick the controller is waiting for, if any.
    pub fn next_tick(&self) -> Option<TickToken> {
        self.pending
    }

    /// Attach the surface frames are painted onto, returning the previous one.
    pub fn attach_surface(&mut self, surface: CpuSurface) -> Option<CpuSurface> {
        self.surface.replace(surface)
    }

    /// Detach the surface; subsequent ticks no-op until one is attached again.
    pub fn detach_surface(&mut self) -> Option<CpuSurface> {
        self.surface.take()
    }

    /// Borrow the attached surface.
    pub fn surface(&self) -> Option<&CpuSurface> {
        self.surface.as_ref()
    }

    /// `Idle -> Sampling`.
    pub fn begin_sampling(&mut self) -> PixmorphResult<()> {
        self.transition(Phase::Idle, Phase::Sampling)
    }

    /// `Sampling -> Pairing`.
    pub fn begin_pairing(&mut self) -> PixmorphResult<()> {
        self.transition(Phase::Sampling, Phase::Pairing)
    }

    /// Install a freshly paired field; the controller waits in [`Phase::Pairing`] for `start`.
    pub fn install(&mut self, field: ParticleField) -> PixmorphResult<()> {
        if matches!(self.phase, Phase::Running | Phase::Done) {
            return Err(PixmorphError::validation(format!(
                "cannot install a particle field while {:?}; reset first",
                self.phase
            )));
        }
        tracing::debug!(particles = field.len(), "installed particle field");
        self.field = Some(Arc::new(field));
        self.set_phase(Phase::Pairing);
        Ok(())
    }

    /// Begin the sweep, or resume it after [`AnimationController::stop`].
    ///
    /// Returns the first tick to deliver. An empty field completes immediately and returns `None`.
    pub fn start(&mut self) -> PixmorphResult<Option<TickToken>> {
        match self.phase {
            Phase::Running if self.running => Ok(self.pending),
            Phase::Running => {
                self.running = true;
                Ok(Some(self.schedule()))
            }
            Phase::Pairing => {
                let Some(field) = self.field.clone() else {
                    return Err(PixmorphError::validation(
                        "start requires a paired particle field",
                    ));
                };
                let max_scan = field.max_scan();
                if !max_scan.is_finite() || max_scan < 0.0 {
                    return Err(PixmorphError::validation("invalid maximum scan bound"));
                }
                self.begin_run();
                if field.is_empty() {
                    self.clear_surface();
                    self.complete();
                    return Ok(None);
                }
                Ok(Some(self.schedule()))
            }
            other => Err(PixmorphError::validation(format!(
                "cannot start while {other:?}"
            ))),
        }
    }

    /// Pause the sweep and cancel the pending tick. No-op unless running.
    pub fn stop(&mut self) {
        if self.phase == Phase::Running && self.running {
            self.running = false;
            self.cancel_pending();
            tracing::debug!(progress = self.progress, "stopped");
        }
    }

    /// `Done -> Running` with progress reset to zero and the same field reused.
    pub fn replay(&mut self) -> PixmorphResult<Option<TickToken>> {
        if self.phase != Phase::Done {
            return Err(PixmorphError::validation(format!(
                "replay requires a finished run, currently {:?}",
                self.phase
            )));
        }
        let empty = self.field.as_ref().is_none_or(|f| f.is_empty());
        self.begin_run();
        if empty {
            self.clear_surface();
            self.complete();
            return Ok(None);
        }
        Ok(Some(self.schedule()))
    }

    /// Return to [`Phase::Idle`] from anywhere: cancel the pending tick, drop the field, and blank
    /// the surface. The next run has to sample and pair again.
    pub fn reset(&mut self) {
        self.cancel_pending();
        self.field = None;
        self.progress = 0.0;
        self.running = false;
        self.ticks = 0;
        self.clear_surface();
        self.set_phase(Phase::Idle);
    }

    /// Deliver the tick identified by `token`.
    ///
    /// Advances the progress by `scan_speed`, paints one frame, and either schedules the next tick
    /// or completes the run.
    pub fn tick(&mut self, token: TickToken) -> TickOutcome {
        if self.pending != Some(token) || self.phase != Phase::Running || !self.running {
            tracing::warn!(?token, "ignoring stale tick");
            return TickOutcome::Stale;
        }
        let Some(field) = self.field.clone() else {
            return TickOutcome::Stale;
        };
        let Some(surface) = self.surface.as_mut() else {
            return TickOutcome::SurfaceUnavailable;
        };

        self.pending = None;
        self.progress += self.cfg.scan_speed;
        self.ticks += 1;

        let plan = self.renderer.plan_frame(&field, self.progress);
        surface.execute(&plan);

        if self.renderer.is_complete(self.progress, field.max_scan()) {
            let summary = self.complete();
            return TickOutcome::Completed(summary);
        }
        TickOutcome::Continue {
            progress: self.progress,
            next: self.schedule(),
        }
    }

    fn transition(&mut self, from: Phase, to: Phase) -> PixmorphResult<()> {
        if self.phase != from {
            return Err(PixmorphError::validation(format!(
                "cannot enter {to:?} from {:?}",
                self.phase
            )));
        }
        self.set_phase(to);
        Ok(())
    }

    fn set_phase(&mut self, phase: Phase) {
        if self.phase != phase {
            tracing::debug!(from = ?self.phase, to = ?phase, "phase transition");
            self.phase = phase;
        }
    }

    fn begin_run(&mut self) {
        self.cancel_pending();
        self.progress = 0.0;
        self.ticks = 0;
        self.run += 1;
        self.running = true;
        self.set_phase(Phase::Running);
    }

    fn schedule(&mut self) -> TickToken {
        let token = TickToken {
            generation: self.generation,
            seq: self.ticks,
        };
        self.pending = Some(token);
        token
    }

    fn clear_surface(&mut self) {
        if let Some(surface) = self.surface.as_mut() {
            surface.clear(self.cfg.background);
        }
    }

    fn cancel_pending(&mut self) {
        self.pending = None;
        self.generation += 1;
    }

    fn complete(&mut self) -> RunSummary {
        self.pending = None;
        self.running = false;
        self.set_phase(Phase::Done);
        let summary = RunSummary {
            run: self.run,
            ticks: self.ticks,
            particles: self.field.as_ref().map_or(0, |f| f.len()),
            final_progress: self.progress,
        };
        self.last_summary = Some(summary);
        tracing::info!(
            run = summary.run,
            ticks = summary.ticks,
            particles = summary.particles,
            "run complete"
        );
        if let Some(cb) = self.on_complete.as_mut() {
            cb(&summary);
        }
        summary
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/controller.rs"]
mod tests;
