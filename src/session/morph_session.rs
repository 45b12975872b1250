use std::time::Instant;

use crate::animation::controller::{AnimationController, Phase, RunSummary, TickOutcome, TickToken};
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::config::MorphConfig;
use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{PixmorphError, PixmorphResult};
use crate::raster::buffer::Raster;
use crate::render::backend::FrameRGBA;
use crate::render::cpu::CpuSurface;
use crate::worker::pairing::{JobId, PairingEvent, PairingRequest, PairingWorker};

/// One morph from submission to finished frames.
///
/// The session keeps sampling and pairing on a [`PairingWorker`] and everything that touches the
/// surface on the calling thread:
///
/// 1. [`MorphSession::submit`] two equally sized rasters
/// 2. [`MorphSession::poll`] or [`MorphSession::wait_paired`] until the field is installed
/// 3. [`MorphSession::run`] to tick the sweep to completion, streaming frames into a [`FrameSink`]
/// 4. optionally [`MorphSession::replay`], or [`MorphSession::reset`] and submit new rasters
#[derive(Debug)]
pub struct MorphSession {
    cfg: MorphConfig,
    worker: PairingWorker,
    controller: AnimationController,
    job: Option<JobId>,
    canvas: Canvas,
}

impl MorphSession {
    /// Validate `cfg`, spawn the pairing worker, and create an idle controller.
    pub fn new(cfg: MorphConfig) -> PixmorphResult<Self> {
        let controller = AnimationController::new(cfg.clone())?;
        let worker = PairingWorker::spawn()?;
        Ok(Self {
            cfg,
            worker,
            controller,
            job: None,
            canvas: Canvas::new(0, 0),
        })
    }

    /// Configuration in use.
    pub fn config(&self) -> &MorphConfig {
        &self.cfg
    }

    /// Borrow the controller.
    pub fn controller(&self) -> &AnimationController {
        &self.controller
    }

    /// Mutably borrow the controller, e.g. to register a completion callback.
    pub fn controller_mut(&mut self) -> &mut AnimationController {
        &mut self.controller
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.controller.phase()
    }

    /// Current contents of the surface.
    pub fn snapshot(&self) -> Option<FrameRGBA> {
        self.controller.surface().map(CpuSurface::snapshot)
    }

    /// Hand both rasters to the worker. Any previous run is reset first.
    pub fn submit(&mut self, source: Raster, target: Raster) -> PixmorphResult<JobId> {
        if self.controller.phase() != Phase::Idle {
            self.reset();
        }
        self.canvas = target.canvas();
        self.controller.begin_sampling()?;
        let job = self.worker.submit(PairingRequest {
            source,
            target,
            config: self.cfg.clone(),
        })?;
        tracing::debug!(job = job.0, "submitted pairing job");
        self.job = Some(job);
        Ok(job)
    }

    /// Apply every worker event that is ready without blocking.
    ///
    /// A failed job is reported here exactly once; the controller stays where it was.
    pub fn poll(&mut self) -> PixmorphResult<Phase> {
        while let Some(ev) = self.worker.try_recv()? {
            self.handle_event(ev)?;
        }
        Ok(self.controller.phase())
    }

    /// Block until the submitted job is paired and installed; returns the particle count.
    pub fn wait_paired(&mut self) -> PixmorphResult<usize> {
        while self.job.is_some() {
            let ev = self.worker.recv()?;
            self.handle_event(ev)?;
        }
        self.controller
            .field()
            .map(|f| f.len())
            .ok_or_else(|| PixmorphError::validation("no pairing job was submitted"))
    }

    /// Run the sweep to completion.
    ///
    /// With `pacing`, ticks are spaced at the given frame rate; otherwise they run back to back.
    pub fn run(
        &mut self,
        sink: &mut dyn FrameSink,
        pacing: Option<Fps>,
    ) -> PixmorphResult<RunSummary> {
        let first = self.controller.start()?;
        self.drive(first, sink, pacing)
    }

    /// Replay a finished run with the same pairing.
    pub fn replay(
        &mut self,
        sink: &mut dyn FrameSink,
        pacing: Option<Fps>,
    ) -> PixmorphResult<RunSummary> {
        let first = self.controller.replay()?;
        self.drive(first, sink, pacing)
    }

    /// Back to idle. Late worker replies for the abandoned job are ignored.
    pub fn reset(&mut self) {
        self.job = None;
        self.controller.reset();
    }

    fn handle_event(&mut self, ev: PairingEvent) -> PixmorphResult<()> {
        if self.job != Some(ev.job()) {
            tracing::warn!(job = ev.job().0, "dropping reply for abandoned job");
            return Ok(());
        }
        match ev {
            PairingEvent::Sampled {
                source_count,
                target_count,
                ..
            } => {
                tracing::debug!(source_count, target_count, "sampling finished");
                self.controller.begin_pairing()
            }
            PairingEvent::Paired { field, .. } => {
                self.job = None;
                self.ensure_surface()?;
                self.controller.install(field)
            }
            PairingEvent::Failed { error, .. } => {
                self.job = None;
                tracing::warn!(%error, "pairing failed");
                Err(error)
            }
        }
    }

    fn ensure_surface(&mut self) -> PixmorphResult<()> {
        if self.canvas.is_empty() {
            return Ok(());
        }
        let matches = self
            .controller
            .surface()
            .is_some_and(|s| s.canvas() == self.canvas);
        if !matches {
            self.controller.attach_surface(CpuSurface::new(self.canvas)?);
        }
        Ok(())
    }

    fn drive(
        &mut self,
        first: Option<TickToken>,
        sink: &mut dyn FrameSink,
        pacing: Option<Fps>,
    ) -> PixmorphResult<RunSummary> {
        sink.begin(SinkConfig {
            canvas: self.canvas,
            run: self.controller.run(),
        })?;

        let interval = pacing.map(Fps::tick_interval);
        let mut deadline = Instant::now();
        let mut next = first;

        while let Some(token) = next {
            if let Some(interval) = interval {
                deadline += interval;
                let now = Instant::now();
                if deadline > now {
                    std::thread::sleep(deadline - now);
                }
            }

            match self.controller.tick(token) {
                TickOutcome::Continue { next: n, .. } => {
                    self.push_current(sink)?;
                    next = Some(n);
                }
                TickOutcome::Completed(summary) => {
                    self.push_current(sink)?;
                    sink.end()?;
                    return Ok(summary);
                }
                TickOutcome::SurfaceUnavailable => {
                    return Err(PixmorphError::render("no surface attached to the session"));
                }
                TickOutcome::Stale => {
                    return Err(PixmorphError::validation("tick was cancelled mid-run"));
                }
            }
        }

        sink.end()?;
        self.controller
            .last_summary()
            .ok_or_else(|| PixmorphError::validation("run ended without completing"))
    }

    fn push_current(&self, sink: &mut dyn FrameSink) -> PixmorphResult<()> {
        if let Some(surface) = self.controller.surface() {
            sink.push_frame(self.controller.ticks(), &surface.snapshot())?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/morph_session.rs"]
mod tests;
