//! Off-thread sampling and pairing.
//!
//! The worker owns nothing shared with the render side: each [`PairingRequest`] moves both rasters
//! and the configuration into the worker thread, and results come back as [`PairingEvent`]
//! messages. A successful request yields [`PairingEvent::Sampled`] then [`PairingEvent::Paired`];
//! a failed one yields a single [`PairingEvent::Failed`].

use std::sync::mpsc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::foundation::config::MorphConfig;
use crate::foundation::error::{PixmorphError, PixmorphResult};
use crate::particles::matcher::{pair_samples, sample_pair};
use crate::particles::model::ParticleField;
use crate::raster::buffer::Raster;

/// Identifier assigned to a submitted request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JobId(pub u64);

/// Everything the worker needs, passed by value.
#[derive(Debug)]
pub struct PairingRequest {
    /// Raster whose pixels are moved.
    pub source: Raster,
    /// Raster whose layout is rebuilt.
    pub target: Raster,
    /// Sampling/pairing configuration.
    pub config: MorphConfig,
}

/// Messages sent from the worker back to its owner.
#[derive(Debug)]
pub enum PairingEvent {
    /// Both rasters were sampled; pairing is under way.
    Sampled {
        /// Job the event belongs to.
        job: JobId,
        /// Visible source cells.
        source_count: usize,
        /// Visible target cells.
        target_count: usize,
    },
    /// Pairing finished.
    Paired {
        /// Job the event belongs to.
        job: JobId,
        /// Sweep-ordered result.
        field: ParticleField,
    },
    /// Sampling or pairing failed; no field will follow for this job.
    Failed {
        /// Job the event belongs to.
        job: JobId,
        /// Why sampling or pairing was rejected.
        error: PixmorphError,
    },
}

impl PairingEvent {
    /// Job the event belongs to.
    pub fn job(&self) -> JobId {
        match self {
            Self::Sampled { job, .. } | Self::Paired { job, .. } | Self::Failed { job, .. } => {
                *job
            }
        }
    }
}

enum InMsg {
    Job(JobId, Box<PairingRequest>),
    Shutdown,
}

/// Dedicated thread that samples and pairs rasters.
pub struct PairingWorker {
    sender: mpsc::Sender<InMsg>,
    events: mpsc::Receiver<PairingEvent>,
    handle: Option<JoinHandle<()>>,
    next_job: u64,
}

impl std::fmt::Debug for PairingWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PairingWorker")
            .field("next_job", &self.next_job)
            .finish_non_exhaustive()
    }
}

impl PairingWorker {
    /// Spawn the worker thread.
    pub fn spawn() -> PixmorphResult<Self> {
        let (tx, rx) = mpsc::channel::<InMsg>();
        let (ev_tx, ev_rx) = mpsc::channel::<PairingEvent>();

        let handle = thread::Builder::new()
            .name("pixmorph-pairing".into())
            .spawn(move || worker_loop(rx, ev_tx))
            .map_err(|e| PixmorphError::computation(format!("spawn pairing worker: {e}")))?;

        Ok(Self {
            sender: tx,
            events: ev_rx,
            handle: Some(handle),
            next_job: 1,
        })
    }

    /// Queue a request; jobs are processed in submission order.
    pub fn submit(&mut self, req: PairingRequest) -> PixmorphResult<JobId> {
        let job = JobId(self.next_job);
        self.next_job += 1;
        self.sender
            .send(InMsg::Job(job, Box::new(req)))
            .map_err(|_| PixmorphError::computation("pairing worker is gone"))?;
        Ok(job)
    }

    /// Next event if one is ready.
    pub fn try_recv(&self) -> PixmorphResult<Option<PairingEvent>> {
        match self.events.try_recv() {
            Ok(ev) => Ok(Some(ev)),
            Err(mpsc::TryRecvError::Empty) => Ok(None),
            Err(mpsc::TryRecvError::Disconnected) => {
                Err(PixmorphError::computation("pairing worker exited"))
            }
        }
    }

    /// Block until the next event.
    pub fn recv(&self) -> PixmorphResult<PairingEvent> {
        self.events
            .recv()
            .map_err(|_| PixmorphError::computation("pairing worker exited"))
    }

    /// Block for at most `timeout` waiting for the next event.
    pub fn recv_timeout(&self, timeout: Duration) -> PixmorphResult<Option<PairingEvent>> {
        match self.events.recv_timeout(timeout) {
            Ok(ev) => Ok(Some(ev)),
            Err(mpsc::RecvTimeoutError::Timeout) => Ok(None),
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                Err(PixmorphError::computation("pairing worker exited"))
            }
        }
    }

    /// Stop the worker and wait for it to exit.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        let _ = self.sender.send(InMsg::Shutdown);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for PairingWorker {
    fn drop(&mut self) {
        self.stop();
    }
}

fn worker_loop(rx: mpsc::Receiver<InMsg>, events: mpsc::Sender<PairingEvent>) {
    while let Ok(msg) = rx.recv() {
        let (job, req) = match msg {
            InMsg::Job(job, req) => (job, req),
            InMsg::Shutdown => break,
        };
        if !run_job(job, *req, &events) {
            // Owner hung up.
            break;
        }
    }
}

#[tracing::instrument(skip_all, fields(job = job.0))]
fn run_job(job: JobId, req: PairingRequest, events: &mpsc::Sender<PairingEvent>) -> bool {
    let PairingRequest {
        source,
        target,
        config,
    } = req;

    let (src, dst) = match sample_pair(&source, &target, &config) {
        Ok(samples) => samples,
        Err(e) => {
            tracing::warn!(error = %e, "sampling failed");
            return events.send(PairingEvent::Failed { job, error: e }).is_ok();
        }
    };

    let sampled = PairingEvent::Sampled {
        job,
        source_count: src.len(),
        target_count: dst.len(),
    };
    if events.send(sampled).is_err() {
        return false;
    }

    let field = pair_samples(&source, src, dst, &config);
    events.send(PairingEvent::Paired { job, field }).is_ok()
}

#[cfg(test)]
#[path = "../../tests/unit/worker/pairing.rs"]
mod tests;
