use std::path::PathBuf;

use anyhow::Context;

use crate::foundation::core::Canvas;
use crate::foundation::error::PixmorphResult;
use crate::render::backend::FrameRGBA;

/// Configuration provided to a [`FrameSink`] at the start of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkConfig {
    /// Frame size in pixels.
    pub canvas: Canvas,
    /// 1-based run number (replays count up).
    pub run: u64,
}

/// Sink contract for consuming rendered frames in tick order.
///
/// Ordering contract: `push_frame` is called with strictly increasing tick numbers, starting at 1,
/// between one `begin` and one `end`.
pub trait FrameSink {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> PixmorphResult<()>;
    /// Push the frame painted by tick `tick`.
    fn push_frame(&mut self, tick: u64, frame: &FrameRGBA) -> PixmorphResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> PixmorphResult<()>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(u64, FrameRGBA)>,
    ended: bool,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the sink configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Borrow the captured frames.
    pub fn frames(&self) -> &[(u64, FrameRGBA)] {
        &self.frames
    }

    /// Whether `end` was called after the last `begin`.
    pub fn is_ended(&self) -> bool {
        self.ended
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> PixmorphResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.ended = false;
        Ok(())
    }

    fn push_frame(&mut self, tick: u64, frame: &FrameRGBA) -> PixmorphResult<()> {
        self.frames.push((tick, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> PixmorphResult<()> {
        self.ended = true;
        Ok(())
    }
}

/// Sink that drops every frame.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl FrameSink for NullSink {
    fn begin(&mut self, _cfg: SinkConfig) -> PixmorphResult<()> {
        Ok(())
    }

    fn push_frame(&mut self, _tick: u64, _frame: &FrameRGBA) -> PixmorphResult<()> {
        Ok(())
    }

    fn end(&mut self) -> PixmorphResult<()> {
        Ok(())
    }
}

/// Writes every frame as `<dir>/<prefix>_r<run>_<tick>.png`.
#[derive(Debug, Clone)]
pub struct PngSequenceSink {
    dir: PathBuf,
    prefix: String,
    run: u64,
    written: u64,
}

impl PngSequenceSink {
    /// Write frames into `dir`, creating it on `begin`.
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.into(),
            run: 0,
            written: 0,
        }
    }

    /// Number of frames written so far.
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Path the frame for `tick` of the current run is written to.
    pub fn frame_path(&self, tick: u64) -> PathBuf {
        self.dir
            .join(format!("{}_r{}_{:05}.png", self.prefix, self.run, tick))
    }
}

impl FrameSink for PngSequenceSink {
    fn begin(&mut self, cfg: SinkConfig) -> PixmorphResult<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("create frame dir '{}'", self.dir.display()))?;
        self.run = cfg.run;
        Ok(())
    }

    fn push_frame(&mut self, tick: u64, frame: &FrameRGBA) -> PixmorphResult<()> {
        let path = self.frame_path(tick);
        save_png(&path, frame)?;
        self.written += 1;
        Ok(())
    }

    fn end(&mut self) -> PixmorphResult<()> {
        tracing::debug!(frames = self.written, dir = %self.dir.display(), "png sequence done");
        Ok(())
    }
}

/// Write `frame` as a straight-alpha PNG.
pub fn save_png(path: &std::path::Path, frame: &FrameRGBA) -> PixmorphResult<()> {
    let straight = frame.clone().into_straight();
    image::save_buffer_with_format(
        path,
        &straight.data,
        straight.width,
        straight.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
