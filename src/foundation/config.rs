use crate::animation::ease::Ease;
use crate::foundation::error::{PixmorphError, PixmorphResult};

/// How the sampler picks one color for a grid cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorMode {
    /// Pixel at the cell origin (top-left).
    #[default]
    Origin,
    /// Mean over every pixel of the (clamped) cell.
    Average,
}

/// Tunables for sampling, pairing, and the sweep animation.
///
/// All timeline quantities (`scan_speed`, `ease_duration`, `transition_window`, `flash_window`,
/// `tail_margin`) are measured in scan units, i.e. pixels along the `x + y` diagonal.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MorphConfig {
    /// Edge length of a sampling cell in pixels.
    pub cell_size: u32,
    /// Scan progress added per tick.
    pub scan_speed: f64,
    /// Span over which the easing curve goes from 0 to 1.
    pub ease_duration: f64,
    /// Easing curve for the source-to-target flight.
    pub ease: Ease,
    /// Span after a particle is reached during which it is drawn in flight.
    pub transition_window: f64,
    /// Leading part of the transition window drawn with a highlight flash.
    pub flash_window: f64,
    /// Upper bound on the per-particle jitter vector length.
    pub drift: f64,
    /// Amplitude of the per-frame perturbation at mid-transition.
    pub chaos: f64,
    /// Extra scan distance past `width + height` before the run is declared done.
    pub tail_margin: f64,
    /// Cells whose alpha is below this value are skipped.
    pub alpha_threshold: u8,
    /// Cell color extraction mode.
    pub color_mode: ColorMode,
    /// Frame clear color (straight RGBA8).
    pub background: [u8; 4],
    /// Flash highlight color (straight RGBA8).
    pub highlight: [u8; 4],
    /// Seed for jitter and per-frame chaos.
    pub seed: u64,
}

impl Default for MorphConfig {
    fn default() -> Self {
        Self {
            cell_size: 4,
            scan_speed: 8.0,
            ease_duration: 60.0,
            ease: Ease::OutCubic,
            transition_window: 100.0,
            flash_window: 12.0,
            drift: 24.0,
            chaos: 4.0,
            tail_margin: 120.0,
            alpha_threshold: 128,
            color_mode: ColorMode::Origin,
            background: [10, 10, 14, 255],
            highlight: [255, 255, 240, 220],
            seed: 0x5EED_CAFE,
        }
    }
}

impl MorphConfig {
    /// Check that every field is usable by the sampler, matcher, and renderer.
    pub fn validate(&self) -> PixmorphResult<()> {
        if self.cell_size == 0 {
            return Err(PixmorphError::validation("cell_size must be > 0"));
        }
        positive("scan_speed", self.scan_speed)?;
        positive("ease_duration", self.ease_duration)?;
        positive("transition_window", self.transition_window)?;
        non_negative("drift", self.drift)?;
        non_negative("chaos", self.chaos)?;
        non_negative("flash_window", self.flash_window)?;
        if self.flash_window > self.transition_window {
            return Err(PixmorphError::validation(
                "flash_window must not exceed transition_window",
            ));
        }
        if !self.tail_margin.is_finite() || self.tail_margin < self.transition_window {
            return Err(PixmorphError::validation(
                "tail_margin must be finite and >= transition_window",
            ));
        }
        Ok(())
    }

    /// Parse a (possibly partial) JSON configuration; missing fields take defaults.
    pub fn from_json(text: &str) -> PixmorphResult<Self> {
        let cfg: Self = serde_json::from_str(text)
            .map_err(|e| PixmorphError::validation(format!("parse config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }
}

fn positive(name: &str, v: f64) -> PixmorphResult<()> {
    if !v.is_finite() || v <= 0.0 {
        return Err(PixmorphError::validation(format!(
            "{name} must be finite and > 0"
        )));
    }
    Ok(())
}

fn non_negative(name: &str, v: f64) -> PixmorphResult<()> {
    if !v.is_finite() || v < 0.0 {
        return Err(PixmorphError::validation(format!(
            "{name} must be finite and >= 0"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/config.rs"]
mod tests;
