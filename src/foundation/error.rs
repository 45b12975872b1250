/// Convenience result type used across pixmorph.
pub type PixmorphResult<T> = Result<T, PixmorphError>;

/// Top-level error taxonomy used by engine APIs.
///
/// A missing render surface is not an error: ticks without a surface no-op and are reported
/// through [`crate::TickOutcome::SurfaceUnavailable`] instead.
#[derive(thiserror::Error, Debug)]
pub enum PixmorphError {
    /// Unreadable or non-image input, raised before the core is invoked.
    #[error("input error: {0}")]
    Input(String),

    /// Invalid configuration, raster shape, or controller state transition.
    #[error("validation error: {0}")]
    Validation(String),

    /// Sampling or pairing failed; the pairing request is rejected as a whole.
    #[error("computation error: {0}")]
    Computation(String),

    /// A raster surface could not be created or read back.
    #[error("render error: {0}")]
    Render(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PixmorphError {
    /// Build a [`PixmorphError::Input`] value.
    pub fn input(msg: impl Into<String>) -> Self {
        Self::Input(msg.into())
    }

    /// Build a [`PixmorphError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`PixmorphError::Computation`] value.
    pub fn computation(msg: impl Into<String>) -> Self {
        Self::Computation(msg.into())
    }

    /// Build a [`PixmorphError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
