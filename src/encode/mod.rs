//! Encoding sinks.
//!
//! Sinks consume rendered frames in tick order and are driven by `MorphSession::run`.

/// Generic frame sink trait and built-in sinks.
pub mod sink;
