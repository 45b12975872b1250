//! End-to-end morph orchestration.

/// Worker, controller, and surface wired together.
pub mod morph_session;
