//! Frame planning and the CPU raster surface.

/// Frame buffer type handed to sinks.
pub mod backend;
/// `vello_cpu` surface that executes frame plans.
pub mod cpu;
/// Per-frame draw plans.
pub mod frame;
