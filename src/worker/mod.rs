//! Background thread for sampling and pairing.

/// Pairing worker and its message types.
pub mod pairing;
