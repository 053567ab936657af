//! Cache-key and cache-buster derivation.
//!
//! Pure string derivation, no I/O: the surrounding modules hand the derived
//! key to the orchestration runtime's cache-volume API.

pub mod keys;

pub use keys::{bust_at, buster_stamp_at, BusterLevel, CacheKey};
