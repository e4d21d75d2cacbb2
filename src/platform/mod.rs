//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Wall-clock seeding
//! - The JavaScript-facing game handle (web only)

#[cfg(target_arch = "wasm32")]
pub mod web;

/// Seed derived from the current time
#[cfg(target_arch = "wasm32")]
pub fn time_seed() -> u64 {
    js_sys::Date::now() as u64
}

/// Seed derived from the current time
#[cfg(not(target_arch = "wasm32"))]
pub fn time_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}
