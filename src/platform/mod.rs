//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Input events (mapped to commands on every target)
//! - Storage (LocalStorage on web)
//! - Canvas drawing and the DOM HUD (web only)

pub mod fps;
pub mod input;

#[cfg(target_arch = "wasm32")]
pub mod canvas;
#[cfg(target_arch = "wasm32")]
pub mod storage;
