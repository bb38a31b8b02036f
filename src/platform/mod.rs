//! Platform abstraction layer
//!
//! The simulation never touches the browser directly. On wasm32 this module
//! provides the glue:
//! - Keyboard subscription with default-prevention for navigation keys
//! - Interval pump driving the session clock
//! - `WebCabinet`, the object exported to JavaScript

#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::{IntervalPump, KeyboardSubscription, WebCabinet};

/// How often the browser pump advances the clock
pub const PUMP_INTERVAL_MS: i32 = 8;
