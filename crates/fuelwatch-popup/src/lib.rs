//! Floating statistics popup for the FuelWatch map
//!
//! This crate provides the interactive floating-window subsystem behind the
//! per-station statistics popups:
//! - On-demand resource fetching with per-popup caching
//! - Resource-lifetime management (object URLs released exactly once)
//! - Drag / eight-direction resize / maximize / minimize state machine
//! - Viewport-aware geometry (reactive clamping, content scale-to-fit)
//!
//! ## Architecture
//!
//! The crate is organized into focused modules:
//!
//! - [`math`]: Core geometry types (`Vec2`, `Size`, `Rect`, style constants)
//! - [`geometry`]: Pure drag/resize/clamp/fit computations
//! - [`window`]: Window geometry and display mode state
//! - [`gesture`]: Drag and resize session state machine
//! - [`cache`]: Fetch-key → resource-handle cache with explicit release
//! - [`engine`]: Popup engine coordinating all of the above
//! - [`refill`]: Inline refill-statistics tables (JSON, no window)
//!
//! ## Example
//!
//! ```rust
//! use fuelwatch_popup::{PopupEngine, Size};
//! use fuelwatch_net::{FetchKey, FuelType, StatsEndpoint};
//!
//! let mut engine = PopupEngine::new(
//!     "Show Statistics",
//!     "Station 42",
//!     "https://stats.example.com",
//!     Size::new(1600.0, 900.0),
//! );
//!
//! let key = FetchKey::new(StatsEndpoint::StatisticalGraphs, 42, FuelType::Diesel);
//! let decision = engine.trigger_fetch(key);
//! ```
//!
//! ## Design Principles
//!
//! 1. **Pure Rust Core**: All state management is pure Rust, testable
//!    without a browser
//! 2. **Injected Effects**: Fetching and handle release are performed by the
//!    host layer, so tests can observe and fake them
//! 3. **Per-Instance State**: One engine and one cache per popup; nothing
//!    global, so popups never cross-wire

pub mod cache;
pub mod engine;
pub mod geometry;
pub mod gesture;
pub mod math;
pub mod refill;
pub mod window;

// WASM exports (only available with "wasm" feature)
#[cfg(feature = "wasm")]
mod wasm;
#[cfg(feature = "wasm")]
pub use wasm::*;

// Re-export core types for convenience
pub use cache::{FetchDecision, HandleReleaser, ResourceCache, ResourceHandle};
pub use engine::{PopupEngine, TriggerState};
pub use gesture::{GestureState, ResizeDirection};
pub use math::{PopupStyle, Rect, Size, Vec2, POPUP_STYLE};
pub use refill::RefillStatsEngine;
pub use window::{PopupWindow, WindowGeometry, WindowMode};
