//! Core geometry types
//!
//! Provides the value types the popup geometry is computed with.

mod rect;
mod size;
mod style;
mod vec2;

pub use rect::Rect;
pub use size::Size;
pub use style::{PopupStyle, POPUP_STYLE};
pub use vec2::Vec2;
