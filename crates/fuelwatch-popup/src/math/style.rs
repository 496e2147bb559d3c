//! Popup style constants

use super::Size;

/// Style constants for the popup window chrome
pub struct PopupStyle {
    /// Header (drag handle) height, also added on top of fitted content
    pub header_height: f32,
    /// Minimum window width
    pub min_width: f32,
    /// Minimum window height
    pub min_height: f32,
    /// Default window size before content is measured
    pub default_width: f32,
    /// Default window height before content is measured
    pub default_height: f32,
    /// Default window position
    pub default_x: f32,
    pub default_y: f32,
    /// Margin kept around a maximized window
    pub maximize_margin: f32,
    /// Fraction of the viewport width content may occupy
    pub fit_width_fraction: f32,
    /// Fraction of the viewport height content may occupy
    pub fit_height_fraction: f32,
}

impl PopupStyle {
    /// Minimum window size
    #[inline]
    pub fn min_size(&self) -> Size {
        Size::new(self.min_width, self.min_height)
    }
}

/// Default popup style matching the map UI design
pub const POPUP_STYLE: PopupStyle = PopupStyle {
    header_height: 50.0,
    min_width: 300.0,
    min_height: 200.0,
    default_width: 800.0,
    default_height: 600.0,
    default_x: 0.0,
    default_y: 100.0,
    maximize_margin: 16.0,
    fit_width_fraction: 0.90,
    fit_height_fraction: 0.80,
};
