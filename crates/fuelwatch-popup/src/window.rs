//! Popup window state

use serde::{Deserialize, Serialize};

use crate::math::{Size, Vec2};

/// Display mode of the popup window
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowMode {
    #[default]
    Normal,
    Minimized,
    Maximized,
}

/// Position and size of the popup window
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WindowGeometry {
    /// Top-left corner in viewport coordinates
    pub position: Vec2,
    /// Window size including header
    pub size: Size,
}

impl WindowGeometry {
    /// Create a new geometry
    #[inline]
    pub fn new(position: Vec2, size: Size) -> Self {
        Self { position, size }
    }
}

/// The floating window a single popup owns.
///
/// `geometry` always holds the Normal-mode geometry; Maximized bounds are
/// derived from the viewport at render time and never stored here, so
/// restoring is exact.
#[derive(Clone, Debug)]
pub struct PopupWindow {
    /// Normal-mode geometry
    pub geometry: WindowGeometry,
    /// Current display mode
    pub mode: WindowMode,
    /// Saved geometry for restore after maximize
    restore_geometry: Option<WindowGeometry>,
}

impl PopupWindow {
    /// Create a window in Normal mode at the given geometry
    pub fn new(geometry: WindowGeometry) -> Self {
        Self {
            geometry,
            mode: WindowMode::Normal,
            restore_geometry: None,
        }
    }

    /// Check if the window is minimized
    #[inline]
    pub fn is_minimized(&self) -> bool {
        self.mode == WindowMode::Minimized
    }

    /// Check if the window is maximized
    #[inline]
    pub fn is_maximized(&self) -> bool {
        self.mode == WindowMode::Maximized
    }

    /// Toggle between Normal and Maximized.
    ///
    /// `rendered_position` is the window's current on-screen position as the
    /// rendering layer sees it; snapshotting it (instead of the stored
    /// position) keeps the restore visually continuous when CSS offsets are
    /// in play. Entering Maximized always leaves Minimized.
    pub fn toggle_maximize(&mut self, rendered_position: Option<Vec2>) {
        if self.mode == WindowMode::Maximized {
            self.mode = WindowMode::Normal;
            if let Some(geometry) = self.restore_geometry.take() {
                self.geometry = geometry;
            }
        } else {
            self.restore_geometry = Some(WindowGeometry::new(
                rendered_position.unwrap_or(self.geometry.position),
                self.geometry.size,
            ));
            self.mode = WindowMode::Maximized;
        }
    }

    /// Toggle between Minimized and Normal.
    ///
    /// Minimizing a maximized window drops back to the remembered Normal
    /// geometry first, so restoring from the header renders at the same
    /// size and position as before the maximize.
    pub fn toggle_minimize(&mut self) {
        if self.mode == WindowMode::Minimized {
            self.mode = WindowMode::Normal;
        } else {
            if let Some(geometry) = self.restore_geometry.take() {
                self.geometry = geometry;
            }
            self.mode = WindowMode::Minimized;
        }
    }
}
