//! Pure geometry for drag, resize, clamping and content fitting
//!
//! Every function here maps (gesture snapshot, current pointer) or
//! (geometry, viewport) to new geometry. No state, no side effects; the
//! engine applies the results under pointer and viewport events.

use crate::gesture::ResizeDirection;
use crate::math::{Rect, Size, Vec2, POPUP_STYLE};
use crate::window::WindowGeometry;

/// New window position while dragging.
///
/// Intentionally unclamped: the window may be dragged partly off screen and
/// is only pulled back by [`clamp_to_viewport`] when the viewport itself
/// changes.
#[inline]
pub fn apply_drag(grab_offset: Vec2, pointer: Vec2) -> Vec2 {
    pointer - grab_offset
}

/// New window geometry while resizing from one of the eight handles.
///
/// The edge opposite the dragged handle stays fixed on screen. Minimum size
/// always wins: when a delta would shrink below the minimum, the size pins
/// there and the moving edge stops, which keeps the anchor edge stationary
/// even at the clamp.
pub fn apply_resize(
    direction: ResizeDirection,
    start: WindowGeometry,
    start_pointer: Vec2,
    pointer: Vec2,
) -> WindowGeometry {
    let delta = pointer - start_pointer;
    let mut position = start.position;
    let mut size = start.size;

    if direction.moves_right() {
        size.width = (start.size.width + delta.x).max(POPUP_STYLE.min_width);
    }
    if direction.moves_bottom() {
        size.height = (start.size.height + delta.y).max(POPUP_STYLE.min_height);
    }
    if direction.moves_left() {
        size.width = (start.size.width - delta.x).max(POPUP_STYLE.min_width);
        position.x = start.position.x + (start.size.width - size.width);
    }
    if direction.moves_top() {
        size.height = (start.size.height - delta.y).max(POPUP_STYLE.min_height);
        position.y = start.position.y + (start.size.height - size.height);
    }

    WindowGeometry::new(position, size)
}

/// Constrain a window to the viewport.
///
/// Applied reactively when the viewport dimensions change, not during
/// gestures. When the window is wider or taller than the viewport the
/// top-left edge wins so the header stays reachable.
pub fn clamp_to_viewport(geometry: WindowGeometry, viewport: Size) -> WindowGeometry {
    let max_x = viewport.width - geometry.size.width;
    let max_y = viewport.height - geometry.size.height;
    WindowGeometry::new(
        Vec2::new(
            geometry.position.x.min(max_x).max(0.0),
            geometry.position.y.min(max_y).max(0.0),
        ),
        geometry.size,
    )
}

/// Downscale natural content dimensions to fit a bounding box.
///
/// Aspect ratio is preserved by taking the smaller of the two axis ratios;
/// content already inside the box passes through unchanged.
pub fn scale_to_fit(natural: Size, max_box: Size) -> Size {
    if natural.is_empty() {
        return natural;
    }
    if natural.width <= max_box.width && natural.height <= max_box.height {
        return natural;
    }
    let ratio = (max_box.width / natural.width).min(max_box.height / natural.height);
    natural.scale(ratio)
}

/// The box content may occupy, relative to the viewport.
#[inline]
pub fn content_max_box(viewport: Size) -> Size {
    Size::new(
        viewport.width * POPUP_STYLE.fit_width_fraction,
        viewport.height * POPUP_STYLE.fit_height_fraction,
    )
}

/// Near-fullscreen bounds for the Maximized mode, derived from the viewport
/// on every render and never persisted.
pub fn maximized_bounds(viewport: Size) -> Rect {
    let margin = POPUP_STYLE.maximize_margin;
    Rect::new(
        margin,
        margin,
        (viewport.width - margin * 2.0).max(POPUP_STYLE.min_width),
        (viewport.height - margin * 2.0).max(POPUP_STYLE.min_height),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start_geometry() -> WindowGeometry {
        WindowGeometry::new(Vec2::new(100.0, 100.0), Size::new(400.0, 300.0))
    }

    #[test]
    fn test_apply_drag() {
        let position = apply_drag(Vec2::new(20.0, 10.0), Vec2::new(220.0, 160.0));
        assert!((position.x - 200.0).abs() < 0.001);
        assert!((position.y - 150.0).abs() < 0.001);
    }

    #[test]
    fn test_resize_south_grows() {
        let geometry = apply_resize(
            ResizeDirection::South,
            start_geometry(),
            Vec2::new(300.0, 400.0),
            Vec2::new(300.0, 450.0),
        );
        assert!((geometry.position.y - 100.0).abs() < 0.001);
        assert!((geometry.size.height - 350.0).abs() < 0.001);
        assert!((geometry.size.width - 400.0).abs() < 0.001);
    }

    #[test]
    fn test_resize_north_anchors_bottom() {
        let start = start_geometry();
        let geometry = apply_resize(
            ResizeDirection::North,
            start,
            Vec2::new(300.0, 100.0),
            Vec2::new(300.0, 50.0),
        );
        assert!((geometry.position.y - 50.0).abs() < 0.001);
        assert!((geometry.size.height - 350.0).abs() < 0.001);
        // Bottom edge stays where it was
        let bottom = geometry.position.y + geometry.size.height;
        assert!((bottom - (start.position.y + start.size.height)).abs() < 0.001);
    }

    #[test]
    fn test_resize_west_anchors_right() {
        let start = start_geometry();
        let geometry = apply_resize(
            ResizeDirection::West,
            start,
            Vec2::new(100.0, 200.0),
            Vec2::new(160.0, 200.0),
        );
        assert!((geometry.size.width - 340.0).abs() < 0.001);
        let right = geometry.position.x + geometry.size.width;
        assert!((right - (start.position.x + start.size.width)).abs() < 0.001);
    }

    #[test]
    fn test_resize_corner_moves_both_axes() {
        let geometry = apply_resize(
            ResizeDirection::SouthEast,
            start_geometry(),
            Vec2::new(500.0, 400.0),
            Vec2::new(560.0, 470.0),
        );
        assert!((geometry.size.width - 460.0).abs() < 0.001);
        assert!((geometry.size.height - 370.0).abs() < 0.001);
    }

    #[test]
    fn test_resize_minimum_pins_anchor() {
        let start = start_geometry();
        // Drag the north-west corner far past the opposite corner
        let geometry = apply_resize(
            ResizeDirection::NorthWest,
            start,
            Vec2::new(100.0, 100.0),
            Vec2::new(2000.0, 2000.0),
        );
        assert!((geometry.size.width - 300.0).abs() < 0.001);
        assert!((geometry.size.height - 200.0).abs() < 0.001);
        // Anchor edges (right and bottom) still have not moved
        assert!((geometry.position.x + geometry.size.width - 500.0).abs() < 0.001);
        assert!((geometry.position.y + geometry.size.height - 400.0).abs() < 0.001);
    }

    #[test]
    fn test_clamp_to_viewport() {
        let viewport = Size::new(1280.0, 720.0);
        let off_screen = WindowGeometry::new(Vec2::new(1200.0, -40.0), Size::new(400.0, 300.0));
        let clamped = clamp_to_viewport(off_screen, viewport);
        assert!((clamped.position.x - 880.0).abs() < 0.001);
        assert!((clamped.position.y - 0.0).abs() < 0.001);
        assert!((clamped.size.width - 400.0).abs() < 0.001);
    }

    #[test]
    fn test_clamp_oversized_window_keeps_origin_visible() {
        let viewport = Size::new(800.0, 600.0);
        let oversized = WindowGeometry::new(Vec2::new(300.0, 300.0), Size::new(1000.0, 900.0));
        let clamped = clamp_to_viewport(oversized, viewport);
        assert!((clamped.position.x - 0.0).abs() < 0.001);
        assert!((clamped.position.y - 0.0).abs() < 0.001);
    }

    #[test]
    fn test_scale_to_fit_downscales_preserving_aspect() {
        let fitted = scale_to_fit(Size::new(4000.0, 2000.0), Size::new(1200.0, 800.0));
        assert!((fitted.width - 1200.0).abs() < 0.001);
        assert!((fitted.height - 600.0).abs() < 0.001);
        assert!((fitted.aspect_ratio() - 2.0).abs() < 0.001);
    }

    #[test]
    fn test_scale_to_fit_passes_small_content_through() {
        let fitted = scale_to_fit(Size::new(640.0, 480.0), Size::new(1200.0, 800.0));
        assert!((fitted.width - 640.0).abs() < 0.001);
        assert!((fitted.height - 480.0).abs() < 0.001);
    }

    #[test]
    fn test_content_max_box() {
        let max_box = content_max_box(Size::new(1600.0, 900.0));
        assert!((max_box.width - 1440.0).abs() < 0.001);
        assert!((max_box.height - 720.0).abs() < 0.001);
    }

    #[test]
    fn test_maximized_bounds_track_viewport() {
        let bounds = maximized_bounds(Size::new(1280.0, 720.0));
        assert!((bounds.x - 16.0).abs() < 0.001);
        assert!((bounds.width - 1248.0).abs() < 0.001);
        assert!((bounds.height - 688.0).abs() < 0.001);
    }
}
