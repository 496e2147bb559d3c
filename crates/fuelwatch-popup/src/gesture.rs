//! Gesture sessions for drag and resize operations

use crate::math::Vec2;
use crate::window::WindowGeometry;

/// Resize handle direction (compass naming, matching the CSS handle classes)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResizeDirection {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl ResizeDirection {
    /// All eight directions
    pub const ALL: [ResizeDirection; 8] = [
        ResizeDirection::North,
        ResizeDirection::South,
        ResizeDirection::East,
        ResizeDirection::West,
        ResizeDirection::NorthEast,
        ResizeDirection::NorthWest,
        ResizeDirection::SouthEast,
        ResizeDirection::SouthWest,
    ];

    /// Parse the short compass form used by the rendering layer
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "n" => Some(ResizeDirection::North),
            "s" => Some(ResizeDirection::South),
            "e" => Some(ResizeDirection::East),
            "w" => Some(ResizeDirection::West),
            "ne" => Some(ResizeDirection::NorthEast),
            "nw" => Some(ResizeDirection::NorthWest),
            "se" => Some(ResizeDirection::SouthEast),
            "sw" => Some(ResizeDirection::SouthWest),
            _ => None,
        }
    }

    /// Short compass form
    pub fn as_str(&self) -> &'static str {
        match self {
            ResizeDirection::North => "n",
            ResizeDirection::South => "s",
            ResizeDirection::East => "e",
            ResizeDirection::West => "w",
            ResizeDirection::NorthEast => "ne",
            ResizeDirection::NorthWest => "nw",
            ResizeDirection::SouthEast => "se",
            ResizeDirection::SouthWest => "sw",
        }
    }

    /// Whether this handle moves the top edge
    #[inline]
    pub fn moves_top(&self) -> bool {
        matches!(
            self,
            ResizeDirection::North | ResizeDirection::NorthEast | ResizeDirection::NorthWest
        )
    }

    /// Whether this handle moves the left edge
    #[inline]
    pub fn moves_left(&self) -> bool {
        matches!(
            self,
            ResizeDirection::West | ResizeDirection::NorthWest | ResizeDirection::SouthWest
        )
    }

    /// Whether this handle moves the bottom edge
    #[inline]
    pub fn moves_bottom(&self) -> bool {
        matches!(
            self,
            ResizeDirection::South | ResizeDirection::SouthEast | ResizeDirection::SouthWest
        )
    }

    /// Whether this handle moves the right edge
    #[inline]
    pub fn moves_right(&self) -> bool {
        matches!(
            self,
            ResizeDirection::East | ResizeDirection::NorthEast | ResizeDirection::SouthEast
        )
    }

    /// Get CSS cursor style for this handle
    pub fn cursor(&self) -> &'static str {
        match self {
            ResizeDirection::North | ResizeDirection::South => "ns-resize",
            ResizeDirection::East | ResizeDirection::West => "ew-resize",
            ResizeDirection::NorthEast | ResizeDirection::SouthWest => "nesw-resize",
            ResizeDirection::NorthWest | ResizeDirection::SouthEast => "nwse-resize",
        }
    }
}

/// An active pointer gesture.
///
/// A session exists only between a begin and its matching pointer release;
/// the snapshot it carries is everything a pointer-move needs, so no state
/// outside the session can go stale mid-gesture.
#[derive(Clone, Debug)]
pub enum GestureState {
    /// Dragging the window by its header
    Drag {
        /// Offset from window origin to the grabbing pointer
        grab_offset: Vec2,
    },
    /// Resizing the window from one of the eight handles
    Resize {
        /// Which resize handle
        direction: ResizeDirection,
        /// Window geometry at gesture start
        start_geometry: WindowGeometry,
        /// Pointer position at gesture start
        start_pointer: Vec2,
    },
}

impl GestureState {
    /// Check if this is a drag operation
    #[inline]
    pub fn is_drag(&self) -> bool {
        matches!(self, GestureState::Drag { .. })
    }

    /// Check if this is a resize operation
    #[inline]
    pub fn is_resize(&self) -> bool {
        matches!(self, GestureState::Resize { .. })
    }

    /// Get the resize direction if this is a resize
    pub fn direction(&self) -> Option<ResizeDirection> {
        match self {
            GestureState::Resize { direction, .. } => Some(*direction),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Size;

    #[test]
    fn test_direction_parse_roundtrip() {
        for direction in ResizeDirection::ALL {
            assert_eq!(ResizeDirection::from_str(direction.as_str()), Some(direction));
        }
        assert_eq!(ResizeDirection::from_str("x"), None);
    }

    #[test]
    fn test_direction_edges() {
        assert!(ResizeDirection::NorthWest.moves_top());
        assert!(ResizeDirection::NorthWest.moves_left());
        assert!(!ResizeDirection::NorthWest.moves_bottom());
        assert!(ResizeDirection::SouthEast.moves_bottom());
        assert!(ResizeDirection::SouthEast.moves_right());
    }

    #[test]
    fn test_gesture_predicates() {
        let drag = GestureState::Drag {
            grab_offset: Vec2::new(10.0, 5.0),
        };
        assert!(drag.is_drag());
        assert!(!drag.is_resize());
        assert_eq!(drag.direction(), None);

        let resize = GestureState::Resize {
            direction: ResizeDirection::SouthWest,
            start_geometry: WindowGeometry::new(Vec2::new(0.0, 0.0), Size::new(400.0, 300.0)),
            start_pointer: Vec2::new(0.0, 300.0),
        };
        assert!(resize.is_resize());
        assert_eq!(resize.direction(), Some(ResizeDirection::SouthWest));
    }
}
