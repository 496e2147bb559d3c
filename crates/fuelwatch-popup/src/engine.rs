//! Popup engine coordinating fetch lifecycle, window state and gestures
//!
//! One engine per popup instance. All mutation goes through the transition
//! methods here; the rendering layer only reads state and derives visual
//! attributes from it.

use fuelwatch_net::{FetchKey, NetworkError};

use crate::cache::{FetchDecision, HandleReleaser, ResourceCache};
use crate::geometry;
use crate::gesture::{GestureState, ResizeDirection};
use crate::math::{Size, Vec2, POPUP_STYLE};
use crate::window::{PopupWindow, WindowGeometry, WindowMode};

/// Visible state of the trigger affordance
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TriggerState {
    /// Label shown, trigger enabled
    Idle,
    /// Busy indicator shown, trigger disabled
    Loading,
    /// Label shown plus an inline error message
    Error(String),
}

impl TriggerState {
    /// String form for the rendering layer
    pub fn as_str(&self) -> &'static str {
        match self {
            TriggerState::Idle => "idle",
            TriggerState::Loading => "loading",
            TriggerState::Error(_) => "error",
        }
    }
}

/// Popup engine owning one floating window and one resource cache.
///
/// The engine is pure state: it decides what to fetch and how geometry
/// changes, while the host layer performs the fetch and reports back via
/// [`fetch_succeeded`](PopupEngine::fetch_succeeded) /
/// [`fetch_failed`](PopupEngine::fetch_failed).
pub struct PopupEngine {
    /// Trigger button label
    label: String,
    /// Station name shown in the window header
    title: String,
    /// Statistics service base URL
    base_url: String,
    /// Current viewport size
    viewport: Size,
    /// Trigger affordance state
    trigger: TriggerState,
    /// Fetched resources owned by this popup
    cache: ResourceCache,
    /// The floating window, when open
    window: Option<PopupWindow>,
    /// Active pointer gesture, if any
    gesture: Option<GestureState>,
    /// Key whose handle is currently displayed
    active_key: Option<FetchKey>,
    /// Key that should open the window when its fetch resolves
    pending_open: Option<FetchKey>,
    /// Set once the owning popup has been destroyed
    torn_down: bool,
}

impl PopupEngine {
    /// Create an engine for one popup instance
    pub fn new(
        label: impl Into<String>,
        title: impl Into<String>,
        base_url: impl Into<String>,
        viewport: Size,
    ) -> Self {
        Self {
            label: label.into(),
            title: title.into(),
            base_url: base_url.into(),
            viewport,
            trigger: TriggerState::Idle,
            cache: ResourceCache::new(),
            window: None,
            gesture: None,
            active_key: None,
            pending_open: None,
            torn_down: false,
        }
    }

    // =========================================================================
    // Fetch lifecycle
    // =========================================================================

    /// User activated the trigger for `key`.
    ///
    /// On a cache hit the window opens immediately without any network
    /// round trip. On a miss the returned `Start` request must be performed
    /// by the host; while a fetch is loading further triggers are no-ops.
    pub fn trigger_fetch(&mut self, key: FetchKey) -> FetchDecision {
        if self.torn_down || self.trigger == TriggerState::Loading {
            return FetchDecision::InFlight;
        }

        match self.cache.begin_fetch(&key, &self.base_url) {
            FetchDecision::Hit(url) => {
                self.trigger = TriggerState::Idle;
                self.active_key = Some(key);
                self.open_window();
                FetchDecision::Hit(url)
            }
            FetchDecision::Start(request) => {
                self.trigger = TriggerState::Loading;
                self.pending_open = Some(key);
                FetchDecision::Start(request)
            }
            FetchDecision::InFlight => {
                self.pending_open = Some(key);
                FetchDecision::InFlight
            }
        }
    }

    /// A fetch for `key` resolved with a materialized local `url`.
    ///
    /// The handle is cached even when the popup no longer wants it (the
    /// work is not wasted), but the window only opens if this key is still
    /// the pending open; a popup closed or torn down mid-flight stays
    /// closed.
    pub fn fetch_succeeded(&mut self, key: FetchKey, url: String, releaser: &dyn HandleReleaser) {
        if self.torn_down {
            // Cache is already drained; releasing here is the only way
            // this handle ever gets freed.
            releaser.release(&url);
            return;
        }

        self.cache.complete_fetch(key.clone(), url, releaser);
        self.trigger = TriggerState::Idle;

        if self.pending_open.as_ref() == Some(&key) {
            self.pending_open = None;
            self.active_key = Some(key);
            self.open_window();
        }
    }

    /// A fetch for `key` failed; nothing is cached, retry refetches.
    pub fn fetch_failed(&mut self, key: &FetchKey, error: &NetworkError) {
        if self.torn_down {
            return;
        }
        self.cache.fail_fetch(key);
        if self.pending_open.as_ref() == Some(key) {
            self.pending_open = None;
        }
        self.trigger = TriggerState::Error(error.message().to_string());
    }

    /// Open the window at the default geometry if it is not already open
    fn open_window(&mut self) {
        if self.window.is_none() {
            self.window = Some(PopupWindow::new(WindowGeometry::new(
                Vec2::new(POPUP_STYLE.default_x, POPUP_STYLE.default_y),
                Size::new(POPUP_STYLE.default_width, POPUP_STYLE.default_height),
            )));
        }
    }

    /// Content reported its natural dimensions; fit the window to it.
    ///
    /// The content is scaled into the viewport-relative max box and the
    /// header allowance added on top; the result becomes the window's
    /// Normal geometry.
    pub fn content_measured(&mut self, natural: Size) {
        let Some(window) = self.window.as_mut() else {
            return;
        };
        let fitted = geometry::scale_to_fit(natural, geometry::content_max_box(self.viewport));
        window.geometry.size = Size::new(fitted.width, fitted.height + POPUP_STYLE.header_height);
    }

    /// Close the window. The cached handles stay, so re-triggering reopens
    /// instantly without a network round trip.
    pub fn close(&mut self) {
        self.window = None;
        self.gesture = None;
        self.active_key = None;
        self.pending_open = None;
    }

    /// Release everything this popup owns. Idempotent; must run when the
    /// popup instance is destroyed, on every exit path.
    pub fn teardown(&mut self, releaser: &dyn HandleReleaser) {
        self.cache.teardown(releaser);
        self.window = None;
        self.gesture = None;
        self.active_key = None;
        self.pending_open = None;
        self.trigger = TriggerState::Idle;
        self.torn_down = true;
    }

    // =========================================================================
    // Gestures
    // =========================================================================

    /// Start dragging from the header. Legal only from Idle and only while
    /// the window is in Normal mode.
    pub fn begin_drag(&mut self, pointer: Vec2) {
        if self.gesture.is_some() {
            return;
        }
        let Some(window) = self.window.as_ref() else {
            return;
        };
        if window.mode != WindowMode::Normal {
            return;
        }
        self.gesture = Some(GestureState::Drag {
            grab_offset: pointer - window.geometry.position,
        });
    }

    /// Start resizing from one of the eight handles. Mutually exclusive
    /// with dragging.
    pub fn begin_resize(&mut self, direction: ResizeDirection, pointer: Vec2) {
        if self.gesture.is_some() {
            return;
        }
        let Some(window) = self.window.as_ref() else {
            return;
        };
        if window.mode != WindowMode::Normal {
            return;
        }
        self.gesture = Some(GestureState::Resize {
            direction,
            start_geometry: window.geometry,
            start_pointer: pointer,
        });
    }

    /// Pointer moved while a gesture is active; no-op when idle.
    pub fn pointer_moved(&mut self, pointer: Vec2) {
        let Some(window) = self.window.as_mut() else {
            return;
        };
        match &self.gesture {
            Some(GestureState::Drag { grab_offset }) => {
                window.geometry.position = geometry::apply_drag(*grab_offset, pointer);
            }
            Some(GestureState::Resize {
                direction,
                start_geometry,
                start_pointer,
            }) => {
                window.geometry =
                    geometry::apply_resize(*direction, *start_geometry, *start_pointer, pointer);
            }
            None => {}
        }
    }

    /// Pointer released; ends the gesture. A release with no active
    /// session is a no-op.
    pub fn pointer_released(&mut self) {
        self.gesture = None;
    }

    // =========================================================================
    // Display mode
    // =========================================================================

    /// Toggle Normal/Maximized. `rendered_position` is the on-screen
    /// position the rendering layer measured, if it has one.
    pub fn toggle_maximize(&mut self, rendered_position: Option<Vec2>) {
        if let Some(window) = self.window.as_mut() {
            self.gesture = None;
            window.toggle_maximize(rendered_position);
        }
    }

    /// Toggle Minimized; also leaves Maximized.
    pub fn toggle_minimize(&mut self) {
        if let Some(window) = self.window.as_mut() {
            self.gesture = None;
            window.toggle_minimize();
        }
    }

    /// The viewport changed size. Normal geometry is reclamped so the
    /// window stays reachable; Maximized bounds follow the viewport on
    /// render without being stored.
    pub fn viewport_resized(&mut self, viewport: Size) {
        self.viewport = viewport;
        if let Some(window) = self.window.as_mut() {
            if window.mode == WindowMode::Normal {
                window.geometry = geometry::clamp_to_viewport(window.geometry, viewport);
            }
        }
    }

    // =========================================================================
    // Accessors for the rendering layer
    // =========================================================================

    /// Trigger button label
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Window header title
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Current trigger state
    pub fn trigger_state(&self) -> &TriggerState {
        &self.trigger
    }

    /// Inline error message, if the last fetch failed
    pub fn error_message(&self) -> Option<&str> {
        match &self.trigger {
            TriggerState::Error(message) => Some(message),
            _ => None,
        }
    }

    /// Check if the window is open
    pub fn is_open(&self) -> bool {
        self.window.is_some()
    }

    /// The open window, if any
    pub fn window(&self) -> Option<&PopupWindow> {
        self.window.as_ref()
    }

    /// Local URL of the displayed resource, if any
    pub fn content_url(&self) -> Option<&str> {
        let key = self.active_key.as_ref()?;
        self.cache.get(key).map(|handle| handle.url.as_str())
    }

    /// Current viewport size
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Active gesture, if any
    pub fn gesture(&self) -> Option<&GestureState> {
        self.gesture.as_ref()
    }

    /// Number of cached handles (test and debugging aid)
    pub fn cached_handles(&self) -> usize {
        self.cache.len()
    }

    /// Geometry the rendering layer should draw right now.
    ///
    /// Maximized bounds derive from the viewport; Minimized keeps only the
    /// header strip at the stored position; Normal is the stored geometry.
    pub fn effective_geometry(&self) -> Option<WindowGeometry> {
        let window = self.window.as_ref()?;
        Some(match window.mode {
            WindowMode::Normal => window.geometry,
            WindowMode::Minimized => WindowGeometry::new(
                window.geometry.position,
                Size::new(window.geometry.size.width, POPUP_STYLE.header_height),
            ),
            WindowMode::Maximized => {
                let bounds = geometry::maximized_bounds(self.viewport);
                WindowGeometry::new(bounds.position(), bounds.size())
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fuelwatch_net::{FuelType, StatsEndpoint};
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingReleaser {
        released: RefCell<Vec<String>>,
    }

    impl HandleReleaser for RecordingReleaser {
        fn release(&self, url: &str) {
            self.released.borrow_mut().push(url.to_string());
        }
    }

    fn test_engine() -> PopupEngine {
        PopupEngine::new(
            "Show Statistics",
            "Station 42",
            "https://stats.example",
            Size::new(1600.0, 900.0),
        )
    }

    fn graphs_key() -> FetchKey {
        FetchKey::new(StatsEndpoint::StatisticalGraphs, 42, FuelType::Gasoline)
    }

    #[test]
    fn test_trigger_miss_starts_fetch_and_loading() {
        let mut engine = test_engine();

        let decision = engine.trigger_fetch(graphs_key());
        assert!(matches!(decision, FetchDecision::Start(_)));
        assert_eq!(engine.trigger_state(), &TriggerState::Loading);
        assert!(!engine.is_open());
    }

    #[test]
    fn test_trigger_while_loading_is_ignored() {
        let mut engine = test_engine();

        engine.trigger_fetch(graphs_key());
        let decision = engine.trigger_fetch(graphs_key());
        assert!(matches!(decision, FetchDecision::InFlight));
    }

    #[test]
    fn test_success_opens_window_at_default_geometry() {
        let mut engine = test_engine();
        let releaser = RecordingReleaser::default();

        engine.trigger_fetch(graphs_key());
        engine.fetch_succeeded(graphs_key(), "blob:stats".to_string(), &releaser);

        assert!(engine.is_open());
        assert_eq!(engine.content_url(), Some("blob:stats"));
        let geometry = engine.window().unwrap().geometry;
        assert!((geometry.position.x - POPUP_STYLE.default_x).abs() < 0.001);
        assert!((geometry.position.y - POPUP_STYLE.default_y).abs() < 0.001);
        assert!((geometry.size.width - POPUP_STYLE.default_width).abs() < 0.001);
    }

    #[test]
    fn test_failure_surfaces_message_and_allows_retry() {
        let mut engine = test_engine();

        engine.trigger_fetch(graphs_key());
        engine.fetch_failed(&graphs_key(), &NetworkError::HttpStatus(502));

        assert_eq!(engine.trigger_state().as_str(), "error");
        assert_eq!(engine.error_message(), Some("Failed to fetch statistics"));
        assert!(!engine.is_open());

        // Retry performs a fresh fetch
        let decision = engine.trigger_fetch(graphs_key());
        assert!(matches!(decision, FetchDecision::Start(_)));
    }

    #[test]
    fn test_drag_disabled_while_maximized() {
        let mut engine = test_engine();
        let releaser = RecordingReleaser::default();

        engine.trigger_fetch(graphs_key());
        engine.fetch_succeeded(graphs_key(), "blob:stats".to_string(), &releaser);
        engine.toggle_maximize(None);

        engine.begin_drag(Vec2::new(100.0, 110.0));
        assert!(engine.gesture().is_none());
    }

    #[test]
    fn test_resize_suppressed_during_drag() {
        let mut engine = test_engine();
        let releaser = RecordingReleaser::default();

        engine.trigger_fetch(graphs_key());
        engine.fetch_succeeded(graphs_key(), "blob:stats".to_string(), &releaser);

        engine.begin_drag(Vec2::new(100.0, 110.0));
        assert!(engine.gesture().unwrap().is_drag());

        engine.begin_resize(ResizeDirection::SouthEast, Vec2::new(800.0, 700.0));
        assert!(engine.gesture().unwrap().is_drag());

        engine.pointer_released();
        assert!(engine.gesture().is_none());
    }

    #[test]
    fn test_pointer_events_without_session_are_noops() {
        let mut engine = test_engine();
        let releaser = RecordingReleaser::default();

        engine.trigger_fetch(graphs_key());
        engine.fetch_succeeded(graphs_key(), "blob:stats".to_string(), &releaser);

        let before = engine.window().unwrap().geometry;
        engine.pointer_moved(Vec2::new(500.0, 500.0));
        engine.pointer_released();
        let after = engine.window().unwrap().geometry;
        assert_eq!(before, after);
    }

    #[test]
    fn test_viewport_resize_reclamps_normal_geometry() {
        let mut engine = test_engine();
        let releaser = RecordingReleaser::default();

        engine.trigger_fetch(graphs_key());
        engine.fetch_succeeded(graphs_key(), "blob:stats".to_string(), &releaser);

        // Drag the window far to the right, then shrink the viewport
        engine.begin_drag(Vec2::new(10.0, 110.0));
        engine.pointer_moved(Vec2::new(1400.0, 110.0));
        engine.pointer_released();

        engine.viewport_resized(Size::new(1000.0, 700.0));
        let geometry = engine.window().unwrap().geometry;
        assert!((geometry.position.x - 200.0).abs() < 0.001);
        assert!((geometry.position.y + geometry.size.height) <= 700.001);
    }

    #[test]
    fn test_effective_geometry_minimized_is_header_only() {
        let mut engine = test_engine();
        let releaser = RecordingReleaser::default();

        engine.trigger_fetch(graphs_key());
        engine.fetch_succeeded(graphs_key(), "blob:stats".to_string(), &releaser);
        engine.toggle_minimize();

        let effective = engine.effective_geometry().unwrap();
        assert!((effective.size.height - POPUP_STYLE.header_height).abs() < 0.001);
        // Stored geometry untouched
        let stored = engine.window().unwrap().geometry;
        assert!((stored.size.height - POPUP_STYLE.default_height).abs() < 0.001);
    }

    #[test]
    fn test_teardown_during_flight_releases_late_handle() {
        let mut engine = test_engine();
        let releaser = RecordingReleaser::default();

        engine.trigger_fetch(graphs_key());
        engine.teardown(&releaser);
        engine.fetch_succeeded(graphs_key(), "blob:late".to_string(), &releaser);

        assert!(!engine.is_open());
        assert_eq!(*releaser.released.borrow(), vec!["blob:late".to_string()]);
        assert_eq!(engine.cached_handles(), 0);
    }
}
