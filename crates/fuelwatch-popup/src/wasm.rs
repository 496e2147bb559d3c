//! WASM exports for the statistics popup
//!
//! This module provides wasm-bindgen exports for the PopupEngine, allowing
//! the map shell to drive a popup directly: it performs the browser fetch,
//! materializes the payload as a blob object-URL, and revokes the URLs when
//! the popup is disposed.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{Blob, Headers, Request, RequestInit, RequestMode, Response, Url};

use fuelwatch_net::{FetchKey, FuelType, HttpRequest, NetworkError, RefillStats, StatsEndpoint};

use crate::cache::{FetchDecision, HandleReleaser};
use crate::engine::PopupEngine;
use crate::gesture::ResizeDirection;
use crate::math::{Size, Vec2, POPUP_STYLE};
use crate::refill::RefillStatsEngine;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    fn log(s: &str);
}

/// Revokes blob object-URLs when a handle is released
struct ObjectUrlReleaser;

impl HandleReleaser for ObjectUrlReleaser {
    fn release(&self, url: &str) {
        if Url::revoke_object_url(url).is_err() {
            log(&format!("[popup] failed to revoke object URL {}", url));
        }
    }
}

/// Popup controller for WASM - wraps PopupEngine with a JS-friendly API.
///
/// One controller per station marker; all state is per-instance, so
/// simultaneously open popups never observe each other's gestures or
/// caches.
#[wasm_bindgen]
pub struct StatsPopupController {
    engine: Rc<RefCell<PopupEngine>>,
    station_id: u32,
    fuel_type: FuelType,
}

#[wasm_bindgen]
impl StatsPopupController {
    /// Create a controller for one station popup
    #[wasm_bindgen(constructor)]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        label: &str,
        station_name: &str,
        base_url: &str,
        station_id: u32,
        fuel_type_code: u8,
        viewport_width: f32,
        viewport_height: f32,
    ) -> Self {
        #[cfg(feature = "console_error_panic_hook")]
        console_error_panic_hook::set_once();

        let fuel_type = FuelType::from_code(fuel_type_code).unwrap_or_else(|| {
            log(&format!(
                "[popup] unknown fuel type code {}, defaulting to gasoline",
                fuel_type_code
            ));
            FuelType::Gasoline
        });

        Self {
            engine: Rc::new(RefCell::new(PopupEngine::new(
                label,
                station_name,
                base_url,
                Size::new(viewport_width, viewport_height),
            ))),
            station_id,
            fuel_type,
        }
    }

    // =========================================================================
    // Triggers
    // =========================================================================

    /// Fetch and show the statistical graphs image
    #[wasm_bindgen]
    pub fn show_graphs(&self) {
        self.start(StatsEndpoint::StatisticalGraphs);
    }

    /// Fetch and show the statistical data tables image
    #[wasm_bindgen]
    pub fn show_data(&self) {
        self.start(StatsEndpoint::StatisticalData);
    }

    /// Fetch and show the machine-learning projections image
    #[wasm_bindgen]
    pub fn show_models(&self) {
        self.start(StatsEndpoint::MachineLearningModels);
    }

    /// Fetch and show the time-series plot for an ISO-8601 date range
    #[wasm_bindgen]
    pub fn show_time_series(&self, start_date: &str, end_date: &str) {
        self.start(StatsEndpoint::TimeSeries {
            start_date: start_date.to_string(),
            end_date: end_date.to_string(),
        });
    }

    fn start(&self, endpoint: StatsEndpoint) {
        let key = FetchKey::new(endpoint, self.station_id, self.fuel_type);
        let decision = self.engine.borrow_mut().trigger_fetch(key.clone());
        if let FetchDecision::Start(request) = decision {
            spawn_local(perform_fetch(Rc::clone(&self.engine), key, request));
        }
    }

    // =========================================================================
    // Window controls
    // =========================================================================

    /// Close the window (cached resources are kept)
    #[wasm_bindgen]
    pub fn close(&self) {
        self.engine.borrow_mut().close();
    }

    /// Toggle Normal/Maximized. Pass the window's current on-screen
    /// position so restoring is visually continuous; omit it when no
    /// rendered rect is available.
    #[wasm_bindgen]
    pub fn toggle_maximize(&self, rendered_x: Option<f32>, rendered_y: Option<f32>) {
        let rendered = match (rendered_x, rendered_y) {
            (Some(x), Some(y)) => Some(Vec2::new(x, y)),
            _ => None,
        };
        self.engine.borrow_mut().toggle_maximize(rendered);
    }

    /// Toggle Minimized
    #[wasm_bindgen]
    pub fn toggle_minimize(&self) {
        self.engine.borrow_mut().toggle_minimize();
    }

    // =========================================================================
    // Pointer input
    // =========================================================================

    /// Start dragging from the header
    #[wasm_bindgen]
    pub fn begin_drag(&self, x: f32, y: f32) {
        self.engine.borrow_mut().begin_drag(Vec2::new(x, y));
    }

    /// Start resizing from a handle ("n", "ne", "e", ...)
    #[wasm_bindgen]
    pub fn begin_resize(&self, direction: &str, x: f32, y: f32) {
        let Some(direction) = ResizeDirection::from_str(direction) else {
            return;
        };
        self.engine
            .borrow_mut()
            .begin_resize(direction, Vec2::new(x, y));
    }

    /// Pointer moved (only meaningful while a gesture is active)
    #[wasm_bindgen]
    pub fn pointer_moved(&self, x: f32, y: f32) {
        self.engine.borrow_mut().pointer_moved(Vec2::new(x, y));
    }

    /// Pointer released; ends any active gesture
    #[wasm_bindgen]
    pub fn pointer_released(&self) {
        self.engine.borrow_mut().pointer_released();
    }

    // =========================================================================
    // Environment
    // =========================================================================

    /// The browser viewport changed size
    #[wasm_bindgen]
    pub fn viewport_resized(&self, width: f32, height: f32) {
        self.engine
            .borrow_mut()
            .viewport_resized(Size::new(width, height));
    }

    /// The displayed image reported its natural dimensions
    #[wasm_bindgen]
    pub fn content_measured(&self, natural_width: f32, natural_height: f32) {
        self.engine
            .borrow_mut()
            .content_measured(Size::new(natural_width, natural_height));
    }

    /// Release every cached resource. Must be called when the popup is
    /// unmounted; safe to call more than once.
    #[wasm_bindgen]
    pub fn dispose(&self) {
        self.engine.borrow_mut().teardown(&ObjectUrlReleaser);
    }

    // =========================================================================
    // State snapshot
    // =========================================================================

    /// Get the popup state as JSON for the rendering layer
    #[wasm_bindgen]
    pub fn state_json(&self) -> String {
        let engine = self.engine.borrow();

        let window_json = match (engine.window(), engine.effective_geometry()) {
            (Some(window), Some(rect)) => Some(serde_json::json!({
                "mode": mode_to_str(window.mode),
                "screenRect": {
                    "x": rect.position.x,
                    "y": rect.position.y,
                    "width": rect.size.width,
                    "height": rect.size.height
                },
                "cursor": gesture_cursor(&engine),
                // Handles disappear while minimized; only the header strip
                // renders there
                "resizeHandles": if window.is_minimized() {
                    Vec::new()
                } else {
                    resize_handles_json()
                },
            })),
            _ => None,
        };

        serde_json::to_string(&serde_json::json!({
            "label": engine.label(),
            "title": engine.title(),
            "trigger": engine.trigger_state().as_str(),
            "error": engine.error_message(),
            "contentUrl": engine.content_url(),
            "headerHeight": POPUP_STYLE.header_height,
            "window": window_json,
        }))
        .unwrap_or_else(|_| "{}".to_string())
    }
}

/// Cursor the shell should show for the active gesture
fn gesture_cursor(engine: &PopupEngine) -> &'static str {
    match engine.gesture() {
        Some(gesture) if gesture.is_drag() => "grabbing",
        Some(gesture) => gesture.direction().map(|d| d.cursor()).unwrap_or("default"),
        None => "grab",
    }
}

/// Static handle descriptors for the shell's render pass
fn resize_handles_json() -> Vec<serde_json::Value> {
    ResizeDirection::ALL
        .iter()
        .map(|direction| {
            serde_json::json!({
                "direction": direction.as_str(),
                "cursor": direction.cursor(),
            })
        })
        .collect()
}

/// Convert WindowMode to a JSON-friendly string
fn mode_to_str(mode: crate::window::WindowMode) -> &'static str {
    match mode {
        crate::window::WindowMode::Normal => "normal",
        crate::window::WindowMode::Minimized => "minimized",
        crate::window::WindowMode::Maximized => "maximized",
    }
}

// =============================================================================
// Refill statistics controller
// =============================================================================

/// Inline refill-statistics controller for WASM.
///
/// The companion control next to the popup trigger: it fetches tabular
/// refill statistics as JSON for inline rendering, with no floating window
/// and no cached resources.
#[wasm_bindgen]
pub struct RefillStatsController {
    engine: Rc<RefCell<RefillStatsEngine>>,
}

#[wasm_bindgen]
impl RefillStatsController {
    /// Create a controller for one station's refill-statistics trigger
    #[wasm_bindgen(constructor)]
    pub fn new(base_url: &str, station_id: u32, fuel_type_code: u8) -> Self {
        let fuel_type = FuelType::from_code(fuel_type_code).unwrap_or_else(|| {
            log(&format!(
                "[popup] unknown fuel type code {}, defaulting to gasoline",
                fuel_type_code
            ));
            FuelType::Gasoline
        });

        Self {
            engine: Rc::new(RefCell::new(RefillStatsEngine::new(
                base_url, station_id, fuel_type,
            ))),
        }
    }

    /// Fetch (or refetch) the refill-statistics tables
    #[wasm_bindgen]
    pub fn fetch_stats(&self) {
        let Some(request) = self.engine.borrow_mut().trigger_fetch() else {
            return;
        };
        spawn_local(perform_stats_fetch(Rc::clone(&self.engine), request));
    }

    /// Get the trigger and table state as JSON for the rendering layer
    #[wasm_bindgen]
    pub fn state_json(&self) -> String {
        let engine = self.engine.borrow();
        serde_json::to_string(&serde_json::json!({
            "trigger": engine.trigger_state().as_str(),
            "error": engine.error_message(),
            "stats": engine.stats(),
        }))
        .unwrap_or_else(|_| "{}".to_string())
    }
}

// =============================================================================
// Browser fetch
// =============================================================================

/// Perform one fetch and report the outcome back to the engine.
async fn perform_fetch(engine: Rc<RefCell<PopupEngine>>, key: FetchKey, request: HttpRequest) {
    match fetch_object_url(&request).await {
        Ok(url) => {
            engine
                .borrow_mut()
                .fetch_succeeded(key, url, &ObjectUrlReleaser);
        }
        Err(error) => {
            log(&format!(
                "[popup] fetch failed for {}: {}",
                request.url,
                error.message()
            ));
            engine.borrow_mut().fetch_failed(&key, &error);
        }
    }
}

/// Fetch and parse the refill tables, then report back to the engine.
async fn perform_stats_fetch(engine: Rc<RefCell<RefillStatsEngine>>, request: HttpRequest) {
    let outcome = match fetch_text(&request).await {
        Ok(body) => serde_json::from_str::<RefillStats>(&body).map_err(|_| NetworkError::Decode),
        Err(error) => Err(error),
    };
    match outcome {
        Ok(stats) => engine.borrow_mut().fetch_succeeded(stats),
        Err(error) => {
            log(&format!(
                "[popup] stats fetch failed for {}: {}",
                request.url,
                error.message()
            ));
            engine.borrow_mut().fetch_failed(&error);
        }
    }
}

/// Run one request through the browser fetch API.
async fn fetch_response(request: &HttpRequest) -> Result<Response, NetworkError> {
    let window = web_sys::window().ok_or(NetworkError::Other("no window".to_string()))?;

    let opts = RequestInit::new();
    opts.set_method(request.method.as_str());
    opts.set_mode(RequestMode::Cors);
    if !request.headers.is_empty() {
        let headers = Headers::new().map_err(|_| NetworkError::ConnectionFailed)?;
        for (name, value) in &request.headers {
            headers
                .append(name, value)
                .map_err(|_| NetworkError::ConnectionFailed)?;
        }
        opts.set_headers(&JsValue::from(headers));
    }

    let req = Request::new_with_str_and_init(&request.url, &opts)
        .map_err(|_| NetworkError::InvalidUrl)?;

    let response = JsFuture::from(window.fetch_with_request(&req))
        .await
        .map_err(|_| NetworkError::ConnectionFailed)?;
    let response: Response = response
        .dyn_into()
        .map_err(|_| NetworkError::ConnectionFailed)?;

    if !(200..300).contains(&response.status()) {
        return Err(NetworkError::HttpStatus(response.status()));
    }

    Ok(response)
}

/// Fetch a binary payload and materialize it as a blob object-URL.
async fn fetch_object_url(request: &HttpRequest) -> Result<String, NetworkError> {
    let response = fetch_response(request).await?;

    let blob = JsFuture::from(response.blob().map_err(|_| NetworkError::Decode)?)
        .await
        .map_err(|_| NetworkError::Decode)?;
    let blob: Blob = blob.dyn_into().map_err(|_| NetworkError::Decode)?;

    Url::create_object_url_with_blob(&blob).map_err(|_| NetworkError::Decode)
}

/// Fetch a JSON payload as text.
async fn fetch_text(request: &HttpRequest) -> Result<String, NetworkError> {
    let response = fetch_response(request).await?;

    let text = JsFuture::from(response.text().map_err(|_| NetworkError::Decode)?)
        .await
        .map_err(|_| NetworkError::Decode)?;
    text.as_string().ok_or(NetworkError::Decode)
}
