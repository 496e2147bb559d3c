//! Network types for FuelWatch
//!
//! This crate provides the HTTP request and error vocabulary used by the
//! statistics popup, plus the endpoint catalogue of the statistics service.
//!
//! # Architecture
//!
//! The popup engine never talks to the network itself. It decides *what* to
//! fetch and hands an [`HttpRequest`] to the host layer (the browser fetch
//! API in the WASM build, a stub in tests):
//!
//! ```text
//! PopupEngine
//!      │
//!      │ FetchDecision::Start(HttpRequest)
//!      ▼
//! ┌─────────────────┐
//! │   Host fetch    │  ◄── browser fetch() / test stub
//! └────────┬────────┘
//!          │
//!          │ local object URL / NetworkError
//!          ▼
//! PopupEngine::fetch_succeeded / fetch_failed
//! ```

#![no_std]

extern crate alloc;

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

// =============================================================================
// HTTP Method
// =============================================================================

/// HTTP request method.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    /// HTTP GET
    Get,
    /// HTTP POST
    Post,
    /// HTTP HEAD
    Head,
}

impl HttpMethod {
    /// Convert to uppercase string for the fetch API.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Head => "HEAD",
        }
    }
}

// =============================================================================
// HTTP Request
// =============================================================================

/// HTTP request to be performed by the host layer.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HttpRequest {
    /// HTTP method (GET, POST, etc.)
    pub method: HttpMethod,
    /// Target URL
    pub url: String,
    /// Request headers as key-value pairs
    pub headers: Vec<(String, String)>,
    /// Request timeout in milliseconds
    pub timeout_ms: u32,
}

impl HttpRequest {
    /// Create a new GET request.
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            url: url.into(),
            headers: Vec::new(),
            timeout_ms: 30_000,
        }
    }

    /// Add a header.
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    /// Set timeout in milliseconds.
    pub fn with_timeout(mut self, timeout_ms: u32) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }
}

// =============================================================================
// Network Error
// =============================================================================

/// Errors that can occur while fetching a statistics resource.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum NetworkError {
    /// Failed to establish connection
    ConnectionFailed,
    /// Request timed out
    Timeout,
    /// Invalid URL format
    InvalidUrl,
    /// Server answered with a non-success status
    HttpStatus(u16),
    /// Payload could not be materialized into a displayable resource
    Decode,
    /// Other error with description
    Other(String),
}

impl NetworkError {
    /// Convert to a user-friendly error message.
    pub fn message(&self) -> &str {
        match self {
            NetworkError::ConnectionFailed => "Failed to connect",
            NetworkError::Timeout => "Request timed out",
            NetworkError::InvalidUrl => "Invalid URL",
            NetworkError::HttpStatus(_) => "Failed to fetch statistics",
            NetworkError::Decode => "Could not decode statistics image",
            NetworkError::Other(msg) => msg,
        }
    }
}

// =============================================================================
// Fuel Types
// =============================================================================

/// Fuel types tracked by the statistics service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FuelType {
    Gasoline,
    Diesel,
    PremiumGasoline,
    UlsDiesel,
}

impl FuelType {
    /// Numeric code used by the statistics service.
    pub fn code(&self) -> u8 {
        match self {
            FuelType::Gasoline => 0,
            FuelType::Diesel => 1,
            FuelType::PremiumGasoline => 2,
            FuelType::UlsDiesel => 3,
        }
    }

    /// Parse a numeric service code.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(FuelType::Gasoline),
            1 => Some(FuelType::Diesel),
            2 => Some(FuelType::PremiumGasoline),
            3 => Some(FuelType::UlsDiesel),
            _ => None,
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            FuelType::Gasoline => "Gasoline",
            FuelType::Diesel => "Diesel",
            FuelType::PremiumGasoline => "Premium Gasoline",
            FuelType::UlsDiesel => "ULS Diesel",
        }
    }
}

// =============================================================================
// Statistics Endpoints
// =============================================================================

/// Resources exposed by the statistics-image service.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatsEndpoint {
    /// Pre-rendered statistical graphs for a station
    StatisticalGraphs,
    /// Rendered statistical data tables
    StatisticalData,
    /// Machine-learning model projections
    MachineLearningModels,
    /// Time-series plot over an inclusive date range (ISO-8601 dates)
    TimeSeries { start_date: String, end_date: String },
}

impl StatsEndpoint {
    /// Path segment under `/api/stats-image/`.
    pub fn path(&self) -> &'static str {
        match self {
            StatsEndpoint::StatisticalGraphs => "statistical-graphs",
            StatsEndpoint::StatisticalData => "statistical-data",
            StatsEndpoint::MachineLearningModels => "machine-learning-models",
            StatsEndpoint::TimeSeries { .. } => "time-series",
        }
    }
}

// =============================================================================
// Fetch Key
// =============================================================================

/// Composite identity of a cacheable statistics request.
///
/// Two triggers that would hit the same service URL produce equal keys, which
/// is what the popup's resource cache relies on.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FetchKey {
    /// Which statistics resource
    pub endpoint: StatsEndpoint,
    /// Station identifier
    pub station_id: u32,
    /// Fuel type identifier
    pub fuel_type: FuelType,
}

impl FetchKey {
    /// Create a new fetch key.
    pub fn new(endpoint: StatsEndpoint, station_id: u32, fuel_type: FuelType) -> Self {
        Self {
            endpoint,
            station_id,
            fuel_type,
        }
    }

    /// Full service URL for this key.
    pub fn to_url(&self, base_url: &str) -> String {
        let base = base_url.trim_end_matches('/');
        let common = format!(
            "{}/api/stats-image/{}?station_id={}&fuel_type={}",
            base,
            self.endpoint.path(),
            self.station_id,
            self.fuel_type.code()
        );
        match &self.endpoint {
            StatsEndpoint::TimeSeries {
                start_date,
                end_date,
            } => format!("{}&startDate={}&endDate={}", common, start_date, end_date),
            _ => common,
        }
    }

    /// GET request for this key.
    pub fn to_request(&self, base_url: &str) -> HttpRequest {
        HttpRequest::get(self.to_url(base_url))
    }
}

// =============================================================================
// Refill Statistics
// =============================================================================

/// One day-indexed row of refill statistics.
///
/// The service reports all values pre-formatted as display strings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyStats {
    pub day: String,
    pub mean: String,
    pub median: String,
    pub min: String,
    pub max: String,
    pub std: String,
}

/// Tabular refill statistics for one station and fuel type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefillStats {
    /// When the station is typically refilled during the day
    #[serde(rename = "refill_time_daily_stats")]
    pub refill_time: DailyStats,
    /// How long a refill lasts before the station runs empty
    #[serde(rename = "time_between_refill_empty_daily_stats")]
    pub time_between_refill_empty: DailyStats,
}

impl RefillStats {
    /// Service URL for a station's refill statistics.
    pub fn url(base_url: &str, station_id: u32, fuel_type: FuelType) -> String {
        format!(
            "{}/api/fuel-station-stats/{}/{}",
            base_url.trim_end_matches('/'),
            station_id,
            fuel_type.code()
        )
    }

    /// GET request for a station's refill statistics.
    pub fn request(base_url: &str, station_id: u32, fuel_type: FuelType) -> HttpRequest {
        HttpRequest::get(Self::url(base_url, station_id, fuel_type))
            .with_header("Accept", "application/json")
    }
}
