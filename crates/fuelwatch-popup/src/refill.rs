//! Inline refill-statistics tables
//!
//! A second, simpler trigger next to the popup: it fetches tabular refill
//! statistics as JSON and projects them for inline rendering under the
//! trigger. No floating window, no cached object URLs; every activation
//! performs a fresh fetch so the tables always show current numbers.

use fuelwatch_net::{FuelType, HttpRequest, NetworkError, RefillStats};

use crate::engine::TriggerState;

/// State behind one refill-statistics trigger.
///
/// Like [`PopupEngine`](crate::engine::PopupEngine), this is pure state: it
/// decides what to fetch and the host layer performs the request and reports
/// back.
pub struct RefillStatsEngine {
    /// Statistics service base URL
    base_url: String,
    /// Station identifier
    station_id: u32,
    /// Fuel type identifier
    fuel_type: FuelType,
    /// Trigger affordance state
    trigger: TriggerState,
    /// Last successfully fetched tables, kept visible across failed retries
    stats: Option<RefillStats>,
}

impl RefillStatsEngine {
    /// Create an engine for one station's refill-statistics trigger
    pub fn new(base_url: impl Into<String>, station_id: u32, fuel_type: FuelType) -> Self {
        Self {
            base_url: base_url.into(),
            station_id,
            fuel_type,
            trigger: TriggerState::Idle,
            stats: None,
        }
    }

    /// User activated the trigger.
    ///
    /// Returns the request the host must perform, or `None` while a fetch
    /// is already loading (trigger disabled). Statistics are not cached;
    /// each activation refetches.
    pub fn trigger_fetch(&mut self) -> Option<HttpRequest> {
        if self.trigger == TriggerState::Loading {
            return None;
        }
        self.trigger = TriggerState::Loading;
        Some(RefillStats::request(
            &self.base_url,
            self.station_id,
            self.fuel_type,
        ))
    }

    /// The fetch resolved with parsed tables.
    pub fn fetch_succeeded(&mut self, stats: RefillStats) {
        self.trigger = TriggerState::Idle;
        self.stats = Some(stats);
    }

    /// The fetch failed. Previously shown tables stay on screen; only the
    /// inline error message is added.
    pub fn fetch_failed(&mut self, error: &NetworkError) {
        self.trigger = TriggerState::Error(error.message().to_string());
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

    /// The tables to render, if any
    pub fn stats(&self) -> Option<&RefillStats> {
        self.stats.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fuelwatch_net::DailyStats;

    fn sample_stats(day: &str) -> RefillStats {
        let row = DailyStats {
            day: day.to_string(),
            mean: "08:30".to_string(),
            median: "08:15".to_string(),
            min: "06:00".to_string(),
            max: "11:45".to_string(),
            std: "01:10".to_string(),
        };
        RefillStats {
            refill_time: row.clone(),
            time_between_refill_empty: row,
        }
    }

    #[test]
    fn test_trigger_starts_fetch_and_disables_while_loading() {
        let mut engine = RefillStatsEngine::new("https://stats.example", 21, FuelType::Diesel);

        let request = engine.trigger_fetch().expect("first trigger starts a fetch");
        assert_eq!(
            request.url,
            "https://stats.example/api/fuel-station-stats/21/1"
        );
        assert_eq!(engine.trigger_state(), &TriggerState::Loading);

        // Disabled until the fetch settles
        assert!(engine.trigger_fetch().is_none());
    }

    #[test]
    fn test_every_activation_refetches() {
        let mut engine = RefillStatsEngine::new("https://stats.example", 21, FuelType::Diesel);

        engine.trigger_fetch();
        engine.fetch_succeeded(sample_stats("Monday"));
        assert_eq!(engine.stats().unwrap().refill_time.day, "Monday");

        // A second activation fetches again and replaces the tables
        assert!(engine.trigger_fetch().is_some());
        engine.fetch_succeeded(sample_stats("Tuesday"));
        assert_eq!(engine.stats().unwrap().refill_time.day, "Tuesday");
    }

    #[test]
    fn test_failure_keeps_previous_tables() {
        let mut engine = RefillStatsEngine::new("https://stats.example", 21, FuelType::Diesel);

        engine.trigger_fetch();
        engine.fetch_succeeded(sample_stats("Monday"));

        engine.trigger_fetch();
        engine.fetch_failed(&NetworkError::Timeout);

        assert_eq!(engine.error_message(), Some("Request timed out"));
        assert_eq!(engine.stats().unwrap().refill_time.day, "Monday");

        // Retry is allowed after a failure
        assert!(engine.trigger_fetch().is_some());
    }
}
