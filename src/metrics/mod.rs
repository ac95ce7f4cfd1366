//! Metrics module for the OTC trading service.
//!
//! Provides Prometheus-compatible metrics for monitoring:
//! - API request metrics (latency, count, errors)
//! - Quote lifecycle metrics (created, updated, cancelled)
//! - OTC order state transitions and balance coordination calls
//! - Currency-order lifecycle and expiry sweeps
//! - Database query latency

#![allow(dead_code)]

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::time::Instant;

/// Metric names as constants for consistency
pub mod names {
    // API Metrics
    pub const HTTP_REQUESTS_TOTAL: &str = "http_requests_total";
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "http_request_duration_seconds";
    pub const HTTP_REQUESTS_IN_FLIGHT: &str = "http_requests_in_flight";

    // Quote Metrics
    pub const QUOTES_CREATED_TOTAL: &str = "quotes_created_total";
    pub const QUOTES_UPDATED_TOTAL: &str = "quotes_updated_total";
    pub const QUOTES_CANCELLED_TOTAL: &str = "quotes_cancelled_total";

    // OTC Order Metrics
    pub const ORDERS_TAKEN_TOTAL: &str = "otc_orders_taken_total";
    pub const ORDER_TRANSITIONS_TOTAL: &str = "otc_order_transitions_total";
    pub const ORDER_EXPIRED_TOTAL: &str = "otc_order_expired_total";

    // Account-service coordination metrics
    pub const ACCOUNT_LOCK_CALLS_TOTAL: &str = "account_lock_calls_total";
    pub const ACCOUNT_RELEASE_CALLS_TOTAL: &str = "account_release_calls_total";
    pub const ACCOUNT_CALL_DURATION_SECONDS: &str = "account_call_duration_seconds";
    pub const ACCOUNT_CALL_ERRORS_TOTAL: &str = "account_call_errors_total";

    // Currency Order Metrics
    pub const CURRENCY_ORDERS_CREATED_TOTAL: &str = "currency_orders_created_total";
    pub const CURRENCY_ORDERS_EXPIRED_TOTAL: &str = "currency_orders_expired_total";

    // Expiry worker metrics
    pub const EXPIRY_WORKER_TICKS_TOTAL: &str = "expiry_worker_ticks_total";
    pub const EXPIRY_WORKER_TICK_DURATION_SECONDS: &str = "expiry_worker_tick_duration_seconds";

    // Database Metrics
    pub const DB_QUERY_DURATION_SECONDS: &str = "db_query_duration_seconds";
    pub const DB_CONNECTIONS_ACTIVE: &str = "db_connections_active";
    pub const DB_CONNECTIONS_IDLE: &str = "db_connections_idle";
}

/// Label keys
pub mod labels {
    pub const METHOD: &str = "method";
    pub const ENDPOINT: &str = "endpoint";
    pub const STATUS: &str = "status";
    pub const SIDE: &str = "side";
    pub const FROM_STATUS: &str = "from_status";
    pub const TO_STATUS: &str = "to_status";
    pub const OPERATION: &str = "operation";
    pub const QUERY_TYPE: &str = "query_type";
}

/// Initializes the Prometheus metrics exporter. Returns a handle that can be
/// used to render metrics for a `/metrics` scrape endpoint.
pub fn init_metrics() -> PrometheusHandle {
    let builder = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full(names::HTTP_REQUEST_DURATION_SECONDS.to_string()),
            &[0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0],
        )
        .unwrap()
        .set_buckets_for_metric(
            Matcher::Full(names::ACCOUNT_CALL_DURATION_SECONDS.to_string()),
            &[0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 5.0, 60.0],
        )
        .unwrap()
        .set_buckets_for_metric(
            Matcher::Full(names::DB_QUERY_DURATION_SECONDS.to_string()),
            &[0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 5.0],
        )
        .unwrap()
        .set_buckets_for_metric(
            Matcher::Full(names::EXPIRY_WORKER_TICK_DURATION_SECONDS.to_string()),
            &[0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 30.0],
        )
        .unwrap();

    builder.install_recorder().expect("failed to install Prometheus recorder")
}

// ============================================================================
// HTTP Metrics
// ============================================================================

pub fn record_http_request(method: &str, endpoint: &str, status: u16, duration_secs: f64) {
    let status_str = status.to_string();
    counter!(
        names::HTTP_REQUESTS_TOTAL,
        labels::METHOD => method.to_string(),
        labels::ENDPOINT => endpoint.to_string(),
        labels::STATUS => status_str.clone()
    )
    .increment(1);

    histogram!(
        names::HTTP_REQUEST_DURATION_SECONDS,
        labels::METHOD => method.to_string(),
        labels::ENDPOINT => endpoint.to_string(),
        labels::STATUS => status_str
    )
    .record(duration_secs);
}

pub fn set_http_requests_in_flight(count: i64) {
    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).set(count as f64);
}

// ============================================================================
// Quote Metrics
// ============================================================================

pub fn record_quote_created(side: &str) {
    counter!(names::QUOTES_CREATED_TOTAL, labels::SIDE => side.to_string()).increment(1);
}

pub fn record_quote_updated() {
    counter!(names::QUOTES_UPDATED_TOTAL).increment(1);
}

pub fn record_quote_cancelled() {
    counter!(names::QUOTES_CANCELLED_TOTAL).increment(1);
}

// ============================================================================
// OTC Order Metrics
// ============================================================================

pub fn record_order_taken(side: &str) {
    counter!(names::ORDERS_TAKEN_TOTAL, labels::SIDE => side.to_string()).increment(1);
}

pub fn record_order_transition(from_status: &str, to_status: &str) {
    counter!(
        names::ORDER_TRANSITIONS_TOTAL,
        labels::FROM_STATUS => from_status.to_string(),
        labels::TO_STATUS => to_status.to_string()
    )
    .increment(1);
}

pub fn record_order_expired() {
    counter!(names::ORDER_EXPIRED_TOTAL).increment(1);
}

// ============================================================================
// Account-service coordination metrics
// ============================================================================

pub fn record_account_lock_call(duration_secs: f64) {
    counter!(names::ACCOUNT_LOCK_CALLS_TOTAL).increment(1);
    histogram!(names::ACCOUNT_CALL_DURATION_SECONDS, labels::OPERATION => "lock").record(duration_secs);
}

pub fn record_account_release_call(duration_secs: f64) {
    counter!(names::ACCOUNT_RELEASE_CALLS_TOTAL).increment(1);
    histogram!(names::ACCOUNT_CALL_DURATION_SECONDS, labels::OPERATION => "release").record(duration_secs);
}

pub fn record_account_call_error(operation: &str) {
    counter!(names::ACCOUNT_CALL_ERRORS_TOTAL, labels::OPERATION => operation.to_string()).increment(1);
}

// ============================================================================
// Currency Order Metrics
// ============================================================================

pub fn record_currency_order_created(side: &str) {
    counter!(names::CURRENCY_ORDERS_CREATED_TOTAL, labels::SIDE => side.to_string()).increment(1);
}

pub fn record_currency_orders_expired(count: u64) {
    counter!(names::CURRENCY_ORDERS_EXPIRED_TOTAL).increment(count);
}

// ============================================================================
// Expiry worker metrics
// ============================================================================

pub fn record_expiry_tick(duration_secs: f64) {
    counter!(names::EXPIRY_WORKER_TICKS_TOTAL).increment(1);
    histogram!(names::EXPIRY_WORKER_TICK_DURATION_SECONDS).record(duration_secs);
}

// ============================================================================
// Database Metrics
// ============================================================================

pub fn record_db_query(query_type: &str, duration_secs: f64) {
    histogram!(names::DB_QUERY_DURATION_SECONDS, labels::QUERY_TYPE => query_type.to_string()).record(duration_secs);
}

pub fn set_db_connections(active: i64, idle: i64) {
    gauge!(names::DB_CONNECTIONS_ACTIVE).set(active as f64);
    gauge!(names::DB_CONNECTIONS_IDLE).set(idle as f64);
}

// ============================================================================
// Timer Helper
// ============================================================================

/// Timer for measuring durations
pub struct Timer {
    start: Instant,
}

impl Timer {
    pub fn new() -> Self {
        Self { start: Instant::now() }
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer() {
        let timer = Timer::new();
        std::thread::sleep(std::time::Duration::from_millis(10));
        let elapsed = timer.elapsed_secs();
        assert!(elapsed >= 0.01);
        assert!(elapsed < 0.1);
    }

    #[test]
    fn test_metric_names() {
        assert_eq!(names::HTTP_REQUESTS_TOTAL, "http_requests_total");
        assert_eq!(names::QUOTES_CREATED_TOTAL, "quotes_created_total");
        assert_eq!(names::ORDER_TRANSITIONS_TOTAL, "otc_order_transitions_total");
    }

    #[test]
    fn test_label_keys() {
        assert_eq!(labels::METHOD, "method");
        assert_eq!(labels::SIDE, "side");
        assert_eq!(labels::OPERATION, "operation");
    }
}
