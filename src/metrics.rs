//! Prometheus metrics collection for the contact API.
//!
//! Metrics are exposed on a separate HTTP listener when
//! `server.metrics_port` is configured.
//!
//! - `http_requests_total{method,route,status}` - Requests served
//! - `http_request_duration_seconds{method,route}` - Request latency histogram
//! - `contacts_created_total` / `contacts_deleted_total` - Store mutations
//! - `api_errors_total{error}` - Error responses by kind

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::sync::OnceLock;

/// Global Prometheus registry for all metrics.
pub static REGISTRY: OnceLock<Registry> = OnceLock::new();

pub fn registry() -> &'static Registry {
    REGISTRY.get_or_init(Registry::new)
}

// ========================================================================
// Counters (monotonic increasing)
// ========================================================================

/// Requests served by method, matched route and status code.
pub static REQUEST_COUNTER: OnceLock<IntCounterVec> = OnceLock::new();

/// Contacts persisted.
pub static CONTACTS_CREATED: OnceLock<IntCounter> = OnceLock::new();

/// Contacts removed.
pub static CONTACTS_DELETED: OnceLock<IntCounter> = OnceLock::new();

/// Error responses by error code.
pub static API_ERRORS: OnceLock<IntCounterVec> = OnceLock::new();

// ========================================================================
// Histograms
// ========================================================================

/// Request latency by method and matched route.
pub static REQUEST_LATENCY: OnceLock<HistogramVec> = OnceLock::new();

/// Initialize the Prometheus metrics registry.
///
/// Safe to call more than once; only the first call registers metrics.
pub fn init() {
    let r = registry();

    // Helper macro to register metric
    macro_rules! register {
        ($metric:ident, $init:expr) => {
            if $metric.get().is_none() {
                let m = $init.expect(concat!(stringify!($metric), " creation failed"));
                if let Err(e) = r.register(Box::new(m.clone())) {
                    tracing::warn!(error = %e, concat!("Failed to register metric ", stringify!($metric)));
                }
                let _ = $metric.set(m);
            }
        };
    }

    register!(REQUEST_COUNTER, IntCounterVec::new(Opts::new("http_requests_total", "HTTP requests served"), &["method", "route", "status"]));
    register!(REQUEST_LATENCY, HistogramVec::new(
        HistogramOpts::new("http_request_duration_seconds", "HTTP request latency")
            .buckets(vec![0.0005, 0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0]),
        &["method", "route"]));
    register!(CONTACTS_CREATED, IntCounter::new("contacts_created_total", "Contacts created"));
    register!(CONTACTS_DELETED, IntCounter::new("contacts_deleted_total", "Contacts deleted"));
    register!(API_ERRORS, IntCounterVec::new(Opts::new("api_errors_total", "Error responses by kind"), &["error"]));
}

/// Gather all metrics and encode them in Prometheus text format.
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = registry().gather();
    let mut buffer = vec![];
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode Prometheus metrics");
        return String::new();
    }
    match String::from_utf8(buffer) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "Prometheus metrics were not valid UTF-8");
            String::new()
        }
    }
}

// ============================================================================
// Helper functions for metric updates
// ============================================================================

/// Record a served request with latency.
#[inline]
pub fn record_request(method: &str, route: &str, status: u16, duration_secs: f64) {
    if let Some(c) = REQUEST_COUNTER.get() {
        c.with_label_values(&[method, route, &status.to_string()]).inc();
    }
    if let Some(h) = REQUEST_LATENCY.get() {
        h.with_label_values(&[method, route]).observe(duration_secs);
    }
}

/// Record an error response.
#[inline]
pub fn record_api_error(error: &str) {
    if let Some(c) = API_ERRORS.get() {
        c.with_label_values(&[error]).inc();
    }
}

#[inline]
pub fn record_contact_created() {
    if let Some(c) = CONTACTS_CREATED.get() {
        c.inc();
    }
}

#[inline]
pub fn record_contact_deleted() {
    if let Some(c) = CONTACTS_DELETED.get() {
        c.inc();
    }
}
