//! Telemetry utilities for request timing and tracing spans.

use std::time::{Duration, Instant};

/// Guard for timing a request and recording metrics.
///
/// Records request latency when [`RequestTimer::finish`] is called; a timer
/// dropped without finishing (handler panic, client gone) records nothing.
pub struct RequestTimer {
    method: String,
    route: String,
    start: Instant,
}

impl RequestTimer {
    /// Start timing a request.
    pub fn new(method: impl Into<String>, route: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            route: route.into(),
            start: Instant::now(),
        }
    }

    /// Stop the timer, record the request and return the elapsed time.
    pub fn finish(self, status: u16) -> Duration {
        let elapsed = self.start.elapsed();
        crate::metrics::record_request(&self.method, &self.route, status, elapsed.as_secs_f64());
        elapsed
    }
}

/// Standardized span constructors.
pub mod spans {
    use tracing::{Span, info_span};

    /// Create a span for one HTTP request.
    pub fn request(method: &str, path: &str) -> Span {
        info_span!("request", method = %method, path = %path)
    }
}
