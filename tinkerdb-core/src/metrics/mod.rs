//! Metrics collection and export for observability
//!
//! Recording goes through the `metrics` facade and is a no-op until a
//! recorder is installed, so the request layer can record unconditionally.

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;
use thiserror::Error;

pub const REQUESTS_TOTAL: &str = "kv.requests.total";
pub const REQUESTS_REJECTED: &str = "kv.requests.rejected";
pub const REQUEST_DURATION_MS: &str = "kv.request.duration_ms";
pub const TENANTS: &str = "kv.tenants";

#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("Failed to install Prometheus exporter: {0}")]
    ExporterInstall(String),
}

/// Register metric descriptions with the installed recorder
pub fn init_metrics() {
    describe_counter!(REQUESTS_TOTAL, "Requests handled, labelled by operation");
    describe_counter!(
        REQUESTS_REJECTED,
        "Requests rejected for an empty tenant ID or key, labelled by operation"
    );
    describe_histogram!(REQUEST_DURATION_MS, "Request handling time in milliseconds");
    describe_gauge!(TENANTS, "Tenants with a live namespace");
}

/// Install the global Prometheus recorder with a scrape endpoint on `addr`.
///
/// Must be called from within a tokio runtime.
pub fn install_prometheus_exporter(addr: SocketAddr) -> Result<(), MetricsError> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| MetricsError::ExporterInstall(e.to_string()))?;

    init_metrics();
    Ok(())
}

pub fn record_request(op: &'static str) {
    counter!(REQUESTS_TOTAL, "op" => op).increment(1);
}

pub fn record_rejected(op: &'static str) {
    counter!(REQUESTS_REJECTED, "op" => op).increment(1);
}

pub fn record_tenant_count(count: usize) {
    gauge!(TENANTS).set(count as f64);
}

/// Measures one request; the duration is recorded when the timer is stopped
/// or dropped, so early returns are measured too.
pub struct Timer {
    op: &'static str,
    start: Instant,
}

impl Timer {
    pub fn start(op: &'static str) -> Self {
        record_request(op);
        Self {
            op,
            start: Instant::now(),
        }
    }

    /// Record now. Equivalent to dropping the timer.
    pub fn stop(self) {}
}

impl Drop for Timer {
    fn drop(&mut self) {
        let elapsed = self.start.elapsed();
        histogram!(REQUEST_DURATION_MS, "op" => self.op).record(elapsed.as_secs_f64() * 1000.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_init() {
        // No recorder installed: descriptions are dropped without panicking
        init_metrics();
    }

    #[test]
    fn test_recording_without_recorder() {
        record_request("get");
        record_rejected("set");
        record_tenant_count(3);
    }

    #[test]
    fn test_dropped_timer_records_duration() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();

        ::metrics::with_local_recorder(&recorder, || {
            let timer = Timer::start("set");
            drop(timer);
        });

        let rendered = handle.render();
        assert!(rendered.contains("kv_requests_total{op=\"set\"} 1"), "{}", rendered);
        assert!(rendered.contains("kv_request_duration_ms_count{op=\"set\"} 1"), "{}", rendered);
    }

    #[test]
    fn test_timer() {
        let timer = Timer::start("set");
        std::thread::sleep(std::time::Duration::from_millis(1));
        timer.stop();
    }
}
