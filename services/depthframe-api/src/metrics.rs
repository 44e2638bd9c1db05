//! Prometheus metrics recorded by the handlers.

use std::time::Duration;

use metrics::{counter, histogram};

pub fn record_request(endpoint: &'static str) {
    counter!("depthframe_requests_total", "endpoint" => endpoint).increment(1);
}

pub fn record_render(format: &'static str, rows: usize, elapsed: Duration) {
    counter!("depthframe_renders_total", "format" => format).increment(1);
    counter!("depthframe_rows_served_total").increment(rows as u64);
    histogram!("depthframe_render_seconds", "format" => format).record(elapsed.as_secs_f64());
}

pub fn record_error(code: &'static str) {
    counter!("depthframe_render_errors_total", "code" => code).increment(1);
}
