use std::time::Instant;

use axum::http::StatusCode;
use once_cell::sync::Lazy;
use prometheus::{register_histogram_vec, register_int_counter_vec, Encoder, HistogramVec, IntCounterVec, TextEncoder};

// Prometheus metrics (default registry)
pub static PRODUCT_OPERATIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "product_operations_total",
        "Product operations by kind and outcome",
        &["operation", "outcome"]
    )
    .expect("register product_operations_total")
});

pub static PRODUCT_OPERATION_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "product_operation_duration_seconds",
        "Product operation duration in seconds",
        &["operation"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5]
    )
    .expect("register product_operation_duration")
});

/// Times one operation and records its outcome when finished.
pub struct OperationTimer {
    operation: &'static str,
    started: Instant,
}

impl OperationTimer {
    pub fn start(operation: &'static str) -> Self {
        Self { operation, started: Instant::now() }
    }

    pub fn finish<T, E>(self, result: &Result<T, E>) {
        let outcome = if result.is_ok() { "ok" } else { "error" };
        PRODUCT_OPERATIONS_TOTAL.with_label_values(&[self.operation, outcome]).inc();
        PRODUCT_OPERATION_DURATION
            .with_label_values(&[self.operation])
            .observe(self.started.elapsed().as_secs_f64());
    }
}

pub fn encode_metrics() -> (StatusCode, String) {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (StatusCode::INTERNAL_SERVER_ERROR, format!("metrics encode error: {e}"));
    }
    (StatusCode::OK, String::from_utf8(buffer).unwrap_or_default())
}

pub async fn metrics() -> (StatusCode, String) {
    encode_metrics()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timer_records_outcome() {
        let ok: Result<(), ()> = Ok(());
        let before = PRODUCT_OPERATIONS_TOTAL.with_label_values(&["unit_test", "ok"]).get();
        OperationTimer::start("unit_test").finish(&ok);
        assert_eq!(PRODUCT_OPERATIONS_TOTAL.with_label_values(&["unit_test", "ok"]).get(), before + 1);

        let (status, body) = encode_metrics();
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("product_operations_total"));
    }
}
