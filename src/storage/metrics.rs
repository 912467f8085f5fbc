//! Shared metrics recording for forecast operations.

use std::time::Instant;

/// Records metrics for one forecast service call.
///
/// Each `ForecastService` operation (list, get, create, update, delete) is
/// timed from before its session is opened until the session is dropped.
/// Two metrics are recorded:
/// 1. `forecast_operations_total` - Counter by backend, operation, and status
/// 2. `forecast_operation_duration_ms` - Histogram of the whole unit of work
///
/// # Arguments
///
/// * `backend` - [`ContextFactory::backend_name`](crate::storage::ContextFactory::backend_name)
/// * `operation` - Service operation name
/// * `start` - Time the call began, before the session was opened
/// * `status` - `"success"` or `"error"`, see [`status_label`]
pub fn record_operation_metrics(
    backend: &'static str,
    operation: &'static str,
    start: Instant,
    status: &'static str,
) {
    metrics::counter!(
        "forecast_operations_total",
        "backend" => backend,
        "operation" => operation,
        "status" => status
    )
    .increment(1);
    metrics::histogram!(
        "forecast_operation_duration_ms",
        "backend" => backend,
        "operation" => operation,
        "status" => status
    )
    .record(start.elapsed().as_secs_f64() * 1000.0);
}

/// Returns the metrics status label for a result.
pub const fn status_label<T, E>(result: &Result<T, E>) -> &'static str {
    if result.is_ok() { "success" } else { "error" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_operation_metrics() {
        // No recorder is installed in unit tests; recording must still be safe.
        let start = Instant::now();
        record_operation_metrics("sqlite", "list", start, "success");
        record_operation_metrics("memory", "delete", start, "error");
    }

    #[test]
    fn test_status_label() {
        let ok: Result<(), ()> = Ok(());
        let err: Result<(), ()> = Err(());
        assert_eq!(status_label(&ok), "success");
        assert_eq!(status_label(&err), "error");
    }
}
