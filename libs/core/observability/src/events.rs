//! Counters for the events domain.

use metrics::counter;

pub struct EventMetrics;

impl EventMetrics {
    /// Count a store operation. `outcome` is `"success"`, `"not_found"`,
    /// `"invalid"` or `"error"`.
    pub fn record_operation(operation: &'static str, outcome: &'static str) {
        counter!(
            "events_operations_total",
            "operation" => operation,
            "outcome" => outcome
        )
        .increment(1);
    }

    pub fn record_join() {
        counter!("events_joins_total").increment(1);
        tracing::debug!("Event join recorded");
    }
}
