//! Pipeline metrics
//!
//! Recorded through the `metrics` facade. The binary installs a Prometheus
//! recorder with [`install_recorder`] and can render the text exposition at
//! the end of a run; without a recorder these calls are no-ops.

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

pub const DOCUMENTS_LOADED: &str = "motor_catalog_documents_loaded_total";
pub const ENTRIES_PARSED: &str = "motor_catalog_entries_parsed_total";
pub const MOTORS_NORMALIZED: &str = "motor_catalog_motors_normalized_total";
pub const FAILURES: &str = "motor_catalog_failures_total";
pub const ENTRIES_PER_DOCUMENT: &str = "motor_catalog_entries_per_document";
pub const RUN_DURATION: &str = "motor_catalog_run_duration_seconds";

/// Install the global Prometheus recorder and return a handle for rendering.
pub fn install_recorder() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

pub struct CatalogMetrics;

impl CatalogMetrics {
    /// Record a document whose entry list was parsed
    pub fn record_document_loaded(entries: usize) {
        ::metrics::counter!(DOCUMENTS_LOADED).increment(1);
        ::metrics::counter!(ENTRIES_PARSED).increment(entries as u64);
        ::metrics::histogram!(ENTRIES_PER_DOCUMENT).record(entries as f64);
    }

    pub fn record_motors_normalized(count: usize) {
        ::metrics::counter!(MOTORS_NORMALIZED).increment(count as u64);
    }

    pub fn record_failure(kind: &'static str) {
        ::metrics::counter!(FAILURES, "kind" => kind).increment(1);
    }

    pub fn record_run_duration(duration_secs: f64) {
        ::metrics::histogram!(RUN_DURATION).record(duration_secs);
    }

    /// Names of every metric this crate records
    pub fn metric_names() -> Vec<&'static str> {
        vec![
            DOCUMENTS_LOADED,
            ENTRIES_PARSED,
            MOTORS_NORMALIZED,
            FAILURES,
            ENTRIES_PER_DOCUMENT,
            RUN_DURATION,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_without_recorder_is_noop() {
        CatalogMetrics::record_document_loaded(4);
        CatalogMetrics::record_motors_normalized(4);
        CatalogMetrics::record_failure("missing_field");
        CatalogMetrics::record_run_duration(0.01);
    }

    #[test]
    fn test_recorded_metrics_render_in_prometheus_format() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();

        ::metrics::with_local_recorder(&recorder, || {
            CatalogMetrics::record_document_loaded(2);
            CatalogMetrics::record_motors_normalized(2);
            CatalogMetrics::record_failure("unknown_vendor");
        });

        let rendered = handle.render();
        assert!(rendered.contains("motor_catalog_documents_loaded_total 1"));
        assert!(rendered.contains("motor_catalog_motors_normalized_total 2"));
        assert!(rendered.contains("kind=\"unknown_vendor\""));
        assert!(rendered.contains("motor_catalog_entries_per_document"));
    }

    #[test]
    fn test_metric_names_are_prefixed() {
        for name in CatalogMetrics::metric_names() {
            assert!(name.starts_with("motor_catalog_"));
        }
    }
}
