//! Request counters for the metrics endpoint.

use std::sync::atomic::{AtomicU64, Ordering};

/// Process-lifetime request counters.
#[derive(Debug, Default)]
pub struct MetricsCollector {
    pub dataset_requests: AtomicU64,
    pub simplified_requests: AtomicU64,
    pub radius_requests: AtomicU64,
    pub detailed_requests: AtomicU64,
    pub reloads: AtomicU64,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn incr(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Prometheus text exposition of all counters.
    pub fn render(&self, loaded_datasets: usize) -> String {
        let mut out = String::new();

        let mut counter = |name: &str, help: &str, value: u64| {
            out.push_str(&format!(
                "# HELP {name} {help}\n# TYPE {name} counter\n{name} {value}\n"
            ));
        };

        counter(
            "wind_dataset_requests_total",
            "Total /datasets requests",
            self.dataset_requests.load(Ordering::Relaxed),
        );
        counter(
            "wind_simplified_requests_total",
            "Total /simplified requests",
            self.simplified_requests.load(Ordering::Relaxed),
        );
        counter(
            "wind_radius_requests_total",
            "Total /trixels-in-radius requests",
            self.radius_requests.load(Ordering::Relaxed),
        );
        counter(
            "wind_detailed_requests_total",
            "Total /detailed-by-trixel-names requests",
            self.detailed_requests.load(Ordering::Relaxed),
        );
        counter(
            "wind_snapshot_reloads_total",
            "Total snapshot reloads",
            self.reloads.load(Ordering::Relaxed),
        );

        out.push_str(&format!(
            "# HELP wind_loaded_datasets Currently loaded dataset indexes\n\
             # TYPE wind_loaded_datasets gauge\nwind_loaded_datasets {loaded_datasets}\n"
        ));

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_contains_all_series() {
        let metrics = MetricsCollector::new();
        MetricsCollector::incr(&metrics.radius_requests);
        MetricsCollector::incr(&metrics.radius_requests);

        let text = metrics.render(3);
        assert!(text.contains("wind_radius_requests_total 2"));
        assert!(text.contains("wind_loaded_datasets 3"));
    }
}
