//! Graph configuration: selected series, type restriction, and the series limit.

use crate::catalog::Metric;

/// Maximum number of metric series that can be plotted on one graph.
pub const MAX_GRAPH_SERIES: usize = 6;

/// Whether the add-metric trigger is enabled for a graph that already has
/// `count` series. The trigger is inert once the ceiling is reached.
pub fn can_add_series(count: usize) -> bool {
    count < MAX_GRAPH_SERIES
}

/// The per-graph configuration owned by the application: which metrics are
/// plotted (insertion order is display order) and an optional restriction
/// on the metric types offered by the add-metric dialog.
#[derive(Debug, Default, Clone)]
pub struct GraphConfig {
    pub selected_metrics: Vec<String>,
    pub type_filter: Option<Vec<String>>,
}

impl GraphConfig {
    pub fn new(selected_metrics: Vec<String>, type_filter: Option<Vec<String>>) -> Self {
        Self {
            selected_metrics,
            type_filter,
        }
    }

    pub fn can_add_metric(&self) -> bool {
        can_add_series(self.selected_metrics.len())
    }

    /// Append a metric to the graph. Commit target of the add-metric
    /// dialog; a key already on the graph is left in place (re-adding is
    /// possible when no type filter narrows the dialog).
    pub fn add_metric(&mut self, key: &str) {
        if !self.selected_metrics.iter().any(|k| k == key) {
            self.selected_metrics.push(key.to_string());
        }
    }

    /// Reconcile a startup selection (config file or CLI flags) with the
    /// loaded catalog: drop unknown keys, drop duplicates keeping the
    /// first occurrence, and truncate to the series limit.
    pub fn sanitize(&mut self, metrics: &[Metric]) {
        let mut seen: Vec<String> = Vec::new();
        for key in &self.selected_metrics {
            if seen.len() == MAX_GRAPH_SERIES {
                break;
            }
            if metrics.iter().any(|m| &m.key == key) && !seen.contains(key) {
                seen.push(key.clone());
            }
        }
        self.selected_metrics = seen;
    }
}
