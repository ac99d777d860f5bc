//! Metric catalog: metric records and the selectable-option filter.

use serde::{Deserialize, Serialize};

use crate::l10n::MessageBundle;

/// One measurable quantity that can be plotted as a graph series.
///
/// Catalog entries are supplied in full by the activity export and are
/// read-only from the graph's point of view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metric {
    pub key: String,
    pub name: String,
    /// Category tag, e.g. "INT", "PERCENT", "RATING".
    #[serde(rename = "type")]
    pub metric_type: String,
    /// Hidden metrics never appear in user-facing pickers.
    #[serde(default)]
    pub hidden: bool,
    /// Custom metrics use `name` verbatim instead of a translated label.
    #[serde(default)]
    pub custom: bool,
}

/// Keys with the `new_` prefix are delta/comparison variants of a base
/// metric and are never directly selectable.
pub fn is_diff_metric(key: &str) -> bool {
    key.starts_with("new_")
}

/// A selectable dialog entry: the metric key and its display label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricOption {
    pub value: String,
    pub label: String,
}

/// Display label for a metric: the catalog name verbatim for custom
/// metrics, the translated `metric.<key>.name` otherwise.
pub fn metric_label(metric: &Metric, messages: &MessageBundle) -> String {
    if metric.custom {
        metric.name.clone()
    } else {
        messages.translate(&["metric", &metric.key, "name"])
    }
}

/// Filter the catalog down to the options offered by the add-metric dialog.
///
/// Per metric, in order: hidden metrics are dropped, diff metrics are
/// dropped, and when a non-empty type filter is given only metrics whose
/// type is in the filter and whose key is not already on the graph remain.
/// Without a type filter no selection-membership check is applied; metrics
/// already on the graph stay listed.
///
/// Output order equals catalog order. Labels come from the message bundle
/// (`metric.<key>.name`) unless the metric is custom, in which case its
/// catalog name is used verbatim.
pub fn metric_options(
    metrics: &[Metric],
    type_filter: Option<&[String]>,
    selected: &[String],
    messages: &MessageBundle,
) -> Vec<MetricOption> {
    metrics
        .iter()
        .filter(|metric| {
            if metric.hidden || is_diff_metric(&metric.key) {
                return false;
            }
            match type_filter {
                Some(types) if !types.is_empty() => {
                    types.contains(&metric.metric_type)
                        && !selected.iter().any(|k| k == &metric.key)
                }
                _ => true,
            }
        })
        .map(|metric| MetricOption {
            value: metric.key.clone(),
            label: metric_label(metric, messages),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{is_diff_metric, metric_options, Metric};
    use crate::l10n::MessageBundle;

    fn metric(key: &str, metric_type: &str, hidden: bool) -> Metric {
        Metric {
            key: key.to_string(),
            name: key.to_uppercase(),
            metric_type: metric_type.to_string(),
            hidden,
            custom: false,
        }
    }

    #[test]
    fn diff_metric_key_convention() {
        assert!(is_diff_metric("new_coverage"));
        assert!(is_diff_metric("new_"));
        assert!(!is_diff_metric("coverage"));
        assert!(!is_diff_metric("renewals"));
    }

    #[test]
    fn hidden_metrics_never_listed() {
        let messages = MessageBundle::empty();
        let catalog = vec![metric("coverage", "PERCENT", false), metric("data", "DATA", true)];
        let options = metric_options(&catalog, None, &[], &messages);
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].value, "coverage");

        // Still excluded when a matching type filter is present.
        let filter = vec!["DATA".to_string(), "PERCENT".to_string()];
        let options = metric_options(&catalog, Some(&filter), &[], &messages);
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].value, "coverage");
    }

    #[test]
    fn diff_metrics_never_listed() {
        let messages = MessageBundle::empty();
        let catalog = vec![metric("bugs", "INT", false), metric("new_bugs", "INT", false)];
        let options = metric_options(&catalog, None, &[], &messages);
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].value, "bugs");
    }

    #[test]
    fn type_filter_restricts_and_excludes_selected() {
        let messages = MessageBundle::empty();
        let catalog = vec![
            metric("bugs", "INT", false),
            metric("coverage", "PERCENT", false),
            metric("tests", "INT", false),
        ];
        let filter = vec!["INT".to_string()];
        let selected = vec!["bugs".to_string()];
        let options = metric_options(&catalog, Some(&filter), &selected, &messages);
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].value, "tests");
    }

    #[test]
    fn empty_type_filter_behaves_like_none() {
        let messages = MessageBundle::empty();
        let catalog = vec![metric("bugs", "INT", false), metric("coverage", "PERCENT", false)];
        let selected = vec!["bugs".to_string()];
        let options = metric_options(&catalog, Some(&[]), &selected, &messages);
        // No type restriction: already-selected metrics stay listed.
        assert_eq!(options.len(), 2);
    }

    #[test]
    fn no_type_filter_keeps_selected_metrics_listed() {
        let messages = MessageBundle::empty();
        let catalog = vec![metric("bugs", "INT", false)];
        let selected = vec!["bugs".to_string()];
        let options = metric_options(&catalog, None, &selected, &messages);
        assert_eq!(options.len(), 1);
    }

    #[test]
    fn catalog_order_is_preserved() {
        let messages = MessageBundle::empty();
        let catalog = vec![
            metric("tests", "INT", false),
            metric("bugs", "INT", false),
            metric("coverage", "PERCENT", false),
        ];
        let values: Vec<String> = metric_options(&catalog, None, &[], &messages)
            .into_iter()
            .map(|o| o.value)
            .collect();
        assert_eq!(values, vec!["tests", "bugs", "coverage"]);
    }

    #[test]
    fn custom_metric_uses_catalog_name_verbatim() {
        let messages = MessageBundle::empty();
        let catalog = vec![Metric {
            key: "team_velocity".to_string(),
            name: "Team Velocity".to_string(),
            metric_type: "FLOAT".to_string(),
            hidden: false,
            custom: true,
        }];
        let options = metric_options(&catalog, None, &[], &messages);
        assert_eq!(options[0].label, "Team Velocity");
    }

    #[test]
    fn translated_label_falls_back_to_joined_key() {
        let messages = MessageBundle::empty();
        let catalog = vec![metric("bugs", "INT", false)];
        let options = metric_options(&catalog, None, &[], &messages);
        assert_eq!(options[0].label, "metric.bugs.name");
    }

    #[test]
    fn hidden_and_diff_excluded_under_type_filter() {
        let messages = MessageBundle::empty();
        let catalog = vec![
            metric("complexity", "INT", false),
            metric("internal_score", "INT", true),
            metric("new_complexity", "INT", false),
        ];
        let filter = vec!["INT".to_string()];
        let options = metric_options(&catalog, Some(&filter), &[], &messages);
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].value, "complexity");
    }
}
