//! Project activity export: the metric catalog plus per-metric measure
//! histories, and conversion of histories into chart points.

use std::path::Path;

use chrono::NaiveDate;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use serde::{Deserialize, Serialize};

use crate::catalog::Metric;

/// One measured value on one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurePoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// The full history of one metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasureHistory {
    pub metric: String,
    pub history: Vec<MeasurePoint>,
}

/// A project activity export: catalog and histories. Read-only once loaded;
/// the graph configuration only references metrics by key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityData {
    pub project: String,
    pub metrics: Vec<Metric>,
    pub measures: Vec<MeasureHistory>,
}

/// Chart-ready series for one plotted metric. X values are day ordinals
/// (days since the Unix epoch) so the ratatui chart can treat them as f64.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphSeries {
    pub metric: String,
    pub points: Vec<(f64, f64)>,
}

const EPOCH: NaiveDate = match NaiveDate::from_ymd_opt(1970, 1, 1) {
    Some(d) => d,
    None => unreachable!(),
};

/// Days since the Unix epoch, as the chart's x value.
pub fn date_to_ordinal(date: NaiveDate) -> f64 {
    (date - EPOCH).num_days() as f64
}

/// Inverse of [`date_to_ordinal`], for axis label formatting. Values
/// outside the representable range clamp to the epoch.
pub fn ordinal_to_date(ordinal: f64) -> NaiveDate {
    EPOCH
        .checked_add_signed(chrono::Duration::days(ordinal as i64))
        .unwrap_or(EPOCH)
}

impl ActivityData {
    /// Parse an activity export from a JSON string.
    pub fn from_json(source: &str) -> Result<Self> {
        serde_json::from_str(source).wrap_err("Invalid activity export")
    }

    /// Load an activity export from a JSON file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("Could not read {}", path.display()))?;
        Self::from_json(&source)
            .wrap_err_with(|| format!("Could not parse {}", path.display()))
    }

    pub fn metrics(&self) -> &[Metric] {
        &self.metrics
    }

    pub fn metric(&self, key: &str) -> Option<&Metric> {
        self.metrics.iter().find(|m| m.key == key)
    }

    pub fn history(&self, key: &str) -> Option<&MeasureHistory> {
        self.measures.iter().find(|m| m.metric == key)
    }

    /// Build one chart series per selected metric, in selection order.
    /// A metric without a history yields an empty series; points with
    /// non-finite values are skipped.
    pub fn chart_series(&self, selected: &[String]) -> Vec<GraphSeries> {
        selected
            .iter()
            .map(|key| {
                let points = self
                    .history(key)
                    .map(|h| {
                        h.history
                            .iter()
                            .filter(|p| p.value.is_finite())
                            .map(|p| (date_to_ordinal(p.date), p.value))
                            .collect()
                    })
                    .unwrap_or_default();
                GraphSeries {
                    metric: key.clone(),
                    points,
                }
            })
            .collect()
    }
}

/// Min/max bounds over all points of all series, None when no points exist.
pub fn series_bounds(series: &[GraphSeries]) -> Option<([f64; 2], [f64; 2])> {
    let mut bounds: Option<([f64; 2], [f64; 2])> = None;
    for s in series {
        for &(x, y) in &s.points {
            let ([x_min, x_max], [y_min, y_max]) =
                bounds.get_or_insert(([x, x], [y, y]));
            *x_min = x_min.min(x);
            *x_max = x_max.max(x);
            *y_min = y_min.min(y);
            *y_max = y_max.max(y);
        }
    }
    bounds
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample() -> ActivityData {
        ActivityData::from_json(
            r#"{
                "project": "Demo",
                "metrics": [
                    {"key": "coverage", "name": "Coverage", "type": "PERCENT"},
                    {"key": "bugs", "name": "Bugs", "type": "INT"}
                ],
                "measures": [
                    {"metric": "coverage", "history": [
                        {"date": "2024-01-01", "value": 80.0},
                        {"date": "2024-01-08", "value": 82.5}
                    ]}
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn parses_export_with_defaulted_flags() {
        let data = sample();
        assert_eq!(data.project, "Demo");
        assert_eq!(data.metrics().len(), 2);
        // hidden/custom omitted in the export default to false.
        assert!(!data.metric("coverage").unwrap().hidden);
        assert!(!data.metric("coverage").unwrap().custom);
    }

    #[test]
    fn date_ordinal_round_trip() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let ordinal = date_to_ordinal(date);
        assert_eq!(ordinal_to_date(ordinal), date);
        assert_eq!(date_to_ordinal(NaiveDate::from_ymd_opt(1970, 1, 1).unwrap()), 0.0);
        assert_eq!(date_to_ordinal(NaiveDate::from_ymd_opt(1970, 1, 2).unwrap()), 1.0);
    }

    #[test]
    fn chart_series_in_selection_order() {
        let data = sample();
        let selected = vec!["bugs".to_string(), "coverage".to_string()];
        let series = data.chart_series(&selected);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].metric, "bugs");
        assert!(series[0].points.is_empty()); // no history in the export
        assert_eq!(series[1].points.len(), 2);
        assert_eq!(series[1].points[0].1, 80.0);
        assert!(series[1].points[0].0 < series[1].points[1].0);
    }

    #[test]
    fn non_finite_values_are_skipped() {
        let data = ActivityData {
            project: "Demo".to_string(),
            metrics: vec![],
            measures: vec![MeasureHistory {
                metric: "m".to_string(),
                history: vec![
                    MeasurePoint {
                        date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                        value: 1.0,
                    },
                    MeasurePoint {
                        date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
                        value: f64::NAN,
                    },
                ],
            }],
        };
        let series = data.chart_series(&["m".to_string()]);
        assert_eq!(series[0].points.len(), 1);
    }

    #[test]
    fn bounds_cover_all_series() {
        let series = vec![
            GraphSeries {
                metric: "a".to_string(),
                points: vec![(0.0, 5.0), (10.0, 1.0)],
            },
            GraphSeries {
                metric: "b".to_string(),
                points: vec![(5.0, 20.0)],
            },
        ];
        let (x, y) = series_bounds(&series).unwrap();
        assert_eq!(x, [0.0, 10.0]);
        assert_eq!(y, [1.0, 20.0]);
        assert!(series_bounds(&[]).is_none());
    }

    #[test]
    fn invalid_export_is_an_error() {
        assert!(ActivityData::from_json("{}").is_err());
        assert!(ActivityData::from_json("not json").is_err());
    }
}
