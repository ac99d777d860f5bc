//! Activity chart: one line dataset per plotted metric over a date axis.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph, Widget},
};

use crate::activity::{ordinal_to_date, series_bounds, GraphSeries};
use crate::config::Theme;

/// Series colors, assigned by selection order (wraps past the end).
pub const SERIES_COLORS: [Color; 6] = [
    Color::Cyan,
    Color::Magenta,
    Color::Green,
    Color::Yellow,
    Color::Blue,
    Color::Red,
];

/// Pad a min/max pair so flat series and extreme points stay visible.
pub fn padded_bounds(min: f64, max: f64) -> [f64; 2] {
    if min == max {
        return [min - 1.0, max + 1.0];
    }
    let pad = (max - min) * 0.05;
    [min - pad, max + pad]
}

/// Three x-axis labels (min, mid, max ordinal) formatted as dates.
pub fn date_labels(x_bounds: [f64; 2], date_format: &str) -> Vec<String> {
    let mid = (x_bounds[0] + x_bounds[1]) / 2.0;
    [x_bounds[0], mid, x_bounds[1]]
        .iter()
        .map(|&ordinal| ordinal_to_date(ordinal).format(date_format).to_string())
        .collect()
}

fn value_labels(y_bounds: [f64; 2]) -> Vec<String> {
    let mid = (y_bounds[0] + y_bounds[1]) / 2.0;
    [y_bounds[0], mid, y_bounds[1]]
        .iter()
        .map(|v| format!("{v:.1}"))
        .collect()
}

/// Renders the activity graph for the currently selected metrics.
pub struct ActivityChart<'a> {
    series: &'a [GraphSeries],
    /// Display labels, same order as `series`.
    labels: &'a [String],
    theme: &'a Theme,
    date_format: &'a str,
    show_legend: bool,
}

impl<'a> ActivityChart<'a> {
    pub fn new(series: &'a [GraphSeries], labels: &'a [String], theme: &'a Theme) -> Self {
        Self {
            series,
            labels,
            theme,
            date_format: "%Y-%m-%d",
            show_legend: true,
        }
    }

    pub fn with_date_format(mut self, date_format: &'a str) -> Self {
        self.date_format = date_format;
        self
    }

    pub fn with_legend(mut self, show_legend: bool) -> Self {
        self.show_legend = show_legend;
        self
    }
}

impl Widget for &ActivityChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let text_secondary = self.theme.get("text_secondary");

        let Some(([x_min, x_max], [y_min, y_max])) = series_bounds(self.series) else {
            Paragraph::new("No measures to plot. Press 'a' to add a metric.")
                .style(Style::default().fg(text_secondary))
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL))
                .render(area, buf);
            return;
        };

        let x_bounds = [x_min, x_max];
        let y_bounds = padded_bounds(y_min, y_max);

        let datasets: Vec<Dataset> = self
            .series
            .iter()
            .enumerate()
            .map(|(i, s)| {
                let color = SERIES_COLORS[i % SERIES_COLORS.len()];
                let mut dataset = Dataset::default()
                    .marker(symbols::Marker::Braille)
                    .graph_type(GraphType::Line)
                    .style(Style::default().fg(color))
                    .data(&s.points);
                if self.show_legend {
                    let label = self
                        .labels
                        .get(i)
                        .cloned()
                        .unwrap_or_else(|| s.metric.clone());
                    dataset = dataset.name(label);
                }
                dataset
            })
            .collect();

        let axis_style = Style::default().fg(text_secondary);
        let chart = Chart::new(datasets)
            .block(Block::default().borders(Borders::ALL))
            .x_axis(
                Axis::default()
                    .style(axis_style)
                    .bounds(x_bounds)
                    .labels(date_labels(x_bounds, self.date_format)),
            )
            .y_axis(
                Axis::default()
                    .style(axis_style)
                    .bounds(y_bounds)
                    .labels(value_labels(y_bounds)),
            );
        chart.render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::{date_labels, padded_bounds};

    #[test]
    fn flat_series_gets_widened_bounds() {
        assert_eq!(padded_bounds(5.0, 5.0), [4.0, 6.0]);
    }

    #[test]
    fn bounds_pad_by_five_percent() {
        let [lo, hi] = padded_bounds(0.0, 100.0);
        assert_eq!(lo, -5.0);
        assert_eq!(hi, 105.0);
    }

    #[test]
    fn date_labels_span_the_range() {
        // 2024-01-01 is ordinal 19723.
        let labels = date_labels([19723.0, 19737.0], "%Y-%m-%d");
        assert_eq!(labels.len(), 3);
        assert_eq!(labels[0], "2024-01-01");
        assert_eq!(labels[2], "2024-01-15");
    }
}
