use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style, Stylize},
    widgets::{Paragraph, Widget},
};

use crate::graph::MAX_GRAPH_SERIES;

/// Bottom key-hint bar. The add-metric hint dims once the graph is full.
#[derive(Default)]
pub struct Controls {
    pub series_count: Option<usize>,
    pub add_enabled: bool,
    pub dimmed: bool,
}

impl Controls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_series_count(mut self, series_count: usize) -> Self {
        self.series_count = Some(series_count);
        self
    }

    pub fn with_add_enabled(mut self, add_enabled: bool) -> Self {
        self.add_enabled = add_enabled;
        self
    }

    pub fn with_dimmed(mut self, dimmed: bool) -> Self {
        self.dimmed = dimmed;
        self
    }
}

impl Widget for &Controls {
    fn render(self, area: Rect, buf: &mut Buffer) {
        const CONTROLS: [(&str, &str); 3] = [
            ("a", "Add metric"),
            ("^h", "Help"),
            ("q", "Quit"),
        ];

        let mut constraints = CONTROLS.iter().fold(vec![], |mut acc, (key, action)| {
            acc.push(Constraint::Length(key.chars().count() as u16 + 2));
            acc.push(Constraint::Length(action.chars().count() as u16 + 1));
            acc
        });

        // Add space for the series count if available
        if self.series_count.is_some() {
            constraints.push(Constraint::Length(14)); // Space for "Series: x/y"
        }
        constraints.push(Constraint::Fill(1)); // Fill the remaining space

        let layout = Layout::new(Direction::Horizontal, constraints).split(area);
        let color = Color::DarkGray;

        let base_style = if self.dimmed {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        for (i, (key, action)) in CONTROLS.iter().enumerate() {
            // The add-metric trigger goes dim when the series limit is reached.
            let style = if *key == "a" && !self.add_enabled {
                Style::default().fg(Color::DarkGray)
            } else {
                base_style
            };
            let j = i * 2;
            Paragraph::new(*key)
                .style(style.bold())
                .centered()
                .render(layout[j], buf);
            Paragraph::new(*action)
                .style(style.fg(color))
                .render(layout[j + 1], buf);
        }

        if let Some(series_count) = self.series_count {
            Paragraph::new(format!("Series: {series_count}/{MAX_GRAPH_SERIES}"))
                .style(base_style.fg(color))
                .render(layout[CONTROLS.len() * 2], buf);
        }
    }
}
