use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::path::PathBuf;
use std::sync::mpsc::Sender;

use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};

use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

pub mod activity;
pub mod add_metric_modal;
pub mod catalog;
pub mod config;
pub mod graph;
pub mod l10n;
pub mod widgets;

pub use config::{
    rgb_to_256_color, rgb_to_basic_ansi, AppConfig, ColorParser, ConfigManager, Theme,
};
pub use graph::{can_add_series, GraphConfig, MAX_GRAPH_SERIES};
pub use l10n::MessageBundle;

use activity::ActivityData;
use add_metric_modal::{AddMetricFocus, AddMetricModal};
use catalog::metric_label;
use widgets::add_metric::render_add_metric_panel;
use widgets::chart::ActivityChart;
use widgets::controls::Controls;
use widgets::text_input::TextInputEvent;

/// Application name used for the config directory and other app-specific paths
pub const APP_NAME: &str = "metrui";

/// Width of the add-metric side panel.
const ADD_METRIC_PANEL_WIDTH: u16 = 44;

pub enum AppEvent {
    Key(KeyEvent),
    Open(PathBuf),
    Exit,
    Crash(String),
    Resize(u16, u16), // resized (width, height)
}

#[derive(Debug, Default, PartialEq, Eq)]
pub enum InputMode {
    #[default]
    Normal,
    AddingMetric,
}

#[derive(Default)]
struct DebugState {
    enabled: bool,
    num_frames: u64,
    last_key: String,
}

pub struct App {
    pub activity: Option<ActivityData>,
    path: Option<PathBuf>,
    events: Sender<AppEvent>,
    pub input_mode: InputMode,
    pub graph: GraphConfig,
    pub add_metric_modal: AddMetricModal,
    pub messages: MessageBundle,
    show_help: bool,
    debug: DebugState,
    theme: Theme,
    config: AppConfig,
}

impl App {
    pub fn new(events: Sender<AppEvent>) -> App {
        let theme = Theme::from_config(&AppConfig::default().theme).unwrap_or_else(|e| {
            eprintln!("Warning: Failed to create default theme: {}. Using fallback.", e);
            Theme::default()
        });
        Self::new_with_config(events, theme, AppConfig::default(), MessageBundle::empty())
    }

    pub fn new_with_config(
        events: Sender<AppEvent>,
        theme: Theme,
        config: AppConfig,
        messages: MessageBundle,
    ) -> App {
        let type_filter = if config.graph.type_filter.is_empty() {
            None
        } else {
            Some(config.graph.type_filter.clone())
        };
        App {
            activity: None,
            path: None,
            events,
            input_mode: InputMode::Normal,
            graph: GraphConfig::new(config.graph.metrics.clone(), type_filter),
            add_metric_modal: AddMetricModal::new(),
            messages,
            show_help: false,
            debug: DebugState {
                enabled: config.debug.enabled,
                ..DebugState::default()
            },
            theme,
            config,
        }
    }

    pub fn send_event(&mut self, event: AppEvent) -> color_eyre::Result<()> {
        self.events.send(event)?;
        Ok(())
    }

    pub fn enable_debug(&mut self) {
        self.debug.enabled = true;
    }

    /// Replace the startup selection (CLI flags take precedence over the
    /// config file; applied before the activity file is opened).
    pub fn override_graph(&mut self, metrics: Vec<String>, type_filter: Option<Vec<String>>) {
        if !metrics.is_empty() {
            self.graph.selected_metrics = metrics;
        }
        if type_filter.is_some() {
            self.graph.type_filter = type_filter;
        }
    }

    fn color(&self, name: &str) -> ratatui::style::Color {
        self.theme.get(name)
    }

    /// Handle an application event. May return a follow-up event for the
    /// main loop to enqueue.
    pub fn event(&mut self, event: &AppEvent) -> Option<AppEvent> {
        match event {
            AppEvent::Key(key) => self.handle_key(key),
            AppEvent::Open(path) => {
                match ActivityData::from_path(path) {
                    Ok(data) => {
                        self.graph.sanitize(data.metrics());
                        self.activity = Some(data);
                        self.path = Some(path.clone());
                        None
                    }
                    Err(e) => Some(AppEvent::Crash(format!("{e:#}"))),
                }
            }
            AppEvent::Resize(_, _) => None,
            // Exit and Crash are handled by the main loop.
            AppEvent::Exit | AppEvent::Crash(_) => None,
        }
    }

    fn handle_key(&mut self, event: &KeyEvent) -> Option<AppEvent> {
        self.debug.last_key = format!("{:?}", event.code);

        if event.code == KeyCode::Char('c') && event.modifiers.contains(KeyModifiers::CONTROL) {
            return Some(AppEvent::Exit);
        }

        if self.show_help {
            // Any dismissal key closes the overlay; everything else is ignored.
            if matches!(event.code, KeyCode::Esc | KeyCode::Char('q') | KeyCode::Enter) {
                self.show_help = false;
            }
            return None;
        }

        if event.code == KeyCode::Char('h') && event.modifiers.contains(KeyModifiers::CONTROL) {
            self.show_help = true;
            return None;
        }

        match self.input_mode {
            InputMode::Normal => self.handle_normal_key(event),
            InputMode::AddingMetric => self.handle_add_metric_key(event),
        }
    }

    fn handle_normal_key(&mut self, event: &KeyEvent) -> Option<AppEvent> {
        match event.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => Some(AppEvent::Exit),
            KeyCode::Char('a') => {
                self.open_add_metric_dialog();
                None
            }
            _ => None,
        }
    }

    /// Activate the add-metric trigger. Inert while the graph is at the
    /// series limit (the trigger renders dimmed in that state) or before
    /// an activity file is loaded.
    fn open_add_metric_dialog(&mut self) {
        let Some(activity) = &self.activity else {
            return;
        };
        if !self.graph.can_add_metric() {
            return;
        }
        self.add_metric_modal.open(
            activity.metrics(),
            self.graph.type_filter.as_deref(),
            &self.graph.selected_metrics,
            &self.messages,
        );
        self.input_mode = InputMode::AddingMetric;
    }

    fn handle_add_metric_key(&mut self, event: &KeyEvent) -> Option<AppEvent> {
        match event.code {
            KeyCode::Esc => {
                self.add_metric_modal.cancel();
                self.input_mode = InputMode::Normal;
            }
            KeyCode::Tab => self.add_metric_modal.next_focus(),
            KeyCode::BackTab => self.add_metric_modal.prev_focus(),
            _ => match self.add_metric_modal.focus {
                AddMetricFocus::Search => match self.add_metric_modal.search_input.handle_key(event) {
                    TextInputEvent::Submit => self.add_metric_modal.focus = AddMetricFocus::Options,
                    TextInputEvent::Cancel => {
                        self.add_metric_modal.cancel();
                        self.input_mode = InputMode::Normal;
                    }
                    TextInputEvent::None => self.add_metric_modal.clamp_list_selection(),
                },
                AddMetricFocus::Options => match event.code {
                    KeyCode::Down | KeyCode::Char('j') => self.add_metric_modal.list_down(),
                    KeyCode::Up | KeyCode::Char('k') => self.add_metric_modal.list_up(),
                    KeyCode::Char(' ') | KeyCode::Enter => self.add_metric_modal.pick_highlighted(),
                    _ => {}
                },
                AddMetricFocus::Add => {
                    if event.code == KeyCode::Enter {
                        let graph = &mut self.graph;
                        self.add_metric_modal.submit(|key| graph.add_metric(key));
                        // An inert submit (no pick yet) keeps the dialog open.
                        if !self.add_metric_modal.is_open() {
                            self.input_mode = InputMode::Normal;
                        }
                    }
                }
                AddMetricFocus::Cancel => {
                    if event.code == KeyCode::Enter {
                        self.add_metric_modal.cancel();
                        self.input_mode = InputMode::Normal;
                    }
                }
            },
        }
        None
    }

    /// Display labels for the plotted series, in selection order.
    fn series_labels(&self) -> Vec<String> {
        let Some(activity) = &self.activity else {
            return Vec::new();
        };
        self.graph
            .selected_metrics
            .iter()
            .map(|key| match activity.metric(key) {
                Some(metric) => metric_label(metric, &self.messages),
                None => key.clone(),
            })
            .collect()
    }

    fn render_help(&self, area: Rect, buf: &mut Buffer) {
        const HELP_TEXT: &str = "\
Keys:
  a            Open the add-metric dialog (disabled at 6 series)
  q            Quit
  Ctrl+H       This help

Add-metric dialog:
  Tab/S-Tab    Move focus (Search, Options, Add, Cancel)
  Up/Down j/k  Move the highlight in the options list
  Space/Enter  Pick the highlighted metric
  Enter on Add Commit the pick and close
  Esc          Cancel without adding

Press Esc or Enter to close this help.";

        let width = area.width.min(60);
        let height = area.height.min(18);
        let popup = Rect {
            x: area.x + (area.width.saturating_sub(width)) / 2,
            y: area.y + (area.height.saturating_sub(height)) / 2,
            width,
            height,
        };
        Clear.render(popup, buf);
        Paragraph::new(HELP_TEXT)
            .style(Style::default().fg(self.color("text_primary")))
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(self.color("modal_border")))
                    .title(" Help "),
            )
            .render(popup, buf);
    }
}

impl Widget for &mut App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.debug.num_frames += 1;

        // Background for the whole application area
        Block::default()
            .style(Style::default().bg(self.color("background")))
            .render(area, buf);

        let mut constraints = vec![
            Constraint::Length(1), // Title
            Constraint::Fill(1),   // Graph (and dialog panel)
            Constraint::Length(1), // Controls
        ];
        if self.debug.enabled {
            constraints.push(Constraint::Length(1));
        }
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        // Title row
        let title = match &self.activity {
            Some(activity) => format!(" metrui: {}", activity.project),
            None => " metrui".to_string(),
        };
        Paragraph::new(title)
            .style(
                Style::default()
                    .fg(self.color("title_bar"))
                    .bg(self.color("controls_bg"))
                    .add_modifier(Modifier::BOLD),
            )
            .render(layout[0], buf);

        // Graph area, with the dialog as a right-hand panel when open
        let main_area = layout[1];
        let mut chart_area = main_area;
        let mut panel_area = Rect::default();
        if self.add_metric_modal.is_open() {
            let chunks = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([
                    Constraint::Min(0),
                    Constraint::Length(ADD_METRIC_PANEL_WIDTH),
                ])
                .split(main_area);
            chart_area = chunks[0];
            panel_area = chunks[1];
        }

        match &self.activity {
            Some(activity) => {
                let series = activity.chart_series(&self.graph.selected_metrics);
                let labels = self.series_labels();
                ActivityChart::new(&series, &labels, &self.theme)
                    .with_date_format(&self.config.ui.date_format)
                    .with_legend(self.config.ui.show_legend)
                    .render(chart_area, buf);
            }
            None => {
                Paragraph::new("No activity loaded")
                    .style(Style::default().fg(self.color("text_secondary")))
                    .render(chart_area, buf);
            }
        }

        if self.add_metric_modal.is_open() {
            render_add_metric_panel(
                panel_area,
                buf,
                &mut self.add_metric_modal,
                &self.theme,
                &self.messages,
            );
        }

        Controls::new()
            .with_series_count(self.graph.selected_metrics.len())
            .with_add_enabled(self.activity.is_some() && self.graph.can_add_metric())
            .with_dimmed(self.add_metric_modal.is_open())
            .render(layout[2], buf);

        if self.debug.enabled {
            let path = self
                .path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default();
            Paragraph::new(format!(
                "frames: {} | last key: {} | {}",
                self.debug.num_frames, self.debug.last_key, path
            ))
            .style(Style::default().fg(self.color("dimmed")))
            .render(layout[layout.len() - 1], buf);
        }

        if self.show_help {
            self.render_help(area, buf);
        }
    }
}
