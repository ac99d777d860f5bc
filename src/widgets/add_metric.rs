//! Add-metric dialog panel: search field, option list, type note, buttons.

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, StatefulWidget, Widget, Wrap},
};

use crate::add_metric_modal::{AddMetricFocus, AddMetricModal};
use crate::config::Theme;
use crate::l10n::MessageBundle;

/// Renders the add-metric dialog into the given side-panel area.
pub fn render_add_metric_panel(
    area: Rect,
    buf: &mut Buffer,
    modal: &mut AddMetricModal,
    theme: &Theme,
    messages: &MessageBundle,
) {
    modal.clamp_list_selection();

    let border_color = theme.get("modal_border");
    let active_color = theme.get("modal_border_active");
    let text_primary = theme.get("text_primary");
    let text_secondary = theme.get("text_secondary");
    let dimmed = theme.get("dimmed");

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(format!(
            " {} ",
            messages.translate(&["project_activity", "graphs", "custom", "add_metric"])
        ));
    let inner = block.inner(area);
    block.render(area, buf);

    let note_height = if modal.type_note.is_some() { 2 } else { 0 };
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Search label
            Constraint::Length(1), // Search input
            Constraint::Length(note_height),
            Constraint::Min(3),    // Options list
            Constraint::Length(1), // Buttons
        ])
        .split(inner);

    // Search field
    let search_focused = modal.focus == AddMetricFocus::Search;
    let label_style = if search_focused {
        Style::default().fg(active_color)
    } else {
        Style::default().fg(border_color)
    };
    Paragraph::new(messages.translate(&["project_activity", "graphs", "custom", "search"]))
        .style(label_style)
        .render(layout[0], buf);
    modal.search_input.set_focused(search_focused);
    (&modal.search_input).render(layout[1], buf);

    if let Some(note) = &modal.type_note {
        Paragraph::new(note.as_str())
            .style(Style::default().fg(text_secondary))
            .wrap(Wrap { trim: true })
            .render(layout[2], buf);
    }

    // Options list; the pending pick carries a filled marker.
    let options = modal.filtered_options();
    let pending = modal.pending().map(str::to_string);
    if options.is_empty() {
        Paragraph::new(messages.translate(&["no_results"]))
            .style(Style::default().fg(text_secondary))
            .render(layout[3], buf);
    } else {
        let items: Vec<ListItem> = options
            .iter()
            .map(|option| {
                let marker = if pending.as_deref() == Some(option.value.as_str()) {
                    "● "
                } else {
                    "○ "
                };
                ListItem::new(Line::from(vec![
                    Span::styled(marker, Style::default().fg(active_color)),
                    Span::styled(option.label.clone(), Style::default().fg(text_primary)),
                ]))
            })
            .collect();
        let highlight_style = if modal.focus == AddMetricFocus::Options {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        };
        let list = List::new(items).highlight_style(highlight_style);
        StatefulWidget::render(list, layout[3], buf, &mut modal.list_state);
    }

    // Buttons: Add (disabled until a pick exists) and Cancel
    let buttons = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Fill(1), Constraint::Fill(1)])
        .split(layout[4]);

    let add_style = if !modal.can_submit() {
        Style::default().fg(dimmed)
    } else if modal.focus == AddMetricFocus::Add {
        Style::default().fg(active_color).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(text_primary)
    };
    Paragraph::new(format!(
        "[ {} ]",
        messages.translate(&["project_activity", "graphs", "custom", "add"])
    ))
    .style(add_style)
    .centered()
    .render(buttons[0], buf);

    let cancel_style = if modal.focus == AddMetricFocus::Cancel {
        Style::default().fg(active_color).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(text_primary)
    };
    Paragraph::new(format!("[ {} ]", messages.translate(&["cancel"])))
        .style(cancel_style)
        .centered()
        .render(buttons[1], buf);
}
