//! Add-metric dialog: lets the user grow the graph by one metric series.

use ratatui::widgets::ListState;

use crate::catalog::{metric_options, Metric, MetricOption};
use crate::l10n::MessageBundle;
use crate::widgets::text_input::TextInput;

/// Focus area inside the add-metric dialog.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum AddMetricFocus {
    #[default]
    Search,
    Options,
    Add,
    Cancel,
}

/// Dialog lifecycle. A pending pick exists only while the dialog is open;
/// every transition back to Closed clears it.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub enum DialogState {
    #[default]
    Closed,
    Open { pending: Option<String> },
}

/// Add-metric dialog state: option list, search narrowing, and the single
/// tentative pick. Committing hands the picked key to the graph exactly
/// once; cancelling discards it.
#[derive(Default)]
pub struct AddMetricModal {
    pub state: DialogState,
    pub focus: AddMetricFocus,
    /// Options computed when the dialog opens (recomputed on every open).
    pub options: Vec<MetricOption>,
    /// Explanatory note shown when a type filter narrows the options.
    pub type_note: Option<String>,
    /// Search input narrowing the displayed options by label.
    pub search_input: TextInput,
    /// List state for the options list (index into filtered_options).
    pub list_state: ListState,
}

impl AddMetricModal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, DialogState::Open { .. })
    }

    /// The tentative pick, if any.
    pub fn pending(&self) -> Option<&str> {
        match &self.state {
            DialogState::Open { pending } => pending.as_deref(),
            DialogState::Closed => None,
        }
    }

    /// Open the dialog. The option list is computed here, from the catalog
    /// and selection state as they are right now, so a reopened dialog
    /// never shows stale candidates. The pending pick always starts empty.
    pub fn open(
        &mut self,
        metrics: &[Metric],
        type_filter: Option<&[String]>,
        selected: &[String],
        messages: &MessageBundle,
    ) {
        self.state = DialogState::Open { pending: None };
        self.focus = AddMetricFocus::Search;
        self.options = metric_options(metrics, type_filter, selected, messages);
        self.type_note = match type_filter {
            Some(types) if !types.is_empty() => {
                let mut names: Vec<String> = types
                    .iter()
                    .map(|t| messages.translate(&["metric", "type", t]))
                    .collect();
                names.sort();
                Some(messages.translate_with_parameters(
                    "project_activity.graphs.custom.type_x_message",
                    &[names.join(", ")],
                ))
            }
            _ => None,
        };
        self.search_input.set_value(String::new());
        self.list_state
            .select(if self.options.is_empty() { None } else { Some(0) });
    }

    /// Options narrowed by the current search string (case-insensitive
    /// substring over labels). Narrowing affects display only.
    pub fn filtered_options(&self) -> Vec<MetricOption> {
        let q = self.search_input.value().trim().to_lowercase();
        if q.is_empty() {
            return self.options.clone();
        }
        self.options
            .iter()
            .filter(|o| o.label.to_lowercase().contains(&q))
            .cloned()
            .collect()
    }

    /// Clamp the list highlight to the filtered length (e.g. after the
    /// search string changes).
    pub fn clamp_list_selection(&mut self) {
        let len = self.filtered_options().len();
        if let Some(s) = self.list_state.selected() {
            if s >= len {
                self.list_state
                    .select(if len == 0 { None } else { Some(len - 1) });
            }
        } else if len > 0 {
            self.list_state.select(Some(0));
        }
    }

    /// Move the options highlight down (highlight only; pick with space/enter).
    pub fn list_down(&mut self) {
        let len = self.filtered_options().len();
        if len == 0 {
            return;
        }
        let i = self
            .list_state
            .selected()
            .unwrap_or(0)
            .saturating_add(1)
            .min(len - 1);
        self.list_state.select(Some(i));
    }

    /// Move the options highlight up.
    pub fn list_up(&mut self) {
        let len = self.filtered_options().len();
        if len == 0 {
            return;
        }
        let i = self.list_state.selected().unwrap_or(0).saturating_sub(1);
        self.list_state.select(Some(i));
    }

    /// Pick the highlighted option as the pending selection.
    pub fn pick_highlighted(&mut self) {
        let display = self.filtered_options();
        if let Some(i) = self.list_state.selected() {
            if let Some(option) = display.get(i) {
                let key = option.value.clone();
                self.pick(&key);
            }
        }
    }

    /// Set the pending selection to `key`. Replaces any previous pick; at
    /// most one pending value exists. Keys not offered by the dialog are
    /// ignored, as is a pick while the dialog is closed.
    pub fn pick(&mut self, key: &str) {
        if !self.is_open() || !self.options.iter().any(|o| o.value == key) {
            return;
        }
        self.state = DialogState::Open {
            pending: Some(key.to_string()),
        };
    }

    /// Whether the submit affordance is enabled: a pending pick exists.
    pub fn can_submit(&self) -> bool {
        matches!(self.state, DialogState::Open { pending: Some(_) })
    }

    /// Commit the pending pick: hand it to `add_metric` exactly once and
    /// close. Without a pending pick this is inert and the dialog stays
    /// open (the submit affordance is disabled in that state).
    pub fn submit<F: FnOnce(&str)>(&mut self, add_metric: F) {
        if let DialogState::Open { pending: Some(key) } = &self.state {
            let key = key.clone();
            add_metric(&key);
            self.close();
        }
    }

    /// Discard the pending pick and close. Never commits.
    pub fn cancel(&mut self) {
        self.close();
    }

    fn close(&mut self) {
        self.state = DialogState::Closed;
        self.focus = AddMetricFocus::Search;
        self.options.clear();
        self.type_note = None;
        self.search_input.set_value(String::new());
        self.list_state.select(None);
    }

    pub fn next_focus(&mut self) {
        self.focus = match self.focus {
            AddMetricFocus::Search => AddMetricFocus::Options,
            AddMetricFocus::Options => AddMetricFocus::Add,
            AddMetricFocus::Add => AddMetricFocus::Cancel,
            AddMetricFocus::Cancel => AddMetricFocus::Search,
        };
    }

    pub fn prev_focus(&mut self) {
        self.focus = match self.focus {
            AddMetricFocus::Search => AddMetricFocus::Cancel,
            AddMetricFocus::Options => AddMetricFocus::Search,
            AddMetricFocus::Add => AddMetricFocus::Options,
            AddMetricFocus::Cancel => AddMetricFocus::Add,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::{AddMetricFocus, AddMetricModal, DialogState};
    use crate::catalog::Metric;
    use crate::l10n::MessageBundle;

    fn catalog() -> Vec<Metric> {
        ["coverage", "bugs", "tests"]
            .iter()
            .map(|key| Metric {
                key: (*key).to_string(),
                name: key.to_uppercase(),
                metric_type: "INT".to_string(),
                hidden: false,
                custom: true,
            })
            .collect()
    }

    fn open_modal(modal: &mut AddMetricModal) {
        modal.open(&catalog(), None, &[], &MessageBundle::empty());
    }

    #[test]
    fn open_starts_with_empty_pending() {
        let mut modal = AddMetricModal::new();
        open_modal(&mut modal);
        assert!(modal.is_open());
        assert_eq!(modal.pending(), None);
        assert_eq!(modal.focus, AddMetricFocus::Search);
        assert_eq!(modal.list_state.selected(), Some(0));
    }

    #[test]
    fn reopen_clears_stale_pending() {
        let mut modal = AddMetricModal::new();
        open_modal(&mut modal);
        modal.pick("coverage");
        modal.cancel();
        open_modal(&mut modal);
        assert_eq!(modal.pending(), None);
    }

    #[test]
    fn pick_replaces_previous_pick() {
        let mut modal = AddMetricModal::new();
        open_modal(&mut modal);
        modal.pick("coverage");
        assert_eq!(modal.pending(), Some("coverage"));
        modal.pick("bugs");
        assert_eq!(modal.pending(), Some("bugs"));
    }

    #[test]
    fn pick_ignores_keys_not_offered() {
        let mut modal = AddMetricModal::new();
        open_modal(&mut modal);
        modal.pick("nonsense");
        assert_eq!(modal.pending(), None);
    }

    #[test]
    fn pick_while_closed_is_ignored() {
        let mut modal = AddMetricModal::new();
        modal.pick("coverage");
        assert_eq!(modal.state, DialogState::Closed);
    }

    #[test]
    fn cancel_never_commits() {
        let mut modal = AddMetricModal::new();
        open_modal(&mut modal);
        modal.pick("coverage");
        let mut commits = 0;
        // cancel() takes no callback at all; submit after cancel must not fire.
        modal.cancel();
        modal.submit(|_| commits += 1);
        assert_eq!(commits, 0);
        assert_eq!(modal.state, DialogState::Closed);
    }

    #[test]
    fn submit_commits_exactly_once_with_last_pick() {
        let mut modal = AddMetricModal::new();
        open_modal(&mut modal);
        modal.pick("coverage");
        modal.pick("bugs");
        let mut committed = Vec::new();
        modal.submit(|key| committed.push(key.to_string()));
        assert_eq!(committed, vec!["bugs"]);
        assert!(!modal.is_open());
        assert_eq!(modal.pending(), None);
    }

    #[test]
    fn submit_without_pick_is_inert() {
        let mut modal = AddMetricModal::new();
        open_modal(&mut modal);
        assert!(!modal.can_submit());
        let mut commits = 0;
        modal.submit(|_| commits += 1);
        assert_eq!(commits, 0);
        assert!(modal.is_open());
    }

    #[test]
    fn options_are_recomputed_on_each_open() {
        let mut modal = AddMetricModal::new();
        let metrics = catalog();
        let filter = vec!["INT".to_string()];
        let messages = MessageBundle::empty();

        modal.open(&metrics, Some(&filter), &[], &messages);
        assert_eq!(modal.options.len(), 3);
        modal.cancel();

        // "coverage" joined the graph since the last open.
        let selected = vec!["coverage".to_string()];
        modal.open(&metrics, Some(&filter), &selected, &messages);
        assert_eq!(modal.options.len(), 2);
        assert!(!modal.options.iter().any(|o| o.value == "coverage"));
    }

    #[test]
    fn search_narrows_displayed_options() {
        let mut modal = AddMetricModal::new();
        open_modal(&mut modal);
        modal.search_input.set_value("COV".to_string());
        let display = modal.filtered_options();
        assert_eq!(display.len(), 1);
        assert_eq!(display[0].value, "coverage");
        modal.clamp_list_selection();
        assert_eq!(modal.list_state.selected(), Some(0));
    }

    #[test]
    fn list_highlight_stays_in_bounds() {
        let mut modal = AddMetricModal::new();
        open_modal(&mut modal);
        for _ in 0..10 {
            modal.list_down();
        }
        assert_eq!(modal.list_state.selected(), Some(2));
        for _ in 0..10 {
            modal.list_up();
        }
        assert_eq!(modal.list_state.selected(), Some(0));
    }

    #[test]
    fn pick_highlighted_uses_filtered_order() {
        let mut modal = AddMetricModal::new();
        open_modal(&mut modal);
        modal.search_input.set_value("bug".to_string());
        modal.clamp_list_selection();
        modal.pick_highlighted();
        assert_eq!(modal.pending(), Some("bugs"));
    }

    #[test]
    fn focus_cycles_through_dialog_areas() {
        let mut modal = AddMetricModal::new();
        open_modal(&mut modal);
        let forward = [
            AddMetricFocus::Options,
            AddMetricFocus::Add,
            AddMetricFocus::Cancel,
            AddMetricFocus::Search,
        ];
        for expected in forward {
            modal.next_focus();
            assert_eq!(modal.focus, expected);
        }
        modal.prev_focus();
        assert_eq!(modal.focus, AddMetricFocus::Cancel);
    }

    #[test]
    fn type_note_lists_sorted_translated_types() {
        let mut modal = AddMetricModal::new();
        let messages = MessageBundle::from_toml(
            r#"
            "metric.type.INT" = "Integer"
            "metric.type.PERCENT" = "Percentage"
            "project_activity.graphs.custom.type_x_message" = "Only {0} here"
            "#,
        )
        .unwrap();
        let filter = vec!["PERCENT".to_string(), "INT".to_string()];
        modal.open(&catalog(), Some(&filter), &[], &messages);
        assert_eq!(
            modal.type_note.as_deref(),
            Some("Only Integer, Percentage here")
        );
    }

    #[test]
    fn no_type_note_without_filter() {
        let mut modal = AddMetricModal::new();
        open_modal(&mut modal);
        assert!(modal.type_note.is_none());

        modal.cancel();
        modal.open(&catalog(), Some(&[]), &[], &MessageBundle::empty());
        assert!(modal.type_note.is_none());
    }
}
