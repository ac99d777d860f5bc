//! Message bundle: translated UI strings with dotted-key lookup.
//!
//! The built-in bundle ships in the binary; a `messages.toml` in the config
//! directory overrides or extends individual entries.

use std::collections::HashMap;

use color_eyre::eyre::WrapErr;
use color_eyre::Result;

use crate::config::ConfigManager;

/// Built-in message bundle. Flat dotted keys, same shape as a user
/// `messages.toml` override file.
const DEFAULT_MESSAGES: &str = r#"
"cancel" = "Cancel"
"no_results" = "No results"

"project_activity.graphs.custom.add" = "Add metric"
"project_activity.graphs.custom.add_metric" = "Add a metric to the graph"
"project_activity.graphs.custom.search" = "Search for a metric by name"
"project_activity.graphs.custom.type_x_message" = "Only metrics of type {0} can be added to this graph"

"metric.type.INT" = "Integer"
"metric.type.FLOAT" = "Float"
"metric.type.PERCENT" = "Percentage"
"metric.type.RATING" = "Rating"
"metric.type.WORK_DUR" = "Work Duration"

"metric.ncloc.name" = "Lines of Code"
"metric.coverage.name" = "Coverage"
"metric.bugs.name" = "Bugs"
"metric.vulnerabilities.name" = "Vulnerabilities"
"metric.code_smells.name" = "Code Smells"
"metric.complexity.name" = "Cyclomatic Complexity"
"metric.duplicated_lines_density.name" = "Duplicated Lines (%)"
"metric.tests.name" = "Unit Tests"
"metric.test_success_density.name" = "Unit Test Success (%)"
"metric.reliability_rating.name" = "Reliability Rating"
"metric.security_rating.name" = "Security Rating"
"metric.sqale_rating.name" = "Maintainability Rating"
"#;

/// Translated message lookup. Missing entries fall back to the joined key,
/// so an incomplete bundle degrades to raw keys instead of failing.
#[derive(Debug, Clone, Default)]
pub struct MessageBundle {
    messages: HashMap<String, String>,
}

impl MessageBundle {
    /// Bundle with no entries; every lookup falls back to the key.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a flat `"dotted.key" = "message"` TOML document.
    pub fn from_toml(source: &str) -> Result<Self> {
        let messages: HashMap<String, String> =
            toml::from_str(source).wrap_err("Invalid message bundle")?;
        Ok(Self { messages })
    }

    /// The built-in bundle plus any `messages.toml` overrides from the
    /// config directory.
    pub fn load(config: &ConfigManager) -> Result<Self> {
        let mut bundle = Self::from_toml(DEFAULT_MESSAGES)?;
        let override_path = config.config_path("messages.toml");
        if override_path.exists() {
            let source = std::fs::read_to_string(&override_path)
                .wrap_err_with(|| format!("Could not read {}", override_path.display()))?;
            let overrides = Self::from_toml(&source)
                .wrap_err_with(|| format!("Could not parse {}", override_path.display()))?;
            bundle.messages.extend(overrides.messages);
        }
        Ok(bundle)
    }

    /// Look up the message for the given key parts joined with dots.
    /// Unknown keys translate to the joined key itself.
    pub fn translate(&self, parts: &[&str]) -> String {
        let key = parts.join(".");
        match self.messages.get(&key) {
            Some(message) => message.clone(),
            None => key,
        }
    }

    /// Like [`translate`](Self::translate) for a single key, substituting
    /// `{0}`, `{1}`, ... placeholders with the given parameters.
    pub fn translate_with_parameters(&self, key: &str, params: &[String]) -> String {
        let mut message = self.translate(&[key]);
        for (i, param) in params.iter().enumerate() {
            message = message.replace(&format!("{{{i}}}"), param);
        }
        message
    }
}
