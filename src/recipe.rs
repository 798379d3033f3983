//! Recipe data model.
//!
//! A [`Recipe`] is the unit of compilation: project metadata, variables and an
//! ordered list of [`Step`]s. Step configuration stays a loosely typed JSON
//! map because the set of meaningful keys depends on the step type.
//!
//! The persisted form is the JSON object used by the project store:
//!
//! ```json
//! {
//!   "schema_version": "1.0",
//!   "project": { "id": "...", "name": "demo", "description": "", "target": ["oracle_linux_6_9"] },
//!   "vars": { "INSTALL_ROOT": "/opt/demo", "LOG_DIR": "/var/log/asg" },
//!   "steps": [ { "id": "s1", "name": "Create root", "type": "mkdir", "config": { "path": "/opt/demo" } } ],
//!   "updatedAt": "2026-01-01T00:00:00Z"
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{AsRefStr, Display};

/// Schema tag written into new recipes
pub const SCHEMA_VERSION: &str = "1.0";

/// Targets assigned to a freshly created project
pub const DEFAULT_TARGETS: &[&str] = &["oracle_linux_6_9", "kylinsec_3_4"];

/// Default install root for new projects
pub const DEFAULT_INSTALL_ROOT: &str = "/opt/demo";

/// Log directory used when the recipe does not provide one
pub const DEFAULT_LOG_DIR: &str = "/var/log/asg";

/// Step configuration: key → loosely typed value
pub type StepConfig = BTreeMap<String, Value>;

/// Full declarative description of an installation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    #[serde(default)]
    pub schema_version: String,
    #[serde(default)]
    pub project: ProjectMeta,
    #[serde(default)]
    pub vars: BTreeMap<String, String>,
    #[serde(default)]
    pub steps: Vec<Step>,
    #[serde(rename = "updatedAt", default)]
    pub updated_at: DateTime<Utc>,
}

/// Project identity and metadata
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectMeta {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub target: Vec<String>,
}

/// One instruction in a recipe
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Step {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub step_type: String,
    #[serde(default)]
    pub config: StepConfig,
}

/// Severity of a validator finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Display, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum IssueLevel {
    /// Blocks export
    Error,
    /// Advisory only
    Warn,
}

/// A validator finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub level: IssueLevel,
    /// Originating step, empty for recipe-level issues
    #[serde(rename = "stepId", default)]
    pub step_id: String,
    pub message: String,
}

impl Issue {
    pub fn new(level: IssueLevel, step_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            step_id: step_id.into(),
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == IssueLevel::Error
    }
}

/// Returns true if any issue blocks export
pub fn has_blocking(issues: &[Issue]) -> bool {
    issues.iter().any(Issue::is_error)
}

impl Recipe {
    /// Starter recipe for a new project: default targets and vars, no steps.
    pub fn new_empty(project_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            project: ProjectMeta {
                id: project_id.into(),
                name: name.into(),
                description: String::new(),
                target: DEFAULT_TARGETS.iter().map(|t| t.to_string()).collect(),
            },
            vars: BTreeMap::from([
                ("INSTALL_ROOT".to_string(), DEFAULT_INSTALL_ROOT.to_string()),
                ("LOG_DIR".to_string(), DEFAULT_LOG_DIR.to_string()),
            ]),
            steps: Vec::new(),
            updated_at: Utc::now(),
        }
    }

    /// Random 32 hex digit project id
    pub fn generate_id() -> String {
        uuid::Uuid::new_v4().simple().to_string()
    }

    /// Log directory the generated script falls back to
    pub fn log_dir(&self) -> &str {
        match self.vars.get("LOG_DIR") {
            Some(dir) if !dir.is_empty() => dir,
            _ => DEFAULT_LOG_DIR,
        }
    }

    /// Canonical indented serialization used for audit and diffing
    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Save recipe to a JSON file, stamping `updatedAt`
    pub fn save_to_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.updated_at = Utc::now();
        let json = self
            .to_pretty_json()
            .context("Failed to serialize recipe to JSON")?;

        fs::write(&path, json)
            .with_context(|| format!("Failed to write recipe to {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Load recipe from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read recipe from {:?}", path.as_ref()))?;

        let recipe: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse recipe JSON in {:?}", path.as_ref()))?;

        Ok(recipe)
    }
}

// ============================================================================
// Config value helpers
// ============================================================================

/// Render a config value as text for presence checks and code generation.
///
/// Strings render as themselves, `null` as empty, lists as their elements
/// joined by a space, objects as compact JSON.
pub fn stringify(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items.iter().map(stringify).collect::<Vec<_>>().join(" "),
        Value::Object(_) => value.to_string(),
    }
}

/// Truthiness of a config value: `false`, `null`, `0`, `""`, `[]` and `{}` are false.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Typed read access over a step's config map
pub trait ConfigExt {
    /// Stringified value, empty when the key is absent
    fn text(&self, key: &str) -> String;
    /// Stringified value, `None` when absent or empty
    fn opt_text(&self, key: &str) -> Option<String>;
    /// Truthiness of the value, false when absent
    fn flag(&self, key: &str) -> bool;
    /// True only for an explicit `false` (bool or string)
    fn is_explicit_false(&self, key: &str) -> bool;
    /// List value; a string is split with `split`
    fn list(&self, key: &str, split: fn(&str) -> Vec<String>) -> Vec<String>;
}

impl ConfigExt for StepConfig {
    fn text(&self, key: &str) -> String {
        self.get(key).map(stringify).unwrap_or_default()
    }

    fn opt_text(&self, key: &str) -> Option<String> {
        Some(self.text(key)).filter(|s| !s.is_empty())
    }

    fn flag(&self, key: &str) -> bool {
        self.get(key).is_some_and(is_truthy)
    }

    fn is_explicit_false(&self, key: &str) -> bool {
        match self.get(key) {
            Some(Value::Bool(b)) => !*b,
            Some(Value::String(s)) => s.eq_ignore_ascii_case("false"),
            _ => false,
        }
    }

    fn list(&self, key: &str, split: fn(&str) -> Vec<String>) -> Vec<String> {
        match self.get(key) {
            Some(Value::Array(items)) => items
                .iter()
                .map(stringify)
                .filter(|s| !s.is_empty())
                .collect(),
            Some(Value::String(s)) => split(s),
            Some(Value::Null) | None => Vec::new(),
            Some(other) => vec![stringify(other)],
        }
    }
}

/// Split on whitespace (package lists)
pub fn split_words(s: &str) -> Vec<String> {
    s.split_whitespace().map(str::to_string).collect()
}

/// Split on newlines (file lines)
pub fn split_lines(s: &str) -> Vec<String> {
    s.lines().map(str::to_string).collect()
}
