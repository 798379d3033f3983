//! Recipe validator.
//!
//! Checks every step against the rule set registered for its `type` string and
//! reports problems as [`Issue`] values. Validation never fails: a missing or
//! malformed value is itself an issue.
//!
//! # Design
//!
//! - **Data-driven**: rules live in the [`RULES`] table keyed by the type
//!   string, and operate on the raw config map. Adding a step kind means adding
//!   a row, not touching the typed generator.
//! - **Order preserving**: issues come out in step order; within a step,
//!   required keys first (in table order) then the extra checks.
//! - **Independent**: a step's issues depend only on that step.
//!
//! # Rules
//!
//! | Type | Required | Extra |
//! |------|----------|-------|
//! | `mkdir` | path | |
//! | `copy` | src, dest | |
//! | `chmod` | path, mode | |
//! | `chown` | path, owner | |
//! | `extract_tar_gz`, `extract_zip` | src, dest | warn without `creates` |
//! | `rpm_install` | rpms, mode | mode ∈ {upgrade, install} |
//! | `append_lines` | file, lines | warn when backup disabled |
//! | `delete_lines` | file, match, mode | mode ∈ {fixed, regex}; backup warn |
//! | `replace` | file, pattern, replacement, mode | mode ∈ {fixed, regex}; backup warn |
//! | `run_cmd` | cmd | warn without `cwd` |
//! | `service_sysv`, `service_systemd` | src, name | |
//! | `auto_service` | name, sysv_src, systemd_src | |
//!
//! Presence means "not an empty string": `null`, `[]` and `false` are all
//! present. The mode check runs even when `mode` is absent, so a missing mode yields
//! both "mode is required" and the mode-validity error.

use serde_json::Value;
use tracing::debug;

use crate::recipe::{stringify, Issue, IssueLevel, Recipe, Step, StepConfig};

/// An additional check run after the required-key checks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    /// Warn when `key` is absent from the config
    WarnIfAbsent {
        key: &'static str,
        message: &'static str,
    },
    /// Error unless `key`, lowercased, is one of `allowed`
    OneOf {
        key: &'static str,
        allowed: &'static [&'static str],
        message: &'static str,
    },
    /// Warn when `backup` is present and not `true`
    BackupDisabled,
}

/// Rules for one step type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepRules {
    pub required: &'static [&'static str],
    pub checks: &'static [Check],
}

const CREATES_WARNING: Check = Check::WarnIfAbsent {
    key: "creates",
    message: "creates is not set; idempotency may be improved",
};

const MATCH_MODE: Check = Check::OneOf {
    key: "mode",
    allowed: &["fixed", "regex"],
    message: "mode must be fixed or regex",
};

/// Rule table keyed by step type string
pub const RULES: &[(&str, StepRules)] = &[
    ("mkdir", StepRules { required: &["path"], checks: &[] }),
    ("copy", StepRules { required: &["src", "dest"], checks: &[] }),
    ("chmod", StepRules { required: &["path", "mode"], checks: &[] }),
    ("chown", StepRules { required: &["path", "owner"], checks: &[] }),
    ("extract_tar_gz", StepRules { required: &["src", "dest"], checks: &[CREATES_WARNING] }),
    ("extract_zip", StepRules { required: &["src", "dest"], checks: &[CREATES_WARNING] }),
    (
        "rpm_install",
        StepRules {
            required: &["rpms", "mode"],
            checks: &[Check::OneOf {
                key: "mode",
                allowed: &["upgrade", "install"],
                message: "mode must be upgrade or install",
            }],
        },
    ),
    (
        "append_lines",
        StepRules { required: &["file", "lines"], checks: &[Check::BackupDisabled] },
    ),
    (
        "delete_lines",
        StepRules {
            required: &["file", "match", "mode"],
            checks: &[MATCH_MODE, Check::BackupDisabled],
        },
    ),
    (
        "replace",
        StepRules {
            required: &["file", "pattern", "replacement", "mode"],
            checks: &[MATCH_MODE, Check::BackupDisabled],
        },
    ),
    (
        "run_cmd",
        StepRules {
            required: &["cmd"],
            checks: &[Check::WarnIfAbsent {
                key: "cwd",
                message: "cwd is not set; command will run from script directory",
            }],
        },
    ),
    ("service_sysv", StepRules { required: &["src", "name"], checks: &[] }),
    ("service_systemd", StepRules { required: &["src", "name"], checks: &[] }),
    (
        "auto_service",
        StepRules { required: &["name", "sysv_src", "systemd_src"], checks: &[] },
    ),
];

/// Look up the rules for a step type
pub fn rules_for(step_type: &str) -> Option<&'static StepRules> {
    RULES
        .iter()
        .find(|(name, _)| *name == step_type)
        .map(|(_, rules)| rules)
}

/// Validate a whole recipe: the concatenation of each step's issues, in order.
pub fn validate(recipe: &Recipe) -> Vec<Issue> {
    let issues: Vec<Issue> = recipe.steps.iter().flat_map(validate_step).collect();
    debug!(
        project = %recipe.project.id,
        steps = recipe.steps.len(),
        issues = issues.len(),
        "validated recipe"
    );
    issues
}

/// Validate one step in isolation
pub fn validate_step(step: &Step) -> Vec<Issue> {
    let mut issues = Vec::new();
    let mut add = |level: IssueLevel, message: String| {
        issues.push(Issue::new(level, step.id.clone(), message));
    };

    let Some(rules) = rules_for(&step.step_type) else {
        add(IssueLevel::Warn, format!("unknown step type {}", step.step_type));
        return issues;
    };

    for key in rules.required {
        if !is_present(&step.config, key) {
            add(IssueLevel::Error, format!("{} is required", key));
        }
    }

    for check in rules.checks {
        match *check {
            Check::WarnIfAbsent { key, message } => {
                if !step.config.contains_key(key) {
                    add(IssueLevel::Warn, message.to_string());
                }
            }
            Check::OneOf { key, allowed, message } => {
                let value = step.config.get(key).map(rule_text).unwrap_or_default();
                if !allowed.contains(&value.to_lowercase().as_str()) {
                    add(IssueLevel::Error, message.to_string());
                }
            }
            Check::BackupDisabled => {
                if step
                    .config
                    .get("backup")
                    .is_some_and(|v| *v != Value::Bool(true))
                {
                    add(IssueLevel::Warn, "backup is disabled; risk of data loss".to_string());
                }
            }
        }
    }

    issues
}

/// A required key is present when it exists and its text is not empty.
fn is_present(config: &StepConfig, key: &str) -> bool {
    config.get(key).is_some_and(|v| !rule_text(v).is_empty())
}

/// Text of a config value as the rules see it.
///
/// Differs from [`stringify`] for containers: `null` is `<nil>`, lists and
/// maps keep their brackets. So `[]` and `null` count as present, and a list
/// never matches a mode name. Only an empty string is missing.
fn rule_text(value: &Value) -> String {
    match value {
        Value::Null => "<nil>".to_string(),
        Value::Array(items) => format!(
            "[{}]",
            items.iter().map(rule_text).collect::<Vec<_>>().join(" ")
        ),
        Value::Object(map) => format!(
            "map[{}]",
            map.iter()
                .map(|(k, v)| format!("{}:{}", k, rule_text(v)))
                .collect::<Vec<_>>()
                .join(" ")
        ),
        scalar => stringify(scalar),
    }
}
