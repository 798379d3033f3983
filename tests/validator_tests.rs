//! Tests for Recipe Validation
//!
//! These tests verify:
//! - Per-type required keys and extra rules
//! - Issue ordering across a recipe
//! - Export gating semantics (errors block, warnings do not)

use installforge::{has_blocking, validate, Issue, IssueLevel, Recipe, Step};
use serde_json::json;

fn step(id: &str, step_type: &str, config: serde_json::Value) -> Step {
    Step {
        id: id.to_string(),
        name: format!("{} {}", step_type, id),
        step_type: step_type.to_string(),
        config: serde_json::from_value(config).expect("config object"),
    }
}

fn recipe(steps: Vec<Step>) -> Recipe {
    let mut recipe = Recipe::new_empty("p1", "demo");
    recipe.steps = steps;
    recipe
}

// =============================================================================
// Scenario Tests
// =============================================================================

#[test]
fn test_empty_recipe_has_no_issues() {
    assert!(validate(&recipe(vec![])).is_empty());
}

#[test]
fn test_single_mkdir_is_clean() {
    let r = recipe(vec![step("s1", "mkdir", json!({"path": "/opt/demo"}))]);
    assert!(validate(&r).is_empty());
}

#[test]
fn test_replace_missing_mode() {
    let r = recipe(vec![step(
        "s1",
        "replace",
        json!({"file": "/etc/app.conf", "pattern": "a", "replacement": "b"}),
    )]);
    let issues = validate(&r);
    assert_eq!(
        issues,
        vec![
            Issue::new(IssueLevel::Error, "s1", "mode is required"),
            Issue::new(IssueLevel::Error, "s1", "mode must be fixed or regex"),
        ]
    );
}

#[test]
fn test_rpm_mode_values() {
    for (mode, expected) in [("Upgrade", 0), ("UPGRADE", 0), ("install", 0), ("foo", 1)] {
        let r = recipe(vec![step("r", "rpm_install", json!({"rpms": ["a.rpm"], "mode": mode}))]);
        let issues = validate(&r);
        assert_eq!(issues.len(), expected, "mode {}", mode);
        if expected == 1 {
            assert_eq!(issues[0].level, IssueLevel::Error);
            assert_eq!(issues[0].message, "mode must be upgrade or install");
        }
    }
}

#[test]
fn test_unknown_type_warns_without_blocking() {
    let r = recipe(vec![step("x", "reboot_now", json!({"anything": 1}))]);
    let issues = validate(&r);
    assert_eq!(issues, vec![Issue::new(IssueLevel::Warn, "x", "unknown step type reboot_now")]);
    assert!(!has_blocking(&issues));
}

#[test]
fn test_full_recipe_mixed_issues() {
    let r = recipe(vec![
        step("a", "copy", json!({"src": "$ASSET_DIR/app.conf"})),
        step("b", "extract_tar_gz", json!({"src": "app.tgz", "dest": "/opt/demo"})),
        step("c", "run_cmd", json!({"cmd": "./post.sh", "cwd": "/opt/demo"})),
        step("d", "append_lines", json!({"file": "/etc/hosts", "lines": ["1.2.3.4 x"], "backup": false})),
    ]);
    let issues = validate(&r);
    let summary: Vec<(&str, IssueLevel)> =
        issues.iter().map(|i| (i.step_id.as_str(), i.level)).collect();
    assert_eq!(
        summary,
        vec![
            ("a", IssueLevel::Error),
            ("b", IssueLevel::Warn),
            ("d", IssueLevel::Warn),
        ]
    );
    assert!(has_blocking(&issues));
}

#[test]
fn test_warnings_only_do_not_block() {
    let r = recipe(vec![
        step("b", "extract_zip", json!({"src": "app.zip", "dest": "/opt/demo"})),
        step("c", "run_cmd", json!({"cmd": "true"})),
    ]);
    let issues = validate(&r);
    assert_eq!(issues.len(), 2);
    assert!(!has_blocking(&issues));
}

#[test]
fn test_config_parsed_from_json_file_shape() {
    let raw = r#"{
        "schema_version": "1.0",
        "project": {"id": "p", "name": "n", "description": "", "target": []},
        "vars": {},
        "steps": [
            {"id": "s1", "name": "perm", "type": "chmod", "config": {"path": "/opt/x", "mode": 755}},
            {"id": "s2", "name": "own", "type": "chown", "config": {"path": "/opt/x", "owner": ""}}
        ],
        "updatedAt": "2025-03-01T12:00:00Z"
    }"#;
    let r: Recipe = serde_json::from_str(raw).expect("parse");
    let issues = validate(&r);
    assert_eq!(issues, vec![Issue::new(IssueLevel::Error, "s2", "owner is required")]);
}
