//! Property-Based Tests for InstallForge
//!
//! Uses proptest for testing invariants:
//! - Issue order follows step order; reordering never changes issue content
//! - `render(r).issues == validate(r)`
//! - Mode checks are case-insensitive
//! - Step type names round-trip

use installforge::{render, validate, validate_step, Recipe, Step, StepType};
use proptest::prelude::*;
use serde_json::{json, Value};
use strum::IntoEnumIterator;

// =============================================================================
// Strategies
// =============================================================================

const TYPES: &[&str] = &[
    "mkdir",
    "copy",
    "chmod",
    "chown",
    "extract_tar_gz",
    "extract_zip",
    "rpm_install",
    "append_lines",
    "delete_lines",
    "replace",
    "run_cmd",
    "service_sysv",
    "service_systemd",
    "auto_service",
    "not_a_type",
];

const KEYS: &[&str] = &[
    "path", "src", "dest", "mode", "owner", "creates", "rpms", "file", "lines", "match",
    "pattern", "replacement", "cmd", "cwd", "name", "sysv_src", "systemd_src", "backup",
];

fn value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(json!("")),
        "[a-zA-Z0-9/_.]{1,12}".prop_map(Value::from),
        any::<bool>().prop_map(Value::from),
        Just(json!(["a.rpm", "b.rpm"])),
        Just(json!("upgrade")),
        Just(json!("regex")),
    ]
}

fn step_strategy() -> impl Strategy<Value = Step> {
    (
        "[a-z0-9]{1,6}",
        prop::sample::select(TYPES),
        prop::collection::btree_map(prop::sample::select(KEYS), value_strategy(), 0..6),
    )
        .prop_map(|(id, ty, config)| Step {
            name: format!("step {}", id),
            id,
            step_type: ty.to_string(),
            config: config.into_iter().map(|(k, v)| (k.to_string(), v)).collect(),
        })
}

fn recipe_with(steps: Vec<Step>) -> Recipe {
    let mut recipe = Recipe::new_empty("p", "demo");
    recipe.steps = steps;
    recipe
}

// =============================================================================
// Validator Properties
// =============================================================================

proptest! {
    /// Recipe issues are exactly the per-step issues concatenated in order
    #[test]
    fn issues_follow_step_order(steps in prop::collection::vec(step_strategy(), 0..8)) {
        let expected: Vec<_> = steps.iter().flat_map(validate_step).collect();
        prop_assert_eq!(validate(&recipe_with(steps)), expected);
    }

    /// Swapping two steps swaps their issues and changes nothing else
    #[test]
    fn reordering_only_moves_issues(
        steps in prop::collection::vec(step_strategy(), 2..6),
        i in 0usize..6,
        j in 0usize..6,
    ) {
        let (i, j) = (i % steps.len(), j % steps.len());
        let mut swapped = steps.clone();
        swapped.swap(i, j);

        let per_step: Vec<_> = steps.iter().map(validate_step).collect();
        let per_step_swapped: Vec<_> = swapped.iter().map(validate_step).collect();
        prop_assert_eq!(&per_step[i], &per_step_swapped[j]);
        prop_assert_eq!(&per_step[j], &per_step_swapped[i]);

        let mut all = validate(&recipe_with(steps));
        let mut all_swapped = validate(&recipe_with(swapped));
        all.sort_by(|a, b| (&a.step_id, &a.message).cmp(&(&b.step_id, &b.message)));
        all_swapped.sort_by(|a, b| (&a.step_id, &a.message).cmp(&(&b.step_id, &b.message)));
        prop_assert_eq!(all, all_swapped);
    }

    /// Rendering reports the same issues as validation
    #[test]
    fn render_issues_match_validate(steps in prop::collection::vec(step_strategy(), 0..6)) {
        let recipe = recipe_with(steps);
        let result = render(&recipe).expect("render should not fail on printable input");
        prop_assert_eq!(result.issues, validate(&recipe));
    }

    /// Every step produces exactly one progress marker
    #[test]
    fn one_marker_per_step(steps in prop::collection::vec(step_strategy(), 0..6)) {
        let total = steps.len();
        let script = render(&recipe_with(steps)).expect("render").install_sh;
        for index in 1..=total {
            let marker = format!("[{}/{}] step=", index, total);
            prop_assert_eq!(script.matches(marker.as_str()).count(), 1);
        }
    }

    /// rpm modes are accepted in any ASCII casing
    #[test]
    fn rpm_mode_any_case(mode in "(?i)(upgrade|install)") {
        let step = Step {
            id: "r".into(),
            name: "rpm".into(),
            step_type: "rpm_install".into(),
            config: [
                ("rpms".to_string(), json!(["a.rpm"])),
                ("mode".to_string(), json!(mode)),
            ].into_iter().collect(),
        };
        prop_assert!(validate_step(&step).is_empty());
    }
}

// =============================================================================
// StepType Properties
// =============================================================================

fn step_type_strategy() -> impl Strategy<Value = StepType> {
    prop::sample::select(StepType::iter().collect::<Vec<_>>())
}

proptest! {
    /// StepType: to_string → parse round-trip is identity
    #[test]
    fn step_type_roundtrip(ty in step_type_strategy()) {
        let parsed: StepType = ty.to_string().parse().expect("Should parse");
        prop_assert_eq!(ty, parsed);
    }

    /// StepType: every known type validates without the unknown-type warning
    #[test]
    fn known_types_are_registered(ty in step_type_strategy()) {
        let step = Step { step_type: ty.to_string(), ..Step::default() };
        let unknown = format!("unknown step type {}", ty);
        prop_assert!(validate_step(&step).iter().all(|i| i.message != unknown));
    }
}
