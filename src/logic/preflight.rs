//! Preflight command inference.
//!
//! Collects the external commands the generated script needs, based only on
//! the step types present. Unknown types contribute nothing (their fragment
//! aborts anyway). The result is a set: sorted, de-duplicated.

use std::collections::BTreeSet;
use std::str::FromStr;

use crate::recipe::Recipe;
use crate::types::StepType;

/// Resolve all commands the preflight block must check for.
pub fn required_commands(recipe: &Recipe) -> BTreeSet<&'static str> {
    recipe
        .steps
        .iter()
        .filter_map(|step| StepType::from_str(&step.step_type).ok())
        .flat_map(|ty| ty.required_commands().iter().copied())
        .collect()
}
