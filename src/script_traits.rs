//! Per-step code generation contract.
//!
//! Each step kind has a typed struct under [`crate::scripts`] that implements
//! [`StepScript`]. The struct is built leniently from the step's config map
//! (the validator is responsible for reporting missing keys), and produces one
//! self-contained shell fragment plus the commands that fragment relies on.

use crate::shell::QuoteError;
use crate::types::StepType;

/// Trait for typed step fragments.
///
/// # Contract
///
/// - `to_shell()`: Returns the shell block for this step, newline terminated,
///   without the progress marker (the renderer adds that).
/// - `step_type()`: The kind this struct compiles.
/// - `required_commands()`: Commands the preflight block must verify.
///
/// # Invariants
///
/// - Fragments are independent: they never rely on state left by another step
///   other than the `SCRIPT_DIR`, `ASSET_DIR`, `LOG_DIR` and recipe variables
///   set up by the preamble.
/// - Generation is pure: same struct, same text.
///
/// # Example
///
/// ```
/// use installforge::script_traits::StepScript;
/// use installforge::scripts::files::MkdirStep;
///
/// let step = MkdirStep { path: "/opt/demo".to_string() };
/// assert_eq!(step.to_shell().unwrap(), "mkdir -p \"/opt/demo\"\n");
/// assert!(step.required_commands().is_empty());
/// ```
pub trait StepScript {
    /// Render the shell fragment for this step.
    fn to_shell(&self) -> Result<String, QuoteError>;

    /// The step kind this fragment implements.
    fn step_type(&self) -> StepType;

    /// External commands needed on the target machine.
    fn required_commands(&self) -> &'static [&'static str] {
        self.step_type().required_commands()
    }
}
