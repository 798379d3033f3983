//! InstallForge Library
//!
//! Compiles a declarative installation recipe into a single idempotent,
//! preflight-checked shell installer, and statically validates the recipe's
//! steps before generation.

pub mod bundle;
pub mod cli;
pub mod engine;
pub mod error;
pub mod logic;
pub mod recipe;
pub mod script_traits;
pub mod scripts;
pub mod shell;
pub mod types;

// Re-export main types for convenience
pub use bundle::{export_bundle, BundleReport};
pub use engine::codegen::StepOp;
pub use engine::render::{render, render_at, render_install_script, render_readme, RenderResult};
pub use error::{ForgeError, Result};
pub use logic::preflight::required_commands;
pub use logic::validator::{validate, validate_step};
pub use recipe::{has_blocking, Issue, IssueLevel, ProjectMeta, Recipe, Step, StepConfig};
pub use script_traits::StepScript;
pub use types::{MatchMode, RpmMode, StepType};
