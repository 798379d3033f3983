//! Logic modules: pure analysis of a recipe, no generation and no I/O.
//!
//! # Modules
//!
//! - `validator`: per-type rule engine producing issues
//! - `preflight`: external commands implied by the step types present

pub mod preflight;
pub mod validator;
