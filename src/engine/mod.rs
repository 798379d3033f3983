//! Engine modules: the compiler that turns a recipe into an installer.
//!
//! `codegen` maps each step to a typed operation and its shell fragment;
//! `render` assembles the fragments into the final script and companion files.

pub mod codegen;
pub mod render;
