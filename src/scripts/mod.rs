//! Typed step modules.
//!
//! This module contains one struct per step kind implementing `StepScript`.
//! Each struct maps the loosely typed config keys to the exact shell the
//! installer runs for that kind.

pub mod archive;
pub mod command;
pub mod edit;
pub mod files;
pub mod packages;
pub mod service;
