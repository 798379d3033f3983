//! `run_cmd`: run an arbitrary shell command.
//!
//! The command text is emitted verbatim, without re-indenting. It runs in a
//! subshell so the `cd` does not leak into later steps; without `cwd` it runs
//! from `$SCRIPT_DIR`.

use crate::recipe::{ConfigExt, StepConfig};
use crate::script_traits::StepScript;
use crate::shell::{expanding, QuoteError};
use crate::types::StepType;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunCmdStep {
    pub cmd: String,
    pub cwd: Option<String>,
}

impl RunCmdStep {
    pub fn from_config(config: &StepConfig) -> Self {
        Self {
            cmd: config.text("cmd"),
            cwd: config.opt_text("cwd"),
        }
    }
}

impl StepScript for RunCmdStep {
    fn to_shell(&self) -> Result<String, QuoteError> {
        let cwd = match &self.cwd {
            Some(dir) => expanding(dir)?,
            None => "\"$SCRIPT_DIR\"".to_string(),
        };

        // The body is copied as-is: heredoc terminators and multi-line
        // strings depend on exact column positions.
        let mut out = format!("(\ncd {}\n{}", cwd, self.cmd);
        if !self.cmd.ends_with('\n') {
            out.push('\n');
        }
        out.push_str(")\n");
        Ok(out)
    }

    fn step_type(&self) -> StepType {
        StepType::RunCmd
    }
}
