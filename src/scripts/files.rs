//! Filesystem steps: `mkdir`, `copy`, `chmod`, `chown`.

use crate::recipe::{ConfigExt, StepConfig};
use crate::script_traits::StepScript;
use crate::shell::{expanding, literal, QuoteError};
use crate::types::StepType;

/// `mkdir`: create a directory tree. `mkdir -p` makes it idempotent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MkdirStep {
    pub path: String,
}

impl MkdirStep {
    pub fn from_config(config: &StepConfig) -> Self {
        Self {
            path: config.text("path"),
        }
    }
}

impl StepScript for MkdirStep {
    fn to_shell(&self) -> Result<String, QuoteError> {
        Ok(format!("mkdir -p {}\n", expanding(&self.path)?))
    }

    fn step_type(&self) -> StepType {
        StepType::Mkdir
    }
}

/// `copy`: copy `src` to `dest`, optionally fixing the mode afterwards.
///
/// | Config | Effect |
/// |--------|--------|
/// | `overwrite` truthy | `cp -f` |
/// | `overwrite` falsy/absent | `cp -n` (never clobber) |
/// | `mode` set | `chmod <mode> <dest>` after the copy |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyStep {
    pub src: String,
    pub dest: String,
    pub overwrite: bool,
    pub mode: Option<String>,
}

impl CopyStep {
    pub fn from_config(config: &StepConfig) -> Self {
        Self {
            src: config.text("src"),
            dest: config.text("dest"),
            overwrite: config.flag("overwrite"),
            mode: config.opt_text("mode"),
        }
    }
}

impl StepScript for CopyStep {
    fn to_shell(&self) -> Result<String, QuoteError> {
        let flag = if self.overwrite { "-f" } else { "-n" };
        let dest = expanding(&self.dest)?;
        let mut out = format!("cp {} {} {}\n", flag, expanding(&self.src)?, dest);
        if let Some(mode) = &self.mode {
            out.push_str(&format!("chmod {} {}\n", literal(mode)?, dest));
        }
        Ok(out)
    }

    fn step_type(&self) -> StepType {
        StepType::Copy
    }
}

/// `chmod`: apply a permission change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChmodStep {
    pub path: String,
    pub mode: String,
}

impl ChmodStep {
    pub fn from_config(config: &StepConfig) -> Self {
        Self {
            path: config.text("path"),
            mode: config.text("mode"),
        }
    }
}

impl StepScript for ChmodStep {
    fn to_shell(&self) -> Result<String, QuoteError> {
        Ok(format!(
            "chmod {} {}\n",
            literal(&self.mode)?,
            expanding(&self.path)?
        ))
    }

    fn step_type(&self) -> StepType {
        StepType::Chmod
    }
}

/// `chown`: apply an ownership change, `owner[:group]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChownStep {
    pub path: String,
    pub owner: String,
    pub group: Option<String>,
}

impl ChownStep {
    pub fn from_config(config: &StepConfig) -> Self {
        Self {
            path: config.text("path"),
            owner: config.text("owner"),
            group: config.opt_text("group"),
        }
    }

    /// The `owner[:group]` spec passed to chown
    pub fn owner_spec(&self) -> String {
        match &self.group {
            Some(group) => format!("{}:{}", self.owner, group),
            None => self.owner.clone(),
        }
    }
}

impl StepScript for ChownStep {
    fn to_shell(&self) -> Result<String, QuoteError> {
        Ok(format!(
            "chown {} {}\n",
            literal(&self.owner_spec())?,
            expanding(&self.path)?
        ))
    }

    fn step_type(&self) -> StepType {
        StepType::Chown
    }
}
