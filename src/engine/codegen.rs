//! Step → shell fragment translation.
//!
//! [`StepOp`] is the typed form of a recipe step at the generator boundary.
//! Known kinds become the matching `scripts::*` struct; anything else becomes
//! [`StepOp::Unknown`], whose fragment reports the type and exits non-zero so
//! an unrecognised step can never pass silently.

use std::fmt;
use std::str::FromStr;

use crate::recipe::Step;
use crate::script_traits::StepScript;
use crate::scripts::archive::{ArchiveFormat, ExtractStep};
use crate::scripts::command::RunCmdStep;
use crate::scripts::edit::{AppendLinesStep, DeleteLinesStep, ReplaceStep};
use crate::scripts::files::{ChmodStep, ChownStep, CopyStep, MkdirStep};
use crate::scripts::packages::RpmInstallStep;
use crate::scripts::service::{AutoServiceStep, SysvServiceStep, SystemdServiceStep};
use crate::shell::{literal, QuoteError};
use crate::types::StepType;

/// A single typed step operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOp {
    Mkdir(MkdirStep),
    Copy(CopyStep),
    Chmod(ChmodStep),
    Chown(ChownStep),
    Extract(ExtractStep),
    RpmInstall(RpmInstallStep),
    AppendLines(AppendLinesStep),
    DeleteLines(DeleteLinesStep),
    Replace(ReplaceStep),
    RunCmd(RunCmdStep),
    ServiceSysv(SysvServiceStep),
    ServiceSystemd(SystemdServiceStep),
    AutoService(AutoServiceStep),
    /// Type string not in the instruction set
    Unknown(String),
}

impl StepOp {
    /// Build the typed operation for a recipe step.
    pub fn from_step(step: &Step) -> Self {
        let Ok(ty) = StepType::from_str(&step.step_type) else {
            return Self::Unknown(step.step_type.clone());
        };

        let config = &step.config;
        match ty {
            StepType::Mkdir => Self::Mkdir(MkdirStep::from_config(config)),
            StepType::Copy => Self::Copy(CopyStep::from_config(config)),
            StepType::Chmod => Self::Chmod(ChmodStep::from_config(config)),
            StepType::Chown => Self::Chown(ChownStep::from_config(config)),
            StepType::ExtractTarGz => {
                Self::Extract(ExtractStep::from_config(ArchiveFormat::TarGz, config))
            }
            StepType::ExtractZip => {
                Self::Extract(ExtractStep::from_config(ArchiveFormat::Zip, config))
            }
            StepType::RpmInstall => Self::RpmInstall(RpmInstallStep::from_config(config)),
            StepType::AppendLines => Self::AppendLines(AppendLinesStep::from_config(config)),
            StepType::DeleteLines => Self::DeleteLines(DeleteLinesStep::from_config(config)),
            StepType::Replace => Self::Replace(ReplaceStep::from_config(config)),
            StepType::RunCmd => Self::RunCmd(RunCmdStep::from_config(config)),
            StepType::ServiceSysv => Self::ServiceSysv(SysvServiceStep::from_config(config)),
            StepType::ServiceSystemd => {
                Self::ServiceSystemd(SystemdServiceStep::from_config(config))
            }
            StepType::AutoService => Self::AutoService(AutoServiceStep::from_config(config)),
        }
    }

    fn script(&self) -> Option<&dyn StepScript> {
        let script: &dyn StepScript = match self {
            Self::Mkdir(s) => s,
            Self::Copy(s) => s,
            Self::Chmod(s) => s,
            Self::Chown(s) => s,
            Self::Extract(s) => s,
            Self::RpmInstall(s) => s,
            Self::AppendLines(s) => s,
            Self::DeleteLines(s) => s,
            Self::Replace(s) => s,
            Self::RunCmd(s) => s,
            Self::ServiceSysv(s) => s,
            Self::ServiceSystemd(s) => s,
            Self::AutoService(s) => s,
            Self::Unknown(_) => return None,
        };
        Some(script)
    }

    /// Shell fragment for this operation
    pub fn to_shell(&self) -> Result<String, QuoteError> {
        if let Self::Unknown(ty) = self {
            let message = format!("Unknown step type {}", ty);
            return Ok(format!("echo {} >&2\nexit 1\n", literal(&message)?));
        }
        self.script().map_or_else(|| Ok(String::new()), |s| s.to_shell())
    }

    /// Commands this operation needs on the target
    pub fn required_commands(&self) -> &'static [&'static str] {
        match self.script() {
            Some(script) => script.required_commands(),
            None => &[],
        }
    }

    /// The typed kind, `None` for unknown steps
    pub fn step_type(&self) -> Option<StepType> {
        self.script().map(|s| s.step_type())
    }
}

impl fmt::Display for StepOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self, self.step_type()) {
            (Self::Unknown(ty), _) => write!(f, "Unknown({})", ty),
            (_, Some(ty)) => write!(f, "{}", ty),
            (_, None) => write!(f, "Unknown"),
        }
    }
}
