//! `rpm_install`: install or upgrade a list of RPM files.

use std::str::FromStr;

use crate::recipe::{split_words, ConfigExt, StepConfig};
use crate::script_traits::StepScript;
use crate::shell::{expanding, literal, QuoteError};
use crate::types::{RpmMode, StepType};

/// Typed `rpm_install` step.
///
/// `mode` is matched case-insensitively; anything other than `upgrade`
/// installs (the validator reports bad modes separately).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpmInstallStep {
    pub rpms: Vec<String>,
    pub mode: RpmMode,
    pub nodeps: bool,
}

impl RpmInstallStep {
    pub fn from_config(config: &StepConfig) -> Self {
        Self {
            rpms: config.list("rpms", split_words),
            mode: RpmMode::from_str(&config.text("mode")).unwrap_or_default(),
            nodeps: config.flag("nodeps"),
        }
    }
}

impl StepScript for RpmInstallStep {
    fn to_shell(&self) -> Result<String, QuoteError> {
        if self.rpms.is_empty() {
            return Ok(format!("echo {}\n", literal("rpm_install: no packages listed")?));
        }

        let files = self
            .rpms
            .iter()
            .map(|rpm| expanding(rpm))
            .collect::<Result<Vec<_>, _>>()?;
        let nodeps = if self.nodeps { " --nodeps" } else { "" };

        Ok(format!(
            "for _if_rpm in {}; do\n  rpm {}{} \"$_if_rpm\"\ndone\n",
            files.join(" "),
            self.mode.rpm_flags(),
            nodeps
        ))
    }

    fn step_type(&self) -> StepType {
        StepType::RpmInstall
    }
}
