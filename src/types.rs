//! Typed tags for the step instruction set.
//!
//! Recipes carry the step kind as a loose string. The generator converts it
//! into a [`StepType`] at its boundary so code generation can match
//! exhaustively; the validator keeps working on strings (see
//! `logic::validator`).

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Supported step kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StepType {
    Mkdir,
    Copy,
    Chmod,
    Chown,
    ExtractTarGz,
    ExtractZip,
    RpmInstall,
    AppendLines,
    DeleteLines,
    Replace,
    RunCmd,
    ServiceSysv,
    ServiceSystemd,
    AutoService,
}

impl StepType {
    /// External commands the generated fragment needs on the target.
    ///
    /// | Step type | Commands |
    /// |-----------|----------|
    /// | `extract_zip` | `unzip` |
    /// | `extract_tar_gz` | `tar` |
    /// | `rpm_install` | `rpm` |
    /// | `append_lines`, `delete_lines`, `replace` | `sed`, `grep` |
    /// | `service_systemd`, `auto_service` | `systemctl` |
    /// | `service_sysv` | `chkconfig` |
    pub fn required_commands(&self) -> &'static [&'static str] {
        match self {
            Self::ExtractZip => &["unzip"],
            Self::ExtractTarGz => &["tar"],
            Self::RpmInstall => &["rpm"],
            Self::AppendLines | Self::DeleteLines | Self::Replace => &["sed", "grep"],
            Self::ServiceSystemd | Self::AutoService => &["systemctl"],
            Self::ServiceSysv => &["chkconfig"],
            Self::Mkdir | Self::Copy | Self::Chmod | Self::Chown | Self::RunCmd => &[],
        }
    }
}

/// Install mode for `rpm_install`.
///
/// Parsed case-insensitively. The generator treats anything that is not
/// `upgrade` as a plain install.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[derive(Display, EnumString, EnumIter, AsRefStr)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum RpmMode {
    /// `rpm -Uvh`
    Upgrade,
    /// `rpm -ivh`
    #[default]
    Install,
}

impl RpmMode {
    /// The flag cluster passed to `rpm`
    pub fn rpm_flags(&self) -> &'static str {
        match self {
            Self::Upgrade => "-Uvh",
            Self::Install => "-ivh",
        }
    }
}

/// Matching mode for `delete_lines` and `replace`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[derive(Display, EnumString, EnumIter, AsRefStr)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum MatchMode {
    /// Literal substring
    #[default]
    Fixed,
    /// Extended regular expression
    Regex,
}
