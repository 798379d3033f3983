//! Service registration steps: `service_sysv`, `service_systemd`, `auto_service`.
//!
//! `auto_service` defers the init-system choice to install time: the target
//! picks the systemd path when `systemctl` is on its PATH, sysv otherwise.
//! A service is started unless `start` is explicitly `false`.

use crate::recipe::{ConfigExt, StepConfig};
use crate::script_traits::StepScript;
use crate::shell::{expanding, literal, QuoteError};
use crate::types::StepType;

/// Directory for legacy init scripts
pub const SYSV_INIT_DIR: &str = "/etc/init.d";

/// Directory for locally installed unit files
pub const SYSTEMD_UNIT_DIR: &str = "/etc/systemd/system";

fn should_start(config: &StepConfig) -> bool {
    !config.is_explicit_false("start")
}

/// Unit file name, appending `.service` when missing
pub fn unit_name(name: &str) -> String {
    if name.ends_with(".service") {
        name.to_string()
    } else {
        format!("{}.service", name)
    }
}

fn sysv_block(src: &str, name: &str, start: bool) -> Result<String, QuoteError> {
    let script = literal(&format!("{}/{}", SYSV_INIT_DIR, name))?.into_owned();
    let quoted_name = literal(name)?;
    let notice = format!("chkconfig not found; ensure {} is enabled manually", name);

    let mut out = format!("cp {} {}\n", expanding(src)?, script);
    out.push_str(&format!("chmod +x {}\n", script));
    out.push_str("if command -v chkconfig >/dev/null 2>&1; then\n");
    out.push_str(&format!("  chkconfig --add {}\n", quoted_name));
    out.push_str(&format!("  chkconfig {} on\n", quoted_name));
    out.push_str("else\n");
    out.push_str(&format!("  echo {} >&2\n", literal(&notice)?));
    out.push_str("fi\n");
    if start {
        out.push_str(&format!("service {} start\n", quoted_name));
    }
    Ok(out)
}

fn systemd_block(src: &str, name: &str, start: bool) -> Result<String, QuoteError> {
    let unit = unit_name(name);
    let quoted_unit = literal(&unit)?;

    let mut out = format!(
        "cp {} {}\n",
        expanding(src)?,
        literal(&format!("{}/{}", SYSTEMD_UNIT_DIR, unit))?
    );
    out.push_str("systemctl daemon-reload\n");
    if start {
        out.push_str(&format!("systemctl enable --now {}\n", quoted_unit));
    } else {
        out.push_str(&format!("systemctl enable {}\n", quoted_unit));
    }
    Ok(out)
}

fn indent(block: &str) -> String {
    block.lines().map(|line| format!("  {}\n", line)).collect()
}

/// Install a legacy init script and register it with chkconfig.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SysvServiceStep {
    pub src: String,
    pub name: String,
    pub start: bool,
}

impl SysvServiceStep {
    pub fn from_config(config: &StepConfig) -> Self {
        Self {
            src: config.text("src"),
            name: config.text("name"),
            start: should_start(config),
        }
    }
}

impl StepScript for SysvServiceStep {
    fn to_shell(&self) -> Result<String, QuoteError> {
        sysv_block(&self.src, &self.name, self.start)
    }

    fn step_type(&self) -> StepType {
        StepType::ServiceSysv
    }
}

/// Install a unit file, reload systemd and enable it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemdServiceStep {
    pub src: String,
    pub name: String,
    pub start: bool,
}

impl SystemdServiceStep {
    pub fn from_config(config: &StepConfig) -> Self {
        Self {
            src: config.text("src"),
            name: config.text("name"),
            start: should_start(config),
        }
    }
}

impl StepScript for SystemdServiceStep {
    fn to_shell(&self) -> Result<String, QuoteError> {
        systemd_block(&self.src, &self.name, self.start)
    }

    fn step_type(&self) -> StepType {
        StepType::ServiceSystemd
    }
}

/// Pick systemd or sysv on the target machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoServiceStep {
    pub name: String,
    pub sysv_src: String,
    pub systemd_src: String,
    pub start: bool,
}

impl AutoServiceStep {
    pub fn from_config(config: &StepConfig) -> Self {
        Self {
            name: config.text("name"),
            sysv_src: config.text("sysv_src"),
            systemd_src: config.text("systemd_src"),
            start: should_start(config),
        }
    }
}

impl StepScript for AutoServiceStep {
    fn to_shell(&self) -> Result<String, QuoteError> {
        let mut out = String::from("if command -v systemctl >/dev/null 2>&1; then\n");
        out.push_str(&indent(&systemd_block(&self.systemd_src, &self.name, self.start)?));
        out.push_str("else\n");
        out.push_str(&indent(&sysv_block(&self.sysv_src, &self.name, self.start)?));
        out.push_str("fi\n");
        Ok(out)
    }

    fn step_type(&self) -> StepType {
        StepType::AutoService
    }
}
