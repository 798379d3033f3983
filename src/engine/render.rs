//! Installer compiler.
//!
//! Turns a [`Recipe`] into a self-contained bash installer plus a README and a
//! pretty-printed copy of the recipe.
//!
//! # Script Layout
//!
//! Sections are always emitted in this order:
//!
//! | # | Section |
//! |---|---------|
//! | 1 | Shebang, `set -eu` |
//! | 2 | `SCRIPT_DIR` / `ASSET_DIR` from the script location, recipe variables |
//! | 3 | `LOG_DIR` (environment, then recipe, then default), log file tee |
//! | 4 | Root check |
//! | 5 | Preflight: every required command, abort listing all missing ones |
//! | 6 | Steps in recipe order, each with a `[i/total]` progress marker |
//! | 7 | Summary |
//!
//! # What This Explicitly Refuses To Do
//!
//! - Consult validation issues: they are computed and returned, but gating an
//!   export on them is the caller's job (see `bundle`).
//! - Infer ordering: steps are emitted exactly as given.

use std::fmt::Write;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::engine::codegen::StepOp;
use crate::error::{ForgeError, Result};
use crate::logic::preflight::required_commands;
use crate::logic::validator::validate;
use crate::recipe::{Issue, Recipe};
use crate::shell::{self, literal};

/// Rendered artifacts for a recipe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderResult {
    #[serde(rename = "installSh")]
    pub install_sh: String,
    pub readme: String,
    #[serde(rename = "recipeJsonPretty")]
    pub recipe_pretty: String,
    pub issues: Vec<Issue>,
}

/// Render all artifacts, stamping the current time into the script.
pub fn render(recipe: &Recipe) -> Result<RenderResult> {
    render_at(recipe, Utc::now())
}

/// Render all artifacts with an explicit generation timestamp.
pub fn render_at(recipe: &Recipe, generated_at: DateTime<Utc>) -> Result<RenderResult> {
    let issues = validate(recipe);
    let install_sh = render_install_script(recipe, generated_at)?;
    let readme = render_readme(recipe);
    let recipe_pretty = recipe.to_pretty_json()?;

    debug!(
        project = %recipe.project.id,
        steps = recipe.steps.len(),
        issues = issues.len(),
        bytes = install_sh.len(),
        "rendered installer"
    );

    Ok(RenderResult {
        install_sh,
        readme,
        recipe_pretty,
        issues,
    })
}

/// Generate the installer script.
pub fn render_install_script(recipe: &Recipe, generated_at: DateTime<Utc>) -> Result<String> {
    let mut out = String::new();

    // 1. Strict mode
    writeln!(out, "#!/bin/bash")?;
    writeln!(out, "set -eu")?;
    writeln!(out)?;

    // 2. Relocatable bundle paths and recipe variables
    writeln!(out, "SCRIPT_DIR=$(cd \"$(dirname \"$0\")\" && pwd)")?;
    writeln!(out, "ASSET_DIR=\"$SCRIPT_DIR/assets\"")?;
    write_vars(&mut out, recipe)?;
    writeln!(out)?;

    // 3. Logging
    writeln!(out, "LOG_DIR=\"${{LOG_DIR:-}}\"")?;
    writeln!(out, "if [ -z \"$LOG_DIR\" ]; then")?;
    writeln!(out, "  LOG_DIR={}", quote_var("LOG_DIR", recipe.log_dir())?)?;
    writeln!(out, "fi")?;
    writeln!(out, "LOG_FILE=\"$LOG_DIR/install-$(date +%Y%m%d-%H%M%S).log\"")?;
    writeln!(out, "mkdir -p \"$LOG_DIR\"")?;
    writeln!(out, "exec > >(tee -a \"$LOG_FILE\") 2>&1")?;
    writeln!(out)?;
    let banner = format!(
        "[InstallForge] {} generated at {}",
        recipe.project.name,
        generated_at.to_rfc3339_opts(SecondsFormat::Secs, true)
    );
    writeln!(out, "echo {}", quote_meta(&banner)?)?;
    writeln!(out)?;

    // 4. Root check
    writeln!(out, "if [ \"$(id -u)\" -ne 0 ]; then")?;
    writeln!(out, "  echo \"Please run as root (sudo ./install.sh)\" >&2")?;
    writeln!(out, "  exit 1")?;
    writeln!(out, "fi")?;
    writeln!(out)?;

    // 5. Preflight
    writeln!(out, "# Preflight checks")?;
    writeln!(out, "_if_missing=()")?;
    for cmd in required_commands(recipe) {
        writeln!(out, "if ! command -v {} >/dev/null 2>&1; then", cmd)?;
        writeln!(out, "  _if_missing+=({})", cmd)?;
        writeln!(out, "fi")?;
    }
    writeln!(out, "if [ ${{#_if_missing[@]}} -ne 0 ]; then")?;
    writeln!(out, "  echo \"Missing required commands: ${{_if_missing[*]}}\" >&2")?;
    writeln!(out, "  exit 1")?;
    writeln!(out, "fi")?;

    // 6. Steps
    let total = recipe.steps.len();
    for (index, step) in recipe.steps.iter().enumerate() {
        let op = StepOp::from_step(step);
        let marker = format!(
            "[{}/{}] step={} type={} name={}",
            index + 1,
            total,
            step.id,
            step.step_type,
            step.name
        );
        let fragment = op
            .to_shell()
            .map_err(|e| ForgeError::quote(&step.id, e.to_string()))?;

        writeln!(out)?;
        writeln!(
            out,
            "echo {}",
            literal(&marker).map_err(|e| ForgeError::quote(&step.id, e.to_string()))?
        )?;
        out.push_str(&fragment);
        debug!(step = %step.id, op = %op, index = index + 1, "rendered step");
    }

    // 7. Summary
    writeln!(out)?;
    writeln!(out, "echo {}", quote_meta(&format!("Completed {} steps", total))?)?;

    Ok(out)
}

/// Prefix of the shell variables the generated fragments use internally
pub const INTERNAL_VAR_PREFIX: &str = "_if_";

/// Export each recipe variable, letting the environment override it.
///
/// Values may reference `$SCRIPT_DIR`, `$ASSET_DIR` and variables that sort
/// before them by name; references are expanded on the target.
fn write_vars(out: &mut String, recipe: &Recipe) -> Result<()> {
    for (name, value) in &recipe.vars {
        if name == "LOG_DIR" {
            continue;
        }
        if !shell::is_identifier(name) {
            warn!(var = %name, "skipping recipe variable that is not a shell identifier");
            continue;
        }
        if name.starts_with(INTERNAL_VAR_PREFIX) {
            warn!(var = %name, "skipping recipe variable in the installer's internal namespace");
            continue;
        }
        writeln!(out, "if [ -z \"${{{}:-}}\" ]; then", name)?;
        writeln!(out, "  {}={}", name, quote_var(name, value)?)?;
        writeln!(out, "fi")?;
        writeln!(out, "export {}", name)?;
    }
    Ok(())
}

fn quote_var(name: &str, value: &str) -> Result<String> {
    shell::expanding(value).map_err(|e| ForgeError::render(format!("variable {}: {}", name, e)))
}

fn quote_meta(value: &str) -> Result<String> {
    literal(value)
        .map(|q| q.into_owned())
        .map_err(|e| ForgeError::render(format!("recipe metadata: {}", e)))
}

/// Generate the README shipped in the bundle.
pub fn render_readme(recipe: &Recipe) -> String {
    format!(
        "InstallForge bundle\n\
         ===================\n\
         \n\
         Project: {}\n\
         Targets: {}\n\
         \n\
         Usage:\n\
         \x20 chmod +x install.sh\n\
         \x20 sudo ./install.sh\n\
         \n\
         Logs are written under $LOG_DIR (default /var/log/asg).\n",
        recipe.project.name,
        recipe.project.target.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::Step;
    use chrono::TimeZone;
    use serde_json::json;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).single().expect("valid time")
    }

    fn step(id: &str, step_type: &str, config: serde_json::Value) -> Step {
        Step {
            id: id.to_string(),
            name: format!("{} step", id),
            step_type: step_type.to_string(),
            config: serde_json::from_value(config).expect("config object"),
        }
    }

    #[test]
    fn test_empty_recipe_has_no_steps() {
        let recipe = Recipe::new_empty("p", "demo");
        let script = render_install_script(&recipe, fixed_time()).expect("render");
        assert!(script.starts_with("#!/bin/bash\nset -eu\n"));
        assert!(!script.contains("command -v"));
        assert!(!script.contains("step="));
        assert!(script.contains("Completed 0 steps"));
    }

    #[test]
    fn test_sections_in_order() {
        let mut recipe = Recipe::new_empty("p", "demo");
        recipe.steps = vec![step("s1", "extract_tar_gz", json!({"src": "a", "dest": "/d"}))];
        let script = render_install_script(&recipe, fixed_time()).expect("render");

        let pos = |needle: &str| script.find(needle).unwrap_or_else(|| panic!("missing {}", needle));
        let order = [
            "set -eu",
            "SCRIPT_DIR=",
            "ASSET_DIR=",
            "LOG_DIR=\"${LOG_DIR:-}\"",
            "exec > >(tee -a \"$LOG_FILE\") 2>&1",
            "id -u",
            "# Preflight checks",
            "command -v tar",
            "Missing required commands",
            "[1/1] step=s1",
            "tar -xzf",
            "Completed 1 steps",
        ];
        for pair in order.windows(2) {
            assert!(pos(pair[0]) < pos(pair[1]), "{} must precede {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_log_dir_falls_back() {
        let mut recipe = Recipe::new_empty("p", "demo");
        recipe.vars.insert("LOG_DIR".into(), "/var/log/custom".into());
        let script = render_install_script(&recipe, fixed_time()).expect("render");
        assert!(script.contains("  LOG_DIR=\"/var/log/custom\"\n"));

        recipe.vars.remove("LOG_DIR");
        let script = render_install_script(&recipe, fixed_time()).expect("render");
        assert!(script.contains("  LOG_DIR=\"/var/log/asg\"\n"));
    }

    #[test]
    fn test_vars_are_exported_with_override() {
        let mut recipe = Recipe::new_empty("p", "demo");
        recipe.vars.insert("bad-name".into(), "x".into());
        recipe.vars.insert("_if_target".into(), "/etc/passwd".into());
        let script = render_install_script(&recipe, fixed_time()).expect("render");
        assert!(script.contains("if [ -z \"${INSTALL_ROOT:-}\" ]; then\n  INSTALL_ROOT=\"/opt/demo\"\nfi\nexport INSTALL_ROOT\n"));
        assert!(!script.contains("export LOG_DIR"));
        assert!(!script.contains("bad-name"));
        assert!(!script.contains("/etc/passwd"));
    }

    #[test]
    fn test_var_values_expand_references() {
        let mut recipe = Recipe::new_empty("p", "demo");
        recipe.vars.insert("LOG_DIR".into(), "$INSTALL_ROOT/log".into());
        recipe.vars.insert("DATA_DIR".into(), "${ASSET_DIR}/data $(id)".into());
        let script = render_install_script(&recipe, fixed_time()).expect("render");
        assert!(script.contains("  LOG_DIR=\"$INSTALL_ROOT/log\"\n"));
        assert!(script.contains("  DATA_DIR=\"${ASSET_DIR}/data \\$(id)\"\n"));
    }

    #[test]
    fn test_banner_uses_timestamp() {
        let recipe = Recipe::new_empty("p", "demo");
        let script = render_install_script(&recipe, fixed_time()).expect("render");
        assert!(script.contains("[InstallForge] demo generated at 2026-01-02T03:04:05Z"));
    }

    #[test]
    fn test_nul_in_step_value_is_render_error() {
        let mut recipe = Recipe::new_empty("p", "demo");
        recipe.steps = vec![step("bad", "mkdir", json!({"path": "a\u{0}b"}))];
        let err = render_at(&recipe, fixed_time()).expect_err("should fail");
        assert!(matches!(err, ForgeError::Quote { ref step_id, .. } if step_id == "bad"));
    }

    #[test]
    fn test_readme() {
        let recipe = Recipe::new_empty("p", "demo");
        let readme = render_readme(&recipe);
        assert!(readme.starts_with("InstallForge bundle\n"));
        assert!(readme.contains("Project: demo\n"));
        assert!(readme.contains("Targets: oracle_linux_6_9, kylinsec_3_4\n"));
        assert!(readme.contains("\n  chmod +x install.sh\n  sudo ./install.sh\n"));
    }

    #[test]
    fn test_render_result_wire_names() {
        let recipe = Recipe::new_empty("p", "demo");
        let result = render_at(&recipe, fixed_time()).expect("render");
        let json = serde_json::to_value(&result).expect("serialize");
        for key in ["installSh", "readme", "recipeJsonPretty", "issues"] {
            assert!(json.get(key).is_some(), "missing {}", key);
        }
    }
}
