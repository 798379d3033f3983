//! Line editing steps: `append_lines`, `delete_lines`, `replace`.
//!
//! All three work on `$_if_target` and back it up to `$_if_target.bak.<epoch>` first
//! unless `backup` is explicitly `false`. Destructive edits write to
//! `$_if_target.tmp`, copy mode and ownership over, then `mv` it into place.

use std::str::FromStr;

use crate::recipe::{split_lines, ConfigExt, StepConfig};
use crate::script_traits::StepScript;
use crate::shell::{expanding, literal, QuoteError};
use crate::types::{MatchMode, StepType};

const BACKUP: &str = "cp -a \"$_if_target\" \"$_if_target.bak.$(date +%s)\"\n";

const ATOMIC_REPLACE: &str = "chmod --reference=\"$_if_target\" \"$_if_target.tmp\"\n\
chown --reference=\"$_if_target\" \"$_if_target.tmp\"\n\
mv -f \"$_if_target.tmp\" \"$_if_target\"\n";

fn target_line(file: &str) -> Result<String, QuoteError> {
    Ok(format!("_if_target={}\n", expanding(file)?))
}

fn backup_enabled(config: &StepConfig) -> bool {
    !config.is_explicit_false("backup")
}

fn match_mode(config: &StepConfig) -> MatchMode {
    MatchMode::from_str(&config.text("mode")).unwrap_or_default()
}

/// `append_lines`: append each line, skipping exact duplicates when `unique`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppendLinesStep {
    pub file: String,
    pub lines: Vec<String>,
    pub unique: bool,
    pub backup: bool,
}

impl AppendLinesStep {
    pub fn from_config(config: &StepConfig) -> Self {
        Self {
            file: config.text("file"),
            lines: config.list("lines", split_lines),
            unique: config.flag("unique"),
            backup: backup_enabled(config),
        }
    }
}

impl StepScript for AppendLinesStep {
    fn to_shell(&self) -> Result<String, QuoteError> {
        let mut out = target_line(&self.file)?;
        if self.backup {
            out.push_str("if [ -e \"$_if_target\" ]; then\n  ");
            out.push_str(BACKUP);
            out.push_str("fi\n");
        }
        out.push_str("touch \"$_if_target\"\n");

        for line in &self.lines {
            let quoted = literal(line)?;
            if self.unique {
                out.push_str(&format!(
                    "if ! grep -Fqx -- {q} \"$_if_target\"; then\n  printf '%s\\n' {q} >> \"$_if_target\"\nfi\n",
                    q = quoted
                ));
            } else {
                out.push_str(&format!("printf '%s\\n' {} >> \"$_if_target\"\n", quoted));
            }
        }
        Ok(out)
    }

    fn step_type(&self) -> StepType {
        StepType::AppendLines
    }
}

/// `delete_lines`: drop lines matching `match`.
///
/// grep exits 1 when every line was removed; that still counts as success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteLinesStep {
    pub file: String,
    pub pattern: String,
    pub mode: MatchMode,
    pub backup: bool,
}

impl DeleteLinesStep {
    pub fn from_config(config: &StepConfig) -> Self {
        Self {
            file: config.text("file"),
            pattern: config.text("match"),
            mode: match_mode(config),
            backup: backup_enabled(config),
        }
    }
}

impl StepScript for DeleteLinesStep {
    fn to_shell(&self) -> Result<String, QuoteError> {
        let flag = match self.mode {
            MatchMode::Fixed => "-Fv",
            MatchMode::Regex => "-Ev",
        };

        let mut out = target_line(&self.file)?;
        if self.backup {
            out.push_str(BACKUP);
        }
        out.push_str(&format!(
            "if grep {} -- {} \"$_if_target\" > \"$_if_target.tmp\" || [ $? -eq 1 ]; then\n",
            flag,
            literal(&self.pattern)?
        ));
        for line in ATOMIC_REPLACE.lines() {
            out.push_str(&format!("  {}\n", line));
        }
        out.push_str("else\n");
        out.push_str("  rm -f \"$_if_target.tmp\"\n");
        out.push_str("  echo \"delete_lines failed on $_if_target\" >&2\n");
        out.push_str("  exit 1\n");
        out.push_str("fi\n");
        Ok(out)
    }

    fn step_type(&self) -> StepType {
        StepType::DeleteLines
    }
}

/// `replace`: substitute `pattern` with `replacement` on every line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplaceStep {
    pub file: String,
    pub pattern: String,
    pub replacement: String,
    pub mode: MatchMode,
    pub backup: bool,
}

impl ReplaceStep {
    pub fn from_config(config: &StepConfig) -> Self {
        Self {
            file: config.text("file"),
            pattern: config.text("pattern"),
            replacement: config.text("replacement"),
            mode: match_mode(config),
            backup: backup_enabled(config),
        }
    }

    /// The sed `s///g` expression for this step
    pub fn sed_expression(&self) -> String {
        match self.mode {
            MatchMode::Fixed => format!(
                "s/{}/{}/g",
                escape_bre(&self.pattern),
                escape_replacement(&self.replacement)
            ),
            MatchMode::Regex => format!(
                "s/{}/{}/g",
                escape_delimiter(&self.pattern),
                escape_delimiter(&self.replacement)
            ),
        }
    }
}

impl StepScript for ReplaceStep {
    fn to_shell(&self) -> Result<String, QuoteError> {
        let sed = match self.mode {
            MatchMode::Fixed => "sed",
            MatchMode::Regex => "sed -r",
        };

        let mut out = target_line(&self.file)?;
        if self.backup {
            out.push_str(BACKUP);
        }
        out.push_str(&format!(
            "{} {} \"$_if_target\" > \"$_if_target.tmp\"\n",
            sed,
            literal(&self.sed_expression())?
        ));
        out.push_str(ATOMIC_REPLACE);
        Ok(out)
    }

    fn step_type(&self) -> StepType {
        StepType::Replace
    }
}

/// Escape a literal string for use as a basic regular expression
fn escape_bre(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '\\' | '/' | '.' | '*' | '[' | ']' | '^' | '$') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Escape a literal replacement string
fn escape_replacement(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '\\' | '/' | '&' | '\n') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Escape unescaped `/` so user regexes cannot terminate the `s` command
fn escape_delimiter(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                out.push(c);
                if let Some(next) = chars.next() {
                    out.push(next);
                }
            }
            '/' => out.push_str("\\/"),
            _ => out.push(c),
        }
    }
    out
}
