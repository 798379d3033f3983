//! Archive extraction steps: `extract_tar_gz`, `extract_zip`.
//!
//! When `creates` is set the fragment is guarded: if that path already exists
//! on the target the extraction is skipped, so a re-run is a no-op.

use crate::recipe::{ConfigExt, StepConfig};
use crate::script_traits::StepScript;
use crate::shell::{expanding, literal, QuoteError};
use crate::types::StepType;

/// Archive format handled by an [`ExtractStep`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    TarGz,
    Zip,
}

impl ArchiveFormat {
    fn extract_command(&self, src: &str, dest: &str) -> String {
        match self {
            Self::TarGz => format!("tar -xzf {} -C {}", src, dest),
            Self::Zip => format!("unzip -o {} -d {}", src, dest),
        }
    }
}

/// Extract `src` into `dest`, skipped when `creates` exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractStep {
    pub format: ArchiveFormat,
    pub src: String,
    pub dest: String,
    pub creates: Option<String>,
}

impl ExtractStep {
    pub fn from_config(format: ArchiveFormat, config: &StepConfig) -> Self {
        Self {
            format,
            src: config.text("src"),
            dest: config.text("dest"),
            creates: config.opt_text("creates"),
        }
    }
}

impl StepScript for ExtractStep {
    fn to_shell(&self) -> Result<String, QuoteError> {
        let dest = expanding(&self.dest)?;
        let body = format!(
            "mkdir -p {}\n{}\n",
            dest,
            self.format.extract_command(&expanding(&self.src)?, &dest)
        );

        let Some(creates) = &self.creates else {
            return Ok(body);
        };

        let notice = format!("skip {} because {} exists", self.step_type(), creates);
        let mut out = format!("if [ -e {} ]; then\n", expanding(creates)?);
        out.push_str(&format!("  echo {}\n", literal(&notice)?));
        out.push_str("else\n");
        for line in body.lines() {
            out.push_str(&format!("  {}\n", line));
        }
        out.push_str("fi\n");
        Ok(out)
    }

    fn step_type(&self) -> StepType {
        match self.format {
            ArchiveFormat::TarGz => StepType::ExtractTarGz,
            ArchiveFormat::Zip => StepType::ExtractZip,
        }
    }
}
