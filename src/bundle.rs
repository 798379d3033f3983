//! Bundle export.
//!
//! A bundle is a directory a target machine can run directly:
//!
//! ```text
//! <target>/
//!   recipe.json   pretty recipe
//!   install.sh    installer, mode 0755
//!   README.txt
//!   assets/       regular files copied from the project's asset directory
//! ```
//!
//! The target directory is replaced on every export, so files from an
//! earlier bundle never linger.
//!
//! Export is gated on validation: any `error` issue refuses the export and
//! returns the full issue list. Warnings never block.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::engine::render::render;
use crate::error::{ForgeError, Result};
use crate::logic::validator::validate;
use crate::recipe::{has_blocking, Issue, Recipe};

pub const RECIPE_FILE: &str = "recipe.json";
pub const INSTALL_SCRIPT: &str = "install.sh";
pub const README_FILE: &str = "README.txt";
pub const ASSETS_DIR: &str = "assets";

/// What an export wrote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleReport {
    pub path: PathBuf,
    pub assets: Vec<String>,
    /// Non-blocking issues carried through
    pub warnings: Vec<Issue>,
}

/// Validate, render and write a bundle into `target_dir`.
///
/// # Errors
///
/// - `ForgeError::ExportBlocked` when validation reports any `error` issue;
///   nothing is written in that case.
/// - I/O, JSON and quoting failures while writing.
pub fn export_bundle(
    recipe: &Recipe,
    assets_dir: Option<&Path>,
    target_dir: &Path,
) -> Result<BundleReport> {
    let issues = validate(recipe);
    if has_blocking(&issues) {
        warn!(
            project = %recipe.project.id,
            errors = issues.iter().filter(|i| i.is_error()).count(),
            "export refused"
        );
        return Err(ForgeError::ExportBlocked { issues });
    }

    let rendered = render(recipe)?;

    clear_target(target_dir)?;
    let bundle_assets = target_dir.join(ASSETS_DIR);
    fs::create_dir_all(&bundle_assets)?;

    fs::write(target_dir.join(RECIPE_FILE), &rendered.recipe_pretty)?;

    let script_path = target_dir.join(INSTALL_SCRIPT);
    fs::write(&script_path, &rendered.install_sh)?;
    fs::set_permissions(&script_path, fs::Permissions::from_mode(0o755))?;

    fs::write(target_dir.join(README_FILE), &rendered.readme)?;

    let assets = match assets_dir {
        Some(dir) => copy_assets(dir, &bundle_assets)?,
        None => Vec::new(),
    };

    info!(
        project = %recipe.project.id,
        path = %target_dir.display(),
        assets = assets.len(),
        "bundle exported"
    );

    Ok(BundleReport {
        path: target_dir.to_path_buf(),
        assets,
        warnings: issues,
    })
}

/// Remove a previous bundle so the new one holds only current files.
fn clear_target(target_dir: &Path) -> Result<()> {
    match fs::remove_dir_all(target_dir) {
        Ok(()) => {
            debug!(path = %target_dir.display(), "removed previous bundle");
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Copy regular files (not subdirectories) from `src` into `dest`.
/// A missing source directory means no assets.
fn copy_assets(src: &Path, dest: &Path) -> Result<Vec<String>> {
    if !src.exists() {
        return Ok(Vec::new());
    }

    let mut entries = fs::read_dir(src)?.collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|e| e.file_name());

    let mut copied = Vec::new();
    for entry in entries {
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name();
        fs::copy(entry.path(), dest.join(&name))?;
        copied.push(name.to_string_lossy().into_owned());
    }
    Ok(copied)
}
