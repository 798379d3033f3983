//! InstallForge - Main entry point
//!
//! Thin CLI over the library: load a recipe, then validate, render or export it.

use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use installforge::cli::{Cli, Commands};
use installforge::{export_bundle, has_blocking, render, validate, ForgeError, Issue, Recipe};

/// Initialize the logger. `RUST_LOG` overrides the default level.
fn init_logger(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    init_logger(cli.verbose);
    debug!("CLI arguments parsed");

    match run(cli.command) {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("✗ {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> Result<ExitCode> {
    match command {
        Commands::New {
            output,
            name,
            id,
            description,
            targets,
        } => {
            let id = id.unwrap_or_else(Recipe::generate_id);
            let mut recipe = Recipe::new_empty(id, name);
            recipe.project.description = description;
            if !targets.is_empty() {
                recipe.project.target = targets;
            }
            recipe.save_to_file(&output)?;
            info!("Created recipe {} at {:?}", recipe.project.id, output);
            println!("✓ Created recipe {} at {}", recipe.project.id, output.display());
            Ok(ExitCode::SUCCESS)
        }
        Commands::Validate { recipe } => {
            let recipe = Recipe::load_from_file(&recipe)?;
            let issues = validate(&recipe);
            print_issues(&issues);
            if has_blocking(&issues) {
                eprintln!("✗ Recipe has blocking issues");
                Ok(ExitCode::FAILURE)
            } else {
                println!("✓ Recipe is valid ({} warning(s))", issues.len());
                Ok(ExitCode::SUCCESS)
            }
        }
        Commands::Render { recipe, json } => {
            let recipe = Recipe::load_from_file(&recipe)?;
            let result = render(&recipe).context("Failed to render installer")?;
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&result).context("Failed to serialize render result")?
                );
            } else {
                print_issues(&result.issues);
                print!("{}", result.install_sh);
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Export {
            recipe,
            out,
            assets,
        } => export(&recipe, &out, assets.as_deref()),
    }
}

fn export(recipe_path: &Path, out: &Path, assets: Option<&Path>) -> Result<ExitCode> {
    let recipe = Recipe::load_from_file(recipe_path)?;
    match export_bundle(&recipe, assets, out) {
        Ok(report) => {
            print_issues(&report.warnings);
            println!(
                "✓ Bundle written to {} ({} asset(s))",
                report.path.display(),
                report.assets.len()
            );
            Ok(ExitCode::SUCCESS)
        }
        Err(ForgeError::ExportBlocked { issues }) => {
            print_issues(&issues);
            eprintln!("✗ Export refused: fix the errors above first");
            Ok(ExitCode::FAILURE)
        }
        Err(e) => Err(e).with_context(|| format!("Failed to export bundle to {:?}", out)),
    }
}

/// Print issues to stderr, one per line
fn print_issues(issues: &[Issue]) {
    for issue in issues {
        let step = if issue.step_id.is_empty() {
            "recipe".to_string()
        } else {
            format!("step {}", issue.step_id)
        };
        eprintln!("[{}] {}: {}", issue.level, step, issue.message);
    }
}
