use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// InstallForge - compile installation recipes into shell installers
#[derive(Parser)]
#[command(name = "installforge")]
#[command(about = "Validate recipes and generate idempotent, preflight-checked installers")]
#[command(version)]
pub struct Cli {
    /// Verbose logging (debug level unless RUST_LOG is set)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a starter recipe with default vars and no steps
    New {
        /// Where to write the recipe JSON
        output: PathBuf,
        /// Project name
        #[arg(short, long)]
        name: String,
        /// Project id (random if omitted)
        #[arg(long)]
        id: Option<String>,
        /// Project description
        #[arg(short, long, default_value = "")]
        description: String,
        /// Target platform identifiers (repeatable)
        #[arg(short, long = "target")]
        targets: Vec<String>,
    },
    /// Validate a recipe and print its issues
    Validate {
        /// Path to the recipe JSON
        recipe: PathBuf,
    },
    /// Render a recipe and print the installer script
    Render {
        /// Path to the recipe JSON
        recipe: PathBuf,
        /// Print the full render result (script, README, recipe, issues) as JSON
        #[arg(long)]
        json: bool,
    },
    /// Validate, then write a runnable bundle directory
    Export {
        /// Path to the recipe JSON
        recipe: PathBuf,
        /// Bundle output directory
        #[arg(short, long)]
        out: PathBuf,
        /// Directory holding the project's uploaded assets
        #[arg(short, long)]
        assets: Option<PathBuf>,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        <Self as clap::Parser>::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["installforge"]).is_err());
    }

    #[test]
    fn test_new_with_targets() {
        let cli = Cli::try_parse_from([
            "installforge",
            "new",
            "recipe.json",
            "--name",
            "demo",
            "-t",
            "oracle_linux_6_9",
            "-t",
            "kylinsec_3_4",
        ])
        .expect("should parse");
        match cli.command {
            Commands::New { output, name, id, targets, .. } => {
                assert_eq!(output, PathBuf::from("recipe.json"));
                assert_eq!(name, "demo");
                assert!(id.is_none());
                assert_eq!(targets, vec!["oracle_linux_6_9", "kylinsec_3_4"]);
            }
            _ => panic!("Expected New command"),
        }
    }

    #[test]
    fn test_render_json_flag() {
        let cli = Cli::try_parse_from(["installforge", "render", "r.json", "--json"]).expect("parse");
        assert!(matches!(cli.command, Commands::Render { json: true, .. }));
    }

    #[test]
    fn test_export_requires_out() {
        assert!(Cli::try_parse_from(["installforge", "export", "r.json"]).is_err());
        let cli = Cli::try_parse_from(["installforge", "-v", "export", "r.json", "--out", "/tmp/b"])
            .expect("parse");
        assert!(cli.verbose);
        match cli.command {
            Commands::Export { out, assets, .. } => {
                assert_eq!(out, PathBuf::from("/tmp/b"));
                assert!(assets.is_none());
            }
            _ => panic!("Expected Export command"),
        }
    }
}
