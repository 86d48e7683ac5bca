//! Command-line interface for Elmpack
//!
//! Provides the main CLI structure using clap with subcommands for:
//! - `show`: Print the resolved configuration for the bundler
//! - `resolve`: Apply extension resolution to an import specifier
//! - `check`: Evaluate loader rules and no-parse against paths
//! - `emit`: Run plugins into the output directory
//! - `init`: Project scaffolding

mod check;
mod emit;
mod init;
mod resolve;
mod show;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;

use crate::config::{BuildConfig, CONFIG_FILE};

pub use check::CheckCommand;
pub use emit::EmitCommand;
pub use init::InitCommand;
pub use resolve::ResolveCommand;
pub use show::ShowCommand;

/// Elmpack - build configuration for Elm bundling pipelines
#[derive(Parser, Debug)]
#[command(name = "elmpack")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to the config file; defaults apply when it does not exist
    #[arg(short, long, global = true, default_value = CONFIG_FILE, env = "ELMPACK_CONFIG")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the resolved configuration as JSON
    Show(ShowCommand),

    /// Show how an import specifier resolves
    Resolve(ResolveCommand),

    /// Show which loaders apply to files and whether they are parsed
    Check(CheckCommand),

    /// Run plugins and write their assets to the output directory
    Emit(EmitCommand),

    /// Initialize a new project
    Init(InitCommand),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<()> {
        match &self.command {
            Commands::Show(cmd) => cmd.execute(&self.load_config()?).await,
            Commands::Resolve(cmd) => cmd.execute(&self.load_config()?).await,
            Commands::Check(cmd) => cmd.execute(&self.load_config()?).await,
            Commands::Emit(cmd) => {
                print_banner();
                cmd.execute(&self.load_config()?).await
            }
            Commands::Init(cmd) => {
                print_banner();
                cmd.execute().await
            }
        }
    }

    fn load_config(&self) -> Result<BuildConfig> {
        Ok(BuildConfig::load_or_default(&self.config)?)
    }
}

/// Print the Elmpack banner
fn print_banner() {
    eprintln!(
        "\n{} {} {}\n",
        "⚡".cyan(),
        "Elmpack".bold().cyan(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
}
