//! Resolve command implementation

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use tracing::info;

use crate::config::BuildConfig;
use crate::utils::display_path;

/// Show how an import specifier resolves
#[derive(Args, Debug)]
pub struct ResolveCommand {
    /// Import specifier, e.g. `./src/Main`
    pub specifier: String,

    /// Directory of the importing file (defaults to the project root)
    #[arg(long)]
    pub from: Option<PathBuf>,
}

impl ResolveCommand {
    pub async fn execute(&self, config: &BuildConfig) -> Result<()> {
        let from = match &self.from {
            Some(dir) => config.root().join(dir),
            None => config.root().to_path_buf(),
        };
        let resolver = config.resolver();

        for candidate in resolver.candidates(&self.specifier) {
            eprintln!("  {} {}", "?".dimmed(), candidate.dimmed());
        }

        match resolver.resolve(&self.specifier, &from)? {
            Some(path) => {
                info!("Resolved '{}' to {}", self.specifier, path.display());
                println!("{}", display_path(&path, config.root()));
                Ok(())
            }
            None => anyhow::bail!(
                "Cannot resolve '{}' from {}",
                self.specifier,
                from.display()
            ),
        }
    }
}
