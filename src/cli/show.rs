//! Show command implementation

use anyhow::{Context, Result};
use clap::Args;

use crate::config::BuildConfig;
use crate::stats::Reporter;

/// Print the resolved configuration as JSON
#[derive(Args, Debug)]
pub struct ShowCommand {
    /// Pretty-print the JSON
    #[arg(short, long)]
    pub pretty: bool,
}

impl ShowCommand {
    pub async fn execute(&self, config: &BuildConfig) -> Result<()> {
        let reporter = Reporter::new(config.dev_server().stats);
        for (name, path) in config.missing_entries() {
            reporter.warn(&format!("Entry '{}' points to a missing file: {}", name, path.display()));
        }

        let json = if self.pretty {
            config.to_json_pretty()
        } else {
            config.to_json()
        }
        .context("Failed to serialise configuration")?;

        println!("{}", json);

        Ok(())
    }
}
