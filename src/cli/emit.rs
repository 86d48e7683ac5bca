//! Emit command implementation

use std::time::Instant;

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use tracing::info;

use crate::config::BuildConfig;
use crate::plugins::{EmitContext, PluginManager};
use crate::stats::Reporter;
use crate::utils::display_path;

/// Run plugins and write their assets to the output directory
#[derive(Args, Debug)]
pub struct EmitCommand {}

impl EmitCommand {
    pub async fn execute(&self, config: &BuildConfig) -> Result<()> {
        let start = Instant::now();
        let reporter = Reporter::new(config.dev_server().stats);

        let manager = PluginManager::from_config(config.plugins())?;
        info!("Running {} plugin(s)", manager.len());

        let ctx = EmitContext::from_config(config);
        let written = manager.write_assets(&ctx).await?;

        for path in &written {
            eprintln!(
                "  {} Created {}",
                "✓".green(),
                display_path(path, config.root()).cyan()
            );
        }

        reporter.info(&format!(
            "Emitted {} asset(s) in {:.2}s",
            written.len(),
            start.elapsed().as_secs_f64()
        ));

        Ok(())
    }
}
