//! Check command implementation

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::config::BuildConfig;
use crate::utils::display_path;

/// Show which loaders apply to files and whether they are parsed
#[derive(Args, Debug)]
pub struct CheckCommand {
    /// Paths to evaluate, relative to the project root
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,
}

impl CheckCommand {
    pub async fn execute(&self, config: &BuildConfig) -> Result<()> {
        let module = config.module();

        for path in &self.paths {
            let full_path = config.root().join(path);
            let loaders = module.loaders_for(&full_path);
            let loaders = if loaders.is_empty() {
                "-".to_string()
            } else {
                loaders.join("!")
            };
            let parse = if module.is_no_parse(&full_path) {
                "no-parse"
            } else {
                "parse"
            };

            println!("{}\t{}\t{}", display_path(&full_path, config.root()), loaders, parse);
        }

        Ok(())
    }
}
