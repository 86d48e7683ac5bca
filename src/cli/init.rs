//! Project initialization command

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use crate::config::CONFIG_FILE;

/// Initialize a new project
#[derive(Args, Debug)]
pub struct InitCommand {
    /// Project directory
    #[arg(default_value = ".")]
    pub name: String,

    /// Overwrite files that already exist
    #[arg(long)]
    pub force: bool,
}

impl InitCommand {
    pub async fn execute(&self) -> Result<()> {
        let project_dir = Path::new(&self.name);

        eprintln!("{} Initializing new Elm project...\n", "→".blue());

        if self.name != "." {
            fs::create_dir_all(project_dir)
                .context("Failed to create project directory")?;
        }

        self.write_file(project_dir, CONFIG_FILE, &self.generate_config())?;
        self.write_file(project_dir, "index.js", INDEX_JS)?;
        self.write_file(project_dir, "src/Main.elm", MAIN_ELM)?;

        eprintln!(
            "\n{} Project initialized successfully!\n",
            "✓".green().bold()
        );

        eprintln!("  Next steps:");
        if self.name != "." {
            eprintln!("    {} cd {}", "→".dimmed(), self.name.cyan());
        }
        eprintln!("    {} elmpack show --pretty", "→".dimmed());
        eprintln!();

        Ok(())
    }

    fn write_file(&self, project_dir: &Path, relative: &str, content: &str) -> Result<()> {
        let path = project_dir.join(relative);

        if path.exists() && !self.force {
            eprintln!("  {} Skipped {} (exists)", "•".dimmed(), relative.yellow());
            return Ok(());
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&path, content)
            .with_context(|| format!("Failed to write {}", relative))?;
        eprintln!("  {} Created {}", "✓".green(), relative.cyan());

        Ok(())
    }

    fn generate_config(&self) -> String {
        format!(
r#"# Elmpack configuration for {name}
# Every section is optional; omitted values use the defaults shown here.

[entry]
bundle = "index.js"

[output]
path = "dist"
filename = "[name].js"

[resolve]
extensions = ["", ".js", ".elm"]

[module]
no_parse = "\\.elm$"

[[module.rules]]
test = "\\.elm$"
exclude = ["elm-stuff", "node_modules"]
loader = "elm-hot!elm-webpack"

[[plugins]]
name = "html"

[dev_server]
stats = "errors-only"
"#,
            name = if self.name == "." { "my-app" } else { &self.name },
        )
    }
}

const INDEX_JS: &str = r#"var Elm = require('./src/Main');

Elm.Main.fullscreen();
"#;

const MAIN_ELM: &str = r#"module Main exposing (main)

import Html exposing (Html, text)


main : Html msg
main =
    text "Hello from Elm!"
"#;
