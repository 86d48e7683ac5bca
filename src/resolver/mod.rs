//! Module resolution
//!
//! Applies the configured extension order to import specifiers that omit
//! their suffix.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Extension resolution settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveOptions {
    /// Suffixes tried in order; `""` means the literal path
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
        }
    }
}

fn default_extensions() -> Vec<String> {
    vec![String::new(), ".js".to_string(), ".elm".to_string()]
}

/// Module resolver
pub struct Resolver<'a> {
    options: &'a ResolveOptions,
}

impl<'a> Resolver<'a> {
    pub fn new(options: &'a ResolveOptions) -> Self {
        Self { options }
    }

    /// Every path the specifier may refer to, in lookup order
    pub fn candidates(&self, specifier: &str) -> Vec<String> {
        self.options
            .extensions
            .iter()
            .map(|ext| format!("{}{}", specifier, ext))
            .collect()
    }

    /// Resolve an import specifier against the directory of the importer
    pub fn resolve(&self, specifier: &str, from_dir: &Path) -> Result<Option<PathBuf>> {
        debug!("Resolving '{}' from '{}'", specifier, from_dir.display());

        let resolved = if is_path_specifier(specifier) {
            self.resolve_relative(specifier, from_dir)
        } else {
            self.resolve_bare(specifier, from_dir)?
        };

        debug!("Resolved to: {:?}", resolved);

        Ok(resolved)
    }

    fn resolve_relative(&self, specifier: &str, base_dir: &Path) -> Option<PathBuf> {
        for candidate in self.candidates(specifier) {
            let path = base_dir.join(&candidate);
            if path.is_file() {
                return Some(path);
            }
        }

        let dir = base_dir.join(specifier);
        if dir.is_dir() {
            for candidate in self.candidates("index") {
                let index = dir.join(candidate);
                if index.is_file() {
                    return Some(index);
                }
            }
        }

        None
    }

    /// Walk up the directory tree through each `node_modules`
    fn resolve_bare(&self, specifier: &str, from_dir: &Path) -> Result<Option<PathBuf>> {
        let mut current = from_dir.to_path_buf();

        loop {
            let node_modules = current.join("node_modules");

            if node_modules.is_dir() {
                if let Some(resolved) = self.resolve_in_node_modules(&node_modules, specifier)? {
                    return Ok(Some(resolved));
                }
            }

            if !current.pop() {
                break;
            }
        }

        Ok(None)
    }

    fn resolve_in_node_modules(&self, node_modules: &Path, specifier: &str) -> Result<Option<PathBuf>> {
        let (package_name, subpath) = split_package_specifier(specifier);
        let package_dir = node_modules.join(&package_name);

        if !package_dir.is_dir() {
            return Ok(None);
        }

        if let Some(sub) = subpath {
            return Ok(self.resolve_relative(&sub, &package_dir));
        }

        let package_json = package_dir.join("package.json");
        if package_json.is_file() {
            let content = fs::read_to_string(&package_json)
                .with_context(|| format!("Failed to read {}", package_json.display()))?;
            let pkg: serde_json::Value = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse {}", package_json.display()))?;

            if let Some(main) = pkg.get("main").and_then(|v| v.as_str()) {
                if let Some(resolved) = self.resolve_relative(main, &package_dir) {
                    return Ok(Some(resolved));
                }
            }
        }

        Ok(self.resolve_relative("index", &package_dir))
    }
}

fn is_path_specifier(specifier: &str) -> bool {
    specifier.starts_with("./")
        || specifier.starts_with("../")
        || specifier == "."
        || specifier == ".."
        || Path::new(specifier).is_absolute()
}

/// Split `name/sub` or `@scope/name/sub` into package name and subpath
fn split_package_specifier(specifier: &str) -> (String, Option<String>) {
    if specifier.starts_with('@') {
        let parts: Vec<&str> = specifier.splitn(3, '/').collect();
        let name = parts[..parts.len().min(2)].join("/");
        (name, parts.get(2).map(|s| s.to_string()))
    } else {
        let parts: Vec<&str> = specifier.splitn(2, '/').collect();
        (parts[0].to_string(), parts.get(1).map(|s| s.to_string()))
    }
}
