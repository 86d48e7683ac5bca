//! Build configuration
//!
//! Resolves the record handed to the bundling engine. Defaults describe an
//! Elm application with a single `bundle` entry; an optional `elmpack.toml`
//! overrides any section of it.

mod error;
mod schema;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use crate::loader::ModuleOptions;
use crate::resolver::{ResolveOptions, Resolver};

pub use error::{ConfigError, Result};
pub use schema::*;

/// Default config file name looked up by the CLI
pub const CONFIG_FILE: &str = "elmpack.toml";

/// Resolved build configuration
///
/// Immutable once constructed: fields are only reachable through accessors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildConfig {
    root: PathBuf,
    entry: BTreeMap<String, PathBuf>,
    output: OutputOptions,
    resolve: ResolveOptions,
    module: ModuleOptions,
    plugins: Vec<PluginConfig>,
    dev_server: DevServerOptions,
}

impl BuildConfig {
    /// Default configuration rooted at `root`
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self::from_file(root, ConfigFile::default())
    }

    /// Default configuration rooted at the working directory
    pub fn from_current_dir() -> Result<Self> {
        Ok(Self::new(std::env::current_dir()?))
    }

    /// Build from a parsed config file, joining relative paths onto `root`
    pub fn from_file<P: Into<PathBuf>>(root: P, file: ConfigFile) -> Self {
        let root = root.into();

        let entry = file
            .entry
            .into_iter()
            .map(|(name, path)| (name, root.join(path)))
            .collect();

        let output = OutputOptions {
            path: root.join(&file.output.path),
            filename: file.output.filename,
        };

        Self {
            root,
            entry,
            output,
            resolve: file.resolve,
            module: file.module,
            plugins: file.plugins,
            dev_server: file.dev_server,
        }
    }

    /// Load configuration from a TOML file; its directory becomes the root
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let canonical_path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()?.join(path)
        };

        let content = fs::read_to_string(&canonical_path).map_err(|source| ConfigError::Read {
            path: canonical_path.clone(),
            source,
        })?;

        let file: ConfigFile = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: canonical_path.clone(),
            source,
        })?;

        let root = canonical_path
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));

        info!("Loaded configuration from {}", canonical_path.display());

        Ok(Self::from_file(root, file))
    }

    /// Load `path` if it exists, otherwise fall back to the defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.is_file() {
            Self::load(path)
        } else {
            debug!("No config file at {}, using defaults", path.display());
            Self::from_current_dir()
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn entry(&self) -> &BTreeMap<String, PathBuf> {
        &self.entry
    }

    pub fn output(&self) -> &OutputOptions {
        &self.output
    }

    pub fn resolve(&self) -> &ResolveOptions {
        &self.resolve
    }

    pub fn module(&self) -> &ModuleOptions {
        &self.module
    }

    pub fn plugins(&self) -> &[PluginConfig] {
        &self.plugins
    }

    pub fn dev_server(&self) -> &DevServerOptions {
        &self.dev_server
    }

    /// Resolver applying the configured extension order
    pub fn resolver(&self) -> Resolver<'_> {
        Resolver::new(&self.resolve)
    }

    /// Output file path for a bundle
    pub fn output_file(&self, bundle: &str) -> PathBuf {
        self.output.path.join(self.output.filename.render(bundle))
    }

    /// Rendered output filename of each entry, in entry order
    pub fn bundle_filenames(&self) -> Vec<String> {
        self.entry
            .keys()
            .map(|name| self.output.filename.render(name))
            .collect()
    }

    /// Entries whose source file does not exist
    ///
    /// Informational; the engine reports these itself.
    pub fn missing_entries(&self) -> Vec<(&str, &Path)> {
        self.entry
            .iter()
            .filter(|(_, path)| !path.exists())
            .map(|(name, path)| (name.as_str(), path.as_path()))
            .collect()
    }

    /// Serialise for the bundling engine
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::Stats;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_construction_is_deterministic() {
        let a = BuildConfig::new("/work/app");
        let b = BuildConfig::new("/work/app");
        assert_eq!(a, b);
        assert_eq!(a.to_json().unwrap(), b.to_json().unwrap());
    }

    #[test]
    fn test_defaults() {
        let config = BuildConfig::new("/work/app");

        assert_eq!(config.entry().len(), 1);
        assert_eq!(config.entry()["bundle"], PathBuf::from("/work/app/index.js"));
        assert_eq!(config.output().path, PathBuf::from("/work/app/dist"));
        assert_eq!(config.output().filename.as_str(), "[name].js");
        assert_eq!(config.resolve().extensions, vec!["", ".js", ".elm"]);
        assert_eq!(config.module().rules.len(), 1);
        assert_eq!(config.module().rules[0].loader.to_string(), "elm-hot!elm-webpack");
        assert_eq!(config.plugins().len(), 1);
        assert_eq!(config.plugins()[0].name, "html");
        assert_eq!(config.dev_server().stats, Stats::ErrorsOnly);
        assert_eq!(config.dev_server().stats.as_str(), "errors-only");
    }

    #[test]
    fn test_output_filename() {
        let config = BuildConfig::new("/work/app");
        assert_eq!(config.output().filename.render("bundle"), "bundle.js");
        assert_eq!(config.output_file("bundle"), PathBuf::from("/work/app/dist/bundle.js"));
        assert_eq!(config.bundle_filenames(), vec!["bundle.js"]);
    }

    #[test]
    fn test_filename_template_validation() {
        assert!(FilenameTemplate::new("[name].[name].js").is_err());
        assert!(FilenameTemplate::new("app.js").is_err());
        let template = FilenameTemplate::new("js/[name].min.js").unwrap();
        assert_eq!(template.render("vendor"), "js/vendor.min.js");
    }

    #[test]
    fn test_missing_entries_do_not_fail_construction() {
        let dir = TempDir::new().unwrap();
        let config = BuildConfig::new(dir.path());
        assert_eq!(config.missing_entries().len(), 1);

        fs::write(dir.path().join("index.js"), "").unwrap();
        assert!(config.missing_entries().is_empty());
    }

    #[test]
    fn test_load_overrides() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(
            &path,
            r#"
[entry]
app = "src/app.js"

[output]
path = "public/build"
filename = "[name].bundle.js"

[dev_server]
stats = "minimal"
"#,
        )
        .unwrap();

        let config = BuildConfig::load(&path).unwrap();
        assert_eq!(config.root(), dir.path());
        assert_eq!(config.entry()["app"], dir.path().join("src/app.js"));
        assert!(!config.entry().contains_key("bundle"));
        assert_eq!(config.output_file("app"), dir.path().join("public/build/app.bundle.js"));
        assert_eq!(config.dev_server().stats, Stats::Minimal);

        // Sections left out keep their defaults
        assert_eq!(config.resolve(), &ResolveOptions::default());
        assert_eq!(config.module(), &ModuleOptions::default());
        assert_eq!(config.plugins()[0].name, "html");
    }

    #[test]
    fn test_load_matches_defaults_for_empty_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "").unwrap();

        assert_eq!(BuildConfig::load(&path).unwrap(), BuildConfig::new(dir.path()));
    }

    #[test]
    fn test_load_rules() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(
            &path,
            r#"
[resolve]
extensions = ["", ".elm"]

[module]
no_parse = "\\.(elm|min\\.js)$"

[[module.rules]]
test = "\\.elm$"
exclude = ["elm-stuff"]
loader = "elm-webpack"
"#,
        )
        .unwrap();

        let config = BuildConfig::load(&path).unwrap();
        assert_eq!(config.resolve().extensions, vec!["", ".elm"]);
        assert!(config.module().is_no_parse(Path::new("vendor/jquery.min.js")));
        assert_eq!(
            config.module().loaders_for(Path::new("node_modules/x/Main.elm")),
            vec!["elm-webpack"]
        );
    }

    #[test]
    fn test_load_rejects_malformed_files() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);

        fs::write(&path, "[output]\nfilename = \"bundle.js\"\n").unwrap();
        assert!(matches!(BuildConfig::load(&path), Err(ConfigError::Parse { .. })));

        fs::write(&path, "[dev_server]\nstats = \"chatty\"\n").unwrap();
        assert!(matches!(BuildConfig::load(&path), Err(ConfigError::Parse { .. })));

        fs::write(&path, "[module]\nno_parse = \"(\"\n").unwrap();
        assert!(matches!(BuildConfig::load(&path), Err(ConfigError::Parse { .. })));

        fs::write(&path, "[devServer]\nstats = \"none\"\n").unwrap();
        assert!(matches!(BuildConfig::load(&path), Err(ConfigError::Parse { .. })));

        let missing = dir.path().join("nope.toml");
        assert!(matches!(BuildConfig::load(&missing), Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_json_handoff() {
        let config = BuildConfig::new("/work/app");
        let value: serde_json::Value = serde_json::from_str(&config.to_json().unwrap()).unwrap();

        assert_eq!(value["entry"]["bundle"], "/work/app/index.js");
        assert_eq!(value["output"]["filename"], "[name].js");
        assert_eq!(value["resolve"]["extensions"], serde_json::json!(["", ".js", ".elm"]));
        assert_eq!(value["module"]["rules"][0]["test"], "\\.elm$");
        assert_eq!(value["module"]["rules"][0]["exclude"], serde_json::json!(["elm-stuff", "node_modules"]));
        assert_eq!(value["module"]["rules"][0]["loader"], "elm-hot!elm-webpack");
        assert_eq!(value["module"]["no_parse"], "\\.elm$");
        assert_eq!(value["plugins"][0]["name"], "html");
        assert_eq!(value["dev_server"]["stats"], "errors-only");
    }
}
