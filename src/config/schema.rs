//! Configuration schema definitions

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::ConfigError;
use crate::loader::ModuleOptions;
use crate::resolver::ResolveOptions;
use crate::stats::Stats;

/// Placeholder substituted with the bundle name
pub const NAME_PLACEHOLDER: &str = "[name]";

/// Contents of `elmpack.toml`; every section is optional
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Bundle name to entry source path
    #[serde(default = "default_entry")]
    pub entry: BTreeMap<String, PathBuf>,

    #[serde(default)]
    pub output: OutputOptions,

    #[serde(default)]
    pub resolve: ResolveOptions,

    #[serde(default)]
    pub module: ModuleOptions,

    #[serde(default = "default_plugins")]
    pub plugins: Vec<PluginConfig>,

    #[serde(default)]
    pub dev_server: DevServerOptions,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            entry: default_entry(),
            output: OutputOptions::default(),
            resolve: ResolveOptions::default(),
            module: ModuleOptions::default(),
            plugins: default_plugins(),
            dev_server: DevServerOptions::default(),
        }
    }
}

fn default_entry() -> BTreeMap<String, PathBuf> {
    let mut map = BTreeMap::new();
    map.insert("bundle".to_string(), PathBuf::from("index.js"));
    map
}

fn default_plugins() -> Vec<PluginConfig> {
    vec![PluginConfig {
        name: "html".to_string(),
        options: None,
    }]
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputOptions {
    /// Output directory
    #[serde(default = "default_output_path")]
    pub path: PathBuf,

    /// Bundle filename pattern
    #[serde(default)]
    pub filename: FilenameTemplate,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            path: default_output_path(),
            filename: FilenameTemplate::default(),
        }
    }
}

fn default_output_path() -> PathBuf {
    PathBuf::from("dist")
}

/// Filename pattern holding exactly one `[name]` placeholder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilenameTemplate(String);

impl FilenameTemplate {
    pub fn new(template: &str) -> Result<Self, ConfigError> {
        if template.matches(NAME_PLACEHOLDER).count() != 1 {
            return Err(ConfigError::InvalidFilename(template.to_string()));
        }
        Ok(Self(template.to_string()))
    }

    /// Substitute the bundle name
    pub fn render(&self, name: &str) -> String {
        self.0.replacen(NAME_PLACEHOLDER, name, 1)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for FilenameTemplate {
    fn default() -> Self {
        Self(format!("{}.js", NAME_PLACEHOLDER))
    }
}

impl fmt::Display for FilenameTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for FilenameTemplate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for FilenameTemplate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let template = String::deserialize(deserializer)?;
        FilenameTemplate::new(&template).map_err(serde::de::Error::custom)
    }
}

/// Development server configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DevServerOptions {
    /// Console verbosity
    #[serde(default)]
    pub stats: Stats,
}

/// Plugin configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginConfig {
    /// Plugin name/identifier
    pub name: String,

    /// Plugin-specific options
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<toml::Table>,
}
