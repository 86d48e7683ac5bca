//! Plugin system
//!
//! Plugins run after bundling and emit extra assets into the output
//! directory. They are declared by name in the configuration.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::debug;

use crate::config::{BuildConfig, ConfigError, PluginConfig};

/// What plugins know about the build
pub struct EmitContext {
    /// Output directory
    pub output_dir: PathBuf,

    /// Rendered bundle filenames, in entry order
    pub bundles: Vec<String>,
}

impl EmitContext {
    pub fn from_config(config: &BuildConfig) -> Self {
        Self {
            output_dir: config.output().path.clone(),
            bundles: config.bundle_filenames(),
        }
    }
}

/// A file emitted by a plugin, relative to the output directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    pub filename: String,
    pub contents: String,
}

#[async_trait]
pub trait Plugin: Send + Sync {
    /// Plugin name for logging and debugging
    fn name(&self) -> &str;

    /// Produce assets for the output directory
    async fn emit(&self, _ctx: &EmitContext) -> Result<Vec<Asset>> {
        Ok(Vec::new())
    }
}

/// Plugin manager
pub struct PluginManager {
    plugins: Vec<Arc<dyn Plugin>>,
}

impl PluginManager {
    pub fn new() -> Self {
        Self { plugins: Vec::new() }
    }

    /// Instantiate the built-in plugins named in the configuration
    pub fn from_config(configs: &[PluginConfig]) -> Result<Self> {
        let mut manager = Self::new();

        for config in configs {
            let plugin: Arc<dyn Plugin> = match config.name.as_str() {
                "html" => Arc::new(HtmlPlugin::from_options(config.options.as_ref())?),
                other => return Err(ConfigError::UnknownPlugin(other.to_string()).into()),
            };
            manager.register(plugin);
        }

        Ok(manager)
    }

    pub fn register(&mut self, plugin: Arc<dyn Plugin>) {
        self.plugins.push(plugin);
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Run every plugin in declaration order
    pub async fn emit(&self, ctx: &EmitContext) -> Result<Vec<Asset>> {
        let mut assets = Vec::new();

        for plugin in &self.plugins {
            let emitted = plugin
                .emit(ctx)
                .await
                .with_context(|| format!("Plugin '{}' failed", plugin.name()))?;
            debug!("Plugin '{}' emitted {} asset(s)", plugin.name(), emitted.len());
            assets.extend(emitted);
        }

        Ok(assets)
    }

    /// Run every plugin and write the assets into the output directory
    pub async fn write_assets(&self, ctx: &EmitContext) -> Result<Vec<PathBuf>> {
        let assets = self.emit(ctx).await?;
        let mut written = Vec::with_capacity(assets.len());

        for asset in assets {
            let path = ctx.output_dir.join(&asset.filename);
            if let Some(parent) = path.parent() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            tokio::fs::write(&path, asset.contents)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            written.push(path);
        }

        Ok(written)
    }
}

impl Default for PluginManager {
    fn default() -> Self {
        Self::new()
    }
}

/// HTML plugin - emits a page loading every bundle
pub struct HtmlPlugin {
    title: String,
    filename: String,
}

impl HtmlPlugin {
    pub fn new() -> Self {
        Self {
            title: "Elm App".to_string(),
            filename: "index.html".to_string(),
        }
    }

    /// Accepts `title` and `filename` string options
    pub fn from_options(options: Option<&toml::Table>) -> Result<Self> {
        let mut plugin = Self::new();
        let Some(options) = options else {
            return Ok(plugin);
        };

        for (key, value) in options {
            let text = value
                .as_str()
                .with_context(|| format!("html plugin option '{}' must be a string", key))?;
            match key.as_str() {
                "title" => plugin.title = text.to_string(),
                "filename" => plugin.filename = text.to_string(),
                other => anyhow::bail!("unknown html plugin option '{}'", other),
            }
        }

        Ok(plugin)
    }

    pub fn render(&self, bundles: &[String]) -> String {
        let scripts: String = bundles
            .iter()
            .map(|src| {
                format!(
                    "    <script type=\"text/javascript\" src=\"{}\"></script>\n",
                    escape_html(src)
                )
            })
            .collect();

        format!(
r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="UTF-8">
    <title>{title}</title>
  </head>
  <body>
{scripts}  </body>
</html>
"#,
            title = escape_html(&self.title),
            scripts = scripts,
        )
    }
}

impl Default for HtmlPlugin {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Plugin for HtmlPlugin {
    fn name(&self) -> &str {
        "html"
    }

    async fn emit(&self, ctx: &EmitContext) -> Result<Vec<Asset>> {
        Ok(vec![Asset {
            filename: self.filename.clone(),
            contents: self.render(&ctx.bundles),
        }])
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn html_config(options: Option<&str>) -> PluginConfig {
        PluginConfig {
            name: "html".to_string(),
            options: options.map(|o| o.parse::<toml::Table>().unwrap()),
        }
    }

    #[test]
    fn test_html_render() {
        let html = HtmlPlugin::new().render(&["bundle.js".to_string()]);
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Elm App</title>"));
        assert!(html.contains(r#"<script type="text/javascript" src="bundle.js"></script>"#));
    }

    #[test]
    fn test_html_options() {
        let options: toml::Table = r#"title = "Tom & Jerry"
filename = "app.html""#
            .parse()
            .unwrap();
        let plugin = HtmlPlugin::from_options(Some(&options)).unwrap();
        assert_eq!(plugin.filename, "app.html");
        assert!(plugin.render(&[]).contains("<title>Tom &amp; Jerry</title>"));

        let bad: toml::Table = "title = 3".parse().unwrap();
        assert!(HtmlPlugin::from_options(Some(&bad)).is_err());
        let unknown: toml::Table = "inject = \"body\"".parse().unwrap();
        assert!(HtmlPlugin::from_options(Some(&unknown)).is_err());
    }

    #[test]
    fn test_unknown_plugin() {
        let configs = vec![PluginConfig { name: "uglify".to_string(), options: None }];
        let err = PluginManager::from_config(&configs).err().unwrap();
        assert!(err.to_string().contains("uglify"));
    }

    #[tokio::test]
    async fn test_emit_in_order() {
        let configs = vec![html_config(None), html_config(Some("filename = \"second.html\""))];
        let manager = PluginManager::from_config(&configs).unwrap();
        assert_eq!(manager.len(), 2);

        let ctx = EmitContext {
            output_dir: PathBuf::from("/unused"),
            bundles: vec!["bundle.js".to_string(), "vendor.js".to_string()],
        };
        let assets = manager.emit(&ctx).await.unwrap();
        assert_eq!(assets.len(), 2);
        assert_eq!(assets[0].filename, "index.html");
        assert_eq!(assets[1].filename, "second.html");
        let bundle_pos = assets[0].contents.find("bundle.js").unwrap();
        let vendor_pos = assets[0].contents.find("vendor.js").unwrap();
        assert!(bundle_pos < vendor_pos);
    }

    #[tokio::test]
    async fn test_write_assets() {
        let dir = TempDir::new().unwrap();
        let config = BuildConfig::new(dir.path());
        let manager = PluginManager::from_config(config.plugins()).unwrap();
        let ctx = EmitContext::from_config(&config);

        let written = manager.write_assets(&ctx).await.unwrap();
        assert_eq!(written, vec![dir.path().join("dist/index.html")]);

        let html = std::fs::read_to_string(&written[0]).unwrap();
        assert!(html.contains("src=\"bundle.js\""));
    }
}
