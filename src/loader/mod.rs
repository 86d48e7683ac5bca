//! Loader rules and the no-parse directive
//!
//! Decides, for a candidate module path, which loader pipeline the engine
//! should run on it and whether the engine may scan it for imports.

use std::fmt;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::config::ConfigError;
use crate::utils::path_to_module_id;

static ELM_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.elm$").unwrap());
static ELM_STUFF: Lazy<Regex> = Lazy::new(|| Regex::new(r"elm-stuff").unwrap());
static NODE_MODULES: Lazy<Regex> = Lazy::new(|| Regex::new(r"node_modules").unwrap());

/// A regular expression matched against module paths
///
/// Serialised as its source string. Two patterns are equal when their
/// sources are.
#[derive(Debug, Clone)]
pub struct Pattern(Regex);

impl Pattern {
    pub fn new(source: &str) -> Result<Self, ConfigError> {
        Regex::new(source)
            .map(Self)
            .map_err(|source_err| ConfigError::InvalidPattern {
                pattern: source.to_string(),
                source: source_err,
            })
    }

    /// Source text of the expression
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Test the pattern against a path, with separators normalised to `/`
    pub fn is_match(&self, path: &Path) -> bool {
        self.0.is_match(&path_to_module_id(path))
    }
}

impl From<Regex> for Pattern {
    fn from(regex: Regex) -> Self {
        Self(regex)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for Pattern {}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/", self.as_str())
    }
}

impl Serialize for Pattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Pattern {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let source = String::deserialize(deserializer)?;
        Pattern::new(&source).map_err(serde::de::Error::custom)
    }
}

/// A `!`-separated loader pipeline such as `elm-hot!elm-webpack`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderChain(Vec<String>);

impl LoaderChain {
    pub fn parse(chain: &str) -> Self {
        Self(
            chain
                .split('!')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    /// Loader names as written, left to right
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Loader names in the order the engine runs them (rightmost first)
    pub fn execution_order(&self) -> impl Iterator<Item = &str> {
        self.0.iter().rev().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for LoaderChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("!"))
    }
}

impl Serialize for LoaderChain {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for LoaderChain {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let chain = String::deserialize(deserializer)?;
        let parsed = LoaderChain::parse(&chain);
        if parsed.is_empty() {
            return Err(serde::de::Error::custom("loader chain must name at least one loader"));
        }
        Ok(parsed)
    }
}

/// Routes files whose path matches `test` (and no `exclude`) to `loader`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoaderRule {
    pub test: Pattern,

    #[serde(default)]
    pub exclude: Vec<Pattern>,

    pub loader: LoaderChain,
}

impl LoaderRule {
    /// Exclusions are checked before the suffix test
    pub fn matches(&self, path: &Path) -> bool {
        if self.exclude.iter().any(|pattern| pattern.is_match(path)) {
            return false;
        }
        self.test.is_match(path)
    }

    /// The Elm rule: compile `.elm` sources outside `elm-stuff` and `node_modules`
    pub fn elm() -> Self {
        Self {
            test: ELM_SUFFIX.clone().into(),
            exclude: vec![ELM_STUFF.clone().into(), NODE_MODULES.clone().into()],
            loader: LoaderChain::parse("elm-hot!elm-webpack"),
        }
    }
}

/// Module handling directives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleOptions {
    #[serde(default = "default_rules")]
    pub rules: Vec<LoaderRule>,

    #[serde(default = "default_no_parse", skip_serializing_if = "Option::is_none")]
    pub no_parse: Option<Pattern>,
}

impl Default for ModuleOptions {
    fn default() -> Self {
        Self {
            rules: default_rules(),
            no_parse: default_no_parse(),
        }
    }
}

fn default_rules() -> Vec<LoaderRule> {
    vec![LoaderRule::elm()]
}

fn default_no_parse() -> Option<Pattern> {
    Some(ELM_SUFFIX.clone().into())
}

impl ModuleOptions {
    /// Loader names from every matching rule, in rule order
    pub fn loaders_for(&self, path: &Path) -> Vec<&str> {
        self.rules
            .iter()
            .filter(|rule| rule.matches(path))
            .flat_map(|rule| rule.loader.names())
            .collect()
    }

    /// Whether the engine must treat the file as opaque
    pub fn is_no_parse(&self, path: &Path) -> bool {
        self.no_parse
            .as_ref()
            .map(|pattern| pattern.is_match(path))
            .unwrap_or(false)
    }
}
