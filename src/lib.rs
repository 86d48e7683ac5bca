//! Elmpack library
//!
//! Resolves the build configuration handed to an Elm bundling engine and
//! evaluates its directives against concrete paths.

pub mod cli;
pub mod config;
pub mod loader;
pub mod plugins;
pub mod resolver;
pub mod stats;
pub mod utils;

pub use cli::Cli;
pub use config::BuildConfig;
