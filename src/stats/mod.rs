//! Dev-server console verbosity
//!
//! `Stats` mirrors the presets a bundling engine's dev server understands.
//! `Reporter` applies the same filter to messages printed by this tool.

use std::fmt;
use std::str::FromStr;

use colored::Colorize;
use serde::{Deserialize, Serialize};

/// Console verbosity preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stats {
    None,
    #[default]
    ErrorsOnly,
    Minimal,
    Normal,
    Verbose,
}

impl Stats {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stats::None => "none",
            Stats::ErrorsOnly => "errors-only",
            Stats::Minimal => "minimal",
            Stats::Normal => "normal",
            Stats::Verbose => "verbose",
        }
    }

    /// Whether a message of the given severity reaches the console
    pub fn shows(&self, severity: Severity) -> bool {
        match self {
            Stats::None => false,
            Stats::ErrorsOnly => severity == Severity::Error,
            Stats::Minimal => severity <= Severity::Warning,
            Stats::Normal => severity <= Severity::Info,
            Stats::Verbose => true,
        }
    }
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stats {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Stats::None),
            "errors-only" => Ok(Stats::ErrorsOnly),
            "minimal" => Ok(Stats::Minimal),
            "normal" => Ok(Stats::Normal),
            "verbose" => Ok(Stats::Verbose),
            other => Err(format!("unknown stats preset '{}'", other)),
        }
    }
}

/// Message severity, most severe first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
    Info,
    Detail,
}

/// Prints build messages to stderr, filtered by a `Stats` preset
#[derive(Debug, Clone, Copy)]
pub struct Reporter {
    stats: Stats,
}

impl Reporter {
    pub fn new(stats: Stats) -> Self {
        Self { stats }
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    /// Returns whether the message was printed
    pub fn report(&self, severity: Severity, message: &str) -> bool {
        if !self.stats.shows(severity) {
            return false;
        }

        match severity {
            Severity::Error => eprintln!("{} {}", "✗".red().bold(), message),
            Severity::Warning => eprintln!("{} {}", "!".yellow().bold(), message),
            Severity::Info => eprintln!("{} {}", "•".dimmed(), message),
            Severity::Detail => eprintln!("  {}", message.dimmed()),
        }
        true
    }

    pub fn error(&self, message: &str) -> bool {
        self.report(Severity::Error, message)
    }

    pub fn warn(&self, message: &str) -> bool {
        self.report(Severity::Warning, message)
    }

    pub fn info(&self, message: &str) -> bool {
        self.report(Severity::Info, message)
    }

    pub fn detail(&self, message: &str) -> bool {
        self.report(Severity::Detail, message)
    }
}
