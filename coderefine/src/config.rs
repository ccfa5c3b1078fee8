//! Configuration for coderefine.
//!
//! Settings come from `$XDG_CONFIG_HOME/coderefine/config.toml` and are then
//! overridden by command-line flags. Config problems are soft failures: a
//! missing file means defaults, a malformed file is logged and ignored.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use coderefine_core::types::{Depth, Language, ReviewOptions};
use serde::Deserialize;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Command-line arguments.
#[derive(Debug, Default, Parser)]
#[command(name = "coderefine", version, about = "Terminal client for the CodeRefine review service")]
pub struct Args {
    /// Base URL of the review service.
    #[arg(long, env = "CODEREFINE_API_URL")]
    pub api_url: Option<String>,

    /// Color theme: `dark` or `catppuccin-mocha`.
    #[arg(long)]
    pub theme: Option<String>,

    /// Path to an alternative config file.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Source file to load into the editor on startup.
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,
}

/// Settings read from `config.toml`. Every key is optional.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_url: String,
    pub theme: String,
    pub language: Language,
    pub depth: Depth,
    pub check_security: bool,
    pub check_performance: bool,
    pub check_best_practices: bool,
    /// Directory review exports are written to.
    pub export_dir: PathBuf,
    /// Request timeout. Unset means wait for as long as the service takes.
    pub timeout_secs: Option<u64>,
    /// Default `EnvFilter` directive; `RUST_LOG` wins when set.
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        let options = ReviewOptions::default();
        Self {
            api_url: DEFAULT_API_URL.to_owned(),
            theme: "catppuccin-mocha".to_owned(),
            language: options.language,
            depth: options.depth,
            check_security: options.check_security,
            check_performance: options.check_performance,
            check_best_practices: options.check_best_practices,
            export_dir: PathBuf::from("."),
            timeout_secs: None,
            log_level: "info".to_owned(),
        }
    }
}

impl Config {
    /// Loads the config file named by `args` (or the default path) and
    /// applies the command-line overrides.
    ///
    /// Returns the config plus a warning for the caller to log once logging
    /// is initialized.
    pub fn load(args: &Args) -> (Self, Option<String>) {
        let path = args.config.clone().unwrap_or_else(config_path);
        let (mut config, warning) = match std::fs::read_to_string(&path) {
            Ok(raw) => match Self::parse(&raw) {
                Ok(c) => (c, None),
                Err(e) => (
                    Self::default(),
                    Some(format!("config parse error in {}: {e}", path.display())),
                ),
            },
            Err(_) => (Self::default(), None),
        };
        config.apply_args(args);
        (config, warning)
    }

    pub fn parse(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    fn apply_args(&mut self, args: &Args) {
        if let Some(url) = &args.api_url {
            self.api_url = url.clone();
        }
        if let Some(theme) = &args.theme {
            self.theme = theme.clone();
        }
    }

    pub fn review_options(&self) -> ReviewOptions {
        ReviewOptions {
            language: self.language,
            depth: self.depth,
            check_security: self.check_security,
            check_performance: self.check_performance,
            check_best_practices: self.check_best_practices,
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

fn home_relative(var: &str, fallback: &str) -> PathBuf {
    std::env::var(var)
        .ok()
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| {
            std::env::var("HOME")
                .ok()
                .map(|h| Path::new(&h).join(fallback))
        })
        .unwrap_or_else(|| PathBuf::from(fallback))
}

/// `$XDG_CONFIG_HOME/coderefine/config.toml`, falling back to
/// `~/.config/coderefine/config.toml`.
pub fn config_path() -> PathBuf {
    home_relative("XDG_CONFIG_HOME", ".config")
        .join("coderefine")
        .join("config.toml")
}

/// `$XDG_STATE_HOME/coderefine`, falling back to `~/.local/state/coderefine`.
/// Holds the log file.
pub fn state_dir() -> PathBuf {
    home_relative("XDG_STATE_HOME", ".local/state").join("coderefine")
}
