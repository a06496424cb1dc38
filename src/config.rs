//! Configuration management for the fofimon tools.
//!
//! Reads configuration from a .env file and environment variables.
//! Environment variables take precedence over the .env file.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Extra arguments for the compile step (e.g. `-j8`).
pub const MAKE_OPTIONS_VAR: &str = "STMM_MAKE_OPTIONS";

/// Project root override.
pub const SOURCE_DIR_VAR: &str = "FOFIMON_SOURCE_DIR";

/// Set to `1` or `true` to skip host tool checks.
pub const SKIP_PREFLIGHT_VAR: &str = "FOFIMON_SKIP_PREFLIGHT";

/// Tool configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Root of the project tree (default: invocation directory)
    pub source_dir: PathBuf,
    /// Raw compile options, verbatim from the environment
    pub make_options: Option<String>,
    /// Skip the PATH checks before running anything
    pub skip_preflight: bool,
}

impl Config {
    /// Load configuration from .env and the process environment.
    ///
    /// `invocation_dir` is the directory the tool was started from; relative
    /// `FOFIMON_SOURCE_DIR` values resolve against it.
    pub fn load(invocation_dir: &Path) -> Self {
        // Missing .env is normal
        if let Err(err) = dotenvy::dotenv() {
            if !err.not_found() {
                tracing::warn!("ignoring unreadable .env: {}", err);
            }
        }

        let config = Self::from_vars(std::env::vars(), invocation_dir);
        tracing::debug!(?config, "configuration loaded");
        config
    }

    /// Build configuration from an explicit set of variables.
    pub fn from_vars<I>(vars: I, invocation_dir: &Path) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let env_vars: HashMap<String, String> = vars.into_iter().collect();

        let source_dir = env_vars
            .get(SOURCE_DIR_VAR)
            .filter(|s| !s.trim().is_empty())
            .map(|s| {
                let path = PathBuf::from(s);
                if path.is_absolute() {
                    path
                } else {
                    invocation_dir.join(path)
                }
            })
            .unwrap_or_else(|| invocation_dir.to_path_buf());

        let make_options = env_vars
            .get(MAKE_OPTIONS_VAR)
            .filter(|s| !s.trim().is_empty())
            .cloned();

        let skip_preflight = env_vars
            .get(SKIP_PREFLIGHT_VAR)
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Self {
            source_dir,
            make_options,
            skip_preflight,
        }
    }

    /// Compile options split into arguments.
    pub fn make_args(&self) -> Vec<String> {
        self.make_options
            .as_deref()
            .map(|s| s.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_vars(vars(&[]), Path::new("/src/fofimon"));
        assert_eq!(config.source_dir, PathBuf::from("/src/fofimon"));
        assert_eq!(config.make_options, None);
        assert!(!config.skip_preflight);
        assert!(config.make_args().is_empty());
    }

    #[test]
    fn test_make_options_split() {
        let config = Config::from_vars(
            vars(&[(MAKE_OPTIONS_VAR, "  -j8   VERBOSE=1 ")]),
            Path::new("/src"),
        );
        assert_eq!(config.make_args(), vec!["-j8", "VERBOSE=1"]);
    }

    #[test]
    fn test_blank_make_options_ignored() {
        let config = Config::from_vars(vars(&[(MAKE_OPTIONS_VAR, "   ")]), Path::new("/src"));
        assert_eq!(config.make_options, None);
    }

    #[test]
    fn test_relative_source_dir() {
        let config = Config::from_vars(
            vars(&[(SOURCE_DIR_VAR, "checkout/fofimon")]),
            Path::new("/home/dev"),
        );
        assert_eq!(config.source_dir, PathBuf::from("/home/dev/checkout/fofimon"));

        let config = Config::from_vars(vars(&[(SOURCE_DIR_VAR, "/opt/fofimon")]), Path::new("/x"));
        assert_eq!(config.source_dir, PathBuf::from("/opt/fofimon"));
    }

    #[test]
    fn test_skip_preflight_values() {
        for value in ["1", "true", "TRUE", "yes"] {
            let config = Config::from_vars(vars(&[(SKIP_PREFLIGHT_VAR, value)]), Path::new("/"));
            assert!(config.skip_preflight, "{value} should skip");
        }
        let config = Config::from_vars(vars(&[(SKIP_PREFLIGHT_VAR, "0")]), Path::new("/"));
        assert!(!config.skip_preflight);
    }
}
