//! Runtime settings assembled from defaults, a YAML file and the command line.
//!
//! Precedence is command line, then file, then the defaults below. The file is
//! optional: `--config` names one explicitly, otherwise `radio_ai.yaml` in the
//! working directory is used when present.
//!
//! ```yaml
//! creds_path: creds.json
//! template_path: request.txt
//! audio_base_url: http://localhost:3000
//! news_section: world
//! article_count: 5
//! model: claude-sonnet-4-5
//! max_tokens: 300
//! poll_attempts: 60
//! poll_interval_secs: 5
//! ```

use crate::cli::Cli;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, instrument};

pub const DEFAULT_CONFIG_FILE: &str = "radio_ai.yaml";
pub const DEFAULT_CREDS_PATH: &str = "creds.json";
pub const DEFAULT_TEMPLATE_PATH: &str = "request.txt";
pub const DEFAULT_AUDIO_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_SECTION: &str = "world";
pub const DEFAULT_ARTICLE_COUNT: usize = 5;
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-5";
pub const DEFAULT_MAX_TOKENS: u32 = 300;
pub const DEFAULT_POLL_ATTEMPTS: u32 = 60;
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("config {} is not valid YAML: {source}", .path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Optional overrides as written in the YAML file.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub creds_path: Option<PathBuf>,
    pub template_path: Option<PathBuf>,
    pub audio_base_url: Option<String>,
    pub news_section: Option<String>,
    pub article_count: Option<usize>,
    pub model: Option<String>,
    pub max_tokens: Option<u32>,
    pub poll_attempts: Option<u32>,
    pub poll_interval_secs: Option<u64>,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone)]
pub struct Settings {
    pub creds_path: PathBuf,
    pub template_path: PathBuf,
    pub audio_base_url: String,
    pub news_section: String,
    pub article_count: usize,
    pub model: String,
    pub max_tokens: u32,
    pub poll_attempts: u32,
    pub poll_interval: Duration,
    pub editor: String,
}

impl Settings {
    /// Merge command-line flags over an optional file config.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for a zero article count or a
    /// zero poll budget.
    pub fn resolve(cli: &Cli, file: FileConfig) -> Result<Self, ConfigError> {
        let settings = Self {
            creds_path: cli
                .creds
                .clone()
                .or(file.creds_path)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CREDS_PATH)),
            template_path: cli
                .template
                .clone()
                .or(file.template_path)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_TEMPLATE_PATH)),
            audio_base_url: cli
                .base_url
                .clone()
                .or(file.audio_base_url)
                .unwrap_or_else(|| DEFAULT_AUDIO_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            news_section: cli
                .section
                .clone()
                .or(file.news_section)
                .unwrap_or_else(|| DEFAULT_SECTION.to_string()),
            article_count: cli
                .articles
                .or(file.article_count)
                .unwrap_or(DEFAULT_ARTICLE_COUNT),
            model: file.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            max_tokens: file.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            poll_attempts: file.poll_attempts.unwrap_or(DEFAULT_POLL_ATTEMPTS),
            poll_interval: Duration::from_secs(
                file.poll_interval_secs.unwrap_or(DEFAULT_POLL_INTERVAL_SECS),
            ),
            editor: cli.editor.clone(),
        };

        if settings.article_count == 0 {
            return Err(ConfigError::InvalidValue(
                "article_count must be at least 1".into(),
            ));
        }
        if settings.poll_attempts == 0 {
            return Err(ConfigError::InvalidValue(
                "poll_attempts must be at least 1".into(),
            ));
        }
        debug!(?settings, "Resolved settings");
        Ok(settings)
    }
}

/// Parse a YAML config file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid YAML.
#[instrument(level = "info", fields(path = %path.display()))]
pub fn load_file_config(path: &Path) -> Result<FileConfig, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if raw.trim().is_empty() {
        return Ok(FileConfig::default());
    }
    let file = serde_yaml::from_str(&raw).map_err(|source| ConfigError::Yaml {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Loaded configuration");
    Ok(file)
}

/// Load the file config named on the command line, or the default file if it
/// exists in the working directory.
///
/// # Errors
///
/// An explicitly named file must exist and parse; the implicit default may be
/// absent.
pub fn load_settings(cli: &Cli) -> Result<Settings, ConfigError> {
    let file = match &cli.config {
        Some(path) => load_file_config(path)?,
        None => {
            let implicit = Path::new(DEFAULT_CONFIG_FILE);
            if implicit.is_file() {
                load_file_config(implicit)?
            } else {
                FileConfig::default()
            }
        }
    };
    Settings::resolve(cli, file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;
    use tempfile::TempDir;

    fn bare_cli() -> Cli {
        Cli::parse_from(["radio_ai", "--editor", "nano"])
    }

    #[test]
    fn test_defaults_without_file() {
        let settings = Settings::resolve(&bare_cli(), FileConfig::default()).unwrap();

        assert_eq!(settings.creds_path, PathBuf::from("creds.json"));
        assert_eq!(settings.template_path, PathBuf::from("request.txt"));
        assert_eq!(settings.audio_base_url, "http://localhost:3000");
        assert_eq!(settings.news_section, "world");
        assert_eq!(settings.article_count, 5);
        assert_eq!(settings.max_tokens, 300);
        assert_eq!(settings.poll_attempts, 60);
        assert_eq!(settings.poll_interval, Duration::from_secs(5));
    }

    #[test]
    fn test_cli_overrides_file() {
        let cli = Cli::parse_from([
            "radio_ai",
            "--editor",
            "nano",
            "--articles",
            "2",
            "--base-url",
            "http://suno.internal:8080/",
        ]);
        let file = FileConfig {
            article_count: Some(9),
            news_section: Some("science".into()),
            ..FileConfig::default()
        };

        let settings = Settings::resolve(&cli, file).unwrap();
        assert_eq!(settings.article_count, 2);
        assert_eq!(settings.news_section, "science");
        assert_eq!(settings.audio_base_url, "http://suno.internal:8080");
    }

    #[test]
    fn test_zero_article_count_rejected() {
        let file = FileConfig {
            article_count: Some(0),
            ..FileConfig::default()
        };
        let err = Settings::resolve(&bare_cli(), file).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(_)));
    }

    #[test]
    fn test_load_yaml_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("radio_ai.yaml");
        fs::write(
            &path,
            "poll_attempts: 12\npoll_interval_secs: 1\nmodel: claude-test\n",
        )
        .unwrap();

        let file = load_file_config(&path).unwrap();
        assert_eq!(file.poll_attempts, Some(12));
        assert_eq!(file.model.as_deref(), Some("claude-test"));

        let settings = Settings::resolve(&bare_cli(), file).unwrap();
        assert_eq!(settings.poll_interval, Duration::from_secs(1));
    }

    #[test]
    fn test_unknown_yaml_key_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("radio_ai.yaml");
        fs::write(&path, "pol_attempts: 12\n").unwrap();

        let err = load_file_config(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Yaml { .. }));
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let cli = Cli::parse_from(["radio_ai", "--config", "/nonexistent/radio.yaml"]);
        let err = load_settings(&cli).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
