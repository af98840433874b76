//! Shared configuration for mistly tools.
//!
//! TOML file + `MISTLY_*` environment layering, and translation to
//! `mistly_core::CacheSettings`. The CLI applies its own flag overrides
//! on top of what this crate resolves.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use mistly_core::CacheSettings;
use mistly_core::config::DEFAULT_CACHE_FILE;

/// Prefix for environment overrides, e.g. `MISTLY_FILES__CACHE_TTL=600`.
pub const ENV_PREFIX: &str = "MISTLY_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// File locations and lifetimes.
    #[serde(default)]
    pub files: FilesConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FilesConfig {
    /// Cache file path. Defaults to the platform cache directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_path: Option<PathBuf>,

    /// Seconds before the on-disk cache is considered stale.
    /// Zero or negative disables expiry.
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl: i64,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            cache_path: None,
            cache_ttl: default_cache_ttl(),
        }
    }
}

fn default_cache_ttl() -> i64 {
    3600
}

impl Config {
    /// Reject values that would only fail later, deep inside the cache.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self
            .files
            .cache_path
            .as_ref()
            .is_some_and(|p| p.as_os_str().is_empty())
        {
            return Err(ConfigError::Validation {
                field: "files.cache_path".into(),
                reason: "must not be empty".into(),
            });
        }
        Ok(())
    }

    /// Effective cache file path: the configured one, else the default.
    pub fn cache_path(&self) -> PathBuf {
        self.files
            .cache_path
            .clone()
            .unwrap_or_else(default_cache_path)
    }

    /// Translate into the settings a `CacheManager` is built from.
    pub fn to_cache_settings(&self) -> CacheSettings {
        CacheSettings::new(self.cache_path()).with_ttl_secs(self.files.cache_ttl)
    }
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "mistly", "mistly")
}

fn home_fallback(subdir: &str) -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(subdir);
    p.push("mistly");
    p
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || home_fallback(".config").join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Default cache file location under the platform cache directory.
pub fn default_cache_path() -> PathBuf {
    project_dirs().map_or_else(
        || home_fallback(".cache").join(DEFAULT_CACHE_FILE),
        |dirs| dirs.cache_dir().join(DEFAULT_CACHE_FILE),
    )
}

// ── Config loading ──────────────────────────────────────────────────

fn figment_for(path: &Path) -> Figment {
    Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
}

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file path + environment. A missing file is
/// not an error; defaults and environment still apply.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let config: Config = figment_for(path).extract()?;
    config.validate()?;
    tracing::debug!(
        path = %path.display(),
        cache_ttl = config.files.cache_ttl,
        "configuration loaded"
    );
    Ok(config)
}

/// Load config, falling back to defaults on any failure.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_else(|err| {
        tracing::warn!(error = %err, "ignoring unreadable configuration");
        Config::default()
    })
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    cfg.validate()?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}
