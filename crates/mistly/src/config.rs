//! CLI-specific config helpers.
//!
//! Layers `GlobalOpts` flag overrides on top of what `mistly-config`
//! resolves from the config file and environment.

use mistly_config::{load_config_from, load_config_or_default};
use mistly_core::CacheSettings;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Build cache settings: config file, then environment, then CLI flags.
pub fn cache_settings(global: &GlobalOpts) -> Result<CacheSettings, CliError> {
    let cfg = match global.config.as_deref() {
        // An explicitly named config file must load.
        Some(path) => load_config_from(path)?,
        None => load_config_or_default(),
    };
    let mut settings = cfg.to_cache_settings();

    if let Some(path) = global.cache_path.as_ref() {
        if path.as_os_str().is_empty() {
            return Err(CliError::Validation {
                field: "--cache-path".into(),
                reason: "must not be empty".into(),
            });
        }
        settings.path.clone_from(path);
    }
    if let Some(ttl) = global.ttl {
        settings = settings.with_ttl_secs(ttl);
    }

    tracing::debug!(
        path = %settings.path.display(),
        ttl = ?settings.ttl,
        "resolved cache settings"
    );
    Ok(settings)
}
