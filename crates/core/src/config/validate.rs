use super::{types::Config, ConfigError, HosterBackend};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - History limits are at least 1
/// - Scoring threshold is a finite number
/// - The selected hoster backend has its section
/// - TMDB has at least one language
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.history.max_playback == 0 || config.history.max_searches == 0 {
        return Err(ConfigError::ValidationError(
            "history.max_playback and history.max_searches must be at least 1".to_string(),
        ));
    }

    if !config.matching.min_score.is_finite() {
        return Err(ConfigError::ValidationError(
            "matching.min_score must be a finite number".to_string(),
        ));
    }

    if let Some(hoster) = &config.hoster {
        let present = match hoster.backend {
            HosterBackend::Webshare => hoster.webshare.is_some(),
            HosterBackend::Sdilej => hoster.sdilej.is_some(),
        };
        if !present {
            return Err(ConfigError::ValidationError(format!(
                "hoster.backend = \"{0}\" requires a [hoster.{0}] section",
                hoster.backend.as_str()
            )));
        }
    }

    if let Some(tmdb) = &config.catalog.tmdb {
        if tmdb.languages.is_empty() {
            return Err(ConfigError::ValidationError(
                "catalog.tmdb.languages cannot be empty".to_string(),
            ));
        }
    }

    Ok(())
}
