//! Configuration validation utilities.

use std::collections::HashSet;

use herald_framework::split::is_separator;
use herald_framework::suggest::MAX_SCORE;

use super::error::{ConfigError, ConfigResult};
use super::schema::{DispatchConfig, HeraldConfig, LogFormat, LogLevel, LogOutput, LoggingConfig};

/// Validates the entire configuration.
pub fn validate_config(config: &HeraldConfig) -> ConfigResult<()> {
    validate_dispatch_config(&config.dispatch)?;
    validate_logging_config(&config.logging)?;
    Ok(())
}

/// Validates routing settings.
fn validate_dispatch_config(dispatch: &DispatchConfig) -> ConfigResult<()> {
    if dispatch.delimiter.is_empty() || dispatch.delimiter.chars().any(is_separator) {
        return Err(ConfigError::InvalidDelimiter(dispatch.delimiter.clone()));
    }

    let mut seen_ids = HashSet::new();
    for admin in &dispatch.admins {
        if admin.trim().is_empty() {
            return Err(ConfigError::validation("Admin ids cannot be empty"));
        }

        if !seen_ids.insert(admin) {
            return Err(ConfigError::DuplicateAdmin(admin.clone()));
        }
    }

    if dispatch.suggest_threshold > MAX_SCORE {
        return Err(ConfigError::validation(format!(
            "Suggestion threshold must be between 0 and {MAX_SCORE}, got {}",
            dispatch.suggest_threshold
        )));
    }

    Ok(())
}

/// Validates log settings.
fn validate_logging_config(logging: &LoggingConfig) -> ConfigResult<()> {
    for (module, level) in &logging.filters {
        if module.is_empty() {
            return Err(ConfigError::validation("Log filter module cannot be empty"));
        }

        if !LogLevel::NAMES.contains(&level.to_lowercase().as_str()) {
            return Err(ConfigError::validation(format!(
                "Invalid log level for '{module}': {level}. Valid values are: {:?}",
                LogLevel::NAMES
            )));
        }
    }

    if logging.output == LogOutput::File && logging.file_path.is_none() {
        return Err(ConfigError::validation(
            "logging.file_path is required when logging.output is \"file\"",
        ));
    }

    if logging.format == LogFormat::Json && !cfg!(feature = "json-log") {
        return Err(ConfigError::validation(
            "JSON log format requires the `json-log` feature",
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_default_config() {
        assert!(validate_config(&HeraldConfig::default()).is_ok());
    }

    #[test]
    fn test_validate_bad_delimiters() {
        for delimiter in ["", "! ", ","] {
            let mut config = HeraldConfig::default();
            config.dispatch.delimiter = delimiter.to_string();
            assert!(matches!(
                validate_config(&config),
                Err(ConfigError::InvalidDelimiter(_))
            ));
        }
    }

    #[test]
    fn test_validate_admins() {
        let mut config = HeraldConfig::default();
        config.dispatch.admins = vec!["1".into(), "1".into()];
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::DuplicateAdmin(id)) if id == "1"
        ));

        config.dispatch.admins = vec![" ".into()];
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::ValidationError { .. })
        ));
    }

    #[test]
    fn test_validate_threshold_range() {
        let mut config = HeraldConfig::default();
        config.dispatch.suggest_threshold = 1000;
        assert!(validate_config(&config).is_ok());

        config.dispatch.suggest_threshold = 1001;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_filter_levels() {
        let mut config = HeraldConfig::default();
        config
            .logging
            .filters
            .insert("herald_framework".into(), "DEBUG".into());
        assert!(validate_config(&config).is_ok());

        config
            .logging
            .filters
            .insert("herald_runtime".into(), "loud".into());
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_file_output_needs_path() {
        let mut config = HeraldConfig::default();
        config.logging.output = LogOutput::File;
        assert!(validate_config(&config).is_err());

        config.logging.file_path = Some("herald.log".into());
        assert!(validate_config(&config).is_ok());
    }
}
