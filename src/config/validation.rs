use crate::config::types::{CrawlSection, CrawlSettings, OutputSection, UserAgentSection};
use crate::url::parse_absolute;
use crate::ConfigError;
use std::time::Duration;

/// Validates the entire configuration
pub fn validate(settings: &CrawlSettings) -> Result<(), ConfigError> {
    validate_crawl_section(&settings.crawl)?;
    validate_output_section(&settings.output)?;
    validate_user_agents(&settings.user_agent)?;
    Ok(())
}

/// Validates crawl behavior settings
fn validate_crawl_section(config: &CrawlSection) -> Result<(), ConfigError> {
    parse_absolute(config.base_url.trim()).map_err(|e| {
        ConfigError::InvalidUrl(format!("Invalid base_url '{}': {}", config.base_url, e))
    })?;

    seconds_to_duration("delay_seconds", config.delay_seconds)?;

    let timeout = seconds_to_duration("request_timeout_seconds", config.request_timeout_seconds)?;
    if timeout.is_zero() {
        return Err(ConfigError::Validation(format!(
            "request_timeout_seconds must be positive, got {}",
            config.request_timeout_seconds
        )));
    }

    Ok(())
}

/// Converts a seconds value into a `Duration`
///
/// Rejects negative, non-finite and out-of-range values.
pub(crate) fn seconds_to_duration(field: &str, seconds: f64) -> Result<Duration, ConfigError> {
    Duration::try_from_secs_f64(seconds).map_err(|_| {
        ConfigError::Validation(format!(
            "{} must be a non-negative number of seconds within range, got {}",
            field, seconds
        ))
    })
}

/// Validates output settings
fn validate_output_section(config: &OutputSection) -> Result<(), ConfigError> {
    if config.directory.trim().is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    validate_file_name("metadata_file", &config.metadata_file)?;
    validate_file_name("log_file", &config.log_file)?;

    Ok(())
}

/// Validates that a name is a bare file name, not a path
fn validate_file_name(field: &str, name: &str) -> Result<(), ConfigError> {
    if name.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{} cannot be empty", field)));
    }

    if name.contains('/') || name.contains('\\') || name == "." || name == ".." {
        return Err(ConfigError::Validation(format!(
            "{} must be a plain file name, got '{}'",
            field, name
        )));
    }

    Ok(())
}

/// Validates the user agent pool
fn validate_user_agents(config: &UserAgentSection) -> Result<(), ConfigError> {
    if config.pool.is_empty() {
        return Err(ConfigError::Validation(
            "user agent pool cannot be empty".to_string(),
        ));
    }

    if config.pool.iter().any(|ua| ua.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "user agent strings cannot be empty".to_string(),
        ));
    }

    Ok(())
}
