use crate::config::types::{CrawlConfig, CrawlSettings};
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a settings file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(CrawlSettings)` - Successfully loaded and validated settings
/// * `Err(ConfigError)` - Failed to load, parse, or validate the file
pub fn load_settings(path: &Path) -> Result<CrawlSettings, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let settings: CrawlSettings = toml::from_str(&content)?;
    validate(&settings)?;
    Ok(settings)
}

/// Loads a configuration file straight into a [`CrawlConfig`]
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use page_harvester::config::load_config;
///
/// let config = load_config(Path::new("harvest.toml")).unwrap();
/// println!("Crawling {}", config.base_url());
/// ```
pub fn load_config(path: &Path) -> Result<CrawlConfig, ConfigError> {
    CrawlConfig::from_settings(load_settings(path)?)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Logged at startup so a run can be matched to the exact file that drove it.
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    Ok(hex::encode(result))
}

/// Loads settings and returns both the settings and the file's hash
pub fn load_settings_with_hash(path: &Path) -> Result<(CrawlSettings, String), ConfigError> {
    let settings = load_settings(path)?;
    let hash = compute_config_hash(path)?;
    Ok((settings, hash))
}
