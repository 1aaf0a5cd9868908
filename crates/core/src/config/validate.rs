use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Service base URLs are not empty
/// - Row counts are not 0
/// - Every custom hint names an identifier
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.ranking.base_url.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "ranking.base_url cannot be empty".to_string(),
        ));
    }

    if config.bibliographic.base_url.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "bibliographic.base_url cannot be empty".to_string(),
        ));
    }

    let resolver = &config.resolver;
    if resolver.max_harvest_rows == 0 {
        return Err(ConfigError::ValidationError(
            "resolver.max_harvest_rows cannot be 0".to_string(),
        ));
    }
    if resolver.container_rows == 0 {
        return Err(ConfigError::ValidationError(
            "resolver.container_rows cannot be 0".to_string(),
        ));
    }

    if let Some(i) = resolver
        .custom_hints
        .iter()
        .position(|hint| hint.issn.trim().is_empty())
    {
        return Err(ConfigError::ValidationError(format!(
            "resolver.custom_hints[{}].issn cannot be empty",
            i
        )));
    }

    Ok(())
}
