use serde::{Deserialize, Serialize};
use std::net::IpAddr;

use crate::bibliographic::CrossrefConfig;
use crate::orchestrator::RankOptions;
use crate::ranking::JufoConfig;

/// Root configuration. Every section is optional.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub ranking: JufoConfig,
    #[serde(default)]
    pub bibliographic: CrossrefConfig,
    #[serde(default)]
    pub resolver: RankOptions,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_port() -> u16 {
    8080
}

/// Sanitized config for API responses (contact address hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub ranking: JufoConfig,
    pub bibliographic: SanitizedBibliographicConfig,
    pub resolver: SanitizedResolverConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedBibliographicConfig {
    pub base_url: String,
    pub user_agent: String,
    pub mailto_configured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedResolverConfig {
    pub enabled: bool,
    pub debug: bool,
    pub max_harvest_rows: u32,
    pub container_rows: u32,
    pub custom_hints: usize,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        let bibliographic = &config.bibliographic;
        let resolver = &config.resolver;
        Self {
            server: config.server.clone(),
            ranking: config.ranking.clone(),
            bibliographic: SanitizedBibliographicConfig {
                base_url: bibliographic.base_url.clone(),
                user_agent: bibliographic.user_agent.clone(),
                mailto_configured: bibliographic
                    .mailto
                    .as_deref()
                    .is_some_and(|m| !m.trim().is_empty()),
                timeout_secs: bibliographic.timeout_secs,
            },
            resolver: SanitizedResolverConfig {
                enabled: resolver.enabled,
                debug: resolver.debug,
                max_harvest_rows: resolver.max_harvest_rows,
                container_rows: resolver.container_rows,
                custom_hints: resolver.custom_hints.len(),
            },
        }
    }
}
