pub mod badge;
pub mod bibliographic;
pub mod cache;
pub mod config;
pub mod harvest;
pub mod hints;
pub mod normalize;
pub mod orchestrator;
pub mod ranking;
pub mod resolver;
pub mod testing;

pub use badge::{Badge, BadgeTarget};
pub use bibliographic::{BibliographicError, BibliographicService, CrossrefClient, CrossrefConfig};
pub use cache::{CacheNamespace, CacheStats, LookupCache};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, SanitizedConfig,
    ServerConfig,
};
pub use harvest::{CandidateHarvester, Harvest};
pub use hints::{HintEngine, HintError, HintRule, HintRuleConfig};
pub use orchestrator::{
    CascadeState, Publication, RankBadger, RankOptions, RankOrchestrator, Resolution,
};
pub use ranking::{JufoClient, JufoConfig, RankLevel, RankRecord, RankingError, RankingService};
pub use resolver::RankResolver;
