use anyhow::{Context, Result};
use reviewer_roster::{DEFAULT_FETCH_TIMEOUT, DEFAULT_MAX_AGE, DEFAULT_ROSTER_URL};
use reviewer_scoring::ScoringConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_ENV: &str = "REVIEWER_FINDER_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "reviewer-finder.toml";

const ROSTER_URL_ENV: &str = "REVIEWER_FINDER_ROSTER_URL";
const CACHE_FILE_ENV: &str = "REVIEWER_FINDER_CACHE_FILE";
const CACHE_TTL_ENV: &str = "REVIEWER_FINDER_CACHE_TTL_SECONDS";

/// Layered settings: defaults, then TOML file, then environment, then flags
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FinderConfig {
    pub roster: RosterConfig,
    pub scoring: ScoringConfig,
    pub enrichment: EnrichmentConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RosterConfig {
    pub url: String,
    pub cache_file: PathBuf,
    pub max_age_seconds: u64,
    pub timeout_seconds: u64,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_ROSTER_URL.to_string(),
            cache_file: PathBuf::from("cache.csv"),
            max_age_seconds: DEFAULT_MAX_AGE.as_secs(),
            timeout_seconds: DEFAULT_FETCH_TIMEOUT.as_secs(),
        }
    }
}

impl RosterConfig {
    pub const fn max_age(&self) -> Duration {
        Duration::from_secs(self.max_age_seconds)
    }

    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EnrichmentConfig {
    pub enabled: bool,
    pub endpoint: String,
    /// Environment variable holding the API token
    pub token_env: String,
    pub timeout_seconds: u64,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: "https://api.github.com/graphql".to_string(),
            token_env: "GITHUB_API_KEY".to_string(),
            timeout_seconds: 10,
        }
    }
}

impl EnrichmentConfig {
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl FinderConfig {
    /// Read the config file: `explicit`, else `$REVIEWER_FINDER_CONFIG`, else
    /// `reviewer-finder.toml` if it exists. No file means defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => std::env::var_os(CONFIG_ENV)
                .map(PathBuf::from)
                .or_else(|| {
                    let local = PathBuf::from(DEFAULT_CONFIG_FILE);
                    local.exists().then_some(local)
                }),
        };
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config = Self::from_toml(&raw).with_context(|| format!("Invalid {}", path.display()))?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(url) = lookup(ROSTER_URL_ENV) {
            self.roster.url = url;
        }
        if let Some(path) = lookup(CACHE_FILE_ENV) {
            self.roster.cache_file = PathBuf::from(path);
        }
        if let Some(ttl) = lookup(CACHE_TTL_ENV) {
            self.roster.max_age_seconds = ttl
                .trim()
                .parse()
                .with_context(|| format!("{CACHE_TTL_ENV} must be a number of seconds, got '{ttl}'"))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use reviewer_scoring::{MatchMode, ScorePolicy};
    use std::collections::HashMap;

    #[test]
    fn defaults_match_the_public_roster() {
        let cfg = FinderConfig::default();
        assert_eq!(cfg.roster.url, DEFAULT_ROSTER_URL);
        assert_eq!(cfg.roster.max_age(), Duration::from_secs(3600));
        assert_eq!(cfg.roster.cache_file, PathBuf::from("cache.csv"));
        assert!(cfg.enrichment.enabled);
        assert_eq!(cfg.enrichment.token_env, "GITHUB_API_KEY");
    }

    #[test]
    fn toml_sections_override_defaults() {
        let cfg = FinderConfig::from_toml(
            r#"
            [roster]
            url = "http://localhost:8000/roster.csv"
            max_age_seconds = 60

            [scoring]
            policy = "max_normalized"
            keyword_match = "substring"

            [enrichment]
            enabled = false
            "#,
        )
        .unwrap();

        assert_eq!(cfg.roster.url, "http://localhost:8000/roster.csv");
        assert_eq!(cfg.roster.max_age_seconds, 60);
        assert_eq!(cfg.roster.timeout_seconds, 30);
        assert_eq!(cfg.scoring.policy, ScorePolicy::MaxNormalized);
        assert_eq!(cfg.scoring.keyword_match, MatchMode::Substring);
        assert!(!cfg.enrichment.enabled);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(FinderConfig::from_toml("[roster]\nurll = \"x\"").is_err());
        assert!(FinderConfig::from_toml("[ranking]\ncount = 3").is_err());
    }

    #[test]
    fn environment_overrides_file_values() {
        let env: HashMap<&str, &str> = [
            (ROSTER_URL_ENV, "http://mirror/roster.csv"),
            (CACHE_FILE_ENV, "/tmp/roster.csv"),
            (CACHE_TTL_ENV, " 120 "),
        ]
        .into_iter()
        .collect();
        let mut cfg = FinderConfig::default();

        cfg.apply_env_from(|k| env.get(k).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(cfg.roster.url, "http://mirror/roster.csv");
        assert_eq!(cfg.roster.cache_file, PathBuf::from("/tmp/roster.csv"));
        assert_eq!(cfg.roster.max_age_seconds, 120);
    }

    #[test]
    fn malformed_ttl_is_an_error() {
        let mut cfg = FinderConfig::default();
        let err = cfg
            .apply_env_from(|k| (k == CACHE_TTL_ENV).then(|| "an hour".to_string()))
            .unwrap_err();
        assert!(err.to_string().contains(CACHE_TTL_ENV));
    }
}
