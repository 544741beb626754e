use crate::error::{Result, StatsError};
use crate::models::FormFilter;
use crate::reports::StageForms;
use crate::source::ZeroCountPolicy;
use std::env;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_DATABASE_URL: &str = "sqlite:monitor_stats.db";

/// Runtime settings, read from the environment (and `.env` via dotenvy in
/// the binary).
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// `DATABASE_URL`
    pub database_url: String,
    /// `STATS_MAX_CONNECTIONS`
    pub max_connections: u32,
    /// `STATS_FETCH_TIMEOUT_SECS`, 0 disables the timeout.
    pub fetch_timeout: Option<Duration>,
    /// `STATS_INCLUDE_ZERO_COUNTS`
    pub zero_counts: ZeroCountPolicy,
    /// `STATS_CACHE_TTL_SECS`, 0 disables caching.
    pub cache_ttl: Option<Duration>,
    /// `STATS_OPENING_FORM` and `STATS_COUNTING_FORM`; an empty opening
    /// form (the default) counts every form.
    pub stage_forms: StageForms,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: 5,
            fetch_timeout: Some(Duration::from_secs(10)),
            zero_counts: ZeroCountPolicy::Omit,
            cache_ttl: None,
            stage_forms: StageForms::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    // Builds a config from any key lookup; unset keys keep their defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("DATABASE_URL") {
            config.database_url = url;
        }
        if let Some(max) = parse::<u32>(&lookup, "STATS_MAX_CONNECTIONS")? {
            if max == 0 {
                return Err(StatsError::invalid("STATS_MAX_CONNECTIONS", max));
            }
            config.max_connections = max;
        }
        if let Some(secs) = parse::<u64>(&lookup, "STATS_FETCH_TIMEOUT_SECS")? {
            config.fetch_timeout = seconds(secs);
        }
        if let Some(include) = parse::<bool>(&lookup, "STATS_INCLUDE_ZERO_COUNTS")? {
            config.zero_counts = if include {
                ZeroCountPolicy::Include
            } else {
                ZeroCountPolicy::Omit
            };
        }
        if let Some(secs) = parse::<u64>(&lookup, "STATS_CACHE_TTL_SECS")? {
            config.cache_ttl = seconds(secs);
        }
        if let Some(code) = lookup("STATS_OPENING_FORM") {
            config.stage_forms.opening = FormFilter::new(Some(&code));
        }
        if let Some(code) = lookup("STATS_COUNTING_FORM") {
            config.stage_forms.counting = FormFilter::new(Some(&code));
        }

        Ok(config)
    }
}

fn seconds(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

fn parse<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &'static str) -> Result<Option<T>> {
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| StatsError::invalid(key, raw)),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        assert_eq!(config_from(&[]).unwrap(), Config::default());
    }

    #[test]
    fn reads_all_keys() {
        let config = config_from(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("STATS_MAX_CONNECTIONS", "2"),
            ("STATS_FETCH_TIMEOUT_SECS", "0"),
            ("STATS_INCLUDE_ZERO_COUNTS", "true"),
            ("STATS_CACHE_TTL_SECS", "45"),
            ("STATS_OPENING_FORM", "A"),
            ("STATS_COUNTING_FORM", " C2 "),
        ])
        .unwrap();
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.max_connections, 2);
        assert_eq!(config.fetch_timeout, None);
        assert_eq!(config.zero_counts, ZeroCountPolicy::Include);
        assert_eq!(config.cache_ttl, Some(Duration::from_secs(45)));
        assert_eq!(config.stage_forms.opening.code(), Some("A"));
        assert_eq!(config.stage_forms.counting.code(), Some("C2"));
    }

    #[test]
    fn opening_form_defaults_to_all_forms() {
        let config = config_from(&[]).unwrap();
        assert!(config.stage_forms.opening.is_all());
        assert_eq!(config.stage_forms.counting.code(), Some("C"));
    }

    #[test]
    fn malformed_values_are_rejected() {
        assert!(matches!(
            config_from(&[("STATS_CACHE_TTL_SECS", "soon")]),
            Err(StatsError::InvalidParameter { name: "STATS_CACHE_TTL_SECS", .. })
        ));
        assert!(config_from(&[("STATS_MAX_CONNECTIONS", "0")]).is_err());
        assert!(config_from(&[("STATS_INCLUDE_ZERO_COUNTS", "yes")]).is_err());
    }
}
