use std::str::FromStr;

use anyhow::{Context, Result};

use crate::errors::env_context;

/// More digits than an f64 holds for ratings in the thousands
pub const MAX_DECIMAL_PLACES: u32 = 15;

#[derive(Debug, Clone, PartialEq)]
pub struct RatingSettings {
    /// Rating assigned to a store before its first comparison
    pub baseline_rating: f64,
    /// Elo sensitivity, constant for every comparison
    pub k_factor: f64,
    /// Rounding applied to freshly computed ratings
    pub decimal_places: Option<u32>,
}

impl Default for RatingSettings {
    fn default() -> Self {
        Self {
            baseline_rating: 1200.0,
            k_factor: 32.0,
            decimal_places: Some(2),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionSettings {
    pub max_attempts: u32,
    pub retry_delay_ms: u64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            retry_delay_ms: 200,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseSettings {
    pub path: String,
    pub busy_timeout_ms: u64,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            path: "wardrobe_rankings.db".to_string(),
            busy_timeout_ms: 5000,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppConfig {
    pub rating: RatingSettings,
    pub session: SessionSettings,
    pub database: DatabaseSettings,
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by whatever is set in the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = parse_var(&lookup, "RANKING_BASELINE")? {
            config.rating.baseline_rating = value;
        }
        if let Some(value) = parse_var(&lookup, "RANKING_K_FACTOR")? {
            config.rating.k_factor = value;
        }
        if let Some(raw) = lookup("RANKING_DECIMAL_PLACES") {
            config.rating.decimal_places = parse_decimal_places(&raw)
                .with_context(|| env_context("RANKING_DECIMAL_PLACES"))?;
        }
        if let Some(value) = parse_var(&lookup, "SESSION_MAX_ATTEMPTS")? {
            config.session.max_attempts = value;
        }
        if let Some(path) = lookup("DATABASE_PATH") {
            config.database.path = path;
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !self.rating.baseline_rating.is_finite() {
            anyhow::bail!("Baseline rating must be finite");
        }
        if !(self.rating.k_factor.is_finite() && self.rating.k_factor > 0.0) {
            anyhow::bail!("K factor must be a positive number, got {}", self.rating.k_factor);
        }
        if let Some(places) = self.rating.decimal_places {
            if places > MAX_DECIMAL_PLACES {
                anyhow::bail!(
                    "Ratings can be rounded to at most {} decimal places, got {}",
                    MAX_DECIMAL_PLACES,
                    places
                );
            }
        }
        if self.session.max_attempts == 0 {
            anyhow::bail!("Session must allow at least one attempt");
        }
        Ok(())
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    lookup(key)
        .map(|raw| raw.trim().parse::<T>())
        .transpose()
        .with_context(|| env_context(key))
}

fn parse_decimal_places(raw: &str) -> Result<Option<u32>> {
    match raw.trim() {
        "none" | "" => Ok(None),
        digits => Ok(Some(digits.parse()?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_use_conventional_elo_scale() {
        let config = AppConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, AppConfig::new());
        assert_eq!(config.rating.baseline_rating, 1200.0);
        assert_eq!(config.rating.k_factor, 32.0);
        assert_eq!(config.database.path, "wardrobe_rankings.db");
    }

    #[test]
    fn test_environment_overrides() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("RANKING_BASELINE", "1500"),
            ("RANKING_K_FACTOR", "16"),
            ("RANKING_DECIMAL_PLACES", "none"),
            ("SESSION_MAX_ATTEMPTS", "5"),
            ("DATABASE_PATH", "/tmp/other.db"),
        ]))
        .unwrap();

        assert_eq!(config.rating.baseline_rating, 1500.0);
        assert_eq!(config.rating.k_factor, 16.0);
        assert_eq!(config.rating.decimal_places, None);
        assert_eq!(config.session.max_attempts, 5);
        assert_eq!(config.database.path, "/tmp/other.db");
    }

    #[test]
    fn test_malformed_value_names_variable() {
        let err = AppConfig::from_lookup(lookup_from(&[("RANKING_K_FACTOR", "fast")])).unwrap_err();
        assert!(err.to_string().contains("RANKING_K_FACTOR"));
    }

    #[test]
    fn test_excessive_decimal_places_rejected() {
        let err = AppConfig::from_lookup(lookup_from(&[("RANKING_DECIMAL_PLACES", "400")])).unwrap_err();
        assert!(err.to_string().contains("decimal places"));

        let config = AppConfig::from_lookup(lookup_from(&[("RANKING_DECIMAL_PLACES", "15")])).unwrap();
        assert_eq!(config.rating.decimal_places, Some(15));
    }

    #[test]
    fn test_non_positive_k_factor_rejected() {
        assert!(AppConfig::from_lookup(lookup_from(&[("RANKING_K_FACTOR", "0")])).is_err());
    }
}
