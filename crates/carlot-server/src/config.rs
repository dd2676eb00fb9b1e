use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::TimeDelta;

use carlot_api::password::PasswordConfig;
use carlot_api::token::TokenConfig;

/// Placeholder JWT secrets that MUST NOT be used.
const PLACEHOLDER_SECRETS: &[&str] = &["change-me-to-a-random-string", "dev-secret-change-me"];

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    pub token: TokenConfig,
    pub password: PasswordConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key -> value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = lookup("CARLOT_JWT_SECRET").unwrap_or_default();
        if secret.is_empty() || PLACEHOLDER_SECRETS.contains(&secret.as_str()) {
            bail!("CARLOT_JWT_SECRET is unset or still a placeholder; set it in .env and restart");
        }

        let ttl_hours: i64 = parse(&lookup, "CARLOT_TOKEN_TTL_HOURS", 24)?;
        if ttl_hours <= 0 {
            bail!("CARLOT_TOKEN_TTL_HOURS must be positive, got {}", ttl_hours);
        }
        let ttl = TimeDelta::try_hours(ttl_hours)
            .with_context(|| format!("CARLOT_TOKEN_TTL_HOURS is out of range: {}", ttl_hours))?;

        let defaults = PasswordConfig::default();

        Ok(Self {
            host: lookup("CARLOT_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: parse(&lookup, "CARLOT_PORT", 5000)?,
            db_path: lookup("CARLOT_DB_PATH").unwrap_or_else(|| "carlot.db".into()).into(),
            token: TokenConfig { secret, ttl },
            password: PasswordConfig {
                memory_kib: parse(&lookup, "CARLOT_ARGON2_MEMORY_KIB", defaults.memory_kib)?,
                iterations: parse(&lookup, "CARLOT_ARGON2_ITERATIONS", defaults.iterations)?,
            },
        })
    }
}

fn parse<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw.parse().with_context(|| format!("{} has an invalid value '{}'", key, raw)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(pairs: &[(&str, &str)]) -> Result<Config> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_only_secret_is_set() {
        let config = config(&[("CARLOT_JWT_SECRET", "s3cret")]).unwrap();

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 5000);
        assert_eq!(config.db_path, PathBuf::from("carlot.db"));
        assert_eq!(config.token.ttl, chrono::Duration::hours(24));
        assert_eq!(config.password.iterations, PasswordConfig::default().iterations);
    }

    #[test]
    fn overrides_are_parsed() {
        let config = config(&[
            ("CARLOT_JWT_SECRET", "s3cret"),
            ("CARLOT_PORT", "8080"),
            ("CARLOT_TOKEN_TTL_HOURS", "2"),
            ("CARLOT_ARGON2_MEMORY_KIB", "4096"),
        ])
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.token.ttl, chrono::Duration::hours(2));
        assert_eq!(config.password.memory_kib, 4096);
    }

    #[test]
    fn missing_or_placeholder_secret_is_refused() {
        assert!(config(&[]).is_err());
        assert!(config(&[("CARLOT_JWT_SECRET", "dev-secret-change-me")]).is_err());
    }

    #[test]
    fn token_ttl_must_be_a_positive_representable_duration() {
        for bad in ["0", "-3", "9223372036854775807"] {
            let result = config(&[("CARLOT_JWT_SECRET", "s3cret"), ("CARLOT_TOKEN_TTL_HOURS", bad)]);
            let err = result.unwrap_err();
            assert!(err.to_string().contains("CARLOT_TOKEN_TTL_HOURS"), "{}: {}", bad, err);
        }
    }

    #[test]
    fn unparsable_port_is_refused() {
        let err = config(&[("CARLOT_JWT_SECRET", "s3cret"), ("CARLOT_PORT", "http")]).unwrap_err();
        assert!(err.to_string().contains("CARLOT_PORT"));
    }
}
