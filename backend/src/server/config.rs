//! Environment-driven application configuration.

use std::env;
use std::net::SocketAddr;

use chrono::Duration;

use crate::domain::SelfFollowPolicy;

/// Failures while reading the environment.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("required environment variable {name} is not set")]
    Missing { name: &'static str },
    #[error("environment variable {name} is invalid: {message}")]
    Invalid { name: &'static str, message: String },
}

/// Application configuration resolved at boot.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub database_url: String,
    pub db_pool_max_size: u32,
    pub redis_url: Option<String>,
    pub session_key_file: String,
    pub cookie_secure: bool,
    pub invitation_ttl: Duration,
    pub activation_base_url: String,
    pub self_follow: SelfFollowPolicy,
    pub run_migrations: bool,
}

fn parse_flag(value: Option<String>, default: bool) -> bool {
    value.map_or(default, |raw| raw != "0")
}

fn parse_number<T: std::str::FromStr>(
    name: &'static str,
    value: Option<String>,
    default: T,
) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match value {
        Some(raw) => raw.parse().map_err(|err: T::Err| ConfigError::Invalid {
            name,
            message: err.to_string(),
        }),
        None => Ok(default),
    }
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let bind_addr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8080".to_owned())
            .parse()
            .map_err(|err: std::net::AddrParseError| ConfigError::Invalid {
                name: "BIND_ADDR",
                message: err.to_string(),
            })?;

        let database_url = env::var("DATABASE_URL").map_err(|_| ConfigError::Missing {
            name: "DATABASE_URL",
        })?;

        let invitation_ttl_hours: i64 = parse_number(
            "INVITATION_TTL_HOURS",
            env::var("INVITATION_TTL_HOURS").ok(),
            72,
        )?;

        let self_follow = if parse_flag(env::var("ALLOW_SELF_FOLLOW").ok(), true) {
            SelfFollowPolicy::Allow
        } else {
            SelfFollowPolicy::Deny
        };

        Ok(Self {
            bind_addr,
            database_url,
            db_pool_max_size: parse_number(
                "DB_POOL_MAX_SIZE",
                env::var("DB_POOL_MAX_SIZE").ok(),
                10,
            )?,
            redis_url: env::var("REDIS_URL").ok(),
            session_key_file: env::var("SESSION_KEY_FILE")
                .unwrap_or_else(|_| "/var/run/secrets/session_key".to_owned()),
            cookie_secure: parse_flag(env::var("SESSION_COOKIE_SECURE").ok(), true),
            invitation_ttl: Duration::hours(invitation_ttl_hours),
            activation_base_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_owned()),
            self_follow,
            run_migrations: parse_flag(env::var("RUN_MIGRATIONS").ok(), false),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, true, true)]
    #[case(None, false, false)]
    #[case(Some("0"), true, false)]
    #[case(Some("1"), false, true)]
    #[case(Some("true"), false, true)]
    fn flags_default_and_only_zero_disables(
        #[case] raw: Option<&str>,
        #[case] default: bool,
        #[case] expected: bool,
    ) {
        assert_eq!(parse_flag(raw.map(str::to_owned), default), expected);
    }

    #[test]
    fn numbers_fall_back_to_defaults() {
        let parsed: u32 = parse_number("X", None, 10).expect("default");
        assert_eq!(parsed, 10);

        let parsed: u32 = parse_number("X", Some("25".to_owned()), 10).expect("valid");
        assert_eq!(parsed, 25);
    }

    #[test]
    fn malformed_numbers_are_reported_with_their_variable() {
        let error = parse_number::<u32>("DB_POOL_MAX_SIZE", Some("lots".to_owned()), 10)
            .expect_err("invalid number");
        assert!(matches!(
            error,
            ConfigError::Invalid {
                name: "DB_POOL_MAX_SIZE",
                ..
            }
        ));
    }
}
