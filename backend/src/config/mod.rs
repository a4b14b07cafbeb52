//! Central module for application-wide configuration settings.
//!
//! This module handles loading and managing configuration parameters such as
//! the database URL, server port, token signing secret and password hashing policy.

use anyhow::{Context, Result, bail};
use std::env;

/// Longest access token lifetime accepted from configuration (30 days).
pub const MAX_JWT_EXPIRES_IN_SECONDS: u64 = 30 * 24 * 60 * 60;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub max_connections: u32,
    pub acquire_timeout_seconds: u64,
    pub jwt_secret: String,
    pub jwt_expires_in_seconds: u64,
    pub password_hash_iterations: u32,
    pub server_port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub static_dir: String,
}

/// Settings consumed by the authentication core.
///
/// Built once at startup and handed to `AuthService::new`; nothing in the
/// auth core reads the environment on its own.
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub access_token_ttl: chrono::Duration,
    pub password_hash_iterations: u32,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("access_token_ttl", &self.access_token_ttl)
            .field("password_hash_iterations", &self.password_hash_iterations)
            .finish()
    }
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL not set")?;

        let max_connections = env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "5".to_string())
            .parse::<u32>()
            .context("DB_MAX_CONNECTIONS must be a valid number")?;

        let acquire_timeout_seconds = env::var("DB_ACQUIRE_TIMEOUT_SECONDS")
            .unwrap_or_else(|_| "3".to_string())
            .parse::<u64>()
            .context("DB_ACQUIRE_TIMEOUT_SECONDS must be a valid number")?;

        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET not set")?;
        if jwt_secret.trim().is_empty() {
            bail!("JWT_SECRET must not be empty");
        }

        let jwt_expires_in_seconds = parse_token_ttl(
            &env::var("JWT_EXPIRES_IN_SECONDS").unwrap_or_else(|_| "1200".to_string()),
        )?;

        let password_hash_iterations = env::var("PASSWORD_HASH_ITERATIONS")
            .unwrap_or_else(|_| "1000".to_string())
            .parse::<u32>()
            .context("PASSWORD_HASH_ITERATIONS must be a valid number")?;
        if password_hash_iterations == 0 {
            bail!("PASSWORD_HASH_ITERATIONS must be greater than zero");
        }

        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .context("SERVER_PORT must be a valid number")?;

        let cors_allowed_origins = parse_origins(
            &env::var("CORS_ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
        );

        let static_dir = env::var("STATIC_DIR").unwrap_or_else(|_| "static".to_string());

        Ok(Config {
            database_url,
            max_connections,
            acquire_timeout_seconds,
            jwt_secret,
            jwt_expires_in_seconds,
            password_hash_iterations,
            server_port,
            cors_allowed_origins,
            static_dir,
        })
    }

    /// Projects the authentication settings out of the full configuration.
    pub fn auth(&self) -> AuthConfig {
        AuthConfig {
            jwt_secret: self.jwt_secret.clone(),
            access_token_ttl: chrono::Duration::seconds(
                self.jwt_expires_in_seconds.min(MAX_JWT_EXPIRES_IN_SECONDS) as i64,
            ),
            password_hash_iterations: self.password_hash_iterations,
        }
    }
}

fn parse_token_ttl(raw: &str) -> Result<u64> {
    let seconds = raw
        .trim()
        .parse::<u64>()
        .context("JWT_EXPIRES_IN_SECONDS must be a valid number")?;
    if seconds == 0 || seconds > MAX_JWT_EXPIRES_IN_SECONDS {
        bail!(
            "JWT_EXPIRES_IN_SECONDS must be between 1 and {}",
            MAX_JWT_EXPIRES_IN_SECONDS
        );
    }
    Ok(seconds)
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_origins_skips_blanks() {
        let origins = parse_origins("http://localhost:3000, ,https://market.example ,");
        assert_eq!(
            origins,
            vec![
                "http://localhost:3000".to_string(),
                "https://market.example".to_string()
            ]
        );
    }

    #[test]
    fn test_token_ttl_bounds() {
        assert_eq!(parse_token_ttl("1200").unwrap(), 1200);
        assert_eq!(
            parse_token_ttl(&MAX_JWT_EXPIRES_IN_SECONDS.to_string()).unwrap(),
            MAX_JWT_EXPIRES_IN_SECONDS
        );

        assert!(parse_token_ttl("0").is_err());
        assert!(parse_token_ttl("twenty").is_err());
        assert!(parse_token_ttl(&(MAX_JWT_EXPIRES_IN_SECONDS + 1).to_string()).is_err());
        assert!(parse_token_ttl(&u64::MAX.to_string()).is_err());
    }

    #[test]
    fn test_auth_projection() {
        let config = Config {
            database_url: "sqlite::memory:".to_string(),
            max_connections: 1,
            acquire_timeout_seconds: 3,
            jwt_secret: "secret".to_string(),
            jwt_expires_in_seconds: 1200,
            password_hash_iterations: 1000,
            server_port: 3000,
            cors_allowed_origins: vec![],
            static_dir: "static".to_string(),
        };

        let auth = config.auth();
        assert_eq!(auth.access_token_ttl, chrono::Duration::minutes(20));
        assert_eq!(auth.password_hash_iterations, 1000);
        assert!(!format!("{:?}", auth).contains("\"secret\""));
    }

    #[test]
    fn test_auth_projection_clamps_ttl() {
        let config = Config {
            database_url: "sqlite::memory:".to_string(),
            max_connections: 1,
            acquire_timeout_seconds: 3,
            jwt_secret: "secret".to_string(),
            jwt_expires_in_seconds: u64::MAX,
            password_hash_iterations: 1000,
            server_port: 3000,
            cors_allowed_origins: vec![],
            static_dir: "static".to_string(),
        };

        assert_eq!(
            config.auth().access_token_ttl,
            chrono::Duration::seconds(MAX_JWT_EXPIRES_IN_SECONDS as i64)
        );
    }
}
