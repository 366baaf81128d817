// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names, default values, and the
//! typed configuration built from them at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `AUTH0_DOMAIN` | Auth0 tenant domain (e.g. `coffee.eu.auth0.com`) | Required |
//! | `API_AUDIENCE` | Expected JWT audience claim | Required |
//! | `AUTH0_ALGORITHMS` | Comma-separated accepted signing algorithms | `RS256` |
//! | `JWKS_URL` | Override for the JWKS endpoint | `https://<domain>/.well-known/jwks.json` |
//! | `JWKS_CACHE_TTL_SECS` | JWKS cache TTL, `0` fetches on every request | `300` |
//! | `JWKS_FETCH_TIMEOUT_SECS` | JWKS fetch timeout | `5` |
//! | `JWKS_REFRESH_COOLDOWN_SECS` | Minimum age of a cached key set before an unknown `kid` refetches it | `10` |
//! | `JWT_LEEWAY_SECS` | Clock skew tolerated on `exp` | `0` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `5000` |
//! | `SEED_DRINKS` | Seed the menu with a demo drink (`true`/`1`) | unset |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::{net::SocketAddr, str::FromStr, time::Duration};

use jsonwebtoken::Algorithm;
use thiserror::Error;
use url::Url;

pub const AUTH0_DOMAIN_ENV: &str = "AUTH0_DOMAIN";
pub const API_AUDIENCE_ENV: &str = "API_AUDIENCE";
pub const AUTH0_ALGORITHMS_ENV: &str = "AUTH0_ALGORITHMS";
pub const JWKS_URL_ENV: &str = "JWKS_URL";
pub const JWKS_CACHE_TTL_ENV: &str = "JWKS_CACHE_TTL_SECS";
pub const JWKS_FETCH_TIMEOUT_ENV: &str = "JWKS_FETCH_TIMEOUT_SECS";
pub const JWKS_REFRESH_COOLDOWN_ENV: &str = "JWKS_REFRESH_COOLDOWN_SECS";
pub const JWT_LEEWAY_ENV: &str = "JWT_LEEWAY_SECS";
pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const SEED_DRINKS_ENV: &str = "SEED_DRINKS";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Default filter when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

/// Default JWKS cache TTL (5 minutes).
pub const DEFAULT_JWKS_CACHE_TTL: Duration = Duration::from_secs(300);

/// Default JWKS fetch timeout.
pub const DEFAULT_JWKS_FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Default minimum interval between forced JWKS refreshes.
pub const DEFAULT_JWKS_REFRESH_COOLDOWN: Duration = Duration::from_secs(10);

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5000;

/// Configuration errors raised at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable {0} is required")]
    Missing(&'static str),

    #[error("environment variable {name} has invalid value {value:?}")]
    Invalid { name: &'static str, value: String },

    #[error("identity domain {0:?} is not a valid host name")]
    InvalidDomain(String),

    #[error("unsupported signing algorithm {0:?} (only RS256, RS384, RS512, PS256, PS384, PS512)")]
    UnsupportedAlgorithm(String),
}

/// Authentication configuration.
///
/// Built once at startup and injected into the auth guard; nothing in the
/// auth pipeline reads the environment directly.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Identity provider domain, without scheme or trailing slash
    pub identity_domain: String,
    /// Expected `aud` claim
    pub audience: String,
    /// Accepted signing algorithms
    pub algorithms: Vec<Algorithm>,
    /// JWKS endpoint override
    pub jwks_url: Option<String>,
    /// How long a fetched key set is reused
    pub jwks_cache_ttl: Duration,
    /// Upper bound on a single JWKS fetch
    pub jwks_fetch_timeout: Duration,
    /// A cached key set younger than this is not refetched for an unknown `kid`
    pub jwks_refresh_cooldown: Duration,
    /// Clock skew tolerance in seconds applied to `exp`
    pub leeway: u64,
}

impl AuthConfig {
    /// Create a configuration for an identity domain and audience.
    ///
    /// The domain may be given with or without `https://` and a trailing slash.
    pub fn new(
        identity_domain: impl AsRef<str>,
        audience: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            identity_domain: normalize_domain(identity_domain.as_ref())?,
            audience: audience.into(),
            algorithms: vec![Algorithm::RS256],
            jwks_url: None,
            jwks_cache_ttl: DEFAULT_JWKS_CACHE_TTL,
            jwks_fetch_timeout: DEFAULT_JWKS_FETCH_TIMEOUT,
            jwks_refresh_cooldown: DEFAULT_JWKS_REFRESH_COOLDOWN,
            leeway: 0,
        })
    }

    pub fn with_algorithms(mut self, algorithms: Vec<Algorithm>) -> Self {
        self.algorithms = algorithms;
        self
    }

    pub fn with_jwks_url(mut self, url: impl Into<String>) -> Self {
        self.jwks_url = Some(url.into());
        self
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.jwks_cache_ttl = ttl;
        self
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.jwks_fetch_timeout = timeout;
        self
    }

    pub fn with_refresh_cooldown(mut self, cooldown: Duration) -> Self {
        self.jwks_refresh_cooldown = cooldown;
        self
    }

    pub fn with_leeway(mut self, leeway: u64) -> Self {
        self.leeway = leeway;
        self
    }

    /// Expected `iss` claim: `https://<domain>/`.
    pub fn issuer(&self) -> String {
        format!("https://{}/", self.identity_domain)
    }

    /// Where the key set is fetched from.
    pub fn jwks_url(&self) -> String {
        self.jwks_url
            .clone()
            .unwrap_or_else(|| format!("https://{}/.well-known/jwks.json", self.identity_domain))
    }

    /// Load from `AUTH0_*` / `JWKS_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let domain = required(AUTH0_DOMAIN_ENV)?;
        let audience = required(API_AUDIENCE_ENV)?;

        let mut config = Self::new(domain, audience)?;

        if let Some(algorithms) = optional(AUTH0_ALGORITHMS_ENV) {
            config = config.with_algorithms(parse_algorithms(&algorithms)?);
        }
        if let Some(url) = optional(JWKS_URL_ENV) {
            Url::parse(&url).map_err(|_| ConfigError::Invalid {
                name: JWKS_URL_ENV,
                value: url.clone(),
            })?;
            config = config.with_jwks_url(url);
        }
        if let Some(ttl) = optional(JWKS_CACHE_TTL_ENV) {
            config = config.with_cache_ttl(secs(JWKS_CACHE_TTL_ENV, &ttl)?);
        }
        if let Some(timeout) = optional(JWKS_FETCH_TIMEOUT_ENV) {
            config = config.with_fetch_timeout(secs(JWKS_FETCH_TIMEOUT_ENV, &timeout)?);
        }
        if let Some(cooldown) = optional(JWKS_REFRESH_COOLDOWN_ENV) {
            config = config.with_refresh_cooldown(secs(JWKS_REFRESH_COOLDOWN_ENV, &cooldown)?);
        }
        if let Some(leeway) = optional(JWT_LEEWAY_ENV) {
            config = config.with_leeway(parse(JWT_LEEWAY_ENV, &leeway)?);
        }

        Ok(config)
    }
}

/// Output format for the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Full server configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub seed_drinks: bool,
    pub log_format: LogFormat,
    pub auth: AuthConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = match optional(PORT_ENV) {
            Some(port) => parse(PORT_ENV, &port)?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            host: optional(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            seed_drinks: optional(SEED_DRINKS_ENV)
                .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
            log_format: log_format_from_env(),
            auth: AuthConfig::from_env()?,
        })
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse().map_err(|_| ConfigError::Invalid {
            name: HOST_ENV,
            value: addr,
        })
    }
}

/// Read `LOG_FORMAT`; anything other than `json` means pretty output.
pub fn log_format_from_env() -> LogFormat {
    match optional(LOG_FORMAT_ENV).as_deref() {
        Some(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
        _ => LogFormat::Pretty,
    }
}

/// Strip scheme and trailing slash and check what is left is a bare host.
pub fn normalize_domain(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim();
    let host = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))
        .unwrap_or(trimmed)
        .trim_end_matches('/');

    let parsed = Url::parse(&format!("https://{host}/"))
        .map_err(|_| ConfigError::InvalidDomain(raw.to_string()))?;

    match parsed.host_str() {
        Some(h) if !host.is_empty() && parsed.path() == "/" && h.eq_ignore_ascii_case(host) => {
            Ok(host.to_string())
        }
        _ => Err(ConfigError::InvalidDomain(raw.to_string())),
    }
}

/// Parse a comma-separated algorithm list. Only RSA families are accepted,
/// since the key set is expected to publish RSA keys.
pub fn parse_algorithms(raw: &str) -> Result<Vec<Algorithm>, ConfigError> {
    let algorithms = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|name| match Algorithm::from_str(name) {
            Ok(
                alg @ (Algorithm::RS256
                | Algorithm::RS384
                | Algorithm::RS512
                | Algorithm::PS256
                | Algorithm::PS384
                | Algorithm::PS512),
            ) => Ok(alg),
            _ => Err(ConfigError::UnsupportedAlgorithm(name.to_string())),
        })
        .collect::<Result<Vec<_>, _>>()?;

    if algorithms.is_empty() {
        return Err(ConfigError::Invalid {
            name: AUTH0_ALGORITHMS_ENV,
            value: raw.to_string(),
        });
    }
    Ok(algorithms)
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    optional(name).ok_or(ConfigError::Missing(name))
}

fn optional(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse<T: FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::Invalid {
        name,
        value: value.to_string(),
    })
}

fn secs(name: &'static str, value: &str) -> Result<Duration, ConfigError> {
    parse(name, value).map(Duration::from_secs)
}
