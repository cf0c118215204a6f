/*
 * Responsibility
 * - 環境変数からの設定読み込み (PORT, APP_ENV, Auth 設定, HTTP limits)
 * - 設定値のバリデーション (不足・矛盾なら起動失敗)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(value: Option<String>) -> Self {
        match value
            .unwrap_or_else(|| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Key material used to verify bearer tokens.
#[derive(Clone, PartialEq, Eq)]
pub enum SignerKey {
    /// Ed25519 public key, EdDSA tokens
    EdPublicPem(String),
    /// Shared secret, HS256 tokens
    Secret(String),
}

impl fmt::Debug for SignerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignerKey::EdPublicPem(_) => f.write_str("EdPublicPem(..)"),
            SignerKey::Secret(_) => f.write_str("Secret(..)"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// `None` disables authentication entirely (bypass mode)
    pub key: Option<SignerKey>,
    pub issuer: Option<String>,
    pub audience: Option<String>,
    pub leeway_seconds: u64,
}

/// Limits applied to every HTTP request, authenticated or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpConfig {
    /// Bounds the time to the response head only; websocket sessions outlive it
    pub request_timeout: Duration,
    pub body_limit_bytes: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            // no endpoint here accepts a body
            body_limit_bytes: 64 * 1024,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    pub auth: AuthConfig,
    pub http: HttpConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_empty = |key: &str| var(key).filter(|v| !v.trim().is_empty());

        let port: u16 = match var("PORT") {
            Some(s) => s.parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 3000,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(var("APP_ENV"));

        let public_key_pem = non_empty("AUTH_PUBLIC_KEY_PEM").map(|pem| pem.replace("\\n", "\n"));
        let secret = non_empty("AUTH_JWT_SECRET");

        let key = match (public_key_pem, secret) {
            (Some(_), Some(_)) => return Err(ConfigError::Invalid("AUTH_JWT_SECRET")),
            (Some(pem), None) => Some(SignerKey::EdPublicPem(pem)),
            (None, Some(secret)) => Some(SignerKey::Secret(secret)),
            (None, None) => None,
        };

        // Bypass mode is an operational switch for local development only
        if key.is_none() && app_env.is_production() {
            return Err(ConfigError::Missing("AUTH_PUBLIC_KEY_PEM"));
        }

        let leeway_seconds = match var("AUTH_LEEWAY_SECONDS") {
            Some(s) => s
                .parse::<u64>()
                .map_err(|_| ConfigError::Invalid("AUTH_LEEWAY_SECONDS"))?,
            None => 60,
        };

        let defaults = HttpConfig::default();
        let request_timeout = match var("HTTP_TIMEOUT_SECONDS") {
            Some(s) => s
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .ok_or(ConfigError::Invalid("HTTP_TIMEOUT_SECONDS"))?,
            None => defaults.request_timeout,
        };
        let body_limit_bytes = match var("HTTP_BODY_LIMIT_BYTES") {
            Some(s) => s
                .parse::<usize>()
                .map_err(|_| ConfigError::Invalid("HTTP_BODY_LIMIT_BYTES"))?,
            None => defaults.body_limit_bytes,
        };

        Ok(Self {
            addr,
            app_env,
            http: HttpConfig {
                request_timeout,
                body_limit_bytes,
            },
            auth: AuthConfig {
                key,
                issuer: non_empty("AUTH_ISSUER"),
                audience: non_empty("AUTH_AUDIENCE"),
                leeway_seconds,
            },
        })
    }
}
