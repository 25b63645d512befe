use clap::{Parser, ValueEnum};
use snaplink_shortener::ShortenerSettings;
use snaplink_storage::RedisSettings;
use snaplink_tinyflake::MAX_NODE_ID;
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;
use url::Url;

pub const LISTEN_ADDR_ENV: &str = "SNAPLINK_LISTEN_ADDR";
pub const PUBLIC_BASE_URL_ENV: &str = "SNAPLINK_PUBLIC_BASE_URL";
pub const TTL_SECS_ENV: &str = "SNAPLINK_TTL_SECS";
pub const STORE_BACKEND_ENV: &str = "SNAPLINK_STORE";
pub const REDIS_ADDR_ENV: &str = "SNAPLINK_REDIS_ADDR";
pub const REDIS_PASSWORD_ENV: &str = "SNAPLINK_REDIS_PASSWORD";
pub const REDIS_DB_ENV: &str = "SNAPLINK_REDIS_DB";
pub const REDIS_KEY_PREFIX_ENV: &str = "SNAPLINK_REDIS_KEY_PREFIX";
pub const STORE_TIMEOUT_MS_ENV: &str = "SNAPLINK_STORE_TIMEOUT_MS";
pub const NODE_ID_ENV: &str = "SNAPLINK_NODE_ID";
pub const LOG_FORMAT_ENV: &str = "SNAPLINK_LOG_FORMAT";

pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_PUBLIC_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_TTL_SECS: u64 = 24 * 60 * 60;
/// Ten years. Far below the point where Redis rejects `SET EX`.
pub const MAX_TTL_SECS: u64 = 10 * 365 * 24 * 60 * 60;
pub const DEFAULT_REDIS_ADDR: &str = "127.0.0.1:6379";
pub const DEFAULT_STORE_TIMEOUT_MS: u64 = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StoreBackendArg {
    #[value(name = "redis")]
    Redis,
    #[value(name = "in-memory")]
    InMemory,
}

impl Display for StoreBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreBackendArg::Redis => write!(f, "redis"),
            StoreBackendArg::InMemory => write!(f, "in-memory"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

impl Display for LogFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Text => write!(f, "text"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "snaplink", about = "URL shortener with expiring links")]
pub struct CLI {
    #[arg(long, env = LISTEN_ADDR_ENV, default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: SocketAddr,

    /// Origin that short URLs are composed on.
    #[arg(long, env = PUBLIC_BASE_URL_ENV, default_value = DEFAULT_PUBLIC_BASE_URL)]
    pub public_base_url: String,

    /// Lifetime of a mapping in seconds.
    #[arg(long, env = TTL_SECS_ENV, default_value_t = DEFAULT_TTL_SECS)]
    pub ttl_secs: u64,

    #[arg(
        long,
        env = STORE_BACKEND_ENV,
        value_enum,
        default_value_t = StoreBackendArg::Redis
    )]
    pub store: StoreBackendArg,

    #[arg(long, env = REDIS_ADDR_ENV, default_value = DEFAULT_REDIS_ADDR)]
    pub redis_addr: String,

    #[arg(long, env = REDIS_PASSWORD_ENV, hide_env_values = true)]
    pub redis_password: Option<String>,

    #[arg(long, env = REDIS_DB_ENV, default_value_t = 0)]
    pub redis_db: i64,

    #[arg(long, env = REDIS_KEY_PREFIX_ENV, default_value = "")]
    pub redis_key_prefix: String,

    /// Upper bound for one store round-trip, in milliseconds.
    #[arg(long, env = STORE_TIMEOUT_MS_ENV, default_value_t = DEFAULT_STORE_TIMEOUT_MS)]
    pub store_timeout_ms: u64,

    /// Generator node index, unique per running instance.
    #[arg(long, env = NODE_ID_ENV, default_value_t = 0)]
    pub node_id: u8,

    #[arg(
        long,
        env = LOG_FORMAT_ENV,
        value_enum,
        default_value_t = LogFormat::Text
    )]
    pub log_format: LogFormat,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid public base url '{url}': {reason}")]
    InvalidPublicBaseUrl { url: String, reason: String },
    #[error("ttl must be greater than zero")]
    ZeroTtl,
    #[error("ttl of {ttl_secs}s exceeds the maximum of {max_ttl_secs}s")]
    TtlTooLong { ttl_secs: u64, max_ttl_secs: u64 },
    #[error("store timeout must be greater than zero")]
    ZeroStoreTimeout,
    #[error("node id {node_id} is out of range (max {max_node_id})")]
    NodeIdOutOfRange { node_id: u8, max_node_id: u8 },
}

#[derive(Debug, Clone)]
pub enum StoreConfig {
    InMemory,
    Redis(RedisSettings),
}

/// Validated startup configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub listen_addr: SocketAddr,
    pub shortener: ShortenerSettings,
    pub store: StoreConfig,
    pub node_id: u8,
    pub log_format: LogFormat,
}

fn validate_public_base_url(raw: &str) -> Result<(), ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidPublicBaseUrl {
        url: raw.to_string(),
        reason,
    };
    let url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(invalid("missing host".to_string()));
    }
    Ok(())
}

impl CLI {
    pub fn into_config(self) -> Result<GatewayConfig, ConfigError> {
        validate_public_base_url(&self.public_base_url)?;
        if self.ttl_secs == 0 {
            return Err(ConfigError::ZeroTtl);
        }
        if self.ttl_secs > MAX_TTL_SECS {
            return Err(ConfigError::TtlTooLong {
                ttl_secs: self.ttl_secs,
                max_ttl_secs: MAX_TTL_SECS,
            });
        }
        if self.store_timeout_ms == 0 {
            return Err(ConfigError::ZeroStoreTimeout);
        }
        if self.node_id > MAX_NODE_ID {
            return Err(ConfigError::NodeIdOutOfRange {
                node_id: self.node_id,
                max_node_id: MAX_NODE_ID,
            });
        }

        let store = match self.store {
            StoreBackendArg::InMemory => StoreConfig::InMemory,
            StoreBackendArg::Redis => StoreConfig::Redis(RedisSettings {
                addr: self.redis_addr,
                password: self.redis_password,
                db: self.redis_db,
                key_prefix: self.redis_key_prefix,
                op_timeout: Duration::from_millis(self.store_timeout_ms),
            }),
        };

        Ok(GatewayConfig {
            listen_addr: self.listen_addr,
            shortener: ShortenerSettings::builder()
                .public_base_url(self.public_base_url)
                .ttl(Duration::from_secs(self.ttl_secs))
                .build(),
            store,
            node_id: self.node_id,
            log_format: self.log_format,
        })
    }
}
