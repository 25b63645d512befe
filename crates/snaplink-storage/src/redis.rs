use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, RedisResult};
use snaplink_core::store::Result;
use snaplink_core::{ShortCode, StoreError, UrlStore};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, info, trace, warn};
use typed_builder::TypedBuilder;
use url::Url;

/// Connection settings for [`RedisUrlStore`].
#[derive(Debug, Clone, TypedBuilder)]
pub struct RedisSettings {
    /// `host:port` of the Redis server.
    #[builder(setter(into))]
    pub addr: String,
    /// Password for `AUTH`, if the server requires one.
    #[builder(default, setter(strip_option, into))]
    pub password: Option<String>,
    /// Logical database index.
    #[builder(default)]
    pub db: i64,
    /// Prepended to every code to form the Redis key.
    #[builder(default, setter(into))]
    pub key_prefix: String,
    /// Upper bound for a single round-trip, connection setup included.
    #[builder(default = Duration::from_secs(2))]
    pub op_timeout: Duration,
}

impl RedisSettings {
    /// Builds the `redis://` connection url, percent-encoding the password.
    pub fn connection_url(&self) -> Result<Url> {
        let mut url = Url::parse(&format!("redis://{}/{}", self.addr, self.db)).map_err(|e| {
            StoreError::Unavailable(format!("invalid redis address '{}': {e}", self.addr))
        })?;
        if let Some(password) = &self.password {
            url.set_password(Some(password)).map_err(|()| {
                StoreError::Unavailable(format!(
                    "cannot attach credentials to redis address '{}'",
                    self.addr
                ))
            })?;
        }
        Ok(url)
    }
}

/// A Redis-backed [`UrlStore`].
///
/// Values are the raw long URLs written with `SET key value EX <seconds>`,
/// so Redis owns expiry. The [`ConnectionManager`] reconnects on its own and
/// is shared by cloning.
#[derive(Clone)]
pub struct RedisUrlStore {
    conn: ConnectionManager,
    key_prefix: String,
    op_timeout: Duration,
}

impl std::fmt::Debug for RedisUrlStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisUrlStore")
            .field("key_prefix", &self.key_prefix)
            .field("op_timeout", &self.op_timeout)
            .finish_non_exhaustive()
    }
}

fn map_redis_error(operation: &str, err: redis::RedisError) -> StoreError {
    let message = format!("{operation}: {err}");
    if err.is_timeout() {
        StoreError::Timeout(message)
    } else {
        StoreError::Unavailable(message)
    }
}

/// Redis `EX` only takes whole seconds; round up and never go below one.
fn ttl_seconds(ttl: Duration) -> u64 {
    let rounded = ttl
        .as_secs()
        .saturating_add(u64::from(ttl.subsec_nanos() > 0));
    rounded.max(1)
}

impl RedisUrlStore {
    /// Connects to Redis and checks the connection with a `PING`.
    ///
    /// Fails if the server cannot be reached within `op_timeout`.
    pub async fn connect(settings: RedisSettings) -> Result<Self> {
        let url = settings.connection_url()?;
        info!(addr = %settings.addr, db = settings.db, "connecting to redis");

        let client = redis::Client::open(url.as_str())
            .map_err(|e| map_redis_error("failed to create redis client", e))?;

        let conn = match tokio::time::timeout(settings.op_timeout, ConnectionManager::new(client))
            .await
        {
            Ok(Ok(conn)) => conn,
            Ok(Err(e)) => return Err(map_redis_error("failed to connect to redis", e)),
            Err(_) => {
                return Err(StoreError::Timeout(format!(
                    "failed to connect to redis: no reply within {:?}",
                    settings.op_timeout
                )))
            }
        };

        let store = Self {
            conn,
            key_prefix: settings.key_prefix,
            op_timeout: settings.op_timeout,
        };
        store.ping().await?;
        info!(addr = %settings.addr, "connected to redis");

        Ok(store)
    }

    /// Generates the Redis key for a short code.
    fn key(&self, code: &ShortCode) -> String {
        format!("{}{}", self.key_prefix, code.as_str())
    }

    async fn bounded<T>(
        &self,
        operation: &str,
        fut: impl Future<Output = RedisResult<T>>,
    ) -> Result<T> {
        match tokio::time::timeout(self.op_timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(map_redis_error(operation, e)),
            Err(_) => Err(StoreError::Timeout(format!(
                "{operation}: no reply within {:?}",
                self.op_timeout
            ))),
        }
    }
}

#[async_trait]
impl UrlStore for RedisUrlStore {
    async fn put(&self, code: &ShortCode, url: &str, ttl: Duration) -> Result<()> {
        let key = self.key(code);
        let seconds = ttl_seconds(ttl);
        trace!(code = %code, ttl_secs = seconds, "writing mapping to redis");

        let mut conn = self.conn.clone();
        let result = self
            .bounded(
                "failed to write value to redis",
                conn.set_ex::<_, _, ()>(&key, url, seconds),
            )
            .await;

        match result {
            Ok(()) => {
                debug!(code = %code, ttl_secs = seconds, "stored mapping in redis");
                Ok(())
            }
            Err(e) => {
                warn!(code = %code, error = %e, "redis error on set");
                Err(e)
            }
        }
    }

    async fn get(&self, code: &ShortCode) -> Result<String> {
        let key = self.key(code);
        trace!(code = %code, "fetching mapping from redis");

        let mut conn = self.conn.clone();
        let value = self
            .bounded(
                "failed to fetch value from redis",
                conn.get::<_, Option<Vec<u8>>>(&key),
            )
            .await
            .inspect_err(|e| warn!(code = %code, error = %e, "redis error on get"))?;

        let Some(bytes) = value else {
            trace!(code = %code, "miss in redis");
            return Err(StoreError::NotFound);
        };

        String::from_utf8(bytes).map_err(|e| {
            warn!(code = %code, error = %e, "stored value is not utf-8");
            StoreError::InvalidData(format!("value for key '{key}' is not utf-8: {e}"))
        })
    }

    async fn ping(&self) -> Result<()> {
        let mut conn = self.conn.clone();
        self.bounded("redis ping failed", conn.ping::<()>()).await
    }
}
