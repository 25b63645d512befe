use crate::error::Result;
use testcontainers::core::{IntoContainerPort, WaitFor};
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, GenericImage, ImageExt};
use typed_builder::TypedBuilder;

const REDIS_PORT: u16 = 6379;

/// How to start a [`RedisServer`].
#[derive(Debug, Clone, TypedBuilder)]
pub struct RedisServerConfig {
    #[builder(default = "7.4".to_string(), setter(into))]
    pub tag: String,
    /// Passed as `--requirepass` when set.
    #[builder(default, setter(strip_option, into))]
    pub password: Option<String>,
}

impl Default for RedisServerConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// A single throwaway Redis server. The container stops when this is dropped.
pub struct RedisServer {
    container: ContainerAsync<GenericImage>,
    password: Option<String>,
}

impl RedisServer {
    pub async fn start(config: RedisServerConfig) -> Result<Self> {
        let image = GenericImage::new("redis", &config.tag)
            .with_exposed_port(REDIS_PORT.tcp())
            .with_wait_for(WaitFor::message_on_stdout("Ready to accept connections"));

        let mut cmd = vec!["redis-server".to_string()];
        if let Some(password) = &config.password {
            cmd.push("--requirepass".to_string());
            cmd.push(password.clone());
        }

        let container = image.with_cmd(cmd).start().await?;

        Ok(Self {
            container,
            password: config.password,
        })
    }

    pub async fn host(&self) -> Result<String> {
        let host = self.container.get_host().await?.to_string();

        Ok(match host.as_str() {
            "localhost" => String::from("127.0.0.1"),
            _ => host,
        })
    }

    pub async fn port(&self) -> Result<u16> {
        Ok(self.container.get_host_port_ipv4(REDIS_PORT).await?)
    }

    /// `host:port` as seen from the test process.
    pub async fn addr(&self) -> Result<String> {
        Ok(format!("{}:{}", self.host().await?, self.port().await?))
    }

    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    /// Opens a plain multiplexed connection, for poking at raw keys.
    pub async fn connection(&self) -> Result<redis::aio::MultiplexedConnection> {
        let auth = match &self.password {
            Some(password) => format!(":{password}@"),
            None => String::new(),
        };
        let url = format!("redis://{auth}{}", self.addr().await?);
        let client = redis::Client::open(url.as_str())?;
        Ok(client.get_multiplexed_async_connection().await?)
    }

    /// Returns the underlying container reference.
    pub fn container(&self) -> &ContainerAsync<GenericImage> {
        &self.container
    }
}
