//! Runs [`RedisUrlStore`] against a real Redis container.
//!
//! Container tests need Docker: `cargo test -p snaplink-storage -- --ignored`.

use redis::AsyncCommands;
use snaplink_core::{ShortCode, StoreError, UrlStore};
use snaplink_storage::{RedisSettings, RedisUrlStore};
use snaplink_test_infra::redis::{RedisServer, RedisServerConfig};
use std::time::Duration;

/// Test fixture that owns the container and connects stores to it.
struct RedisFixture {
    server: RedisServer,
}

impl RedisFixture {
    async fn start() -> Self {
        Self::start_with(RedisServerConfig::default()).await
    }

    async fn start_with(config: RedisServerConfig) -> Self {
        let server = RedisServer::start(config)
            .await
            .expect("Failed to start Redis container");
        Self { server }
    }

    fn settings(&self, addr: String) -> RedisSettings {
        match self.server.password() {
            Some(password) => RedisSettings::builder()
                .addr(addr)
                .password(password)
                .build(),
            None => RedisSettings::builder().addr(addr).build(),
        }
    }

    async fn store(&self) -> RedisUrlStore {
        let addr = self.server.addr().await.expect("Failed to get Redis address");
        RedisUrlStore::connect(self.settings(addr))
            .await
            .expect("Failed to connect store")
    }
}

fn code(s: &str) -> ShortCode {
    ShortCode::new_unchecked(s)
}

#[tokio::test]
#[ignore = "requires docker"]
async fn put_then_get_round_trips() {
    let fixture = RedisFixture::start().await;
    let store = fixture.store().await;

    store
        .put(&code("abc123"), "example.com/page", Duration::from_secs(60))
        .await
        .unwrap();

    assert_eq!(store.get(&code("abc123")).await.unwrap(), "example.com/page");
}

#[tokio::test]
#[ignore = "requires docker"]
async fn value_is_stored_raw_with_expiry() {
    let fixture = RedisFixture::start().await;
    let store = fixture.store().await;

    store
        .put(&code("raw"), "example.com/unnormalized", Duration::from_secs(86_400))
        .await
        .unwrap();

    let mut conn = fixture.server.connection().await.unwrap();
    let raw: String = conn.get("raw").await.unwrap();
    assert_eq!(raw, "example.com/unnormalized");

    let ttl: i64 = conn.ttl("raw").await.unwrap();
    assert!((86_390..=86_400).contains(&ttl), "unexpected ttl {ttl}");
}

#[tokio::test]
#[ignore = "requires docker"]
async fn missing_key_is_not_found() {
    let fixture = RedisFixture::start().await;
    let store = fixture.store().await;

    let err = store.get(&code("never-created")).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound));
}

#[tokio::test]
#[ignore = "requires docker"]
async fn mapping_expires_after_ttl() {
    let fixture = RedisFixture::start().await;
    let store = fixture.store().await;

    store
        .put(&code("short-lived"), "https://example.com", Duration::from_secs(1))
        .await
        .unwrap();
    assert!(store.get(&code("short-lived")).await.is_ok());

    tokio::time::sleep(Duration::from_millis(2_100)).await;

    let err = store.get(&code("short-lived")).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound));
}

#[tokio::test]
#[ignore = "requires docker"]
async fn second_put_overwrites_first() {
    let fixture = RedisFixture::start().await;
    let store = fixture.store().await;

    store
        .put(&code("dup"), "https://first.example.com", Duration::from_secs(60))
        .await
        .unwrap();
    store
        .put(&code("dup"), "https://second.example.com", Duration::from_secs(60))
        .await
        .unwrap();

    assert_eq!(store.get(&code("dup")).await.unwrap(), "https://second.example.com");
}

#[tokio::test]
#[ignore = "requires docker"]
async fn key_prefix_isolates_stores() {
    let fixture = RedisFixture::start().await;
    let addr = fixture.server.addr().await.unwrap();

    let first = RedisUrlStore::connect(
        RedisSettings::builder()
            .addr(addr.clone())
            .key_prefix("one:")
            .build(),
    )
    .await
    .unwrap();
    let second = RedisUrlStore::connect(
        RedisSettings::builder()
            .addr(addr)
            .key_prefix("two:")
            .build(),
    )
    .await
    .unwrap();

    first
        .put(&code("shared"), "https://example.com", Duration::from_secs(60))
        .await
        .unwrap();

    assert!(first.get(&code("shared")).await.is_ok());
    assert!(matches!(
        second.get(&code("shared")).await,
        Err(StoreError::NotFound)
    ));
}

#[tokio::test]
#[ignore = "requires docker"]
async fn password_protected_server() {
    let fixture = RedisFixture::start_with(
        RedisServerConfig::builder().password("s3cret@pass").build(),
    )
    .await;
    let store = fixture.store().await;

    store.ping().await.unwrap();
    store
        .put(&code("auth"), "https://example.com", Duration::from_secs(60))
        .await
        .unwrap();
    assert!(store.get(&code("auth")).await.is_ok());
}

#[tokio::test]
#[ignore = "requires docker"]
async fn wrong_password_fails_at_connect() {
    let fixture = RedisFixture::start_with(
        RedisServerConfig::builder().password("right").build(),
    )
    .await;
    let addr = fixture.server.addr().await.unwrap();

    let result = RedisUrlStore::connect(
        RedisSettings::builder()
            .addr(addr)
            .password("wrong")
            .build(),
    )
    .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn unreachable_server_fails_fast() {
    let result = RedisUrlStore::connect(
        RedisSettings::builder()
            .addr("127.0.0.1:1")
            .op_timeout(Duration::from_millis(500))
            .build(),
    )
    .await;
    assert!(matches!(
        result,
        Err(StoreError::Unavailable(_) | StoreError::Timeout(_))
    ));
}
