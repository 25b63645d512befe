use crate::error::ShortenError;
use crate::shortener::{ShortenRequest, ShortenedUrl, Shortener};
use async_trait::async_trait;
use jiff::{SignedDuration, Timestamp};
use snaplink_core::{GenerationError, ShortCode, UrlStore, ValidationError, DEFAULT_TTL};
use snaplink_generator::Generator;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use typed_builder::TypedBuilder;

/// Fixed inputs of the write path.
#[derive(Debug, Clone, TypedBuilder)]
pub struct ShortenerSettings {
    /// Origin that short URLs are composed on, e.g. `https://snap.link`.
    #[builder(setter(into))]
    pub public_base_url: String,
    /// How long a mapping lives in the store.
    #[builder(default = DEFAULT_TTL)]
    pub ttl: Duration,
    /// Upper bound for producing one code.
    #[builder(default = DEFAULT_GENERATION_TIMEOUT)]
    pub generation_timeout: Duration,
}

pub const DEFAULT_GENERATION_TIMEOUT: Duration = Duration::from_secs(1);

/// A concrete implementation of the [`Shortener`] trait.
///
/// The generator is trusted to produce unique codes: the mapping is written
/// with a plain upsert and no existence check, so a collision would silently
/// replace the older mapping. Nothing is retried.
#[derive(Debug)]
pub struct ShortenerService<S, G> {
    store: Arc<S>,
    generator: Arc<G>,
    settings: ShortenerSettings,
}

impl<S, G> Clone for ShortenerService<S, G> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            generator: Arc::clone(&self.generator),
            settings: self.settings.clone(),
        }
    }
}

impl<S: UrlStore, G: Generator> ShortenerService<S, G> {
    pub fn new(store: S, generator: G, settings: ShortenerSettings) -> Self {
        Self {
            store: Arc::new(store),
            generator: Arc::new(generator),
            settings,
        }
    }

    pub fn settings(&self) -> &ShortenerSettings {
        &self.settings
    }

    /// The generator may sleep while waiting on its clock, so it runs on the
    /// blocking pool. On timeout the blocking call is left to finish on its
    /// own and its code is discarded.
    async fn generate_code(&self) -> Result<ShortCode, ShortenError> {
        let generator = Arc::clone(&self.generator);
        let task = tokio::task::spawn_blocking(move || generator.generate());
        let timeout = self.settings.generation_timeout;

        match tokio::time::timeout(timeout, task).await {
            Ok(Ok(generated)) => Ok(generated?.into()),
            Ok(Err(e)) => {
                error!(error = %e, "generator task failed");
                Err(
                    GenerationError::SourceUnavailable(format!("generator task failed: {e}"))
                        .into(),
                )
            }
            Err(_) => {
                error!(timeout = ?timeout, "generator did not produce a code in time");
                Err(GenerationError::SourceUnavailable(format!(
                    "no code produced within {timeout:?}"
                ))
                .into())
            }
        }
    }

    fn expire_at(&self) -> Timestamp {
        SignedDuration::try_from(self.settings.ttl)
            .ok()
            .and_then(|ttl| Timestamp::now().checked_add(ttl).ok())
            .unwrap_or(Timestamp::MAX)
    }
}

#[async_trait]
impl<S: UrlStore, G: Generator> Shortener for ShortenerService<S, G> {
    async fn shorten(&self, request: ShortenRequest) -> Result<ShortenedUrl, ShortenError> {
        if request.url.is_empty() {
            debug!("rejecting shorten request without url");
            return Err(ValidationError::MissingUrl.into());
        }

        let code = self.generate_code().await?;
        let short_url = code.to_url(&self.settings.public_base_url);
        let expire_at = self.expire_at();

        self.store
            .put(&code, &request.url, self.settings.ttl)
            .await
            .inspect_err(|e| warn!(code = %code, error = %e, "failed to store mapping"))?;

        info!(code = %code, url = %request.url, %expire_at, "shortened url");

        Ok(ShortenedUrl {
            code,
            short_url,
            expire_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snaplink_core::store::Result as StoreResult;
    use snaplink_core::StoreError;
    use snaplink_generator::{ObfuscatedTinyflake, Obfuscator};
    use snaplink_storage::InMemoryUrlStore;
    use snaplink_tinyflake::{Clock, SystemClock, Tinyflake, TinyflakeSettings};
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;
    use std::time::Instant;

    const BASE: &str = "http://localhost:3000";

    /// Hands out a fixed list of codes, then fails.
    struct ScriptedGenerator {
        codes: Mutex<VecDeque<&'static str>>,
    }

    impl ScriptedGenerator {
        fn new(codes: impl IntoIterator<Item = &'static str>) -> Self {
            Self {
                codes: Mutex::new(codes.into_iter().collect()),
            }
        }
    }

    impl Generator for ScriptedGenerator {
        type Output = ShortCode;

        fn generate(&self) -> Result<ShortCode, GenerationError> {
            self.codes
                .lock()
                .unwrap()
                .pop_front()
                .map(ShortCode::new_unchecked)
                .ok_or_else(|| GenerationError::Exhausted("script ran out".to_string()))
        }
    }

    /// Real time, except that one armed read comes back `ahead` in the future.
    struct SteppingClock {
        armed: Arc<AtomicBool>,
        ahead: SignedDuration,
    }

    impl Clock for SteppingClock {
        fn now(&self) -> Timestamp {
            let now = Timestamp::now();
            if self.armed.swap(false, Ordering::SeqCst) {
                now + self.ahead
            } else {
                now
            }
        }

        fn wait_until(&self, target: Timestamp) {
            SystemClock.wait_until(target)
        }
    }

    struct DownStore;

    #[async_trait]
    impl UrlStore for DownStore {
        async fn put(&self, _: &ShortCode, _: &str, _: Duration) -> StoreResult<()> {
            Err(StoreError::Unavailable("connection refused".to_string()))
        }

        async fn get(&self, _: &ShortCode) -> StoreResult<String> {
            Err(StoreError::Unavailable("connection refused".to_string()))
        }

        async fn ping(&self) -> StoreResult<()> {
            Err(StoreError::Unavailable("connection refused".to_string()))
        }
    }

    fn settings() -> ShortenerSettings {
        ShortenerSettings::builder().public_base_url(BASE).build()
    }

    fn scripted_service(
        codes: impl IntoIterator<Item = &'static str>,
    ) -> (
        ShortenerService<InMemoryUrlStore, ScriptedGenerator>,
        InMemoryUrlStore,
    ) {
        let store = InMemoryUrlStore::new();
        let service =
            ShortenerService::new(store.clone(), ScriptedGenerator::new(codes), settings());
        (service, store)
    }

    #[tokio::test]
    async fn shorten_composes_short_url_and_stores_raw_url() {
        let (service, store) = scripted_service(["abc123"]);

        let shortened = service
            .shorten(ShortenRequest::new("example.com/page"))
            .await
            .unwrap();

        assert_eq!(shortened.code.as_str(), "abc123");
        assert_eq!(shortened.short_url, "http://localhost:3000/abc123");
        assert_eq!(
            store.get(&ShortCode::new_unchecked("abc123")).await.unwrap(),
            "example.com/page"
        );
    }

    #[tokio::test]
    async fn expiry_is_one_ttl_from_now() {
        let (service, _) = scripted_service(["abc123"]);
        let before = Timestamp::now();

        let shortened = service
            .shorten(ShortenRequest::new("https://example.com"))
            .await
            .unwrap();

        let lifetime = shortened.expire_at.duration_since(before);
        assert!(lifetime >= SignedDuration::from_hours(24));
        assert!(lifetime < SignedDuration::from_hours(24) + SignedDuration::from_secs(5));
    }

    #[tokio::test]
    async fn empty_url_is_rejected_before_generating() {
        let (service, store) = scripted_service(["abc123"]);

        let err = service.shorten(ShortenRequest::new("")).await.unwrap_err();

        assert!(matches!(
            err,
            ShortenError::Validation(ValidationError::MissingUrl)
        ));
        assert_eq!(err.to_string(), "url is missing");
        assert!(store.is_empty());
        // the scripted code is still unused
        assert!(service.shorten(ShortenRequest::new("x")).await.is_ok());
    }

    #[tokio::test]
    async fn generator_failure_surfaces_as_generation_error() {
        let (service, store) = scripted_service([] as [&str; 0]);

        let err = service
            .shorten(ShortenRequest::new("https://example.com"))
            .await
            .unwrap_err();

        assert!(matches!(err, ShortenError::Generation(_)));
        assert!(err.to_string().starts_with("unable to generate short url"));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn store_failure_carries_cause() {
        let service =
            ShortenerService::new(DownStore, ScriptedGenerator::new(["abc123"]), settings());

        let err = service
            .shorten(ShortenRequest::new("https://example.com"))
            .await
            .unwrap_err();

        assert!(matches!(err, ShortenError::Store(StoreError::Unavailable(_))));
        assert!(err.to_string().contains("connection refused"));
    }

    #[tokio::test]
    async fn colliding_code_overwrites_previous_mapping() {
        let (service, store) = scripted_service(["same", "same"]);

        service
            .shorten(ShortenRequest::new("https://first.example.com"))
            .await
            .unwrap();
        service
            .shorten(ShortenRequest::new("https://second.example.com"))
            .await
            .unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(
            store.get(&ShortCode::new_unchecked("same")).await.unwrap(),
            "https://second.example.com"
        );
    }

    #[tokio::test]
    async fn trailing_slash_on_base_is_trimmed() {
        let store = InMemoryUrlStore::new();
        let settings = ShortenerSettings::builder()
            .public_base_url("https://snap.link/")
            .ttl(Duration::from_secs(60))
            .build();
        let service = ShortenerService::new(store, ScriptedGenerator::new(["q1"]), settings);

        let shortened = service
            .shorten(ShortenRequest::new("https://example.com"))
            .await
            .unwrap();
        assert_eq!(shortened.short_url, "https://snap.link/q1");
    }

    #[tokio::test]
    async fn concurrent_shortens_get_distinct_codes() {
        let flake_settings = TinyflakeSettings::builder()
            .node_id(1)
            .start_epoch(Timestamp::now())
            .build();
        let generator = ObfuscatedTinyflake::new(flake_settings, Obfuscator::default()).unwrap();
        let store = InMemoryUrlStore::new();
        let service = ShortenerService::new(store.clone(), generator, settings());

        let mut handles = vec![];
        for i in 0..50 {
            let service = service.clone();
            handles.push(tokio::spawn(async move {
                service
                    .shorten(ShortenRequest::new(format!("https://example.com/{i}")))
                    .await
                    .unwrap()
            }));
        }

        let mut codes = std::collections::HashSet::new();
        for handle in handles {
            codes.insert(handle.await.unwrap().code);
        }
        assert_eq!(codes.len(), 50);
        assert_eq!(store.len(), 50);
    }

    #[tokio::test]
    async fn waiting_generator_does_not_stall_other_tasks() {
        let armed = Arc::new(AtomicBool::new(false));
        let clock = SteppingClock {
            armed: Arc::clone(&armed),
            ahead: SignedDuration::from_secs(2),
        };
        let flake_settings = TinyflakeSettings::builder()
            .node_id(0)
            .start_epoch(Timestamp::now())
            .build();
        let generator = Tinyflake::with_clock(flake_settings, clock).unwrap();
        let settings = ShortenerSettings::builder()
            .public_base_url(BASE)
            .generation_timeout(Duration::from_millis(100))
            .build();
        let service = ShortenerService::new(InMemoryUrlStore::new(), generator, settings);

        // the first id is stamped 2s ahead, so the next one has to wait for it
        armed.store(true, Ordering::SeqCst);
        service
            .shorten(ShortenRequest::new("https://first.example.com"))
            .await
            .unwrap();

        let ticker = tokio::spawn(async {
            let started = Instant::now();
            tokio::time::sleep(Duration::from_millis(10)).await;
            started.elapsed()
        });

        let started = Instant::now();
        let err = service
            .shorten(ShortenRequest::new("https://second.example.com"))
            .await
            .unwrap_err();

        assert!(matches!(err, ShortenError::Generation(_)), "{err:?}");
        assert!(started.elapsed() < Duration::from_secs(1));
        assert!(ticker.await.unwrap() < Duration::from_secs(1));
    }
}
