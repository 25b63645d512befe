use serde::Deserialize;

/// Body of `POST /short`. A missing or `null` `url` reads as empty and is
/// rejected by the shortener.
#[derive(Debug, Deserialize)]
pub struct ShortenBody {
    #[serde(default)]
    pub url: Option<String>,
}
