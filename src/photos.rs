//! Stock photo lookup for generated recipes.

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use crate::constants::OUTBOUND_TIMEOUT;

/// Errors from the photo search API.
#[derive(Error, Debug)]
pub enum PhotoError {
    /// Couldn't reach the API or read its response.
    #[error("photo search request failed: {0}")]
    Transport(String),

    /// The API answered with a non-success status.
    #[error("photo search returned status {0}")]
    Status(u16),

    /// The configured base URL is unusable.
    #[error("invalid photo search URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl From<reqwest::Error> for PhotoError {
    fn from(err: reqwest::Error) -> Self {
        PhotoError::Transport(err.to_string())
    }
}

/// A photo search API returning the first result's URL.
#[async_trait]
pub trait PhotoSearch: Send + Sync {
    /// Searches for one photo, `None` when there are no results.
    async fn search(&self, query: &str) -> Result<Option<String>, PhotoError>;
}

#[derive(Deserialize, Debug)]
struct PexelsSearchResponse {
    #[serde(default)]
    photos: Vec<PexelsPhoto>,
}

#[derive(Deserialize, Debug)]
struct PexelsPhoto {
    src: PexelsSource,
}

#[derive(Deserialize, Debug)]
struct PexelsSource {
    large: String,
}

impl PexelsSearchResponse {
    fn first_large_url(self) -> Option<String> {
        self.photos.into_iter().next().map(|photo| photo.src.large)
    }
}

/// Client for the Pexels search API.
#[derive(Clone, Debug)]
pub struct PexelsClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl PexelsClient {
    /// Builds a client for the given key and API base.
    pub fn new(api_key: &str, base_url: &str) -> Result<Self, PhotoError> {
        let client = reqwest::Client::builder()
            .timeout(OUTBOUND_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn search_url(&self, query: &str) -> Result<Url, PhotoError> {
        Ok(Url::parse_with_params(
            &format!("{}/search", self.base_url),
            &[("query", query), ("per_page", "1")],
        )?)
    }
}

#[async_trait]
impl PhotoSearch for PexelsClient {
    async fn search(&self, query: &str) -> Result<Option<String>, PhotoError> {
        let url = self.search_url(query)?;
        let resp = self
            .client
            .get(url)
            .header(reqwest::header::AUTHORIZATION, &self.api_key)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(PhotoError::Status(status.as_u16()));
        }

        let parsed: PexelsSearchResponse = resp.json().await?;
        Ok(parsed.first_large_url())
    }
}

/// Looks up a photo for a recipe, falling back to `placeholder` on any problem.
pub async fn fetch_image_for_recipe(
    search: &dyn PhotoSearch,
    search_phrase: &str,
    placeholder: &str,
) -> String {
    let phrase = search_phrase.trim();
    if phrase.is_empty() {
        return placeholder.to_string();
    }

    match search.search(phrase).await {
        Ok(Some(url)) if !url.trim().is_empty() => url,
        Ok(_) => {
            debug!(query = phrase, "No photo found, using placeholder");
            placeholder.to_string()
        }
        Err(err) => {
            warn!(query = phrase, "Photo search failed: {}", err);
            placeholder.to_string()
        }
    }
}
