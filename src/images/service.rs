use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use reqwest::Client;
use thiserror::Error;

pub const DEFAULT_IMAGE_SERVICE_URL: &str = "https://image.pollinations.ai/prompt";

#[derive(Debug, Error)]
pub enum ImageFetchError {
    #[error("image request timed out after {0:?}")]
    Timeout(Duration),
    #[error("image service returned HTTP {0}")]
    Status(u16),
    #[error("image request failed: {0}")]
    Transport(String),
    #[error("image service returned an empty body")]
    Empty,
    #[error("failed to store image: {0}")]
    Io(#[from] std::io::Error),
}

impl ImageFetchError {
    /// Rate limiting, server errors and timeouts get one more attempt.
    pub fn is_transient(&self) -> bool {
        match self {
            ImageFetchError::Timeout(_) | ImageFetchError::Transport(_) => true,
            ImageFetchError::Status(status) => *status == 429 || *status >= 500,
            ImageFetchError::Empty | ImageFetchError::Io(_) => false,
        }
    }
}

#[async_trait]
pub trait ImageService: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<Vec<u8>, ImageFetchError>;
}

/// `GET {base}/{url-encoded prompt}?width=..&height=..` returning image bytes.
#[derive(Clone)]
pub struct PollinationsImageService {
    client: Client,
    base_url: String,
    width: u32,
    height: u32,
}

impl PollinationsImageService {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            width: 1024,
            height: 768,
        }
    }

    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    fn request_url(&self, prompt: &str, seed: u32) -> String {
        format!(
            "{}/{}?width={}&height={}&nologo=true&seed={seed}",
            self.base_url,
            urlencoding::encode(prompt),
            self.width,
            self.height,
        )
    }
}

#[async_trait]
impl ImageService for PollinationsImageService {
    async fn generate(&self, prompt: &str) -> Result<Vec<u8>, ImageFetchError> {
        let seed: u32 = rand::rng().random_range(1..=1_000_000);
        let response = self
            .client
            .get(self.request_url(prompt, seed))
            .send()
            .await
            .map_err(|e| ImageFetchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ImageFetchError::Status(status.as_u16()));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ImageFetchError::Transport(e.to_string()))?;
        if bytes.is_empty() {
            return Err(ImageFetchError::Empty);
        }
        Ok(bytes.to_vec())
    }
}
