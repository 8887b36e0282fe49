use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tokio::sync::Semaphore;

use super::service::{ImageFetchError, ImageService};
use crate::models::outline::Outline;

pub const DEFAULT_IMAGE_TIMEOUT: Duration = Duration::from_secs(20);
pub const DEFAULT_IMAGE_CONCURRENCY: usize = 4;
const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_millis(500);

/// Fetches one illustration per slide with bounded concurrency. A failed
/// slide simply keeps `image_path == None`.
#[derive(Clone)]
pub struct ImageEnricher {
    service: Arc<dyn ImageService>,
    image_dir: PathBuf,
    timeout: Duration,
    concurrency: usize,
    retry_backoff: Duration,
}

/// Owns the image files attached to an outline and removes them when
/// dropped, so they go away whether assembly finishes, fails, or the
/// request is abandoned.
#[must_use]
#[derive(Debug)]
pub struct FetchedImages {
    paths: Vec<PathBuf>,
}

impl FetchedImages {
    pub fn of(outline: &Outline) -> Self {
        Self {
            paths: outline
                .slides
                .iter()
                .filter_map(|s| s.image_path.clone())
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl Drop for FetchedImages {
    fn drop(&mut self) {
        for path in &self.paths {
            match std::fs::remove_file(path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => log::warn!("Failed to remove image {}: {e}", path.display()),
            }
        }
    }
}

pub fn image_prompt(topic: &str, slide_title: &str) -> String {
    format!(
        "professional presentation slide illustration about {slide_title}, in the context of {topic}, \
         clean modern corporate design, informative content"
    )
}

impl ImageEnricher {
    pub fn new(
        service: Arc<dyn ImageService>,
        image_dir: impl Into<PathBuf>,
        timeout: Duration,
        concurrency: usize,
    ) -> Self {
        Self {
            service,
            image_dir: image_dir.into(),
            timeout,
            concurrency: concurrency.max(1),
            retry_backoff: DEFAULT_RETRY_BACKOFF,
        }
    }

    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }

    pub fn image_dir(&self) -> &Path {
        &self.image_dir
    }

    pub async fn enrich(&self, mut outline: Outline, include_images: bool) -> Outline {
        if !include_images || outline.slides.is_empty() {
            return outline;
        }
        if let Err(e) = tokio::fs::create_dir_all(&self.image_dir).await {
            log::warn!(
                "Image directory {} unavailable, continuing without images: {e}",
                self.image_dir.display()
            );
            return outline;
        }

        let prompts: Vec<String> = outline
            .slides
            .iter()
            .map(|slide| image_prompt(&outline.topic, &slide.title))
            .collect();

        let semaphore = Semaphore::new(self.concurrency);
        let semaphore = &semaphore;
        let fetches = prompts.into_iter().enumerate().map(|(index, prompt)| async move {
            let result = match semaphore.acquire().await {
                Ok(_permit) => self.fetch_and_store(index, &prompt).await,
                Err(e) => Err(ImageFetchError::Transport(e.to_string())),
            };
            (index, result)
        });
        let results = futures::future::join_all(fetches).await;

        for (index, result) in results {
            match result {
                Ok(path) => outline.slides[index].image_path = Some(path),
                Err(e) => log::warn!("Image for slide {} skipped: {e}", index + 1),
            }
        }

        log::info!(
            "Image enrichment attached {} of {} images",
            outline.images_attached(),
            outline.slides.len()
        );
        outline
    }

    async fn fetch_and_store(&self, index: usize, prompt: &str) -> Result<PathBuf, ImageFetchError> {
        let bytes = match self.fetch_once(prompt).await {
            Err(e) if e.is_transient() => {
                let jitter_ms = rand::rng().random_range(0..=self.retry_backoff.as_millis() as u64 / 2);
                let delay = self.retry_backoff + Duration::from_millis(jitter_ms);
                log::info!("Retrying image for slide {} in {delay:?}: {e}", index + 1);
                tokio::time::sleep(delay).await;
                self.fetch_once(prompt).await?
            }
            other => other?,
        };

        if bytes.is_empty() {
            return Err(ImageFetchError::Empty);
        }

        let token = hex::encode(rand::rng().random::<[u8; 8]>());
        let path = self.image_dir.join(format!("slide-{}-{token}.img", index + 1));
        tokio::fs::write(&path, &bytes).await?;
        Ok(path)
    }

    async fn fetch_once(&self, prompt: &str) -> Result<Vec<u8>, ImageFetchError> {
        tokio::time::timeout(self.timeout, self.service.generate(prompt))
            .await
            .map_err(|_| ImageFetchError::Timeout(self.timeout))?
    }
}
