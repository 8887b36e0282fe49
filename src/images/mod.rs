pub mod enricher;
pub mod service;

pub use enricher::{FetchedImages, ImageEnricher};
pub use service::{ImageFetchError, ImageService, PollinationsImageService};
