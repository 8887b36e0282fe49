//! Outline generation: prompt construction, the outbound text service, and
//! recovery of a schema-valid outline from whatever text comes back.

pub mod fallback;
pub mod prompt;
pub mod requester;
pub mod text_service;
pub mod validator;

pub use requester::OutlineRequester;
pub use text_service::{GeminiTextService, GenerationError, TextService};
